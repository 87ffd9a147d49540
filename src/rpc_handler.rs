//! RPC method handler for the pocketlinks JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a method call to the bookmark store of an
//! [`App`]; `event_message` renders store notifications as protocol lines.

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_store::{BookmarkStoreTrait, StoreEvent};

fn required_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn optional_str<'a>(params: &'a Value, key: &str) -> &'a str {
    params.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &mut App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Links ───
        "link.add" => {
            let url = required_str(params, "url")?;
            let title = optional_str(params, "title");
            let description = optional_str(params, "description");
            let link = app
                .store
                .add_link(url, title, description)
                .map_err(|e| e.to_string())?;
            serde_json::to_value(link).map_err(|e| e.to_string())
        }
        "link.update" => {
            let id = required_str(params, "id")?;
            let url = required_str(params, "url")?;
            let title = optional_str(params, "title");
            let description = optional_str(params, "description");
            let updated = app
                .store
                .update_link(id, url, title, description)
                .map_err(|e| e.to_string())?;
            Ok(json!({"updated": updated}))
        }
        "link.delete" => {
            let id = required_str(params, "id")?;
            let deleted = app.store.delete_link(id);
            Ok(json!({"deleted": deleted}))
        }
        "link.list" => serde_json::to_value(app.store.links()).map_err(|e| e.to_string()),

        // ─── Store ───
        "store.status" => Ok(json!({
            "loading": app.store.is_loading(),
            "count": app.store.len(),
            "backend": app.store.backend(),
        })),

        _ => Err(format!("unknown method: {}", method)),
    }
}

/// Renders a store notification as an event line.
pub fn event_message(event: &StoreEvent) -> Value {
    json!({
        "event": "notification",
        "kind": event.kind(),
        "level": event.level().as_str(),
        "message": event.message(),
    })
}
