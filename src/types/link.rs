use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schemes that are accepted as-is by [`normalize_url`].
const KNOWN_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Scheme prepended to urls that carry neither `http://` nor `https://`.
const DEFAULT_SCHEME: &str = "http://";

/// A saved link.
///
/// Serialized with the field names used by the links wire format
/// (`createdAt` in camelCase). Records written by older clients may omit
/// `description` and `tags`, so both default to empty on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
}

impl Link {
    /// Builds a new record with a fresh id and the current timestamp.
    ///
    /// `url` is expected to be non-empty; it is normalized here.
    pub fn new(url: &str, title: &str, description: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: normalize_url(url),
            title: title.to_string(),
            description: description.to_string(),
            tags: Vec::new(),
            created_at: now_iso8601(),
        }
    }

    /// Title to show in a list, falling back to the url when the title is empty.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

/// Prefixes `http://` unless the url already starts with `http://` or `https://`.
///
/// No other validation happens: malformed urls are kept as typed.
pub fn normalize_url(url: &str) -> String {
    if KNOWN_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        url.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, url)
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
