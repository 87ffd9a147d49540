// === GatewayError ===

/// Errors raised by a persistence gateway while reading or writing the collection.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A filesystem operation failed.
    #[error("Gateway I/O error: {0}")]
    Io(String),

    /// The local slot database rejected a query.
    #[error("Gateway database error: {0}")]
    Database(String),

    /// The collection could not be serialized.
    #[error("Failed to encode links: {0}")]
    Encode(String),

    /// The stored payload is not a valid links array.
    #[error("Failed to decode links: {0}")]
    Decode(String),

    /// The HTTP request did not complete.
    #[error("Links request failed: {0}")]
    Transport(String),

    /// The links endpoint answered with a non-success status.
    #[error("Links endpoint returned status {status}")]
    Status { status: u16, body: String },

    /// The backend refused the operation outright.
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for GatewayError {
    fn from(e: rusqlite::Error) -> Self {
        GatewayError::Database(e.to_string())
    }
}

// === StoreError ===

/// Errors returned by bookmark store mutations.
///
/// These are caller-side guards; they never produce a user notification.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The url was empty (or only whitespace).
    #[error("url must not be empty")]
    EmptyUrl,

    /// The store was built outside a tokio runtime and cannot spawn persist tasks.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),
}

// === ConfigError ===

/// Errors produced while reading configuration from the environment.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `POCKETLINKS_BACKEND` named an unknown backend.
    #[error("invalid backend '{0}': expected local, remote or memory")]
    InvalidBackend(String),

    /// A numeric variable could not be parsed.
    #[error("invalid number for {var}: '{value}'")]
    InvalidNumber { var: String, value: String },
}
