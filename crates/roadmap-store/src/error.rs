//! Error types for the roadmap store
//!
//! - Store operations (connect, lookup, create)
//! - Authentication (credential and federated sign-in)

/// Errors from the backing store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Connecting to the store failed
    #[error("connection to {uri} failed: {message}")]
    Connection { uri: String, message: String },

    /// A record with this email already exists
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// Backend-specific failure
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create connection error for a URI
    pub fn connection(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            uri: uri.into(),
            message: message.into(),
        }
    }
}

/// Errors during registration and sign-in
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Unknown email, wrong password, wrong role, or a federated-only account
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration input rejected
    #[error("invalid registration: {0}")]
    InvalidInput(&'static str),

    /// Stored password hash is unreadable
    #[error("corrupt password hash for {0}")]
    CorruptDigest(String),

    /// Password hashing failed
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Underlying store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
