use starberry_core::BoxError;
use thiserror::Error;

/// Errors raised by the session middleware and its storage backends.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No domain was configured and the request carried no `Host` header,
    /// so the session cookie cannot be scoped.
    #[error("missing host header")]
    MissingHost,

    /// The handler asked for session data on a request the session
    /// middleware did not process.
    #[error("no session data under context key `{0}`")]
    NotInContext(String),

    /// A storage backend failed to load or save a session.
    #[error("session storage failure: {0}")]
    Storage(#[source] BoxError),

    #[error("session value could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SessionError {
    /// Wraps a backend error, for use by `SessionStorage` implementations.
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        SessionError::Storage(err.into())
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
