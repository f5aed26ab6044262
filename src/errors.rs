use thiserror::Error;

/// Defines errors that can occur when talking to the LiveHint AI API.
///
/// The set is closed: every transport failure is classified exactly once, at
/// the transport boundary, into one of these variants and then propagated
/// unchanged to the caller.
///
/// # Example: Handling API Errors
///
/// ```ignore
/// match client.send_message(&session, "I'm stuck").await {
///     Err(LiveHintError::Http { status_code: 404, .. }) => {
///         tracing::warn!("session expired, starting over");
///     }
///     Err(LiveHintError::Timeout(msg)) => {
///         tracing::error!("tutor took too long: {msg}");
///     }
///     // ...
/// }
/// ```
#[derive(Debug, Error)]
pub enum LiveHintError {
    /// No response arrived within the request's time bound.
    #[error("Request timed out: {0}")]
    Timeout(String),
    /// The service answered with a 4xx or 5xx status.
    #[error("HTTP error {status_code} {reason}: {body}")]
    Http {
        /// HTTP status code (e.g., 404, 500)
        status_code: u16,
        /// Canonical reason phrase for the status ("Not Found")
        reason: String,
        /// Preview of the response body, truncated
        body: String,
    },
    /// The connection failed before any response was received.
    #[error("Connection error: {0}")]
    Connection(String),
    /// Building, sending or decoding the request failed.
    #[error("Request error: {0}")]
    Request(String),
    /// Anything not classified above.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// The kind of a [`LiveHintError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Timeout,
    Http,
    Connection,
    Request,
    Unexpected,
}

impl LiveHintError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Http { .. } => ErrorKind::Http,
            Self::Connection(_) => ErrorKind::Connection,
            Self::Request(_) => ErrorKind::Request,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Returns the HTTP status code for [`LiveHintError::Http`], `None` otherwise.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Errors raised while assembling a [`crate::Config`].
///
/// These only occur at startup; the client refuses to initialize without a
/// base URL and a bearer credential.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not defined")]
    MissingVar(&'static str),
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Error returned by [`crate::Client::from_env`].
#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] LiveHintError),
}
