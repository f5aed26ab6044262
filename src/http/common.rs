use reqwest::{Method, Url};

/// API path prefix. The service is not versioned.
const API_PREFIX: &str = "/api";

/// Represents the endpoints of the LiveHint AI API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// Resolve a problem reference into a problem id and tutorbot
    ProblemInfo,
    /// Create a session for a resolved problem
    CreateSession,
    /// Configure an existing session
    UpdateSession { session_id: &'a str },
    /// Fetch the next chat response for a session
    ChatResponse { session_id: &'a str },
}

impl Endpoint<'_> {
    /// HTTP method used for this endpoint.
    pub fn method(&self) -> Method {
        match self {
            Self::ProblemInfo | Self::ChatResponse { .. } => Method::GET,
            Self::CreateSession => Method::POST,
            Self::UpdateSession { .. } => Method::PUT,
        }
    }

    /// Constructs the URL path for this endpoint. Session ids are
    /// percent-encoded so they always stay a single path segment.
    fn to_path(&self) -> String {
        match self {
            Self::ProblemInfo => format!("{API_PREFIX}/problem-info"),
            Self::CreateSession => format!("{API_PREFIX}/session"),
            Self::UpdateSession { session_id } => {
                format!("{API_PREFIX}/sessions/{}", urlencoding::encode(session_id))
            }
            Self::ChatResponse { session_id } => {
                format!(
                    "{API_PREFIX}/chat-response/{}",
                    urlencoding::encode(session_id)
                )
            }
        }
    }

    /// Short label for logs, e.g. `GET /api/problem-info`.
    pub fn label(&self) -> String {
        format!("{} {}", self.method(), self.to_path())
    }
}

/// Constructs the full URL for an endpoint under `base_url`.
///
/// Any path already present on the base URL is kept, so a service mounted
/// under `https://host/livehint/` works the same as one at the root.
#[must_use]
pub fn construct_endpoint_url(base_url: &Url, endpoint: &Endpoint<'_>) -> String {
    let base = base_url.as_str().trim_end_matches('/');
    format!("{base}{}", endpoint.to_path())
}
