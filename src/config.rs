//! Client configuration.
//!
//! A [`Config`] is built once at startup, either from the environment or
//! explicitly, and handed to [`crate::Client`]. It is never mutated after
//! construction.

use crate::errors::ConfigError;
use reqwest::Url;
use std::time::Duration;

/// Environment variable holding the service base URL.
pub const BASE_URL_VAR: &str = "API_BASE_URL";

/// Environment variable holding the bearer credential.
pub const BEARER_TOKEN_VAR: &str = "API_BEARER_TOKEN";

/// Optional environment variable overriding the problem lookup timeout, in seconds.
pub const TIMEOUT_VAR: &str = "API_TIMEOUT";

/// Default bound for the problem-info lookup.
///
/// The lookup is a cheap database read on the service side, so it gets a
/// short bound. Chat calls wait on model inference and use the client-wide
/// timeout instead.
pub const DEFAULT_PROBLEM_INFO_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the LiveHint AI service.
#[derive(Clone)]
pub struct Config {
    base_url: Url,
    bearer_token: String,
    problem_info_timeout: Duration,
}

// The bearer token must never reach logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url.as_str())
            .field("bearer_token", &"<redacted>")
            .field("problem_info_timeout", &self.problem_info_timeout)
            .finish()
    }
}

impl Config {
    /// Creates a configuration from an explicit base URL and bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// http(s) URL, and [`ConfigError::MissingVar`] if the token is empty.
    pub fn new(
        base_url: impl AsRef<str>,
        bearer_token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let bearer_token = bearer_token.into();
        if bearer_token.trim().is_empty() {
            return Err(ConfigError::MissingVar(BEARER_TOKEN_VAR));
        }

        Ok(Self {
            base_url: parse_base_url(base_url.as_ref())?,
            bearer_token,
            problem_info_timeout: DEFAULT_PROBLEM_INFO_TIMEOUT,
        })
    }

    /// Reads the configuration from `API_BASE_URL`, `API_BEARER_TOKEN` and the
    /// optional `API_TIMEOUT`.
    ///
    /// # Errors
    ///
    /// Fails if either required variable is absent or empty, or if a value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let base_url = required(BASE_URL_VAR)?;
        let bearer_token = required(BEARER_TOKEN_VAR)?;
        let mut config = Self::new(base_url, bearer_token)?;

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            config.problem_info_timeout = parse_timeout(&raw)?;
        }

        Ok(config)
    }

    /// Overrides the problem lookup timeout.
    #[must_use]
    pub const fn with_problem_info_timeout(mut self, timeout: Duration) -> Self {
        self.problem_info_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub(crate) fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    #[must_use]
    pub const fn problem_info_timeout(&self) -> Duration {
        self.problem_info_timeout
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    // Endpoint paths are appended to the URL text.
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
        .ok_or_else(|| ConfigError::InvalidTimeout(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_reads_required_vars() {
        let config = Config::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "https://livehint.example.com"),
            (BEARER_TOKEN_VAR, "secret"),
        ]))
        .unwrap();

        assert_eq!(config.base_url().as_str(), "https://livehint.example.com/");
        assert_eq!(config.bearer_token(), "secret");
        assert_eq!(config.problem_info_timeout(), DEFAULT_PROBLEM_INFO_TIMEOUT);
    }

    #[test]
    fn test_missing_base_url_fails() {
        let err = Config::from_lookup(lookup_from(&[(BEARER_TOKEN_VAR, "secret")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(BASE_URL_VAR));
    }

    #[test]
    fn test_missing_token_fails() {
        let err = Config::from_lookup(lookup_from(&[(BASE_URL_VAR, "https://x.example")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(BEARER_TOKEN_VAR));
    }

    #[test]
    fn test_empty_token_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "https://x.example"),
            (BEARER_TOKEN_VAR, "  "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(BEARER_TOKEN_VAR));
    }

    #[test]
    fn test_timeout_override() {
        let config = Config::from_lookup(lookup_from(&[
            (BASE_URL_VAR, "http://localhost:8000"),
            (BEARER_TOKEN_VAR, "secret"),
            (TIMEOUT_VAR, "0.5"),
        ]))
        .unwrap();
        assert_eq!(config.problem_info_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        for bad in ["soon", "-1", "0", "NaN"] {
            let err = Config::from_lookup(lookup_from(&[
                (BASE_URL_VAR, "http://localhost:8000"),
                (BEARER_TOKEN_VAR, "secret"),
                (TIMEOUT_VAR, bad),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidTimeout(_)),
                "expected InvalidTimeout for {bad:?}"
            );
        }
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        for bad in ["not a url", "ftp://files.example.com", "mailto:tutor@example.com"] {
            let err = Config::new(bad, "secret").unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidBaseUrl { .. }),
                "expected InvalidBaseUrl for {bad:?}"
            );
        }
    }

    #[test]
    fn test_base_url_with_query_or_fragment_rejected() {
        for bad in [
            "https://livehint.example.com/?x=1",
            "https://livehint.example.com/#top",
            "https://livehint.example.com/api?",
        ] {
            let err = Config::new(bad, "secret").unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidBaseUrl { ref reason, .. } if reason.contains("query")),
                "expected InvalidBaseUrl for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_base_url_path_prefix_kept() {
        let config = Config::new("https://livehint.example.com/tutor/", "secret").unwrap();
        assert_eq!(config.base_url().path(), "/tutor/");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::new("https://x.example", "super-secret").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
