use crate::config::Config;
use crate::errors::{ClientInitError, LiveHintError};
use crate::http::transport::Transport;
use crate::http::tutoring;
use crate::types::{ChatMessage, DEFAULT_STREAM, ProblemRef, SessionId, SessionSettings};
use reqwest::Client as ReqwestClient;
use std::time::Duration;

/// The main client for the LiveHint AI tutoring API.
///
/// Holds read-only configuration and an HTTP client; cloning is cheap. The
/// client keeps no session state: sessions live on the service and are
/// referred to by [`SessionId`].
#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
}

/// Builder for `Client` instances.
///
/// # Example
///
/// ```
/// use livehint::{Client, Config};
/// use std::time::Duration;
///
/// let config = Config::new("https://livehint.example.com", "token").unwrap();
/// let client = Client::builder(config)
///     .timeout(Duration::from_secs(120))
///     .connect_timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    config: Config,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Sets the default total request timeout.
    ///
    /// Applies to session creation, session configuration and chat calls.
    /// Chat responses wait on model inference, so keep this generous. The
    /// problem lookup always uses [`Config::problem_info_timeout`].
    ///
    /// If not set, chat calls have no timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Builds the `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`LiveHintError::Unexpected`] if the HTTP client cannot be
    /// constructed (e.g. TLS backend initialization failure).
    pub fn build(self) -> Result<Client, LiveHintError> {
        let mut builder = ReqwestClient::builder();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| LiveHintError::Unexpected(format!("Failed to build HTTP client: {e}")))?;

        Ok(Client {
            transport: Transport::new(http_client, self.config),
        })
    }
}

impl Client {
    /// Creates a new builder for `Client` instances.
    #[must_use]
    pub const fn builder(config: Config) -> ClientBuilder {
        ClientBuilder {
            config,
            timeout: None,
            connect_timeout: None,
        }
    }

    /// Creates a client with default HTTP settings.
    ///
    /// # Errors
    ///
    /// See [`ClientBuilder::build`].
    pub fn new(config: Config) -> Result<Self, LiveHintError> {
        Self::builder(config).build()
    }

    /// Creates a client from `API_BASE_URL` and `API_BEARER_TOKEN`.
    ///
    /// # Errors
    ///
    /// [`ClientInitError::Config`] if either variable is missing or does not
    /// parse, [`ClientInitError::Client`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, ClientInitError> {
        let config = Config::from_env()?;
        Ok(Self::new(config)?)
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        self.transport.config()
    }

    /// Starts a tutoring session for a problem.
    ///
    /// Runs three calls in order: problem lookup, session creation, session
    /// configuration. The session id is returned only when all three
    /// succeed; otherwise the first error is returned and later calls are
    /// not made.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use livehint::{Client, Config, ProblemRef, SessionSettings};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new(Config::from_env()?)?;
    /// let problem = ProblemRef::new("mathbook_tx", "Algebra I", "M1", "101", "1");
    /// let session = client
    ///     .init_session(&problem, &SessionSettings::default().with_temperature(0.2))
    ///     .await?;
    /// println!("Session ID: {session}");
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Any [`LiveHintError`] raised by one of the three calls, unchanged.
    pub async fn init_session(
        &self,
        problem: &ProblemRef,
        settings: &SessionSettings,
    ) -> Result<SessionId, LiveHintError> {
        tracing::debug!(
            "Initializing session: context={}, item_id={:?}",
            problem.app_context(),
            problem.item_id()
        );

        let session = tutoring::init_session(&self.transport, problem, settings).await?;

        tracing::debug!("Session ready: ID={session}");
        Ok(session)
    }

    /// Fetches the bot's opening turn(s).
    ///
    /// With `stream = false` the result holds exactly one message. With
    /// `stream = true` the response is read as an event stream and every
    /// message received before the done sentinel is returned, in order.
    /// Passing `None` uses [`DEFAULT_STREAM`].
    ///
    /// # Errors
    ///
    /// Any transport failure. A timeout while streaming yields
    /// [`LiveHintError::Timeout`], never a partial result.
    pub async fn start_chat(
        &self,
        session: &SessionId,
        stream: impl Into<Option<bool>>,
    ) -> Result<Vec<ChatMessage>, LiveHintError> {
        let stream = stream.into().unwrap_or(DEFAULT_STREAM);
        tracing::debug!("Starting chat: ID={session}, stream={stream}");

        let messages = tutoring::start_chat(&self.transport, session, stream).await?;

        tracing::debug!("Chat started: {} message(s)", messages.len());
        Ok(messages)
    }

    /// Sends a student message and returns the bot's reply as a
    /// one-element vector.
    ///
    /// This call never streams.
    ///
    /// # Errors
    ///
    /// Any transport failure, including an expired session surfacing as
    /// [`LiveHintError::Http`].
    pub async fn send_message(
        &self,
        session: &SessionId,
        content: &str,
    ) -> Result<Vec<ChatMessage>, LiveHintError> {
        tracing::debug!("Sending message: ID={session}, length={}", content.len());

        tutoring::send_message(&self.transport, session, content).await
    }
}
