//! # livehint
//!
//! A Rust client library for the LiveHint AI tutoring API.
//!
//! A conversation goes through three public operations:
//!
//! 1. [`Client::init_session`] resolves a [`ProblemRef`] into a server-side
//!    tutoring session (problem lookup, session creation, session
//!    configuration) and returns its [`SessionId`].
//! 2. [`Client::start_chat`] fetches the bot's opening turn, either as one
//!    JSON object or as a server-sent-event stream.
//! 3. [`Client::send_message`] sends a student message and returns the reply.
//!
//! Chat results are always a `Vec<ChatMessage>` in arrival order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use livehint::{Client, ProblemRef, SessionSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_env()?;
//!
//! let problem = ProblemRef::new("mathbook_tx", "Algebra I", "M1", "101", "1");
//! let session = client
//!     .init_session(&problem, &SessionSettings::default())
//!     .await?;
//!
//! let opening = client.start_chat(&session, true).await?;
//! println!("last streamed message: {:?}", opening.last());
//!
//! let reply = client
//!     .send_message(&session, "sorry I don't quite understand the problem")
//!     .await?;
//! println!("reply: {}", reply[0]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every failing call returns a [`LiveHintError`], classified once at the
//! transport boundary as a timeout, an HTTP status error, a connection
//! error, a request error, or an unexpected error.
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]; install any subscriber to see it. Set
//! `LOUD_WIRE=1` to dump raw requests and responses to stderr.

pub mod client;
pub mod config;
pub mod errors;
pub(crate) mod http;
pub mod types;

pub use client::{Client, ClientBuilder};
pub use config::Config;
pub use errors::{ClientInitError, ConfigError, ErrorKind, LiveHintError};
pub use http::sse_parser::{SseDecoder, decode_event_stream};
pub use types::{
    AppContext, ChatMessage, DEFAULT_MODEL, DEFAULT_STREAM, DEFAULT_TEMPERATURE, KnownModel,
    Model, ProblemRef, SessionId, SessionSettings,
};
