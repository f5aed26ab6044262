//! Data model for problem references, sessions and chat messages.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// One chat turn as returned by the service.
///
/// The schema is owned by the server (typically `role`, `content` and some
/// metadata), so the client keeps it as an opaque JSON value.
pub type ChatMessage = Value;

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: KnownModel = KnownModel::Gpt4o;

/// Sampling temperature used when the caller does not pick one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default streaming preference for [`crate::Client::start_chat`].
pub const DEFAULT_STREAM: bool = false;

/// System prompt selector sent with every chat-response request.
pub const SYSTEM_PROMPT_NUM: &str = "1";

/// Bot type tag sent when configuring a session.
pub const TUTORBOT_TYPE: &str = "livehint";

/// Application context a problem belongs to.
///
/// The service recognizes a fixed set of contexts. The client does not
/// validate: a [`AppContext::Custom`] value is sent as-is and the service
/// decides what to do with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppContext {
    /// Textbook exercises (`mathbook_tx`)
    MathbookTx,
    /// Web-hosted exercises (`mathbook_web`)
    MathbookWeb,
    /// Any other context string
    Custom(String),
}

impl AppContext {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MathbookTx => "mathbook_tx",
            Self::MathbookWeb => "mathbook_web",
            Self::Custom(s) => s,
        }
    }
}

impl From<&str> for AppContext {
    fn from(value: &str) -> Self {
        match value {
            "mathbook_tx" => Self::MathbookTx,
            "mathbook_web" => Self::MathbookWeb,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for AppContext {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AppContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Chat model identifier.
///
/// The known list documents what the service supports; it is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Known(KnownModel),
    /// Custom model identifier (for models added on the service side)
    Custom(String),
}

/// Chat models the service is known to support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownModel {
    Gpt4o,
    Gpt4oMini,
    Gpt4Turbo,
    Gpt35Turbo,
}

impl KnownModel {
    pub const ALL: [Self; 4] = [Self::Gpt4o, Self::Gpt4oMini, Self::Gpt4Turbo, Self::Gpt35Turbo];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt4Turbo => "gpt-4-turbo",
            Self::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }
}

impl Model {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(known) => known.as_str(),
            Self::Custom(s) => s,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::Known(DEFAULT_MODEL)
    }
}

impl From<KnownModel> for Model {
    fn from(value: KnownModel) -> Self {
        Self::Known(value)
    }
}

impl From<&str> for Model {
    fn from(value: &str) -> Self {
        KnownModel::ALL
            .into_iter()
            .find(|known| known.as_str() == value)
            .map_or_else(|| Self::Custom(value.to_string()), Self::Known)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Identifies one exercise: context, course, module, page and question,
/// plus an optional item id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemRef {
    app_context: AppContext,
    course: String,
    module: String,
    page: String,
    question: String,
    item_id: Option<String>,
}

impl ProblemRef {
    pub fn new(
        app_context: impl Into<AppContext>,
        course: impl Into<String>,
        module: impl Into<String>,
        page: impl Into<String>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            app_context: app_context.into(),
            course: course.into(),
            module: module.into(),
            page: page.into(),
            question: question.into(),
            item_id: None,
        }
    }

    #[must_use]
    pub fn with_item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    #[must_use]
    pub const fn app_context(&self) -> &AppContext {
        &self.app_context
    }

    #[must_use]
    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    /// Query parameters for the problem-info lookup. `item_id` is only
    /// present when set.
    pub(crate) fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("app_context", self.app_context.as_str().to_string()),
            ("qr_course", self.course.clone()),
            ("qr_module", self.module.clone()),
            ("qr_page", self.page.clone()),
            ("qr_question", self.question.clone()),
        ];
        if let Some(item_id) = &self.item_id {
            params.push(("item_id", item_id.clone()));
        }
        params
    }
}

/// Server-assigned session identifier.
///
/// Returned by [`crate::Client::init_session`] once all three setup steps
/// have succeeded. The service owns the session; it may expire it at any
/// time, which surfaces as an HTTP error on the next chat call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Resumes a session whose id was obtained earlier, e.g. by another process.
impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bot configuration applied to a new session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub model: Model,
    pub temperature: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl SessionSettings {
    #[must_use]
    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

// --- Wire records ---

/// Body of a successful problem-info lookup.
///
/// Both fields are passed through untouched; a missing field stays `None`
/// and is sent as `null` when creating the session.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct ProblemInfo {
    #[serde(default)]
    pub problem_id: Option<Value>,
    #[serde(default)]
    pub tutorbot: Option<Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionRequest<'a> {
    pub app_context: &'a AppContext,
    pub problem_id: Option<&'a Value>,
    pub tutorbot: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateSessionResponse {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateSessionRequest<'a> {
    pub model: &'a Model,
    pub stream: bool,
    pub temperature: f64,
    pub tutorbot_type: &'a str,
}
