//! Typed event names and the event envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every event name the engine and its handlers publish.
///
/// The wire form (used in logs and external integrations) is the
/// `scope:action` string produced by `Display` and accepted by
/// `FromStr`. The `email`, `form` and `notification` scopes are open
/// families: any suffix is valid and carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventName {
    /// A node is about to execute.
    NodeStart,
    /// A node finished executing (any outcome).
    NodeComplete,
    /// An execution entered the paused state.
    ExecutionPaused,
    /// An execution completed successfully.
    ExecutionComplete,
    /// An execution failed.
    ExecutionFailed,
    /// An AI provider call is about to be made.
    AiRequest,
    /// An AI provider call succeeded.
    AiResponse,
    /// All AI providers failed for a request.
    AiError,
    /// A human task published an approval request.
    HumanApprovalRequested,
    /// A human approved a pending task.
    HumanApproved,
    /// A human rejected a pending task.
    HumanRejected,
    /// A deferred timer elapsed.
    TimerExpired,
    /// A workflow run finished successfully.
    WorkflowCompleted,
    /// A workflow run finished in failure.
    WorkflowFailed,
    /// Open family of email events (`email:<suffix>`).
    Email(String),
    /// Open family of form events (`form:<suffix>`).
    Form(String),
    /// Open family of push notification events (`notification:<suffix>`).
    Notification(String),
}

/// Error returned when a wire string is not a recognized event name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event name `{0}`")]
pub struct EventNameParseError(pub String);

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeStart => f.write_str("node:start"),
            Self::NodeComplete => f.write_str("node:complete"),
            Self::ExecutionPaused => f.write_str("execution:paused"),
            Self::ExecutionComplete => f.write_str("execution:complete"),
            Self::ExecutionFailed => f.write_str("execution:failed"),
            Self::AiRequest => f.write_str("ai:request"),
            Self::AiResponse => f.write_str("ai:response"),
            Self::AiError => f.write_str("ai:error"),
            Self::HumanApprovalRequested => f.write_str("human:approval_requested"),
            Self::HumanApproved => f.write_str("human:approved"),
            Self::HumanRejected => f.write_str("human:rejected"),
            Self::TimerExpired => f.write_str("timer:expired"),
            Self::WorkflowCompleted => f.write_str("workflow:completed"),
            Self::WorkflowFailed => f.write_str("workflow:failed"),
            Self::Email(suffix) => write!(f, "email:{suffix}"),
            Self::Form(suffix) => write!(f, "form:{suffix}"),
            Self::Notification(suffix) => write!(f, "notification:{suffix}"),
        }
    }
}

impl std::str::FromStr for EventName {
    type Err = EventNameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = match s {
            "node:start" => Self::NodeStart,
            "node:complete" => Self::NodeComplete,
            "execution:paused" => Self::ExecutionPaused,
            "execution:complete" => Self::ExecutionComplete,
            "execution:failed" => Self::ExecutionFailed,
            "ai:request" => Self::AiRequest,
            "ai:response" => Self::AiResponse,
            "ai:error" => Self::AiError,
            "human:approval_requested" => Self::HumanApprovalRequested,
            "human:approved" => Self::HumanApproved,
            "human:rejected" => Self::HumanRejected,
            "timer:expired" => Self::TimerExpired,
            "workflow:completed" => Self::WorkflowCompleted,
            "workflow:failed" => Self::WorkflowFailed,
            other => {
                if let Some(suffix) = other.strip_prefix("email:") {
                    Self::Email(suffix.to_string())
                } else if let Some(suffix) = other.strip_prefix("form:") {
                    Self::Form(suffix.to_string())
                } else if let Some(suffix) = other.strip_prefix("notification:") {
                    Self::Notification(suffix.to_string())
                } else {
                    return Err(EventNameParseError(other.to_string()));
                }
            }
        };
        Ok(name)
    }
}

impl TryFrom<String> for EventName {
    type Error = EventNameParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EventName> for String {
    fn from(name: EventName) -> Self {
        name.to_string()
    }
}

/// An event on the bus: a typed name plus a JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// What happened.
    pub name: EventName,
    /// Event-specific data (execution id, node id, outcome, ...).
    pub payload: Value,
}

impl Event {
    /// Create a new event.
    #[must_use]
    pub fn new(name: EventName, payload: Value) -> Self {
        Self { name, payload }
    }

    /// Fetch a string field from the payload.
    #[must_use]
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}
