//! Handler outcomes.

use serde_json::{Map, Value};

/// Result of a handler execution, carrying flow-control intent.
///
/// The engine matches on this to decide what happens next:
/// - `Success` — shallow-merge `output` into the execution's variables
///   and follow the outgoing edges
/// - `Pause` — suspend the execution until an external event resumes it
///
/// The third leg of the protocol, a handler error, is the `Err` arm of
/// the `Result` every handler returns.
#[derive(Debug, Clone)]
pub enum NodeOutcome {
    /// Successful completion.
    Success {
        /// Output merged into the execution variables.
        output: Map<String, Value>,
    },

    /// Suspend until an external resume.
    Pause {
        /// Human-readable reason for the pause.
        reason: String,
        /// Pause descriptor (approval request, timer deadline, ...).
        data: Value,
    },
}

impl NodeOutcome {
    /// Create a success outcome from an output map.
    #[must_use]
    pub fn success(output: Map<String, Value>) -> Self {
        Self::Success { output }
    }

    /// Create a success outcome from a JSON object value.
    ///
    /// Non-object values produce an empty output.
    #[must_use]
    pub fn success_object(value: Value) -> Self {
        let output = match value {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        Self::Success { output }
    }

    /// Create a pause outcome.
    #[must_use]
    pub fn pause(reason: impl Into<String>, data: Value) -> Self {
        Self::Pause {
            reason: reason.into(),
            data,
        }
    }

    /// Returns `true` for a success outcome.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns `true` for a pause outcome.
    #[must_use]
    pub fn is_pause(&self) -> bool {
        matches!(self, Self::Pause { .. })
    }
}
