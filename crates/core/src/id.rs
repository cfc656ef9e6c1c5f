//! Strongly-typed string identifiers for Stratus entities.
//!
//! Workflow and node identifiers come from user-supplied definitions, so
//! they are opaque strings validated on construction. Execution ids are
//! generated by the engine and follow the `exec_<millis>_<random>` format.
//!
//! All id types support:
//! - `parse(&str)` / `FromStr` with validation
//! - `as_str()` borrowing access
//! - Full serde support (serializes as a plain string)
//! - `Display`, `Eq`, `Ord`, `Hash`

use serde::{Deserialize, Serialize};

/// Error returned when an identifier string fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    /// The identifier was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The identifier contained whitespace or a control character.
    #[error("identifier contains invalid character {found:?}")]
    InvalidCharacter {
        /// The offending character.
        found: char,
    },
}

fn validate(raw: &str) -> Result<(), IdParseError> {
    if raw.is_empty() {
        return Err(IdParseError::Empty);
    }
    if let Some(found) = raw.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(IdParseError::InvalidCharacter { found });
    }
    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier from a string, validating it.
            pub fn parse(raw: impl Into<String>) -> Result<Self, IdParseError> {
                let raw = raw.into();
                validate(&raw)?;
                Ok(Self(raw))
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the identifier, returning the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdParseError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdParseError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifier of a stored workflow definition.
    WorkflowId
}

string_id! {
    /// Identifier of a node, unique within its workflow.
    NodeId
}

string_id! {
    /// Identifier of one run of a workflow.
    ///
    /// Generated ids follow `exec_<millis>_<random>` where `<millis>` is the
    /// UTC creation time and `<random>` is a 9-character alphanumeric
    /// suffix. Uniqueness within a process is an engine invariant.
    ExecutionId
}

impl ExecutionId {
    /// Length of the random suffix in generated ids.
    const SUFFIX_LEN: usize = 9;

    /// Generate a fresh execution id.
    #[must_use]
    pub fn generate() -> Self {
        use rand::Rng;

        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: String = rand::rng()
            .sample_iter(rand::distr::Alphanumeric)
            .take(Self::SUFFIX_LEN)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect();
        Self(format!("exec_{millis}_{suffix}"))
    }
}
