#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Stratus Expression
//!
//! Variable substitution and condition evaluation for workflow nodes.
//!
//! Two facilities, both deliberately restricted:
//!
//! - [`substitute`] / [`substitute_value`] replace `{{name}}` placeholders
//!   in strings and in arbitrarily nested JSON values. Unknown placeholders
//!   are left as literals.
//! - [`evaluate_condition`] evaluates `LHS OP RHS` comparisons after
//!   substitution. Evaluation never fails: any parse problem, unknown
//!   operator, or character outside the allowed literal grammar yields
//!   `false` and a warning.
//!
//! There is no general-purpose expression sandbox here, and user input is
//! never handed to one. The grammar is the full extent of what a workflow
//! condition can express.

mod condition;
mod template;

pub use condition::{Comparator, evaluate_condition};
pub use template::{substitute, substitute_value};
