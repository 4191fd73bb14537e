//! Actions - Typed instructions extracted from planner output
//!
//! - `action`: action kinds, the `PlannerAction` variant and key classification
//! - `parse`: code-fence stripping and structural validation of the JSON array

mod action;
mod parse;

pub use action::{classify_key, ActionKind, PlannerAction};
pub use parse::{parse_plan, strip_code_fences, ParsedPlan, PlanError};
