//! Intent verification: decide whether a page serves the user's goal

mod prompt;
mod service;
mod types;

pub use prompt::build_prompt;
pub use service::{normalize, ClassifierOptions, VerdictService};
pub use types::{ClassificationRequest, Decision, Verdict};
