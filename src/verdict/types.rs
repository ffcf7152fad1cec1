//! Request and verdict types for the `/verify` contract

use serde::{Deserialize, Serialize};

/// A single page classification request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    /// What the user says they are trying to do
    pub goal: String,
    /// Title of the page or video being accessed; may be empty
    #[serde(rename = "site_title")]
    pub page_title: String,
    pub url: String,
    /// Alternative descriptor, consulted only when the title is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_label: Option<String>,
}

impl ClassificationRequest {
    pub fn new(
        goal: impl Into<String>,
        page_title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            goal: goal.into(),
            page_title: page_title.into(),
            url: url.into(),
            context_label: None,
        }
    }

    pub fn with_context_label(mut self, label: impl Into<String>) -> Self {
        self.context_label = Some(label.into());
        self
    }

    /// Best available description of the page: title, then context label, then URL
    pub fn context_hint(&self) -> &str {
        if !self.page_title.is_empty() {
            return &self.page_title;
        }
        match self.context_label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => &self.url,
        }
    }
}

/// Binary classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Allowed,
    Blocked,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allowed => "ALLOWED",
            Decision::Blocked => "BLOCKED",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a verification call
///
/// Exactly one of `raw` (classifier answered) or `error` (classifier failed,
/// decision forced to `Allowed`) is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: Decision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Verdict {
    pub fn classified(decision: Decision, raw: impl Into<String>) -> Self {
        Self {
            decision,
            raw: Some(raw.into()),
            error: None,
        }
    }

    /// Fail-open verdict for an unavailable classifier
    pub fn fail_open(error: impl Into<String>) -> Self {
        Self {
            decision: Decision::Allowed,
            raw: None,
            error: Some(error.into()),
        }
    }
}
