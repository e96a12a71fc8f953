//! Request and result values passed between the front-ends and the provider.

use serde::{Deserialize, Serialize};

/// A single summarisation request.
///
/// Created per call and discarded once the result has been displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// Remote video reference handed to the provider
    pub url: String,
    /// Model identifier to generate with
    pub model: String,
    /// Provider API version
    pub api_version: String,
}

impl SummaryRequest {
    pub fn new(
        url: impl Into<String>,
        model: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            model: model.into(),
            api_version: api_version.into(),
        }
    }
}

/// Markdown summary returned by the provider, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
}

impl Summary {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Check if the provider returned anything besides whitespace
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<Summary> for String {
    fn from(summary: Summary) -> Self {
        summary.text
    }
}
