//! Types for the PostgREST client

use serde::Deserialize;

/// Options for returning data from writes, carried in the `Prefer` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOption {
    /// Return the affected rows
    Representation,

    /// Return no body
    Minimal,
}

impl ReturnOption {
    /// Convert the option to its string representation
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnOption::Representation => "representation",
            ReturnOption::Minimal => "minimal",
        }
    }

    /// The full `Prefer` header value for this option
    pub(crate) fn prefer(self) -> String {
        format!("return={}", self.as_str())
    }
}

/// Error body returned by PostgREST on failed requests
#[derive(Debug, Clone, Deserialize)]
pub struct PostgrestErrorBody {
    /// Human-readable message
    #[serde(default)]
    pub message: String,

    /// Postgres error code
    #[serde(default)]
    pub code: Option<String>,

    /// Additional details
    #[serde(default)]
    pub details: Option<String>,

    /// Hint for resolving the error
    #[serde(default)]
    pub hint: Option<String>,
}
