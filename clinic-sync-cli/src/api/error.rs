//! Typed errors for Notion API operations

use std::fmt;

/// Failure of a boundary call against the Notion API.
///
/// Every variant is fail-fast: the enclosing bulk operation aborts on the
/// first failure and nothing is retried. Value-level problems (a cell that
/// cannot be coerced, an unsupported property type) never surface here —
/// they degrade to an omitted property instead.
#[derive(Debug)]
pub enum ApiError {
    /// Schema fetch returned a non-success status
    RemoteSchema { status: u16, body: String },
    /// Page creation failed for the given input row
    RecordCreate {
        row: usize,
        status: u16,
        body: String,
    },
    /// Page creation hit HTTP 429. `created` holds the ids committed
    /// before the abort; the remote side keeps those pages (at-least-once,
    /// no rollback), so a re-run may duplicate them.
    RateLimited { created: Vec<String> },
    /// A query page returned a non-success status
    RemoteQuery { status: u16, body: String },
    /// Transport-level failure: connect error, timeout, or an unreadable
    /// response body
    Transport(reqwest::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RemoteSchema { status, body } => {
                write!(f, "Failed to retrieve data source schema: {} {}", status, body)
            }
            ApiError::RecordCreate { row, status, body } => {
                write!(f, "Failed to create page for row {}: {} {}", row, status, body)
            }
            ApiError::RateLimited { created } => {
                write!(
                    f,
                    "Rate limited by the Notion API (HTTP 429) after {} created pages",
                    created.len()
                )
            }
            ApiError::RemoteQuery { status, body } => {
                write!(f, "Data source query failed: {} {}", status, body)
            }
            ApiError::Transport(err) => write!(f, "Notion API transport error: {}", err),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err)
    }
}
