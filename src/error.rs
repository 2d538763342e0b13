use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single Fetch Gateway call.
///
/// The `Display` text is what the user sees; the search state machine keeps
/// nothing but that message.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Query is required")]
    EmptyQuery,

    #[error("{}", http_error_message(*status, body))]
    UpstreamHttp { status: StatusCode, body: String },

    #[error("{cause}")]
    Network { cause: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl FetchError {
    pub fn network(cause: impl std::fmt::Display) -> FetchError {
        FetchError::Network {
            cause: cause.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::network(e)
    }
}

/// Picks the message for a non-2xx response: the body's `error` string when
/// it has one, otherwise the status line.
pub fn http_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.as_str())
                .filter(|e| !e.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| status_line(status))
}

pub fn status_line(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

/// Caller-side misuse of the search state machine. Never sent upstream.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SearchError {
    #[error("Query is required")]
    EmptyQuery,

    #[error("client page {0} is out of range, pages start at 1")]
    InvalidClientPage(u32),
}
