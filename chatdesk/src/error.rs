use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode store payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid store URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("message content cannot be empty")]
    EmptyMessage,
    #[error("a message send is already in flight")]
    SendInFlight,
    #[error("no conversation is selected")]
    NoSelection,
}

impl DashboardError {
    /// Whether the failure came from talking to the store, as opposed to a
    /// client-side rejection that never produced a request.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            DashboardError::Http(_)
                | DashboardError::Status { .. }
                | DashboardError::Decode(_)
        )
    }
}
