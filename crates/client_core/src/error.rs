use thiserror::Error;

/// Failure of a single backend call.
///
/// The `Display` output is the human-readable text shown to the user.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Application(String),
    #[error("unexpected response from server: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Alert text for the operation that failed.
    pub fn alert_message(&self) -> String {
        format!("Error: {self}")
    }
}
