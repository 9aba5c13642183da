use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Luxe(#[from] luxe::LuxeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A request failed; the text is what the user should see.
    #[error("{0}")]
    Failed(String),

    #[error("interrupted")]
    Interrupted,
}

impl CliError {
    /// Message for the terminal: server-provided text when there is some.
    pub fn display_message(&self) -> String {
        match self {
            CliError::Luxe(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
