use thiserror::Error;

pub type DriverResult<T> = std::result::Result<T, DriverError>;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Browser session lost: {0}")]
    SessionLost(String),

    #[error("WebDriver error (status {status}, {error}): {message}")]
    Protocol {
        status: u16,
        error: String,
        message: String,
    },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Network error: {0}")]
    Transport(String),
}

impl DriverError {
    /// Maps a W3C WebDriver error code to a driver error
    pub fn from_wire(status: u16, error: &str, message: &str) -> Self {
        match error {
            "no such element" => Self::NoSuchElement(message.to_string()),
            "timeout" | "script timeout" => Self::Timeout(message.to_string()),
            "invalid session id" | "session not created" => {
                Self::SessionLost(message.to_string())
            }
            "javascript error" => Self::Script(message.to_string()),
            _ => Self::Protocol {
                status,
                error: error.to_string(),
                message: message.to_string(),
            },
        }
    }

    /// Returns true if the error only concerns the current page
    ///
    /// A lost session or an unreachable automation endpoint is fatal for the
    /// whole crawl.
    pub fn is_page_level(&self) -> bool {
        !matches!(self, Self::SessionLost(_) | Self::Transport(_))
    }
}

impl From<reqwest::Error> for DriverError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DriverError::Timeout(err.to_string())
        } else if err.is_decode() {
            DriverError::UnexpectedResponse(err.to_string())
        } else {
            DriverError::Transport(err.to_string())
        }
    }
}
