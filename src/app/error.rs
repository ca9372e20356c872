use thiserror::Error;

#[derive(Error, Debug)]
pub enum WhiskerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP {code}: {message}")]
    Http { code: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, WhiskerError>;

impl WhiskerError {
    /// Map an error to the message shown in the feed status bar.
    pub fn user_message(&self) -> String {
        match self {
            WhiskerError::Http { code, .. } => match code {
                401 => "Invalid API key. Please check your configuration.".into(),
                403 => "Access forbidden. Check your API permissions.".into(),
                404 => "Requested resource not found.".into(),
                429 => "Too many requests. Please try again later.".into(),
                500..=599 => "Server error. Please try again later.".into(),
                _ => format!("HTTP error: {}", code),
            },
            WhiskerError::Transport(_) => {
                "Network error. Please check your internet connection.".into()
            }
            WhiskerError::Unknown(_) => {
                "An unexpected error occurred. Please try again.".into()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_http_codes() {
        let cases = [
            (401, "Invalid API key. Please check your configuration."),
            (403, "Access forbidden. Check your API permissions."),
            (404, "Requested resource not found."),
            (429, "Too many requests. Please try again later."),
            (500, "Server error. Please try again later."),
            (503, "Server error. Please try again later."),
        ];
        for (code, expected) in cases {
            let err = WhiskerError::Http {
                code,
                message: "irrelevant".into(),
            };
            assert_eq!(err.user_message(), expected);
        }
    }

    #[test]
    fn test_user_message_http_fallback() {
        let err = WhiskerError::Http {
            code: 418,
            message: "teapot".into(),
        };
        assert_eq!(err.user_message(), "HTTP error: 418");
    }

    #[test]
    fn test_user_message_transport() {
        let err = WhiskerError::Transport("connection refused".into());
        assert_eq!(
            err.user_message(),
            "Network error. Please check your internet connection."
        );
    }

    #[test]
    fn test_user_message_unknown() {
        let err = WhiskerError::Unknown("boom".into());
        assert_eq!(
            err.user_message(),
            "An unexpected error occurred. Please try again."
        );
    }
}
