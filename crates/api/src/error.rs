use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ApiError {
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::RequestFailed(err) if err.is_connect() => {
                Some("Check OMICIA_API_URL and your network connection")
            }
            ApiError::RequestFailed(err) if err.is_timeout() => {
                Some("The service did not answer in time, try again later")
            }
            ApiError::InvalidUrl(_) => Some("OMICIA_API_URL must be an absolute http(s) URL"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
