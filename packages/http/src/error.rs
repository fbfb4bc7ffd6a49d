use releasefs_core::Error as CoreError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl Error {
    /// Report a failure to set up the client rather than a failed fetch.
    pub fn into_config_error(self) -> CoreError {
        CoreError::InvalidConfig {
            message: format!("cannot build HTTP client: {}", self),
        }
    }
}

impl From<Error> for CoreError {
    fn from(error: Error) -> Self {
        match error {
            Error::UrlParse(_) | Error::InvalidUrl { .. } => CoreError::InvalidConfig {
                message: error.to_string(),
            },
            other => CoreError::RemoteFetchFailed {
                url: String::new(),
                status: None,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_errors_become_config_errors() {
        let error = Error::from(url::Url::parse("not a url").unwrap_err());
        assert!(matches!(
            CoreError::from(error),
            CoreError::InvalidConfig { .. }
        ));
    }

    #[test]
    fn client_setup_failures_are_config_errors() {
        let error = Error::Transport {
            message: "no TLS backend".to_string(),
        };
        match error.into_config_error() {
            CoreError::InvalidConfig { message } => {
                assert_eq!(message, "cannot build HTTP client: Transport error: no TLS backend");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn json_errors_become_fetch_failures() {
        let error = Error::from(serde_json::from_str::<u64>("\"x\"").unwrap_err());
        assert!(matches!(
            CoreError::from(error),
            CoreError::RemoteFetchFailed { status: None, .. }
        ));
    }
}
