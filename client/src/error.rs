/// Failures while exchanging credentials for a session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid Login")]
    InvalidCredentials,

    #[error("Error connecting to API: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("Login succeeded but the API did not return a session cookie")]
    NoSession,

    #[error("Login responded with unexpected status {0}")]
    UnexpectedStatus(u16),
}

/// Failures of an authenticated API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Error connecting to API: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("The API rejected the session")]
    Unauthorized,

    #[error("Unable to decode API response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("API responded with unexpected status {0}")]
    UnexpectedStatus(u16),
}

/// Error of one poll: either logging in again or the query itself failed.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PollError {
    /// Retrying with the same credentials cannot succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PollError::Auth(AuthError::InvalidCredentials))
    }

    /// The API could not be reached at all; worth backing off before the next attempt.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            PollError::Auth(AuthError::Unreachable(_)) | PollError::Api(ApiError::Unreachable(_))
        )
    }
}
