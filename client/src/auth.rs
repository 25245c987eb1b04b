use crate::{
    error::AuthError,
    ApiEndpoints,
};
use reqwest::{
    header::{
        HeaderValue,
        LOCATION,
    },
    StatusCode,
};
use std::fmt;
use url::Url;

/// Where the dashboard sends a failed login.
const INVALID_LOGIN_LOCATION: &str = "/login?p=invalid";

/// Exchanges the configured credentials for a [`Session`].
#[derive(Clone)]
pub struct SessionManager {
    http: reqwest::Client,
    login_url: Url,
    username: String,
    password: String,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("login_url", &self.login_url.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// `http` must not follow redirects, the failed-login redirect is how bad credentials are detected.
    pub fn new(
        http: reqwest::Client,
        endpoints: &ApiEndpoints,
        username: impl ToString,
        password: impl ToString,
    ) -> Self {
        Self {
            http,
            login_url: endpoints.login(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[instrument(level = "debug", skip(self), fields(username = %self.username))]
    pub async fn authenticate(&self) -> Result<Session, AuthError> {
        debug!(login_url = %self.login_url, "requesting session");

        let response = self
            .http
            .post(self.login_url.clone())
            .form(&[("email", self.username.as_str()), ("password", self.password.as_str())])
            .send()
            .await
            .map_err(AuthError::Unreachable)?;

        let status = response.status();
        let invalid_redirect = response
            .headers()
            .get(LOCATION)
            .and_then(|location| location.to_str().ok())
            .is_some_and(|location| location.contains(INVALID_LOGIN_LOCATION));

        if invalid_redirect || matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AuthError::InvalidCredentials);
        }
        if !(status.is_success() || status.is_redirection()) {
            return Err(AuthError::UnexpectedStatus(status.as_u16()));
        }

        let cookies = response
            .cookies()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect::<Vec<_>>();
        let session = Session::from_cookies(cookies).ok_or(AuthError::NoSession)?;

        info!(cookies = ?session.cookie_names, "authenticated");
        Ok(session)
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// The cookies returned by a successful login, ready to be sent along with API requests.
#[derive(Clone)]
pub struct Session {
    cookie_header: HeaderValue,
    cookie_names: Vec<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cookies", &self.cookie_names)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// `None` without cookies or when a cookie cannot be sent back as a header.
    pub fn from_cookies(cookies: impl IntoIterator<Item = (String, String)>) -> Option<Self> {
        let cookies = cookies.into_iter().collect::<Vec<_>>();
        if cookies.is_empty() {
            return None;
        }

        let header = cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        let cookie_header = HeaderValue::from_str(&header).ok()?;

        Some(Self {
            cookie_header,
            cookie_names: cookies.into_iter().map(|(name, _)| name).collect(),
        })
    }

    pub(crate) fn cookie_header(&self) -> HeaderValue {
        self.cookie_header.clone()
    }
}
