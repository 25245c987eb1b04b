#[macro_use]
extern crate tracing;

use eyre::{
    bail,
    Context as _,
    Result,
};
use std::time::Duration;
use url::Url;

pub mod auth;
pub mod error;
pub mod poller;
pub mod timeseries;

pub use auth::{
    Session,
    SessionManager,
};
pub use error::{
    ApiError,
    AuthError,
    PollError,
};
pub use poller::AuthenticatedPoller;
pub use timeseries::{
    CountSeries,
    TimeseriesClient,
    TimeseriesResponse,
    Window,
};

/// HTTP client shared by the session manager and the timeseries client.
///
/// Redirects are not followed so that a login redirect stays visible, and every request is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")
}

/// Endpoint URLs below the API root, e.g. `https://dashboard.signalsciences.net/api/v0`.
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    base: Url,
}

impl ApiEndpoints {
    pub fn new(base: Url) -> Result<Self> {
        if base.cannot_be_a_base() {
            bail!("API URL {base} cannot be used as a base URL");
        }
        Ok(Self { base })
    }

    pub fn login(&self) -> Url {
        self.join(&["auth", "login"])
    }

    pub fn timeseries(&self, corp: &str, site: &str) -> Url {
        self.join(&["corps", corp, "sites", site, "timeseries", "requests"])
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
