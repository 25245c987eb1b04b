use crate::{
    auth::Session,
    error::ApiError,
    ApiEndpoints,
};
use reqwest::{
    header::{
        COOKIE,
        LOCATION,
    },
    StatusCode,
};
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};
use std::{
    fmt,
    time::Duration,
};

/// The `[from, until]` range (unix seconds) of one timeseries query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub from: i64,
    pub until: i64,
}

impl Window {
    pub fn new(from: i64, until: i64) -> Self {
        Self { from, until }
    }

    /// The `length` seconds leading up to `until`.
    pub fn ending_at(until: i64, length: Duration) -> Self {
        Self::new(until - length.as_secs() as i64, until)
    }

    /// The `length` seconds following `from`.
    pub fn starting_at(from: i64, length: Duration) -> Self {
        Self::new(from, from + length.as_secs() as i64)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from, self.until)
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// Payload of `GET /corps/{corp}/sites/{site}/timeseries/requests`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeseriesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<CountSeries>,
}

impl TimeseriesResponse {
    /// Only the first series is ever evaluated.
    pub fn first_series(&self) -> Option<&CountSeries> {
        self.data.first()
    }

    /// End of the range the API actually answered for, if it returned any series.
    pub fn reported_until(&self) -> Option<i64> {
        self.first_series().map(|series| series.until).filter(|until| *until > 0)
    }
}

/// Anomaly counts for one tag, one element per `inc` seconds between `from` and `until`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountSeries {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<i64>,
    #[serde(default)]
    pub from: i64,
    #[serde(default)]
    pub until: i64,
    #[serde(default)]
    pub inc: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub summary_count: i64,
    #[serde(default)]
    pub total_points: i64,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub meta: SeriesMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMeta {
    #[serde(default)]
    pub lookup: i64,
    #[serde(default)]
    pub quantize: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// Queries per-tag request counts. Every call is a fresh round trip.
#[derive(Debug, Clone)]
pub struct TimeseriesClient {
    http: reqwest::Client,
    endpoints: ApiEndpoints,
}

impl TimeseriesClient {
    pub fn new(http: reqwest::Client, endpoints: ApiEndpoints) -> Self {
        Self { http, endpoints }
    }

    #[instrument(level = "debug", skip(self, session))]
    pub async fn fetch_counts(
        &self,
        session: &Session,
        corp: &str,
        site: &str,
        tag: &str,
        window: Window,
    ) -> Result<TimeseriesResponse, ApiError> {
        let response = self
            .http
            .get(self.endpoints.timeseries(corp, site))
            .query(&[
                ("tag", tag.to_string()),
                ("from", window.from.to_string()),
                ("until", window.until.to_string()),
            ])
            .header(COOKIE, session.cookie_header())
            .send()
            .await
            .map_err(ApiError::Unreachable)?;

        let status = response.status();
        let redirected_to_login = status.is_redirection()
            && response
                .headers()
                .get(LOCATION)
                .and_then(|location| location.to_str().ok())
                .is_some_and(|location| location.contains("/login"));

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) || redirected_to_login {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus(status.as_u16()));
        }

        let payload = response.bytes().await.map_err(ApiError::Unreachable)?;
        let timeseries: TimeseriesResponse = serde_json::from_slice(&payload)?;

        trace!(series = timeseries.data.len(), "decoded timeseries");
        Ok(timeseries)
    }
}
