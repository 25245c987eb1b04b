use crate::{
    auth::{
        Session,
        SessionManager,
    },
    error::{
        ApiError,
        PollError,
    },
    timeseries::{
        TimeseriesClient,
        TimeseriesResponse,
        Window,
    },
};

/// One poller's view of the API: its own session, renewed when the API rejects it.
#[derive(Debug)]
pub struct AuthenticatedPoller {
    sessions: SessionManager,
    timeseries: TimeseriesClient,
    corp: String,
    site: String,
    session: Option<Session>,
}

impl AuthenticatedPoller {
    pub fn new(
        sessions: SessionManager,
        timeseries: TimeseriesClient,
        corp: impl ToString,
        site: impl ToString,
    ) -> Self {
        Self {
            sessions,
            timeseries,
            corp: corp.to_string(),
            site: site.to_string(),
            session: None,
        }
    }

    /// Start from an already established session instead of logging in on the first poll.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Fetch the counts for `tag`. A rejected session is renewed and the request retried once.
    pub async fn poll(&mut self, tag: &str, window: Window) -> Result<TimeseriesResponse, PollError> {
        let session = self.session().await?;
        match self
            .timeseries
            .fetch_counts(&session, &self.corp, &self.site, tag, window)
            .await
        {
            Err(ApiError::Unauthorized) => {
                warn!(tag, "session rejected, logging in again");
                self.session = None;
                let session = self.session().await?;
                Ok(self
                    .timeseries
                    .fetch_counts(&session, &self.corp, &self.site, tag, window)
                    .await?)
            }
            result => Ok(result?),
        }
    }

    async fn session(&mut self) -> Result<Session, PollError> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }
        let session = self.sessions.authenticate().await?;
        self.session = Some(session.clone());
        Ok(session)
    }
}
