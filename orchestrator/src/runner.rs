use crate::{
    clock::{
        Clock,
        SystemClock,
    },
    scheduler::WindowScheduler,
};
use eyre::{
    eyre,
    Context as _,
    Result,
};
use futures::future::join_all;
use sigsci_sounds_client::{
    http_client,
    ApiEndpoints,
    AuthenticatedPoller,
    SessionManager,
    TimeseriesClient,
};
use sigsci_sounds_config::{
    Config,
    TagConfig,
};
use sigsci_sounds_player::{
    AlertPlayer,
    RodioPlayer,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Owns the configuration and starts one poller per tag.
pub struct Orchestrator {
    config: Config,
    player: Arc<dyn AlertPlayer>,
    clock: Arc<dyn Clock>,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            player: Arc::new(RodioPlayer::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_player(mut self, player: Arc<dyn AlertPlayer>) -> Self {
        self.player = player;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Monitor every configured tag until `cancel` fires or the credentials are rejected.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        self.config.validate_for_run()?;
        self.check_resources()?;

        let http = http_client(self.config.request_timeout())?;
        let endpoints = ApiEndpoints::new(self.config.api_url.clone())?;
        let sessions = SessionManager::new(
            http.clone(),
            &endpoints,
            &self.config.username,
            &self.config.password,
        );

        info!(api = %self.config.api_url, user = %self.config.username, "logging in");
        let session = sessions.authenticate().await.context("failed to log in")?;
        info!(
            corp = %self.config.corp,
            site = %self.config.site,
            tags = self.config.tags.len(),
            "logged in, starting pollers"
        );

        let mut handles = Vec::new();
        for tag in &self.config.tags {
            let poller = AuthenticatedPoller::new(
                sessions.clone(),
                TimeseriesClient::new(http.clone(), endpoints.clone()),
                &self.config.corp,
                &self.config.site,
            )
            .with_session(session.clone());

            let scheduler = WindowScheduler::new(
                tag.clone(),
                self.config.interval(),
                poller,
                self.player.clone(),
                self.clock.clone(),
            );

            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                let result = scheduler.run(cancel.clone()).await;
                if result.is_err() {
                    // Nothing else can log in either.
                    cancel.cancel();
                }
                result
            }));
        }

        let mut failure = None;
        for joined in join_all(handles).await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    failure.get_or_insert_with(|| eyre!(err));
                }
                Err(err) => {
                    failure.get_or_insert_with(|| eyre!("poller task failed: {err}"));
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => {
                info!("all pollers stopped");
                Ok(())
            }
        }
    }

    /// Play every tag's alert once, in configuration order. Needs no credentials and no network.
    ///
    /// `on_play` is called for each tag right before its alert plays.
    pub async fn self_test(&self, mut on_play: impl FnMut(&TagConfig)) -> Result<()> {
        self.config.validate_for_self_test()?;

        for tag in &self.config.tags {
            on_play(tag);
            debug!(tag = %tag.name, sound = %tag.sound, "testing alert");
            let player = self.player.clone();
            let tag = tag.clone();
            tokio::task::spawn_blocking(move || play_checked(player.as_ref(), &tag))
                .await
                .context("playback task failed")??;
        }

        info!(tags = self.config.tags.len(), "self-test finished");
        Ok(())
    }

    /// Fail before any network traffic if a configured sound cannot be played.
    fn check_resources(&self) -> Result<()> {
        for tag in &self.config.tags {
            let resource = self
                .player
                .resolve(tag)
                .with_context(|| format!("alert for tag {} is not playable", tag.name))?;
            debug!(tag = %tag.name, ?resource, "alert resource ready");
        }
        Ok(())
    }
}

fn play_checked(player: &dyn AlertPlayer, tag: &TagConfig) -> Result<()> {
    player.resolve(tag)?;
    player
        .play(tag)
        .with_context(|| format!("failed to play alert for {}", tag.name))
}
