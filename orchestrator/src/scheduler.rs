use crate::{
    clock::Clock,
    evaluator::{
        evaluate,
        Evaluation,
    },
    source::CountsSource,
};
use maybe_backoff::MaybeBackoff;
use sigsci_sounds_client::{
    PollError,
    Window,
};
use sigsci_sounds_config::TagConfig;
use sigsci_sounds_player::AlertPlayer;
use std::{
    sync::Arc,
    time::Duration,
};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Polling,
}

/// Where the next query window comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextWindow {
    /// `[now - interval, now]`, used at start-up and after a response without data.
    WallClock,
    /// `[until, until + interval]` following the range the API last reported.
    Chained(i64),
    /// The window of a failed poll, queried again unchanged.
    Retry(Window),
}

/// Polls one tag forever: query, walk the counts, alert, sleep.
pub struct WindowScheduler<S> {
    tag: TagConfig,
    interval: Duration,
    source: S,
    player: Arc<dyn AlertPlayer>,
    clock: Arc<dyn Clock>,
    state: SchedulerState,
    next: NextWindow,
}

impl<S: CountsSource> WindowScheduler<S> {
    pub fn new(
        tag: TagConfig,
        interval: Duration,
        source: S,
        player: Arc<dyn AlertPlayer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tag,
            interval,
            source,
            player,
            clock,
            state: SchedulerState::Idle,
            next: NextWindow::WallClock,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The window the next poll will query.
    pub fn next_window(&self) -> Window {
        match self.next {
            NextWindow::WallClock => Window::ending_at(self.clock.now(), self.interval),
            NextWindow::Chained(until) => Window::starting_at(until, self.interval),
            NextWindow::Retry(window) => window,
        }
    }

    /// Run until cancelled. Only errors that make further polling pointless are returned.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), PollError> {
        let tag = self.tag.name.clone();
        let mut backoff = MaybeBackoff::default();
        info!(%tag, interval = self.interval.as_secs(), "starting poller");

        while !cancel.is_cancelled() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = backoff.sleep() => {}
            }

            match self.poll_once(&cancel).await {
                Ok(evaluation) => {
                    backoff.disarm();
                    debug!(%tag, ?evaluation, "poll finished");
                }
                Err(err) if err.is_fatal() => {
                    error!(%tag, "stopping poller: {err}");
                    return Err(err);
                }
                Err(err) if err.is_unreachable() => {
                    backoff.arm();
                    warn!(%tag, "API unreachable, backing off: {err}");
                }
                Err(err) => {
                    warn!(%tag, "poll failed: {err}");
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = self.clock.sleep(self.interval) => {}
            }
        }

        info!(%tag, "poller stopped");
        Ok(())
    }

    /// One Idle → Polling → Idle round without the trailing sleep.
    ///
    /// On success the next window starts at the `until` the API reported, or falls back to wall-clock time when no
    /// data came back. On failure the same window is queried again.
    pub async fn poll_once(&mut self, cancel: &CancellationToken) -> Result<Evaluation, PollError> {
        let window = self.next_window();
        self.state = SchedulerState::Polling;
        debug!(tag = %self.tag.name, %window, "polling");

        let result = match self.source.fetch_counts(&self.tag.name, window).await {
            Ok(response) => {
                let player = self.player.clone();
                let tag = self.tag.clone();
                let evaluation = evaluate(&response, self.clock.as_ref(), cancel, || {
                    raise_alert(player.clone(), tag.clone())
                })
                .await;
                self.next = match response.reported_until() {
                    Some(until) => NextWindow::Chained(until),
                    None => NextWindow::WallClock,
                };
                Ok(evaluation)
            }
            Err(err) => {
                self.next = NextWindow::Retry(window);
                Err(err)
            }
        };

        self.state = SchedulerState::Idle;
        result
    }
}

/// Play the tag's alert on the blocking pool and wait for it. Failures are logged, the poller keeps going.
async fn raise_alert(player: Arc<dyn AlertPlayer>, tag: TagConfig) {
    let name = tag.name.clone();
    match tokio::task::spawn_blocking(move || player.play(&tag)).await {
        Ok(Ok(())) => info!(tag = %name, "alert played"),
        Ok(Err(err)) => error!(tag = %name, "failed to play alert: {err}"),
        Err(err) => error!(tag = %name, "alert playback panicked: {err}"),
    }
}
