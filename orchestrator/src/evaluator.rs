use crate::clock::Clock;
use sigsci_sounds_client::TimeseriesResponse;
use std::{
    future::Future,
    time::Duration,
};
use tokio_util::sync::CancellationToken;

/// Pause taken before each sample is inspected, which also caps alerts at one per second.
pub const SAMPLE_PAUSE: Duration = Duration::from_secs(1);

/// What a walk over one response did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub inspected: usize,
    pub alerts: usize,
    /// The walk stopped early because of a shutdown request.
    pub cancelled: bool,
}

/// Walk the first series of `response`, pausing before every sample and awaiting `on_alert` for each positive
/// count. Further series are ignored. Cancellation is checked between samples, never during an alert.
pub async fn evaluate<F, Fut>(
    response: &TimeseriesResponse,
    clock: &dyn Clock,
    cancel: &CancellationToken,
    mut on_alert: F,
) -> Evaluation
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut evaluation = Evaluation::default();
    let Some(series) = response.first_series() else {
        return evaluation;
    };

    for &count in &series.data {
        if cancel.is_cancelled() {
            evaluation.cancelled = true;
            break;
        }
        clock.sleep(SAMPLE_PAUSE).await;
        evaluation.inspected += 1;
        if count > 0 {
            on_alert().await;
            evaluation.alerts += 1;
        }
    }

    evaluation
}
