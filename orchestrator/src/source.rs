use sigsci_sounds_client::{
    AuthenticatedPoller,
    PollError,
    TimeseriesResponse,
    Window,
};
use std::{
    future::Future,
    pin::Pin,
};

/// Where a scheduler gets its counts from.
pub trait CountsSource: Send {
    fn fetch_counts<'a>(
        &'a mut self,
        tag: &'a str,
        window: Window,
    ) -> Pin<Box<dyn Future<Output = Result<TimeseriesResponse, PollError>> + Send + 'a>>;
}

impl CountsSource for AuthenticatedPoller {
    fn fetch_counts<'a>(
        &'a mut self,
        tag: &'a str,
        window: Window,
    ) -> Pin<Box<dyn Future<Output = Result<TimeseriesResponse, PollError>> + Send + 'a>> {
        Box::pin(self.poll(tag, window))
    }
}
