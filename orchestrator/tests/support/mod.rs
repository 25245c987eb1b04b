//! Fakes for driving a whole [`Orchestrator`](sigsci_sounds_orchestrator::Orchestrator) run.

use sigsci_sounds_config::{
    Config,
    TagConfig,
};
use sigsci_sounds_orchestrator::Clock;
use sigsci_sounds_player::{
    AlertPlayer,
    PlaybackError,
    Resource,
};
use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{
            AtomicI64,
            AtomicUsize,
            Ordering,
        },
        Arc,
        Mutex,
    },
    time::Duration,
};
use tokio::{
    io::{
        AsyncReadExt,
        AsyncWriteExt,
    },
    net::TcpListener,
};
use tokio_util::sync::CancellationToken;
use url::Url;

pub fn config(api_url: Url, tags: Vec<TagConfig>) -> Config {
    Config {
        username: "analyst@example.com".to_string(),
        password: "hunter2".to_string(),
        corp: "example".to_string(),
        site: "www".to_string(),
        tags,
        api_url,
        interval_secs: 300,
        request_timeout_secs: 5,
    }
}

/// Records which tags were played and optionally requests shutdown on the first one.
#[derive(Default)]
pub struct RecordingPlayer {
    played: Mutex<Vec<String>>,
    cancel_on_play: Option<CancellationToken>,
}

impl RecordingPlayer {
    pub fn cancelling(cancel: CancellationToken) -> Self {
        Self {
            cancel_on_play: Some(cancel),
            ..Default::default()
        }
    }

    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }
}

impl AlertPlayer for RecordingPlayer {
    fn resolve(&self, tag: &TagConfig) -> Result<Resource, PlaybackError> {
        Ok(Resource::Audio(tag.sound.clone().into()))
    }

    fn play(&self, tag: &TagConfig) -> Result<(), PlaybackError> {
        self.played.lock().unwrap().push(tag.name.clone());
        if let Some(cancel) = &self.cancel_on_play {
            cancel.cancel();
        }
        Ok(())
    }
}

/// Sleeps finish at once, time still moves.
pub struct InstantClock(AtomicI64);

impl InstantClock {
    pub fn new(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }
}

impl Clock for InstantClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        self.0.fetch_add(duration.as_secs() as i64, Ordering::SeqCst);
        Box::pin(tokio::task::yield_now())
    }
}

/// Dashboard stand-in: answers logins with `login_reply` and every other request with `counts_body`.
pub struct FakeDashboard {
    pub api_url: Url,
    logins: Arc<AtomicUsize>,
    queries: Arc<AtomicUsize>,
}

impl FakeDashboard {
    pub async fn start(login_reply: &'static str, counts_body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let logins = Arc::new(AtomicUsize::new(0));
        let queries = Arc::new(AtomicUsize::new(0));

        tokio::spawn({
            let logins = logins.clone();
            let queries = queries.clone();
            async move {
                while let Ok((mut stream, _)) = listener.accept().await {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 4096];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut chunk).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&buf).to_string();
                    // Drain the body too, closing on unread input resets the connection.
                    let body_len = head
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                        })
                        .unwrap_or(0);
                    let header_len = head.find("\r\n\r\n").map_or(buf.len(), |pos| pos + 4);
                    while buf.len() < header_len + body_len {
                        match stream.read(&mut chunk).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let reply = if head.starts_with("POST") {
                        logins.fetch_add(1, Ordering::SeqCst);
                        login_reply.to_string()
                    } else {
                        queries.fetch_add(1, Ordering::SeqCst);
                        format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: \
                             close\r\n\r\n{counts_body}",
                            counts_body.len()
                        )
                    };
                    let _ = stream.write_all(reply.as_bytes()).await;
                    let _ = stream.shutdown().await;
                }
            }
        });

        Self {
            api_url: Url::parse(&format!("http://{addr}/api/v0")).unwrap(),
            logins,
            queries,
        }
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

pub const LOGIN_OK: &str =
    "HTTP/1.1 302 Found\r\nLocation: /\r\nSet-Cookie: session=abc123; Path=/\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

pub const LOGIN_INVALID: &str =
    "HTTP/1.1 302 Found\r\nLocation: /login?p=invalid\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
