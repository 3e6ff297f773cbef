//! Push channel lifecycle for one (exercise, user) identity.
//!
//! A [`LiveChannel`] owns exactly one WebSocket connection, driven by a reader
//! task that forwards [`ChannelEvent`]s through a queue private to that
//! connection. Closing the channel stops the task and drops the queue, so no
//! event of a closed channel can be observed after a switch.
//!
//! The connection follows a small state machine:
//!
//! ```text
//! Closed --Connect--> Connecting --Established--> Open
//! Connecting | Open --Failed--> Error
//! any --Close--> Closed
//! ```

use std::fmt;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::prelude::*;

const EVENT_QUEUE_SIZE: usize = 64;
const CLOSE_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Identity a channel is opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelTarget {
    pub exercise_id: i64,
    /// Specific user's submission. `None` selects the caller's own submission.
    pub user_id: Option<i64>,
}

impl ChannelTarget {
    pub fn own(exercise_id: i64) -> Self {
        Self {
            exercise_id,
            user_id: None,
        }
    }

    pub fn of_user(exercise_id: i64, user_id: i64) -> Self {
        Self {
            exercise_id,
            user_id: Some(user_id),
        }
    }
}

impl fmt::Display for ChannelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.user_id {
            Some(user_id) => write!(f, "exercise {} (user {user_id})", self.exercise_id),
            None => write!(f, "exercise {}", self.exercise_id),
        }
    }
}

/// Where the grading service listens for channel connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEndpoint {
    /// Host, port and optional path prefix, e.g. `localhost:8000`.
    pub host: String,
    /// Use `wss` instead of `ws`.
    pub secure: bool,
}

impl ChannelEndpoint {
    pub fn new(host: impl Into<String>, secure: bool) -> Self {
        Self {
            host: host.into(),
            secure,
        }
    }

    fn scheme(&self) -> &'static str {
        if self.secure { "wss" } else { "ws" }
    }
}

/// Builds the channel URI for `target`, carrying `credential` as the token query parameter.
pub fn channel_url(
    endpoint: &ChannelEndpoint,
    target: &ChannelTarget,
    credential: &str,
) -> Result<Url> {
    let host = endpoint.host.trim_end_matches('/');
    let path = match target.user_id {
        Some(user_id) => format!("ws/submission/{}/{user_id}", target.exercise_id),
        None => format!("ws/submission/{}", target.exercise_id),
    };
    let mut url = Url::parse(&format!("{}://{host}/{path}", endpoint.scheme()))?;
    url.query_pairs_mut().append_pair("token", credential);
    Ok(url)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Closed,
    Connecting,
    Open,
    Error,
}

/// Inputs of the [`ChannelState`] machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSignal {
    Connect,
    Established,
    Failed,
    Close,
}

impl ChannelState {
    pub fn transition(self, signal: ChannelSignal) -> Self {
        match (self, signal) {
            (_, ChannelSignal::Close) => ChannelState::Closed,
            (ChannelState::Closed, ChannelSignal::Connect) => ChannelState::Connecting,
            (ChannelState::Connecting, ChannelSignal::Established) => ChannelState::Open,
            (ChannelState::Connecting | ChannelState::Open, ChannelSignal::Failed) => {
                ChannelState::Error
            }
            (state, signal) => {
                warn!("Ignoring {signal:?} while channel is {state:?}");
                state
            }
        }
    }
}

/// Events reported by the reader task, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Opened,
    Frame(String),
    /// Transport failure, either while connecting or on an open connection.
    Failed(String),
    /// The server ended the connection cleanly.
    Closed,
}

impl ChannelEvent {
    fn signal(&self) -> Option<ChannelSignal> {
        match self {
            ChannelEvent::Opened => Some(ChannelSignal::Established),
            ChannelEvent::Frame(_) => None,
            ChannelEvent::Failed(_) => Some(ChannelSignal::Failed),
            ChannelEvent::Closed => Some(ChannelSignal::Close),
        }
    }
}

/// One open push channel.
pub struct LiveChannel {
    target: ChannelTarget,
    state: ChannelState,
    events: mpsc::Receiver<ChannelEvent>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl LiveChannel {
    /// Starts connecting to the channel of `target`.
    ///
    /// Fails with [`Error::MissingCredential`] before any connection attempt when
    /// no credential is available.
    pub fn open(
        endpoint: &ChannelEndpoint,
        target: ChannelTarget,
        credential: Option<&str>,
    ) -> Result<Self> {
        let credential = credential
            .filter(|credential| !credential.is_empty())
            .ok_or(Error::MissingCredential)?;
        let url = channel_url(endpoint, &target, credential)?;

        let (tx, rx) = mpsc::channel(EVENT_QUEUE_SIZE);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        info!("Opening channel for {target}");
        let task = tokio::spawn(run_channel(url, tx, shutdown_rx));

        Ok(Self {
            target,
            state: ChannelState::Closed.transition(ChannelSignal::Connect),
            events: rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn target(&self) -> ChannelTarget {
        self.target
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Waits for the next event. Returns `None` once the reader task is gone or
    /// the channel was closed.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        let event = self.events.recv().await?;
        if let Some(signal) = event.signal() {
            self.state = self.state.transition(signal);
        }
        Some(event)
    }

    /// Closes the connection and waits for the reader task to finish.
    ///
    /// Safe to call more than once.
    pub async fn close(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // The task may already be gone after a failure or a server close.
            let _ = shutdown.send(());
        }
        // Fails a send blocked on a full queue so the task reaches its close path.
        self.events.close();
        if let Some(mut task) = self.task.take() {
            match timeout(CLOSE_GRACE_PERIOD, &mut task).await {
                Ok(Ok(())) => debug!("Channel for {} finished", self.target),
                Ok(Err(join_err)) => warn!("Channel task for {} failed: {join_err}", self.target),
                Err(_timeout) => {
                    warn!(
                        "Channel for {} did not close within {:?}. Aborting",
                        self.target, CLOSE_GRACE_PERIOD
                    );
                    task.abort();
                }
            }
            info!("Closed channel for {}", self.target);
        }
        self.state = self.state.transition(ChannelSignal::Close);
    }
}

/// Signals shutdown without waiting. The detached reader task still sends its
/// Close frame and exits on its own.
impl Drop for LiveChannel {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            if shutdown.send(()).is_ok() {
                debug!("Channel for {} dropped while open", self.target);
            }
        }
    }
}

async fn run_channel(
    url: Url,
    events: mpsc::Sender<ChannelEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let connection = tokio::select! {
        result = connect_async(url.as_str()) => result,
        _ = &mut shutdown => {
            debug!("Channel closed before the connection was established");
            return;
        }
    };

    let (mut socket, _) = match connection {
        Ok(connection) => connection,
        Err(err) => {
            error!("Failed to open channel - {err}");
            let _ = events.send(ChannelEvent::Failed(err.to_string())).await;
            return;
        }
    };
    info!("Channel connection established");

    if events.send(ChannelEvent::Opened).await.is_err() {
        let _ = socket.close(None).await;
        return;
    }

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!("Sending close frame");
                if let Err(err) = socket.close(None).await {
                    debug!("Failed to send close frame - {err}");
                }
                return;
            }
            message = socket.next() => {
                let event = match message {
                    Some(Ok(Message::Text(text))) => {
                        debug!("Received frame: {}", text.as_str());
                        ChannelEvent::Frame(text.as_str().to_owned())
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!("Channel closed by server {:?}", frame);
                        let _ = events.send(ChannelEvent::Closed).await;
                        return;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        warn!("Received unexpected binary message");
                        continue;
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                    Some(Err(err)) => {
                        error!("Channel transport error - {err}");
                        let _ = events.send(ChannelEvent::Failed(err.to_string())).await;
                        return;
                    }
                    None => {
                        warn!("Channel stream ended");
                        let _ = events.send(ChannelEvent::Closed).await;
                        return;
                    }
                };
                if events.send(event).await.is_err() {
                    let _ = socket.close(None).await;
                    return;
                }
            }
        }
    }
}
