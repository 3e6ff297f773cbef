//! Result session: one aggregator bound to at most one live channel.

use tracing::{info, warn};

use crate::aggregator::{ConnectionFault, ResultAggregator};
use crate::channel::{ChannelEndpoint, ChannelEvent, ChannelState, ChannelTarget, LiveChannel};
use crate::prelude::*;
use crate::view::ResultView;

/// Live results of one (exercise, user) identity.
///
/// Changing the identity always closes the previous channel before the next
/// one is opened, and drops everything the previous channel delivered.
pub struct ResultSession {
    endpoint: ChannelEndpoint,
    exercise_grade: Option<f64>,
    aggregator: ResultAggregator,
    target: Option<ChannelTarget>,
    credential: Option<String>,
    channel: Option<LiveChannel>,
}

impl ResultSession {
    pub fn new(endpoint: ChannelEndpoint, exercise_grade: Option<f64>) -> Self {
        Self {
            endpoint,
            exercise_grade,
            aggregator: ResultAggregator::new(),
            target: None,
            credential: None,
            channel: None,
        }
    }

    /// Opens the channel for `target`, closing the current one first.
    ///
    /// A missing credential does not fail the call. The session shows the error
    /// view instead and no connection is attempted.
    pub async fn open(&mut self, target: ChannelTarget, credential: Option<&str>) -> Result<()> {
        self.close().await;
        self.aggregator.reset();
        self.target = Some(target);
        self.credential = credential.map(String::from);

        match LiveChannel::open(&self.endpoint, target, credential) {
            Ok(channel) => {
                self.channel = Some(channel);
                Ok(())
            }
            Err(Error::MissingCredential) => {
                warn!("User is not authenticated or token is missing");
                self.aggregator.mark_error(ConnectionFault::MissingCredential);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Moves the session to another identity or credential. Does nothing if
    /// both are unchanged.
    pub async fn switch(&mut self, target: ChannelTarget, credential: Option<&str>) -> Result<()> {
        if self.target == Some(target) && self.credential.as_deref() == credential {
            return Ok(());
        }
        info!("Switching results to {target}");
        self.open(target, credential).await
    }

    /// Waits for the next channel event and applies it.
    ///
    /// Returns `None` when there is no channel or it has ended.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        let event = self.channel.as_mut()?.recv().await?;
        match &event {
            ChannelEvent::Opened => self.aggregator.mark_open(),
            ChannelEvent::Frame(text) => {
                self.aggregator.apply_frame(text);
            }
            ChannelEvent::Failed(cause) => {
                self.aggregator
                    .mark_error(ConnectionFault::Transport(cause.clone()));
            }
            ChannelEvent::Closed => info!("Server closed the results channel"),
        }
        Some(event)
    }

    /// Closes the current channel, if any.
    pub async fn close(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            channel.close().await;
        }
    }

    pub fn target(&self) -> Option<ChannelTarget> {
        self.target
    }

    pub fn channel_state(&self) -> ChannelState {
        self.channel
            .as_ref()
            .map(LiveChannel::state)
            .unwrap_or(ChannelState::Closed)
    }

    pub fn aggregator(&self) -> &ResultAggregator {
        &self.aggregator
    }

    pub fn view(&self) -> ResultView {
        self.aggregator.view(self.exercise_grade)
    }
}
