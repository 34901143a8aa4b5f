//! Dual-channel orchestration.
//!
//! A [`ChatContext`] owns the transport, one or two [`ChatChannel`]s, and the
//! send guard. One `send_message` call fans a message out to every channel,
//! waits for all of them to settle, and reports per-channel outcomes without
//! ever letting one channel's failure abort the other.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::channel::{ChannelConfig, ChannelReport, ChatChannel};
use crate::errors::{ChannelFailure, ClientError};
use crate::sink::{MetricsPanel, TranscriptSink};
use crate::transport::ChatTransport;

/// Settlement of every channel for one send.
///
/// Partial success is a normal terminal state; the set carries no single
/// success/failure status of its own.
#[derive(Clone, Debug)]
pub struct OutcomeSet {
    outcomes: Vec<Result<ChannelReport, ChannelFailure>>,
}

impl OutcomeSet {
    /// All per-channel outcomes, in channel registration order.
    pub fn outcomes(&self) -> &[Result<ChannelReport, ChannelFailure>] {
        &self.outcomes
    }

    /// Outcome for a specific channel id.
    pub fn outcome_for(&self, channel_id: u8) -> Option<&Result<ChannelReport, ChannelFailure>> {
        self.outcomes.iter().find(|outcome| match outcome {
            Ok(report) => report.channel_id == channel_id,
            Err(failure) => failure.channel_id == channel_id,
        })
    }

    /// Reports of the channels that completed.
    pub fn completed(&self) -> impl Iterator<Item = &ChannelReport> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    /// Failures of the channels that did not complete.
    pub fn failed(&self) -> impl Iterator<Item = &ChannelFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    /// True when every channel completed.
    pub fn all_completed(&self) -> bool {
        self.outcomes.iter().all(Result::is_ok)
    }
}

/// Re-entrancy guard for the send control.
///
/// Held for the duration of one `send_message` call and released on every
/// exit path, so the UI can never get stuck in a busy state from a single
/// channel's fault.
#[derive(Default)]
struct SendGuard {
    busy: AtomicBool,
}

impl SendGuard {
    fn acquire(&self) -> Result<SendPermit<'_>, ClientError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(ClientError::Busy);
        }
        Ok(SendPermit { guard: self })
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

struct SendPermit<'a> {
    guard: &'a SendGuard,
}

impl Drop for SendPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

/// Orchestrates up to two concurrent conversation channels.
pub struct ChatContext {
    transport: Arc<dyn ChatTransport>,
    channels: Vec<ChatChannel>,
    guard: SendGuard,
}

impl ChatContext {
    /// Starts a builder for registering the transport and channels.
    pub fn builder() -> ChatContextBuilder {
        ChatContextBuilder::default()
    }

    /// True while a send is in flight.
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    /// Clears every channel's transcript and metrics panel.
    pub fn clear(&self) {
        for channel in &self.channels {
            channel.clear();
        }
    }

    /// Sends one message to every channel and waits for all of them to settle.
    ///
    /// Before any network activity, every channel's transcript and metrics
    /// panel is cleared and the user's message is echoed into every
    /// transcript. Channels then run concurrently; the join waits for every
    /// outcome and never short-circuits on the first failure.
    pub async fn send_message(&self, message: &str) -> Result<OutcomeSet, ClientError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ClientError::Validation("message must not be empty".into()));
        }
        let _permit = self.guard.acquire()?;

        let exchange_id = uuid::Uuid::new_v4();
        debug!(%exchange_id, channels = self.channels.len(), "starting exchange");

        for channel in &self.channels {
            channel.clear();
        }
        for channel in &self.channels {
            channel.echo_user(message);
        }

        let loops = self
            .channels
            .iter()
            .map(|channel| channel.run(self.transport.as_ref(), message));
        let outcomes = futures::future::join_all(loops).await;

        for outcome in &outcomes {
            match outcome {
                Ok(report) => {
                    debug!(%exchange_id, channel = report.channel_id, has_metrics = report.metrics.is_some(), "channel completed");
                }
                Err(failure) => {
                    debug!(%exchange_id, channel = failure.channel_id, error = %failure.error, "channel failed");
                }
            }
        }

        Ok(OutcomeSet { outcomes })
    }
}

/// Builder used to assemble a [`ChatContext`].
#[derive(Default)]
pub struct ChatContextBuilder {
    transport: Option<Arc<dyn ChatTransport>>,
    channels: Vec<ChatChannel>,
}

impl ChatContextBuilder {
    /// Sets the transport shared by all channels.
    pub fn transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Registers one channel with its config and sinks.
    pub fn channel(
        mut self,
        config: ChannelConfig,
        transcript: Arc<dyn TranscriptSink>,
        metrics: Arc<dyn MetricsPanel>,
    ) -> Self {
        self.channels.push(ChatChannel::new(config, transcript, metrics));
        self
    }

    /// Validates the configuration and builds the context.
    ///
    /// Requires a transport and between one and two channels with distinct
    /// channel ids.
    pub fn build(self) -> Result<ChatContext, ClientError> {
        let transport = self
            .transport
            .ok_or_else(|| ClientError::Config("a transport is required".into()))?;
        if self.channels.is_empty() {
            return Err(ClientError::Config("at least one channel is required".into()));
        }
        if self.channels.len() > 2 {
            return Err(ClientError::Config("at most two channels are supported".into()));
        }
        if self.channels.len() == 2 && self.channels[0].channel_id() == self.channels[1].channel_id()
        {
            return Err(ClientError::Config(format!(
                "duplicate channel id: {}",
                self.channels[0].channel_id()
            )));
        }
        Ok(ChatContext {
            transport,
            channels: self.channels,
            guard: SendGuard::default(),
        })
    }
}
