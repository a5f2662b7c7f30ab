//! In-process publish/subscribe hub for comment events.
//!
//! Each post channel maps to one `tokio::sync::broadcast` sender. Senders are
//! created lazily on first subscribe. A sender whose subscribers have all
//! gone is pruned by the next publish to it or the next subscribe to any
//! channel, so the map holds live channels only. Subscribers that fall behind by more than the configured
//! capacity lose the oldest events and are told how many they missed.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::ports::{CommentChannel, CommentChannelError};
use crate::domain::{ChannelName, CommentEvent};

/// Default number of events buffered per channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Largest per-channel buffer the hub will allocate.
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;

/// Per-post broadcast channels held in process memory.
#[derive(Debug)]
pub struct BroadcastHub {
    capacity: usize,
    channels: Mutex<HashMap<ChannelName, broadcast::Sender<CommentEvent>>>,
}

impl BroadcastHub {
    /// Create a hub buffering up to `capacity` events per channel.
    ///
    /// A zero capacity is raised to one and anything above
    /// [`MAX_CHANNEL_CAPACITY`] is lowered to it.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.clamp(1, MAX_CHANNEL_CAPACITY),
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// Number of channels that currently have subscribers.
    pub fn channel_count(&self) -> usize {
        self.lock()
            .values()
            .filter(|sender| sender.receiver_count() > 0)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ChannelName, broadcast::Sender<CommentEvent>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl CommentChannel for BroadcastHub {
    fn publish(&self, event: CommentEvent) -> Result<(), CommentChannelError> {
        let channel = event.channel();
        let mut channels = self.lock();
        let Some(sender) = channels.get(&channel) else {
            debug!(channel = %channel, "no subscribers; event dropped");
            return Ok(());
        };

        match sender.send(event) {
            Ok(receivers) => {
                debug!(channel = %channel, receivers, "comment event published");
            }
            Err(_) => {
                channels.remove(&channel);
                debug!(channel = %channel, "last subscriber left; channel pruned");
            }
        }
        Ok(())
    }

    fn subscribe(&self, channel: &ChannelName) -> broadcast::Receiver<CommentEvent> {
        let mut channels = self.lock();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        if let Some(sender) = channels.get(channel) {
            return sender.subscribe();
        }
        let (sender, receiver) = broadcast::channel(self.capacity);
        channels.insert(channel.clone(), sender);
        receiver
    }
}
