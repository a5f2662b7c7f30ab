//! Port for the per-post publish/subscribe channel.
//!
//! The real-time bridge publishes confirmed [`CommentEvent`]s here and each
//! connection subscribes to the channel of the post it is viewing. Delivery
//! is best effort: publishing to a channel without subscribers succeeds and
//! the event is discarded.

use tokio::sync::broadcast;

use crate::domain::{ChannelName, CommentEvent};

use super::define_port_error;

define_port_error! {
    /// Errors raised by channel adapters.
    pub enum CommentChannelError {
        /// The broker is shutting down and accepts no more events.
        Closed { message: String } => "comment channel closed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait CommentChannel: Send + Sync {
    /// Fan `event` out to every subscriber of its post's channel.
    fn publish(&self, event: CommentEvent) -> Result<(), CommentChannelError>;

    /// Subscribe to events on `channel`.
    fn subscribe(&self, channel: &ChannelName) -> broadcast::Receiver<CommentEvent>;
}
