//! Domain events emitted after successful comment mutations.
//!
//! The service itself never publishes; the real-time bridge turns the
//! authoritative result of a service call into one of these events and hands
//! it to the channel for the owning post.

use std::fmt;

use super::{Comment, CommentId, PostId};

/// Authoritative outcome of a successful comment mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentEvent {
    Created(Comment),
    Edited(Comment),
    Removed { comment_id: CommentId, post_id: PostId },
}

impl CommentEvent {
    /// Post whose channel should carry the event.
    pub fn post_id(&self) -> &PostId {
        match self {
            Self::Created(comment) | Self::Edited(comment) => &comment.post_id,
            Self::Removed { post_id, .. } => post_id,
        }
    }

    /// Identifier of the affected comment.
    pub fn comment_id(&self) -> &CommentId {
        match self {
            Self::Created(comment) | Self::Edited(comment) => &comment.id,
            Self::Removed { comment_id, .. } => comment_id,
        }
    }

    /// Channel that subscribers of the owning post listen on.
    pub fn channel(&self) -> ChannelName {
        ChannelName::for_post(self.post_id())
    }
}

/// Name of a per-post publish/subscribe channel (`post:{post_id}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelName(String);

impl ChannelName {
    /// Channel scoping events for `post_id`.
    ///
    /// # Examples
    /// ```
    /// use post_comments::domain::{ChannelName, PostId};
    ///
    /// let post = PostId::new("P1").expect("valid post id");
    /// assert_eq!(ChannelName::for_post(&post).as_str(), "post:P1");
    /// ```
    pub fn for_post(post_id: &PostId) -> Self {
        Self(format!("post:{post_id}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
