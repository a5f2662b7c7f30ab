//! Client-side reconciliation of a post's comment list.
//!
//! A [`LiveCommentView`] starts from a snapshot (typically the first page of
//! the listing endpoint) and applies outbound protocol messages in arrival
//! order. Application is idempotent by comment id, so replays and races
//! between the snapshot and the stream never produce duplicate entries.

use std::collections::HashSet;

use crate::domain::{Comment, CommentId};
use crate::inbound::ws::messages::{EditCommentPayload, OutboundMessage, RemoveCommentPayload};

/// What applying a message did to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Inserted,
    Edited,
    Removed,
    /// The message was a duplicate, stale, for an unknown id, or an error.
    Ignored,
}

/// Ordered list of visible comments kept in sync with the channel.
#[derive(Debug, Clone, Default)]
pub struct LiveCommentView {
    comments: Vec<Comment>,
    removed: HashSet<CommentId>,
}

impl LiveCommentView {
    /// Empty view with no tombstones.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the view; later duplicates of these comments are ignored.
    pub fn from_snapshot(comments: impl IntoIterator<Item = Comment>) -> Self {
        let mut view = Self::new();
        for comment in comments {
            view.insert(comment);
        }
        view
    }

    /// Visible comments in arrival order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Visible comment with `id`; removed comments are never returned.
    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|comment| &comment.id == id)
    }

    /// Number of visible comments.
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Apply one outbound message.
    pub fn apply(&mut self, message: OutboundMessage) -> Applied {
        match message {
            OutboundMessage::NewComment(comment) => self.insert(comment),
            OutboundMessage::EditComment(payload) => self.edit(payload),
            OutboundMessage::RemoveComment(payload) => self.remove(payload),
            OutboundMessage::Error(_) => Applied::Ignored,
        }
    }

    fn insert(&mut self, comment: Comment) -> Applied {
        if self.removed.contains(&comment.id) || self.get(&comment.id).is_some() {
            return Applied::Ignored;
        }
        self.comments.push(comment);
        Applied::Inserted
    }

    fn edit(&mut self, payload: EditCommentPayload) -> Applied {
        let Some(existing) = self
            .comments
            .iter_mut()
            .find(|comment| comment.id == payload.id)
        else {
            return Applied::Ignored;
        };
        if payload.updated_at < existing.updated_at {
            return Applied::Ignored;
        }
        existing.body = payload.body;
        existing.updated_at = payload.updated_at;
        Applied::Edited
    }

    fn remove(&mut self, payload: RemoveCommentPayload) -> Applied {
        let before = self.comments.len();
        self.comments
            .retain(|comment| comment.id != payload.comment_id);
        let removed = self.comments.len() != before;
        self.removed.insert(payload.comment_id);
        if removed {
            Applied::Removed
        } else {
            Applied::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommentBody, CommentEvent, Error, PostId, User, UserId};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
            + Duration::minutes(minutes)
    }

    fn comment(id: &str) -> Comment {
        Comment::new(
            CommentId::new(id).expect("valid id"),
            PostId::new("P1").expect("valid post"),
            User::new(UserId::new(1).expect("valid user"), "Ann"),
            CommentBody::new(format!("body {id}")).expect("valid body"),
            at(0),
        )
    }

    fn edit(id: &str, body: &str, minutes: i64) -> OutboundMessage {
        OutboundMessage::EditComment(EditCommentPayload {
            id: CommentId::new(id).expect("valid id"),
            body: CommentBody::new(body).expect("valid body"),
            updated_at: at(minutes),
        })
    }

    fn remove(id: &str) -> OutboundMessage {
        OutboundMessage::RemoveComment(RemoveCommentPayload {
            comment_id: CommentId::new(id).expect("valid id"),
        })
    }

    #[fixture]
    fn view() -> LiveCommentView {
        LiveCommentView::from_snapshot([comment("C1"), comment("C2")])
    }

    #[rstest]
    fn new_comment_is_appended(mut view: LiveCommentView) {
        let applied = view.apply(OutboundMessage::from(CommentEvent::Created(comment("C3"))));
        assert_eq!(applied, Applied::Inserted);
        let ids: Vec<_> = view.comments().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2", "C3"]);
    }

    #[rstest]
    fn duplicate_new_comment_is_ignored(mut view: LiveCommentView) {
        assert_eq!(
            view.apply(OutboundMessage::NewComment(comment("C1"))),
            Applied::Ignored
        );
        assert_eq!(view.len(), 2);
    }

    #[rstest]
    fn edit_replaces_body_of_known_comment(mut view: LiveCommentView) {
        assert_eq!(view.apply(edit("C1", "edited", 5)), Applied::Edited);
        let edited = view
            .get(&CommentId::new("C1").expect("valid id"))
            .expect("comment present");
        assert_eq!(edited.body.as_str(), "edited");
        assert_eq!(edited.updated_at, at(5));
    }

    #[rstest]
    fn edit_for_unknown_id_is_a_no_op(mut view: LiveCommentView) {
        let before = view.comments().to_vec();
        assert_eq!(view.apply(edit("C9", "edited", 5)), Applied::Ignored);
        assert_eq!(view.comments(), before.as_slice());
    }

    #[rstest]
    fn stale_edits_are_ignored(mut view: LiveCommentView) {
        view.apply(edit("C1", "newer", 10));
        assert_eq!(view.apply(edit("C1", "older", 5)), Applied::Ignored);
        let current = view
            .get(&CommentId::new("C1").expect("valid id"))
            .expect("comment present");
        assert_eq!(current.body.as_str(), "newer");
    }

    #[rstest]
    fn remove_for_unknown_id_is_a_no_op(mut view: LiveCommentView) {
        assert_eq!(view.apply(remove("C9")), Applied::Ignored);
        assert_eq!(view.len(), 2);
    }

    #[rstest]
    fn removed_comments_do_not_reappear(mut view: LiveCommentView) {
        assert_eq!(view.apply(remove("C1")), Applied::Removed);
        assert_eq!(
            view.apply(OutboundMessage::NewComment(comment("C1"))),
            Applied::Ignored
        );
        assert_eq!(view.apply(remove("C1")), Applied::Ignored);
        assert_eq!(view.len(), 1);
    }

    #[rstest]
    fn error_replies_leave_the_view_untouched(mut view: LiveCommentView) {
        let message = OutboundMessage::error(&Error::unauthorized("no"), Some("update_comment"));
        assert_eq!(view.apply(message), Applied::Ignored);
        assert_eq!(view.len(), 2);
    }
}
