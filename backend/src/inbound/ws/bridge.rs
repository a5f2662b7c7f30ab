//! Bridge from inbound protocol messages to the comment service.
//!
//! Each inbound message triggers exactly one service call, made with the
//! session's authenticated identity. Only the authoritative result of a
//! successful call is published; failures go back to the caller and never
//! reach the channel.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::{
    CommentChannel, CommentCommand, CreateCommentRequest, DeleteCommentRequest,
    UpdateCommentRequest,
};
use crate::domain::{CommentEvent, CommentId, Error, PostId, RequestContext, UserId};
use crate::inbound::ws::messages::InboundMessage;

/// Identity and scope of one real-time connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionScope {
    /// Authenticated caller.
    pub user_id: UserId,
    /// Post whose channel the connection follows.
    pub post_id: PostId,
}

fn parse_comment_id(raw: String) -> Result<CommentId, Error> {
    CommentId::new(raw).map_err(|err| Error::invalid_id(err.to_string()))
}

fn parse_post_id(raw: String) -> Result<PostId, Error> {
    PostId::new(raw).map_err(|err| Error::invalid_id(err.to_string()))
}

/// Translates inbound messages into service calls and publishes the results.
#[derive(Clone)]
pub struct CommentEventBridge {
    commands: Arc<dyn CommentCommand>,
    channel: Arc<dyn CommentChannel>,
}

impl CommentEventBridge {
    /// Bridge `commands` to subscribers of `channel`.
    pub fn new(commands: Arc<dyn CommentCommand>, channel: Arc<dyn CommentChannel>) -> Self {
        Self { commands, channel }
    }

    /// Channel the bridge publishes on; sessions subscribe through it.
    pub fn channel(&self) -> &Arc<dyn CommentChannel> {
        &self.channel
    }

    /// Run the service call for `message` and publish its outcome.
    ///
    /// # Errors
    /// Returns the domain error of a failed call; nothing is published then.
    pub async fn dispatch(
        &self,
        ctx: &RequestContext,
        scope: &SessionScope,
        message: InboundMessage,
    ) -> Result<CommentEvent, Error> {
        let event = self.execute(ctx, scope, message).await?;
        if let Err(err) = self.channel.publish(event.clone()) {
            warn!(
                error = %err,
                channel = %event.channel(),
                comment_id = %event.comment_id(),
                "failed to publish comment event"
            );
        }
        Ok(event)
    }

    async fn execute(
        &self,
        ctx: &RequestContext,
        scope: &SessionScope,
        message: InboundMessage,
    ) -> Result<CommentEvent, Error> {
        match message {
            InboundMessage::CreateComment(payload) => {
                let request = CreateCommentRequest {
                    user_id: scope.user_id,
                    post_id: parse_post_id(payload.post_id)?,
                    body: payload.body,
                };
                let comment = self.commands.create(ctx, request).await?;
                Ok(CommentEvent::Created(comment))
            }
            InboundMessage::UpdateComment(payload) => {
                let request = UpdateCommentRequest {
                    comment_id: parse_comment_id(payload.comment_id)?,
                    user_id: scope.user_id,
                    body: payload.body,
                };
                let comment = self.commands.update(ctx, request).await?;
                Ok(CommentEvent::Edited(comment))
            }
            InboundMessage::DeleteComment(payload) => {
                let request = DeleteCommentRequest {
                    comment_id: parse_comment_id(payload.comment_id)?,
                    user_id: scope.user_id,
                };
                let removed = self.commands.delete(ctx, request).await?;
                Ok(CommentEvent::Removed {
                    comment_id: removed.id,
                    post_id: removed.post_id,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{CommentChannelError, MockCommentChannel, MockCommentCommand};
    use crate::domain::{Comment, CommentBody, ErrorCode, User};
    use crate::inbound::ws::messages::{
        CreateCommentPayload, DeleteCommentPayload, UpdateCommentPayload,
    };
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn scope() -> SessionScope {
        SessionScope {
            user_id: UserId::new(5).expect("valid user"),
            post_id: PostId::new("P1").expect("valid post"),
        }
    }

    fn comment_for(request: &CreateCommentRequest) -> Comment {
        Comment::new(
            CommentId::new("C1").expect("valid id"),
            request.post_id.clone(),
            User::new(request.user_id, "Eve"),
            CommentBody::new(request.body.clone()).expect("valid body"),
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
        )
    }

    fn bridge(commands: MockCommentCommand, channel: MockCommentChannel) -> CommentEventBridge {
        CommentEventBridge::new(Arc::new(commands), Arc::new(channel))
    }

    #[rstest]
    #[tokio::test]
    async fn create_runs_as_session_user_and_publishes_new_comment(scope: SessionScope) {
        let mut commands = MockCommentCommand::new();
        commands
            .expect_create()
            .withf(|_, request| {
                request.user_id.get() == 5
                    && request.post_id.as_str() == "P1"
                    && request.body == "x"
            })
            .times(1)
            .returning(|_, request| Ok(comment_for(&request)));
        let mut channel = MockCommentChannel::new();
        channel
            .expect_publish()
            .withf(|event| {
                matches!(event, CommentEvent::Created(_)) && event.channel().as_str() == "post:P1"
            })
            .times(1)
            .returning(|_| Ok(()));

        let event = bridge(commands, channel)
            .dispatch(
                &RequestContext::background(),
                &scope,
                InboundMessage::CreateComment(CreateCommentPayload {
                    post_id: "P1".to_owned(),
                    body: "x".to_owned(),
                }),
            )
            .await
            .expect("dispatch succeeds");

        assert!(matches!(event, CommentEvent::Created(ref comment) if comment.user.id.get() == 5));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_calls_are_not_published(scope: SessionScope) {
        let mut commands = MockCommentCommand::new();
        commands
            .expect_update()
            .times(1)
            .returning(|_, _| Err(Error::unauthorized("not yours")));
        let mut channel = MockCommentChannel::new();
        channel.expect_publish().times(0);

        let error = bridge(commands, channel)
            .dispatch(
                &RequestContext::background(),
                &scope,
                InboundMessage::UpdateComment(UpdateCommentPayload {
                    comment_id: "C1".to_owned(),
                    body: "y".to_owned(),
                }),
            )
            .await
            .expect_err("unauthorised");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case("")]
    #[case(" C1 ")]
    #[tokio::test]
    async fn malformed_ids_are_rejected_before_the_service(
        scope: SessionScope,
        #[case] raw: &str,
    ) {
        let mut commands = MockCommentCommand::new();
        commands.expect_delete().times(0);
        let mut channel = MockCommentChannel::new();
        channel.expect_publish().times(0);

        let error = bridge(commands, channel)
            .dispatch(
                &RequestContext::background(),
                &scope,
                InboundMessage::DeleteComment(DeleteCommentPayload {
                    comment_id: raw.to_owned(),
                }),
            )
            .await
            .expect_err("invalid id");

        assert_eq!(error.code(), ErrorCode::InvalidId);
    }

    fn stored_on(post: &str) -> Comment {
        Comment::new(
            CommentId::new("C1").expect("valid id"),
            PostId::new(post).expect("valid post"),
            User::new(UserId::new(5).expect("valid user"), "Eve"),
            CommentBody::new("kept").expect("valid body"),
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
        )
    }

    #[rstest]
    #[case("P1")]
    #[case("P2")]
    #[tokio::test]
    async fn delete_publishes_removal_on_the_stored_post(
        scope: SessionScope,
        #[case] stored_post: &'static str,
    ) {
        let mut commands = MockCommentCommand::new();
        commands
            .expect_delete()
            .withf(|_, request| request.comment_id.as_str() == "C1" && request.user_id.get() == 5)
            .times(1)
            .returning(move |_, _| Ok(stored_on(stored_post)));
        let mut channel = MockCommentChannel::new();
        channel
            .expect_publish()
            .withf(move |event| {
                matches!(event, CommentEvent::Removed { comment_id, post_id }
                    if comment_id.as_str() == "C1" && post_id.as_str() == stored_post)
                    && event.channel().as_str() == format!("post:{stored_post}")
            })
            .times(1)
            .returning(|_| Ok(()));

        bridge(commands, channel)
            .dispatch(
                &RequestContext::background(),
                &scope,
                InboundMessage::DeleteComment(DeleteCommentPayload {
                    comment_id: "C1".to_owned(),
                }),
            )
            .await
            .expect("dispatch succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn publish_failures_do_not_fail_the_request(scope: SessionScope) {
        let mut commands = MockCommentCommand::new();
        commands
            .expect_delete()
            .returning(|_, _| Ok(stored_on("P1")));
        let mut channel = MockCommentChannel::new();
        channel
            .expect_publish()
            .times(1)
            .returning(|_| Err(CommentChannelError::closed("shutting down")));

        let result = bridge(commands, channel)
            .dispatch(
                &RequestContext::background(),
                &scope,
                InboundMessage::DeleteComment(DeleteCommentPayload {
                    comment_id: "C1".to_owned(),
                }),
            )
            .await;

        assert!(result.is_ok());
    }
}
