//! Per-connection WebSocket handler.
//!
//! Keeps WebSocket framing and heartbeats at the edge while deferring
//! comment behaviour to the [`CommentEventBridge`]. Each connection follows
//! the channel of one post: inbound frames become service calls, and every
//! event published on the channel is forwarded to the client, including
//! events caused by this connection. Failures are replied to this connection
//! only.
//!
//! The public WebSocket contract pings every 5s and considers a connection
//! idle after 10s without client traffic. Tests shorten both intervals.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time;
use tracing::{debug, warn};

use crate::domain::{CommentEvent, Error, RequestContext};
use crate::inbound::ws::bridge::{CommentEventBridge, SessionScope};
use crate::inbound::ws::messages::{DecodeError, Decoded, OutboundMessage, decode};

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(1);

pub(super) async fn handle_ws_session(
    bridge: CommentEventBridge,
    scope: SessionScope,
    request_timeout: Duration,
    session: Session,
    stream: MessageStream,
    events: broadcast::Receiver<CommentEvent>,
) {
    WsSession {
        bridge,
        scope,
        request_timeout,
    }
    .run(session, stream, events)
    .await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidEnvelope,
    ChannelClosed,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    bridge: CommentEventBridge,
    scope: SessionScope,
    request_timeout: Duration,
}

impl WsSession {
    async fn run(
        &self,
        mut session: Session,
        mut stream: MessageStream,
        mut events: broadcast::Receiver<CommentEvent>,
    ) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                event = events.recv() => {
                    self.handle_channel_event(&mut session, event).await
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                let close_action = self.close_action_for(&error);
                self.close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        let message = match decode(text) {
            Ok(Decoded::Known(message)) => message,
            Ok(Decoded::Unknown(kind)) => {
                warn!(message_type = %kind, "Dropping unknown WebSocket message type");
                return Ok(());
            }
            Err(DecodeError::Envelope(error)) => {
                warn!(error = %error, "Rejected malformed WebSocket envelope");
                return Err(SessionError::InvalidEnvelope);
            }
            Err(error @ DecodeError::Payload { request_type, .. }) => {
                let reply = Error::invalid_argument(error.to_string());
                return self
                    .send_json(session, &OutboundMessage::error(&reply, Some(request_type)))
                    .await
                    .map_err(SessionError::Network);
            }
        };

        let request_type = message.request_type();
        let ctx = RequestContext::background().with_timeout(self.request_timeout);
        match self.bridge.dispatch(&ctx, &self.scope, message).await {
            // The confirmed event reaches this client through its channel subscription.
            Ok(_) => Ok(()),
            Err(error) => self
                .send_json(session, &OutboundMessage::error(&error, Some(request_type)))
                .await
                .map_err(SessionError::Network),
        }
    }

    async fn handle_channel_event(
        &self,
        session: &mut Session,
        event: Result<CommentEvent, RecvError>,
    ) -> Result<(), SessionError> {
        match event {
            Ok(event) => self
                .send_json(session, &OutboundMessage::from(event))
                .await
                .map_err(SessionError::Network),
            Err(RecvError::Lagged(skipped)) => {
                warn!(
                    skipped,
                    post_id = %self.scope.post_id,
                    "WebSocket subscriber lagged; events skipped"
                );
                Ok(())
            }
            Err(RecvError::Closed) => Err(SessionError::ChannelClosed),
        }
    }

    async fn send_json<T: serde::Serialize>(
        &self,
        session: &mut Session,
        payload: &T,
    ) -> Result<(), Closed> {
        match serde_json::to_string(payload) {
            Ok(body) => session.text(body).await,
            Err(error) => {
                warn!(error = %error, "Failed to serialize WebSocket payload");
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::ChannelClosed => {
                warn!(post_id = %self.scope.post_id, "Comment channel closed; closing connection");
            }
            SessionError::InvalidEnvelope
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {
                debug!(user_id = %self.scope.user_id, "WebSocket session ended");
            }
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::InvalidEnvelope => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("invalid envelope".to_owned()),
            })),
            SessionError::ChannelClosed => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Away,
                description: Some("channel closed".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "Failed to close WebSocket session");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
