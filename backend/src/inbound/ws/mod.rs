//! WebSocket inbound adapter for the real-time comment protocol.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list, session token, post id)
//! - subscribe the connection to its post channel and run the session loop
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use serde::Deserialize;
use tracing::{error, info, warn};
use url::Url;

use crate::domain::{ChannelName, PostId};
use crate::domain::ports::SessionAuthenticationError;
use crate::inbound::ws::bridge::SessionScope;
use crate::inbound::ws::state::{AllowedOrigins, WsState};

mod session;

pub mod bridge;
pub mod live_view;
pub mod messages;
pub mod state;

/// Query string accepted on upgrade.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    token: Option<String>,
}

/// Handle WebSocket upgrade for `/ws/posts/{post_id}`.
#[get("/ws/posts/{post_id}")]
pub async fn ws_entry(
    state: web::Data<WsState>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<ConnectQuery>,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(origin_header, &state.allowed_origins)?;

    let post_id = PostId::new(path.into_inner()).map_err(|error| {
        warn!(error = %error, "Rejected WebSocket upgrade with invalid post id");
        actix_web::error::ErrorBadRequest(error.to_string())
    })?;

    let token = query.into_inner().token.unwrap_or_default();
    let user_id = state
        .authenticator
        .authenticate(&token)
        .await
        .map_err(|error| match error {
            SessionAuthenticationError::UnknownToken => {
                warn!("Rejected WebSocket upgrade with unknown session token");
                actix_web::error::ErrorUnauthorized("Invalid session token")
            }
            SessionAuthenticationError::Unavailable { message } => {
                error!(error = %message, "Session authentication unavailable");
                actix_web::error::ErrorServiceUnavailable("Authentication unavailable")
            }
        })?;

    let (response, session, messages) = actix_ws::handle(&req, stream).inspect_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
    })?;

    // Subscribe before the upgrade completes so no event published after the
    // handshake is missed.
    let events = state
        .bridge
        .channel()
        .subscribe(&ChannelName::for_post(&post_id));
    info!(user_id = %user_id, post_id = %post_id, "WebSocket session opened");
    let scope = SessionScope { user_id, post_id };
    actix_web::rt::spawn(session::handle_ws_session(
        state.bridge.clone(),
        scope,
        state.request_timeout,
        session,
        messages,
        events,
    ));
    Ok(response)
}

fn validate_origin(origin_header: &HeaderValue, allowed: &AllowedOrigins) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if allowed.allows(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn allowed() -> AllowedOrigins {
        AllowedOrigins::parse(["http://localhost:3000", "https://comments.example"])
            .expect("valid origins")
    }

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).expect("valid header value")
    }

    #[rstest]
    #[case("http://localhost:3000")]
    #[case("https://comments.example")]
    fn accepts_configured_origins(allowed: AllowedOrigins, #[case] origin: &str) {
        assert!(validate_origin(&header(origin), &allowed).is_ok());
    }

    #[rstest]
    #[case("http://localhost")]
    #[case("https://example.com")]
    #[case("wss://comments.example")]
    fn rejects_disallowed_origins(allowed: AllowedOrigins, #[case] origin: &str) {
        let error = validate_origin(&header(origin), &allowed).expect_err("origin rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[rstest]
    fn rejects_non_utf8_origin_header(allowed: AllowedOrigins) {
        let header = HeaderValue::from_bytes(&[0x80]).expect("opaque header value");
        let error = validate_origin(&header, &allowed).expect_err("origin rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[rstest]
    fn rejects_unparsable_origin_header(allowed: AllowedOrigins) {
        let header = HeaderValue::from_static("not a url");
        let error = validate_origin(&header, &allowed).expect_err("origin rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
