//! Builders wiring outbound adapters, the domain service, and adapter state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use crate::domain::{CommentService, CommentServicePorts};
use crate::inbound::http::state::HttpState;
use crate::inbound::ws::bridge::CommentEventBridge;
use crate::inbound::ws::state::WsState;
use crate::outbound::broadcast::BroadcastHub;
use crate::outbound::memory::{
    InMemoryCommentStore, InMemoryUserDirectory, StaticTokenAuthenticator,
};

use super::ServerConfig;

/// Adapter state shared by every worker.
#[derive(Clone)]
pub struct AppStates {
    pub http: web::Data<HttpState>,
    pub ws: web::Data<WsState>,
}

/// Assemble the in-process adapters and the comment service behind both
/// inbound adapters.
pub fn build_states(config: &ServerConfig) -> AppStates {
    let store = Arc::new(InMemoryCommentStore::new());
    let users = Arc::new(InMemoryUserDirectory::new(
        config.directory_users.iter().cloned(),
    ));
    let service = Arc::new(CommentService::new(
        CommentServicePorts {
            provider: store.clone(),
            creator: store.clone(),
            updater: store.clone(),
            deleter: store,
            users,
        },
        Arc::new(DefaultClock),
    ));
    let hub = Arc::new(BroadcastHub::new(config.channel_capacity));
    let authenticator = Arc::new(StaticTokenAuthenticator::new(
        config.session_tokens.iter().cloned(),
    ));

    let http = HttpState::new(service.clone(), config.request_timeout);
    let ws = WsState::new(
        CommentEventBridge::new(service, hub),
        authenticator,
        config.allowed_origins.clone(),
        config.request_timeout,
    );

    AppStates {
        http: web::Data::new(http),
        ws: web::Data::new(ws),
    }
}
