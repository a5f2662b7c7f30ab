//! Shared fixtures for integration tests.

use std::time::Duration;

use post_comments::domain::{User, UserId};
use post_comments::inbound::ws::state::AllowedOrigins;
use post_comments::server::ServerConfig;

pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

fn user_id(raw: i64) -> UserId {
    UserId::new(raw).expect("valid user id")
}

/// Configuration with two users, Ann (1) and Bob (2), and a token each.
pub fn server_config() -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1:0".parse().expect("valid addr"),
        allowed_origins: AllowedOrigins::parse([ALLOWED_ORIGIN]).expect("valid origin"),
        request_timeout: Duration::from_secs(2),
        channel_capacity: 16,
        session_tokens: vec![
            ("ann-token".to_owned(), user_id(1)),
            ("bob-token".to_owned(), user_id(2)),
        ],
        directory_users: vec![User::new(user_id(1), "Ann"), User::new(user_id(2), "Bob")],
    }
}
