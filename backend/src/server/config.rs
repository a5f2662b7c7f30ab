//! Server settings loaded via OrthoConfig and their resolved form.
//!
//! Every field can come from the command line, `COMMENTS_*` environment
//! variables, or a configuration file. Missing values fall back to defaults
//! suitable for local development.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{User, UserId};
use crate::inbound::ws::state::AllowedOrigins;
use crate::outbound::broadcast::{DEFAULT_CHANNEL_CAPACITY, MAX_CHANNEL_CAPACITY};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Raw settings as supplied by the operator.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COMMENTS")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Comma-separated browser origins allowed to open WebSocket sessions.
    pub allowed_origins: Option<String>,
    /// Deadline for each service call, in milliseconds.
    pub request_timeout_ms: Option<u64>,
    /// Buffered events per post channel before slow subscribers lag.
    pub channel_capacity: Option<usize>,
    /// Comma-separated `token=user_id` pairs accepted at connect time.
    pub session_tokens: Option<String>,
    /// Comma-separated `user_id=name` pairs seeding the user directory.
    pub directory_users: Option<String>,
}

/// Reasons settings could not be resolved.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid allowed origin list {value:?}: {source}")]
    AllowedOrigins {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("channel capacity {value} outside 1..={max}")]
    ChannelCapacity { value: usize, max: usize },
    #[error("{field}: expected key=value, got {entry:?}")]
    MalformedPair { field: &'static str, entry: String },
    #[error("{field}: invalid user id in {entry:?}")]
    InvalidUserId { field: &'static str, entry: String },
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

fn split_pair<'a>(field: &'static str, entry: &'a str) -> Result<(&'a str, &'a str), SettingsError> {
    entry
        .split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .ok_or_else(|| SettingsError::MalformedPair {
            field,
            entry: entry.to_owned(),
        })
}

fn parse_user_id(field: &'static str, entry: &str, raw: &str) -> Result<UserId, SettingsError> {
    raw.parse().map_err(|_| SettingsError::InvalidUserId {
        field,
        entry: entry.to_owned(),
    })
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn allowed_origins(&self) -> Result<AllowedOrigins, SettingsError> {
        let value = self
            .allowed_origins
            .as_deref()
            .unwrap_or(DEFAULT_ALLOWED_ORIGINS);
        AllowedOrigins::parse(split_list(value)).map_err(|source| {
            SettingsError::AllowedOrigins {
                value: value.to_owned(),
                source,
            }
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(
            self.request_timeout_ms
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        )
    }

    /// Events buffered per post channel before slow subscribers lag.
    pub fn channel_capacity(&self) -> Result<usize, SettingsError> {
        let value = self.channel_capacity.unwrap_or(DEFAULT_CHANNEL_CAPACITY);
        if (1..=MAX_CHANNEL_CAPACITY).contains(&value) {
            Ok(value)
        } else {
            Err(SettingsError::ChannelCapacity {
                value,
                max: MAX_CHANNEL_CAPACITY,
            })
        }
    }

    pub fn session_tokens(&self) -> Result<Vec<(String, UserId)>, SettingsError> {
        const FIELD: &str = "session_tokens";
        split_list(self.session_tokens.as_deref().unwrap_or_default())
            .map(|entry| {
                let (token, user) = split_pair(FIELD, entry)?;
                Ok((token.to_owned(), parse_user_id(FIELD, entry, user)?))
            })
            .collect()
    }

    pub fn directory_users(&self) -> Result<Vec<User>, SettingsError> {
        const FIELD: &str = "directory_users";
        split_list(self.directory_users.as_deref().unwrap_or_default())
            .map(|entry| {
                let (user, name) = split_pair(FIELD, entry)?;
                Ok(User::new(parse_user_id(FIELD, entry, user)?, name))
            })
            .collect()
    }
}

/// Fully resolved configuration for [`super::create_server`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub allowed_origins: AllowedOrigins,
    pub request_timeout: Duration,
    pub channel_capacity: usize,
    pub session_tokens: Vec<(String, UserId)>,
    pub directory_users: Vec<User>,
}

impl TryFrom<&AppSettings> for ServerConfig {
    type Error = SettingsError;

    fn try_from(settings: &AppSettings) -> Result<Self, Self::Error> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            allowed_origins: settings.allowed_origins()?,
            request_timeout: settings.request_timeout(),
            channel_capacity: settings.channel_capacity()?,
            session_tokens: settings.session_tokens()?,
            directory_users: settings.directory_users()?,
        })
    }
}
