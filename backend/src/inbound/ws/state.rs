//! Shared WebSocket adapter state.
//!
//! The upgrade handler and the per-connection sessions depend on ports only,
//! so tests can assemble the adapter from in-memory doubles.

use std::sync::Arc;
use std::time::Duration;

use url::{Origin, Url};

use crate::domain::ports::SessionAuthenticator;
use crate::inbound::ws::bridge::CommentEventBridge;

/// Browser origins allowed to open a real-time connection.
///
/// Entries are compared by scheme, host, and port. The single entry `*`
/// admits every origin.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins {
    any: bool,
    origins: Vec<Origin>,
}

impl AllowedOrigins {
    /// Parse configured entries such as `https://app.example:8443`.
    ///
    /// # Errors
    /// Returns the URL parse error of the first malformed entry.
    ///
    /// # Examples
    /// ```
    /// use post_comments::inbound::ws::state::AllowedOrigins;
    /// use url::Url;
    ///
    /// let allowed = AllowedOrigins::parse(["http://localhost:3000"]).expect("valid origins");
    /// assert!(allowed.allows(&Url::parse("http://localhost:3000").expect("url")));
    /// assert!(!allowed.allows(&Url::parse("http://localhost:4000").expect("url")));
    /// ```
    pub fn parse<I, S>(entries: I) -> Result<Self, url::ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = Self::default();
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry == "*" {
                allowed.any = true;
                continue;
            }
            allowed.origins.push(Url::parse(entry)?.origin());
        }
        Ok(allowed)
    }

    /// Admit every origin.
    pub fn any() -> Self {
        Self {
            any: true,
            origins: Vec::new(),
        }
    }

    /// Whether `origin` matches an entry. Opaque origins never match a
    /// listed entry.
    pub fn allows(&self, origin: &Url) -> bool {
        if self.any {
            return true;
        }
        let origin = origin.origin();
        origin.is_tuple() && self.origins.contains(&origin)
    }
}

/// Dependency bundle for the upgrade handler and its sessions.
#[derive(Clone)]
pub struct WsState {
    pub bridge: CommentEventBridge,
    pub authenticator: Arc<dyn SessionAuthenticator>,
    pub allowed_origins: AllowedOrigins,
    /// Deadline applied to each service call made for an inbound frame.
    pub request_timeout: Duration,
}

impl WsState {
    /// Construct state from explicit port implementations.
    pub fn new(
        bridge: CommentEventBridge,
        authenticator: Arc<dyn SessionAuthenticator>,
        allowed_origins: AllowedOrigins,
        request_timeout: Duration,
    ) -> Self {
        Self {
            bridge,
            authenticator,
            allowed_origins,
            request_timeout,
        }
    }
}
