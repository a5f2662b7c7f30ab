//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::RequestContext;
use crate::domain::ports::CommentQuery;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub comments: Arc<dyn CommentQuery>,
    /// Deadline applied to each request's service call.
    pub request_timeout: Duration,
}

impl HttpState {
    pub fn new(comments: Arc<dyn CommentQuery>, request_timeout: Duration) -> Self {
        Self {
            comments,
            request_timeout,
        }
    }

    /// Fresh context bounded by the configured request timeout.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::background().with_timeout(self.request_timeout)
    }
}
