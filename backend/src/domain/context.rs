//! Request-scoped cancellation and deadlines.
//!
//! Every service operation receives a [`RequestContext`]. Collaborator calls
//! are raced against the context with [`RequestContext::run`], so a cancelled
//! or expired request stops waiting on its ports and issues no further calls.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

use super::Error;

/// Why a request stopped before its collaborator answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("request cancelled")]
    Cancelled,
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl From<Interrupted> for Error {
    fn from(value: Interrupted) -> Self {
        Error::cancelled(value.to_string())
    }
}

/// Cancellation signal and optional deadline for one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: watch::Receiver<bool>,
}

/// Handle that cancels every context cloned from its pair.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation to all holders of the paired context.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl RequestContext {
    /// Context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        let (_sender, cancel) = watch::channel(false);
        Self {
            deadline: None,
            cancel,
        }
    }

    /// Context paired with a handle that can cancel it.
    pub fn cancellable() -> (Self, CancelHandle) {
        let (sender, cancel) = watch::channel(false);
        (
            Self {
                deadline: None,
                cancel,
            },
            CancelHandle { sender },
        )
    }

    /// Derive a context whose deadline is at most `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.with_deadline(deadline)
    }

    /// Derive a context with `deadline`, keeping any earlier deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Report whether the request may still proceed.
    pub fn check(&self) -> Result<(), Interrupted> {
        if *self.cancel.borrow() {
            return Err(Interrupted::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupted::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `future` until it completes or the request is interrupted.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        self.check()?;
        let mut cancel = self.cancel.clone();
        let cancelled = async move {
            // A dropped handle can never cancel, so wait forever in that case.
            let closed = cancel.wait_for(|cancelled| *cancelled).await.is_err();
            if closed {
                std::future::pending::<()>().await;
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = cancelled => Err(Interrupted::Cancelled),
            () = expired => Err(Interrupted::DeadlineExceeded),
            output = future => Ok(output),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}
