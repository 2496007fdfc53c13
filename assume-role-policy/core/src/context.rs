use crate::Error;
use std::{future::Future, time::Duration};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

/// Bounds a single evaluation with a cancellation token and an optional deadline.
///
/// The same context is handed to every collaborator an evaluation calls. Once it is cancelled or
/// its deadline passes, evaluation stops with [`Error::Cancelled`] or
/// [`Error::DeadlineExceeded`].
#[derive(Clone, Debug, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

// === impl Context ===

impl Context {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets a deadline. An existing earlier deadline is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails if the context has already been cancelled or has expired.
    pub fn check(&self) -> Result<(), Error> {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Error::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drives `fut` to completion unless the context ends first.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Error> {
        self.check()?;

        let expired = async {
            match self.deadline {
                Some(deadline) => time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Cancelled),
            _ = expired => Err(Error::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}
