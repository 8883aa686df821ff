// ABOUTME: Per-call deadline and cancellation for graph store operations
// ABOUTME: Every store RPC runs under a CallContext and stops at whichever fires first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab_core::StoreError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Cloneable cancellation signal shared between a caller and its store calls
#[derive(Debug, Clone)]
pub struct CancellationToken {
    state: Arc<watch::Sender<bool>>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    /// New, not yet cancelled token
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Cancel every operation observing this token
    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    /// Whether `cancel` has been called
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolves once the token is cancelled
    pub async fn cancelled(&self) {
        let mut receiver = self.state.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

/// Deadline and cancellation for one logical operation
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl CallContext {
    /// No deadline, never cancelled unless the token is
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Deadline `timeout` from now
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline
    #[must_use]
    pub const fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Observe an existing cancellation token
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Token that cancels operations running under this context
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Time left before the deadline; `None` without a deadline
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fail fast if already cancelled or past the deadline
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` or `DeadlineExceeded`
    pub fn check(&self, operation: &'static str) -> Result<(), StoreError> {
        if self.cancellation.is_cancelled() {
            return Err(StoreError::Cancelled { operation });
        }
        if self.remaining().is_some_and(|left| left.is_zero()) {
            return Err(StoreError::DeadlineExceeded { operation });
        }
        Ok(())
    }

    /// Run `future`, stopping early on cancellation or deadline
    ///
    /// # Errors
    ///
    /// Returns `Cancelled`, `DeadlineExceeded`, or the future's own error
    pub async fn run<T, F>(&self, operation: &'static str, future: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        self.check(operation)?;

        let guarded = async {
            tokio::select! {
                biased;
                () = self.cancellation.cancelled() => Err(StoreError::Cancelled { operation }),
                result = future => result,
            }
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .map_err(|_| StoreError::DeadlineExceeded { operation })?,
            None => guarded.await,
        }
    }
}
