//! Request-scoped context threaded through every store and query operation
//!
//! The context bundles the tenant the request is scoped to, the actor issuing
//! it, and the request's cancellation signal and deadline. It is validated
//! once at the request boundary and then passed by reference; nothing deeper
//! in the call chain looks these values up dynamically.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::{Actor, Error, Result, TenantKey};

/// Per-request tenant, actor and execution limits.
///
/// Clones share the same cancellation signal.
#[derive(Debug, Clone)]
pub struct RequestContext {
    tenant: TenantKey,
    actor: Actor,
    deadline: Option<Instant>,
    cancel: Arc<watch::Sender<bool>>,
}

/// Handle used to cancel every operation running under a context.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<watch::Sender<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

impl RequestContext {
    pub fn new(tenant: TenantKey, actor: Actor) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            tenant,
            actor,
            deadline: None,
            cancel: Arc::new(cancel),
        }
    }

    /// Build a context from raw request parameters, validating the tenant.
    pub fn from_parts(organization: &str, environment: &str, actor: Actor) -> Result<Self> {
        Ok(Self::new(TenantKey::new(organization, environment)?, actor))
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn tenant(&self) -> &TenantKey {
        &self.tenant
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancel))
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Fail fast if the request was cancelled or its deadline has passed.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(Error::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive a backing-store operation under this context's limits.
    ///
    /// The operation is dropped without being polled again once the context
    /// is cancelled or its deadline passes. An operation that already
    /// completed is never reported as cancelled.
    pub async fn run<F, T>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let mut cancelled = self.cancel.subscribe();
        tokio::select! {
            biased;
            _ = wait_cancelled(&mut cancelled) => Err(Error::Cancelled),
            _ = wait_deadline(self.deadline) => Err(Error::DeadlineExceeded),
            result = operation => result,
        }
    }
}

async fn wait_cancelled(rx: &mut watch::Receiver<bool>) {
    let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
