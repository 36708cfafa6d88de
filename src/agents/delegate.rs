use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;

// ============================================================================
// Delegate Seam
// ============================================================================

/// The narrow contract both surfaces consume: one prompt in, one markdown
/// string out. Production implementations wrap rig agents; tests inject
/// deterministic stubs.
#[async_trait]
pub trait Delegate: Send + Sync {
    async fn run(&self, prompt: &str) -> Result<String, DelegateError>;
}

#[derive(Debug, Clone, Error)]
pub enum DelegateError {
    #[error("{0}")]
    Provider(String),
    #[error("delegate call exceeded {0}s")]
    Timeout(u64),
    #[error("delegate call cancelled")]
    Cancelled,
}

// ============================================================================
// Cancellation Token
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

#[derive(Debug, Default)]
struct TokenInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        let notified = self.inner.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

// ============================================================================
// Bounded Invocation
// ============================================================================

/// Run a delegate call under a deadline and a cancellation token.
///
/// The upstream provider round trip has fully opaque latency, so every call
/// site goes through here rather than awaiting the delegate directly.
pub async fn run_bounded(
    delegate: &dyn Delegate,
    prompt: &str,
    timeout: Duration,
    token: &CancellationToken,
) -> Result<String, DelegateError> {
    tokio::select! {
        result = delegate.run(prompt) => result,
        () = token.cancelled() => Err(DelegateError::Cancelled),
        () = tokio::time::sleep(timeout) => Err(DelegateError::Timeout(timeout.as_secs())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoDelegate;

    #[async_trait]
    impl Delegate for EchoDelegate {
        async fn run(&self, prompt: &str) -> Result<String, DelegateError> {
            Ok(format!("echo: {}", prompt))
        }
    }

    struct HangingDelegate;

    #[async_trait]
    impl Delegate for HangingDelegate {
        async fn run(&self, _prompt: &str) -> Result<String, DelegateError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_bounded_passthrough() {
        let token = CancellationToken::new();
        let result = run_bounded(&EchoDelegate, "hi", Duration::from_secs(5), &token).await;
        assert_eq!(result.unwrap(), "echo: hi");
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let token = CancellationToken::new();
        let result = run_bounded(&HangingDelegate, "hi", Duration::from_secs(120), &token).await;
        match result {
            Err(DelegateError::Timeout(secs)) => assert_eq!(secs, 120),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bounded_cancellation() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result = run_bounded(&HangingDelegate, "hi", Duration::from_secs(60), &token).await;
        assert!(matches!(result, Err(DelegateError::Cancelled)));
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_resolves_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancelled().await;

        let result = run_bounded(&EchoDelegate, "hi", Duration::from_secs(5), &token).await;
        // A completed call may still win the race; cancelled must never hang.
        assert!(result.is_ok() || matches!(result, Err(DelegateError::Cancelled)));
    }
}
