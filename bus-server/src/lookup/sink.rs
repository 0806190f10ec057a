//! Where masked lookup failures are reported.

use tracing::warn;

/// Receives human-readable failure messages. Fire-and-forget.
pub trait FailureSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Sink that logs failures through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn report(&self, message: &str) {
        warn!(%message, "route lookup degraded");
    }
}

impl<F> FailureSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}
