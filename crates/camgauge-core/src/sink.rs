//! Optional log side-channel.
//!
//! The engine describes user-visible operations ("cleared drawings on
//! view-2") to a [`LogSink`] when one is attached. Sinks must not block; the
//! engine behaves identically with or without one.

/// Receives free-text operation descriptions.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Forwards operation descriptions to `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, message: &str) {
        tracing::info!(target: "camgauge::operations", "{}", message);
    }
}
