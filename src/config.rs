use std::time::Duration;

use tracing_subscriber::EnvFilter;

// ── Replay settings ───────────────────────────────────────────────────────────

/// How a stored response is fed back as if it were streaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Characters per chunk. Zero is treated as one.
    pub chunk_size: usize,
    /// Pause before each chunk is sent.
    pub delay: Duration,
    /// Cancel generation once this many chunks have arrived.
    pub abort_after: Option<usize>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            delay: Duration::ZERO,
            abort_after: None,
        }
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Install the stderr log subscriber. `RUST_LOG` overrides the `warn` default.
/// Calling it twice is harmless.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
