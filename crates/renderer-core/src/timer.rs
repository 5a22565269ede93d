//! Frame/pass timer, logged via `tracing` rather than printed directly.

use std::time::Instant;

pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        tracing::info!(pass = %label, "starting");
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        tracing::info!(pass = %self.label, elapsed_ms = elapsed.as_millis(), "finished");
    }
}
