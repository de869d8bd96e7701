//! Wall-clock timing around long-running calls

use bevy::log::{info, info_span};
use std::time::{Duration, Instant};

/// Logs the elapsed time at `info` when dropped.
#[must_use = "the timer logs when dropped; binding it to `_` drops it immediately"]
pub struct ScopedTimer {
    label: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        info!(
            "{} took {:.3} s",
            self.label,
            self.start.elapsed().as_secs_f64()
        );
    }
}

/// Run `operation` inside a span named after `label` and log how long it took.
pub fn timed<T>(label: &str, operation: impl FnOnce() -> T) -> T {
    let span = info_span!("timed", label);
    let _entered = span.enter();
    let _timer = ScopedTimer::start(label);
    operation()
}
