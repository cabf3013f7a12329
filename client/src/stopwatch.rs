use std::{fmt::Debug, sync::Arc, time::Duration};

/// Receives the duration of every AMS call.
pub trait Stopwatch: Debug + Send + Sync {
    fn record(&self, label: &str, elapsed: Duration);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopStopwatch;

impl Stopwatch for NoopStopwatch {
    fn record(&self, _label: &str, _elapsed: Duration) {}
}

/// Keeps every recorded timing in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingStopwatch {
    timings: Arc<parking_lot::Mutex<Vec<(String, Duration)>>>,
}

impl RecordingStopwatch {
    pub fn timings(&self) -> Vec<(String, Duration)> {
        self.timings.lock().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.timings.lock().iter().map(|(label, _)| label.clone()).collect()
    }
}

impl Stopwatch for RecordingStopwatch {
    fn record(&self, label: &str, elapsed: Duration) {
        self.timings.lock().push((label.to_owned(), elapsed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_recorded_timings() {
        let stopwatch = RecordingStopwatch::default();
        let shared = stopwatch.clone();

        shared.record("programsConnection", Duration::from_millis(5));

        assert_eq!(stopwatch.labels(), vec!["programsConnection".to_string()]);
        assert_eq!(stopwatch.timings()[0].1, Duration::from_millis(5));
    }
}
