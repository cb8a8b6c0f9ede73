/// Observer for long-running training work.
///
/// Training reports once per completed pass with the fraction of passes
/// finished, in (0, 1]. Sinks must tolerate repeated or out-of-order
/// values; the pipeline itself only ever reports monotonically.
pub trait ProgressSink {
    fn report(&mut self, progress: f64);
}

/// Discards all progress updates.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&mut self, _progress: f64) {}
}

/// Routes progress updates to the log facade.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, progress: f64) {
        log::info!("training progress: {:.0}%", progress * 100.0);
    }
}

/// Accumulates every reported value, oldest first.
///
/// Useful for embedding UIs that redraw a bar from the latest value, and
/// for asserting reporting behavior in tests.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub updates: Vec<f64>,
}

impl ProgressSink for RecordingProgress {
    fn report(&mut self, progress: f64) {
        self.updates.push(progress);
    }
}
