//! Progress reporting for a running export.

/// A snapshot of export progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportProgress {
    /// Steps completed so far
    pub step: usize,
    /// Total steps: one per page plus one for packaging
    pub total_steps: usize,
    /// Percentage in `0..=100`, non-decreasing within one export
    pub percentage: u8,
    /// Human-readable status
    pub message: String,
}

/// Receives progress updates.
pub trait ProgressObserver {
    /// Called for every progress update.
    fn on_progress(&mut self, progress: &ExportProgress);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&ExportProgress),
{
    fn on_progress(&mut self, progress: &ExportProgress) {
        self(progress)
    }
}

/// Observer that discards updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _progress: &ExportProgress) {}
}

/// Step counter owned by the orchestrator.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    step: usize,
    total_steps: usize,
    percentage: u8,
}

impl ProgressTracker {
    /// Track `total_steps` steps (at least one).
    pub fn new(total_steps: usize) -> Self {
        Self {
            step: 0,
            total_steps: total_steps.max(1),
            percentage: 0,
        }
    }

    /// Total steps tracked.
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Current percentage.
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Advance one step.
    ///
    /// The final step is reserved for [`complete`](Self::complete), so
    /// advancing never reaches the last step.
    pub fn advance(&mut self, message: impl Into<String>) -> ExportProgress {
        if self.step + 1 < self.total_steps {
            self.step += 1;
        }
        let computed = ((self.step as f64 / self.total_steps as f64) * 100.0).round() as u8;
        self.percentage = self.percentage.max(computed.min(99));
        self.snapshot(message)
    }

    /// Report the current state with a new message, without advancing.
    pub fn status(&self, message: impl Into<String>) -> ExportProgress {
        self.snapshot(message)
    }

    /// Mark the last step done; percentage becomes exactly 100.
    pub fn complete(&mut self, message: impl Into<String>) -> ExportProgress {
        self.step = self.total_steps;
        self.percentage = 100;
        self.snapshot(message)
    }

    fn snapshot(&self, message: impl Into<String>) -> ExportProgress {
        ExportProgress {
            step: self.step,
            total_steps: self.total_steps,
            percentage: self.percentage,
            message: message.into(),
        }
    }
}
