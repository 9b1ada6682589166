//! Structured progress reporting for proofreading runs.
//!
//! Provides incremental feedback while chunks are planned, dispatched to the
//! LLM and saved.

use std::sync::Arc;
use std::time::Instant;

/// Progress event emitted during a proofreading run.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Phase of the run: "plan", "dispatch", "save"
    pub phase: String,

    /// Current progress (chunks completed, etc.)
    pub current: u64,

    /// Total expected work (if known)
    pub total: Option<u64>,

    /// Percentage complete (0.0 - 100.0)
    pub percentage: Option<f64>,

    /// Human-readable message
    pub message: String,

    /// Elapsed time since the reporter was created
    pub elapsed_secs: Option<f64>,
}

impl ProgressEvent {
    /// Create a new progress event.
    pub fn new(
        phase: impl Into<String>,
        current: u64,
        total: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        let percentage = total.map(|t| {
            if t > 0 {
                (current as f64 / t as f64) * 100.0
            } else {
                0.0
            }
        });

        Self {
            phase: phase.into(),
            current,
            total,
            percentage,
            message: message.into(),
            elapsed_secs: None,
        }
    }

    pub fn with_elapsed(mut self, elapsed_secs: f64) -> Self {
        self.elapsed_secs = Some(elapsed_secs);
        self
    }

    /// Format as a simple user-facing line.
    pub fn format_simple(&self) -> String {
        let progress = match self.total {
            Some(total) => format!("{}/{}", self.current, total),
            None => format!("{}", self.current),
        };

        let pct = match self.percentage {
            Some(p) => format!(" ({:.0}%)", p),
            None => String::new(),
        };

        format!("[{}] {}{} - {}", self.phase, progress, pct, self.message)
    }
}

/// Callback for progress events.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Progress reporter that emits events through a callback.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    start_time: Arc<Instant>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::noop()
    }
}

impl ProgressReporter {
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
            start_time: Arc::new(Instant::now()),
        }
    }

    /// A reporter that emits nothing.
    pub fn noop() -> Self {
        Self {
            callback: None,
            start_time: Arc::new(Instant::now()),
        }
    }

    /// Emit a progress event.
    pub fn emit(&self, event: ProgressEvent) {
        if let Some(callback) = &self.callback {
            let elapsed = self.start_time.elapsed().as_secs_f64();
            let event = event.with_elapsed(elapsed);

            tracing::debug!(
                phase = %event.phase,
                current = event.current,
                total = ?event.total,
                message = %event.message,
                elapsed_secs = elapsed,
                "Progress event"
            );

            callback(event);
        }
    }

    /// Document split into chunks.
    pub fn planned(&self, chunks: usize, budget_chars: usize) {
        self.emit(ProgressEvent::new(
            "plan",
            chunks as u64,
            None,
            format!("{} chunks of at most ~{} characters", chunks, budget_chars),
        ));
    }

    /// A chunk was handed to the LLM. `completed` counts finished chunks so far.
    pub fn chunk_started(&self, completed: usize, total: usize, index: usize) {
        self.emit(ProgressEvent::new(
            "dispatch",
            completed as u64,
            Some(total as u64),
            format!("chunk {} started", index + 1),
        ));
    }

    /// A chunk finished successfully.
    pub fn chunk_completed(&self, completed: usize, total: usize, index: usize) {
        self.emit(ProgressEvent::new(
            "dispatch",
            completed as u64,
            Some(total as u64),
            format!("chunk {} done", index + 1),
        ));
    }

    /// A chunk failed and will fall back.
    pub fn chunk_failed(&self, completed: usize, total: usize, index: usize, cause: &str) {
        self.emit(ProgressEvent::new(
            "dispatch",
            completed as u64,
            Some(total as u64),
            format!("chunk {} failed: {}", index + 1, cause),
        ));
    }

    /// An output artifact was written.
    pub fn saved(&self, path: &str) {
        self.emit(ProgressEvent::new("save", 1, Some(1), format!("wrote {}", path)));
    }
}
