//! Progress reporting port for UI integration.

use crate::domain::AnalysisReport;

/// Events emitted during a batch of analyses.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Analysis started for an image.
    Started {
        /// Path to the image.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total images in batch, if known.
        total: Option<usize>,
    },
    /// Analysis finished for an image, successfully or not.
    Completed {
        /// The analysis report.
        report: AnalysisReport,
    },
    /// All images have been processed.
    Finished {
        /// Images with an eye assessment.
        assessed: usize,
        /// Images whose analysis failed.
        failed: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
