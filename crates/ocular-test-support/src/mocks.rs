//! Mock implementations of core port traits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use ocular_core::domain::{AnalysisReport, ImageInfo};
use ocular_core::ports::{
    FaceLandmarks, ImageLoadError, ImageSource, LandmarkProvider, ProgressEvent, ProgressSink,
    ResultOutput,
};

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images (and optional load failures) and tracks iteration
/// for assertions.
pub struct MockImageSource {
    items: Vec<Result<ImageInfo, ImageLoadError>>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            items: images.into_iter().map(Ok).collect(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Appends an image that fails to load.
    #[must_use]
    pub fn with_failure(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.items.push(Err(ImageLoadError {
            path: path.into(),
            message: message.into(),
        }));
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, ImageLoadError>> + Send + '_> {
        let count = Arc::clone(&self.iteration_count);
        if let Ok(mut c) = count.lock() {
            *c += 1;
        }
        Box::new(self.items.iter().cloned())
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures reports for later assertions.
pub struct MockResultOutput {
    reports: Arc<Mutex<Vec<AnalysisReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<AnalysisReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Started { .. }))
            .count()
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Completed { .. }))
            .count()
    }

    /// Returns the number of `Completed` events carrying a failed report.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Completed { report } if !report.success))
            .count()
    }

    /// Returns whether a `Finished` event was received.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.events()
            .iter()
            .any(|e| matches!(e, ProgressEvent::Finished { .. }))
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { assessed, failed } => Some((*assessed, *failed)),
            _ => None,
        })
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

enum StubBehavior {
    Faces(Vec<FaceLandmarks>),
    Fail(String),
}

/// Deterministic `LandmarkProvider` for testing.
///
/// Returns the same faces (or error) for every image. Clones share the call
/// counter, so a clone kept by the test observes calls made through the one
/// handed to the analyzer.
#[derive(Clone)]
pub struct StubLandmarkProvider {
    behavior: Arc<StubBehavior>,
    calls: Arc<AtomicUsize>,
}

impl StubLandmarkProvider {
    /// Provider returning `faces` for every image.
    #[must_use]
    pub fn new(faces: Vec<FaceLandmarks>) -> Self {
        Self {
            behavior: Arc::new(StubBehavior::Faces(faces)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Provider returning a single face.
    #[must_use]
    pub fn single(face: FaceLandmarks) -> Self {
        Self::new(vec![face])
    }

    /// Provider that never finds a face.
    #[must_use]
    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    /// Provider whose every detection fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: Arc::new(StubBehavior::Fail(message.into())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the number of `detect` calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LandmarkProvider for StubLandmarkProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&self, _image: &ImageInfo) -> anyhow::Result<Vec<FaceLandmarks>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior.as_ref() {
            StubBehavior::Faces(faces) => Ok(faces.clone()),
            StubBehavior::Fail(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}
