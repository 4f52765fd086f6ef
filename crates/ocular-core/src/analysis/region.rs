//! Landmark-based eye region detection.
//!
//! Wraps a [`LandmarkProvider`] behind a lazily initialized handle and turns
//! its normalized face-mesh points into pixel-space [`EyeCandidate`]s.

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::{EyeCandidate, EyeSide, FailedStage, ImageInfo, IrisLandmarks, Point};
use crate::ports::{mesh, FaceLandmarks, Landmark, LandmarkProvider};

/// Builds the landmark provider on first use.
pub type ProviderLoader = Box<dyn Fn() -> anyhow::Result<Box<dyn LandmarkProvider>> + Send + Sync>;

/// Why the region detector produced no candidate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    /// Landmark detection is switched off.
    #[error("landmark detection disabled")]
    Disabled,
    /// The provider could not be created.
    #[error("landmark model unavailable: {0}")]
    ModelInit(String),
    /// The provider returned an error.
    #[error("landmark detection failed: {0}")]
    Detection(String),
    /// The provider found no face at all.
    #[error("no face landmarks found")]
    NoLandmarks,
    /// Faces were found but neither iris could be extracted.
    #[error("iris landmarks missing")]
    IrisMissing,
}

impl RegionError {
    /// Pipeline stage this error is reported under.
    #[must_use]
    pub const fn stage(&self) -> FailedStage {
        match self {
            Self::Disabled => FailedStage::GeometryValidation,
            Self::ModelInit(_) => FailedStage::ModelInit,
            Self::Detection(_) | Self::NoLandmarks => FailedStage::NoLandmarks,
            Self::IrisMissing => FailedStage::IrisMissing,
        }
    }
}

/// Eye candidates found in one image.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDetection {
    candidates: Vec<EyeCandidate>,
}

impl RegionDetection {
    /// All candidates, right eye first.
    #[must_use]
    pub fn candidates(&self) -> &[EyeCandidate] {
        &self.candidates
    }

    /// The candidate used for health scoring.
    #[must_use]
    pub fn primary(&self) -> Option<&EyeCandidate> {
        self.candidates.first()
    }
}

/// Landmark adapter owning the provider handle.
pub struct RegionDetector {
    loader: Option<ProviderLoader>,
    provider: OnceCell<Result<Box<dyn LandmarkProvider>, String>>,
}

impl RegionDetector {
    /// Creates a detector whose provider is built by `loader` on first use.
    #[must_use]
    pub fn new(loader: ProviderLoader) -> Self {
        Self {
            loader: Some(loader),
            provider: OnceCell::new(),
        }
    }

    /// Creates a detector around an already constructed provider.
    #[must_use]
    pub fn from_provider(provider: impl LandmarkProvider + 'static) -> Self {
        Self {
            loader: None,
            provider: OnceCell::with_value(Ok(Box::new(provider) as Box<dyn LandmarkProvider>)),
        }
    }

    /// Creates a detector with no landmark capability.
    ///
    /// Every detection fails with [`RegionError::Disabled`], leaving eye
    /// detection to the fallback engine alone.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            loader: None,
            provider: OnceCell::new(),
        }
    }

    /// Returns `true` once a provider load has been attempted.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.provider.get().is_some()
    }

    /// Releases the provider. A later detection reloads it if a loader is set.
    pub fn shutdown(&mut self) {
        if let Some(Ok(provider)) = self.provider.take() {
            info!(provider = provider.name(), "Landmark provider released");
        }
    }

    fn provider(&self) -> Result<&dyn LandmarkProvider, RegionError> {
        let loaded = match (&self.loader, self.provider.get()) {
            (_, Some(loaded)) => loaded,
            (None, None) => return Err(RegionError::Disabled),
            (Some(loader), None) => self.provider.get_or_init(|| {
                loader()
                    .map(|provider| {
                        info!(provider = provider.name(), "Landmark provider initialized");
                        provider
                    })
                    .map_err(|e| format!("{e:#}"))
            }),
        };

        loaded
            .as_ref()
            .map(|provider| &**provider)
            .map_err(|e| RegionError::ModelInit(e.clone()))
    }

    /// Locates eye candidates in `image`.
    ///
    /// Succeeds when at least one iris is found. Face presence scores are not
    /// consulted.
    ///
    /// # Errors
    ///
    /// Returns a [`RegionError`] naming the stage that produced nothing.
    pub fn detect(&self, image: &ImageInfo) -> Result<RegionDetection, RegionError> {
        let provider = self.provider()?;
        let faces = provider
            .detect(image)
            .map_err(|e| RegionError::Detection(format!("{e:#}")))?;

        let face = faces.first().ok_or(RegionError::NoLandmarks)?;
        debug!(
            faces = faces.len(),
            points = face.points.len(),
            "Landmarks received"
        );

        let candidates: Vec<EyeCandidate> = [
            (EyeSide::Right, mesh::RIGHT_IRIS, mesh::RIGHT_EYE_CONTOUR),
            (EyeSide::Left, mesh::LEFT_IRIS, mesh::LEFT_EYE_CONTOUR),
        ]
        .into_iter()
        .filter_map(|(side, iris, contour)| {
            extract_eye(face, side, &iris, &contour, image.width, image.height)
        })
        .collect();

        if candidates.is_empty() {
            return Err(RegionError::IrisMissing);
        }
        Ok(RegionDetection { candidates })
    }
}

impl std::fmt::Debug for RegionDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionDetector")
            .field("has_loader", &self.loader.is_some())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_pixel(landmark: &Landmark, width: u32, height: u32) -> Option<Point> {
    (landmark.x.is_finite() && landmark.y.is_finite())
        .then(|| Point::new(landmark.x * width as f32, landmark.y * height as f32))
}

fn extract_eye(
    face: &FaceLandmarks,
    side: EyeSide,
    iris: &[usize; 5],
    contour: &[usize; 16],
    width: u32,
    height: u32,
) -> Option<EyeCandidate> {
    let at = |i: usize| face.points.get(i).and_then(|l| to_pixel(l, width, height));

    let center = at(iris[0])?;
    let cardinal = [at(iris[1])?, at(iris[2])?, at(iris[3])?, at(iris[4])?];
    let contour: Vec<Point> = contour.iter().filter_map(|&i| at(i)).collect();

    Some(EyeCandidate::new(
        side,
        IrisLandmarks::new(center, cardinal),
        contour,
        width,
        height,
    ))
}
