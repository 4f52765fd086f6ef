//! Image source port for loading images from various sources.

use crate::domain::ImageInfo;

/// An image that could not be loaded or decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load {path}: {message}")]
pub struct ImageLoadError {
    /// Path of the image.
    pub path: String,
    /// Reason the image could not be loaded.
    pub message: String,
}

/// Port for loading images from a source.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over images from this source.
    ///
    /// Individual items are errors when an image fails to load or decode.
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, ImageLoadError>> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
