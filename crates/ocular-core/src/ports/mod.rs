//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the analysis core and external adapters.

mod image_source;
mod landmarks;
mod progress;
mod result_output;

pub use image_source::{ImageLoadError, ImageSource};
pub use landmarks::{mesh, FaceLandmarks, Landmark, LandmarkProvider};
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
