//! Test support utilities for ocular.
//!
//! Provides mocks, synthetic eye images and face-mesh builders for testing
//! the ocular analysis pipeline.
//!
//! # Example
//!
//! ```
//! use ocular_test_support::{FaceMeshBuilder, StubLandmarkProvider, SyntheticEyeBuilder};
//!
//! // A synthetic eye and landmarks that match it
//! let eye = SyntheticEyeBuilder::new(400, 300);
//! let provider = StubLandmarkProvider::single(FaceMeshBuilder::for_eye(&eye).build());
//! let image = eye.build();
//! ```

mod builders;
mod mocks;

pub use builders::{FaceMeshBuilder, SyntheticEyeBuilder, INFLAMED_SCLERA, IRIS, SCLERA, SKIN};
pub use mocks::{MockImageSource, MockProgressSink, MockResultOutput, StubLandmarkProvider};
