//! Ocular Adapters - External adapters for ocular.
//!
//! This crate provides adapters for:
//! - Filesystem image source
//! - Landmark sidecar files

pub mod fs;
pub mod landmarks;

pub use fs::FsImageSource;
pub use landmarks::{SidecarLandmarkProvider, SIDECAR_SUFFIX};
