//! Sidecar-file landmark provider.
//!
//! Reads landmarks exported by an external face-mesh detector from
//! `<image stem>.landmarks.json`, either next to the image or in a dedicated
//! directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ocular_core::analysis::ProviderLoader;
use ocular_core::{FaceLandmarks, ImageInfo, LandmarkProvider};
use serde::Deserialize;
use tracing::debug;

/// File-name suffix of landmark sidecars.
pub const SIDECAR_SUFFIX: &str = "landmarks.json";

#[derive(Debug, Deserialize)]
struct SidecarFile {
    #[serde(default)]
    faces: Vec<FaceLandmarks>,
}

/// Landmark provider backed by JSON sidecar files.
#[derive(Debug, Clone)]
pub struct SidecarLandmarkProvider {
    dir: Option<PathBuf>,
}

impl SidecarLandmarkProvider {
    /// Opens a provider reading sidecars from `dir`, or next to each image
    /// when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is given but is not a directory.
    pub fn open(dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = &dir {
            if !dir.is_dir() {
                anyhow::bail!("Landmarks directory not found: {}", dir.display());
            }
            debug!("Reading landmark sidecars from {}", dir.display());
        }
        Ok(Self { dir })
    }

    /// Returns a loader that opens the provider on first use.
    #[must_use]
    pub fn loader(dir: Option<PathBuf>) -> ProviderLoader {
        Box::new(move || {
            let provider = Self::open(dir.clone())?;
            Ok(Box::new(provider) as Box<dyn LandmarkProvider>)
        })
    }

    /// Sidecar path for an image.
    #[must_use]
    pub fn sidecar_path(&self, image_path: &Path) -> PathBuf {
        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = format!("{stem}.{SIDECAR_SUFFIX}");
        match &self.dir {
            Some(dir) => dir.join(name),
            None => image_path.with_file_name(name),
        }
    }
}

impl LandmarkProvider for SidecarLandmarkProvider {
    fn name(&self) -> &'static str {
        "sidecar"
    }

    fn detect(&self, image: &ImageInfo) -> Result<Vec<FaceLandmarks>> {
        let path = self.sidecar_path(Path::new(&image.path));
        if !path.is_file() {
            debug!("No landmark sidecar at {}", path.display());
            return Ok(Vec::new());
        }

        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read landmark sidecar: {}", path.display()))?;
        let sidecar: SidecarFile = serde_json::from_str(&data)
            .with_context(|| format!("Malformed landmark sidecar: {}", path.display()))?;

        debug!(
            "Loaded {} face(s) from {}",
            sidecar.faces.len(),
            path.display()
        );
        Ok(sidecar.faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_next_to_image() {
        let provider = SidecarLandmarkProvider { dir: None };
        let path = provider.sidecar_path(Path::new("/photos/left eye.png"));
        assert_eq!(path, PathBuf::from("/photos/left eye.landmarks.json"));
    }

    #[test]
    fn test_sidecar_in_directory() {
        let provider = SidecarLandmarkProvider {
            dir: Some(PathBuf::from("/marks")),
        };
        let path = provider.sidecar_path(Path::new("/photos/eye.jpg"));
        assert_eq!(path, PathBuf::from("/marks/eye.landmarks.json"));
    }

    #[test]
    fn test_missing_directory_fails_to_open() {
        let result = SidecarLandmarkProvider::open(Some(PathBuf::from("/nonexistent/ocular")));
        assert!(result.is_err());
    }
}
