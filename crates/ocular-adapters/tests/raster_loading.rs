//! Integration tests for raster image loading.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use ocular_adapters::FsImageSource;
use ocular_core::{ImageInfo, ImageSource};
use tempfile::TempDir;

fn write_image(dir: &Path, name: &str, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(8, 8, Rgb([200, 190, 180]))
        .save_with_format(&path, format)
        .expect("should write fixture");
    path
}

fn load_single(path: PathBuf) -> ImageInfo {
    let source = FsImageSource::new(vec![path], false);
    let images: Vec<_> = source.images().collect();
    assert_eq!(images.len(), 1);
    images.into_iter().next().unwrap().expect("should load image")
}

#[test]
fn test_load_each_format() {
    let dir = TempDir::new().unwrap();
    for (name, format) in [
        ("test.jpg", ImageFormat::Jpeg),
        ("test.png", ImageFormat::Png),
        ("test.tiff", ImageFormat::Tiff),
        ("test.webp", ImageFormat::WebP),
        ("test.bmp", ImageFormat::Bmp),
    ] {
        let info = load_single(write_image(dir.path(), name, format));
        assert_eq!(info.width, 8, "{name}");
        assert_eq!(info.height, 8, "{name}");
        assert!(info.path.ends_with(name));
    }
}

#[test]
fn test_corrupt_image_yields_load_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();

    let source = FsImageSource::new(vec![path], false);
    let items: Vec<_> = source.images().collect();
    assert_eq!(items.len(), 1);
    let err = items[0].as_ref().expect_err("corrupt image must fail");
    assert!(err.path.ends_with("broken.png"));
    assert!(!err.message.is_empty());
}

#[test]
fn test_load_directory_skips_non_images() {
    let dir = TempDir::new().unwrap();
    write_image(dir.path(), "a.png", ImageFormat::Png);
    write_image(dir.path(), "b.jpg", ImageFormat::Jpeg);
    std::fs::write(dir.path().join("a.landmarks.json"), "{}").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    let source = FsImageSource::new(vec![dir.path().to_path_buf()], false);
    let paths: Vec<String> = source
        .images()
        .map(|r| r.expect("fixture should load").path)
        .collect();

    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("a.png"));
    assert!(paths[1].ends_with("b.jpg"));
}

#[test]
fn test_recursive_flag() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    write_image(dir.path(), "top.png", ImageFormat::Png);
    write_image(&nested, "deep.png", ImageFormat::Png);

    let flat = FsImageSource::new(vec![dir.path().to_path_buf()], false);
    assert_eq!(flat.count_hint(), Some(1));

    let recursive = FsImageSource::new(vec![dir.path().to_path_buf()], true);
    assert_eq!(recursive.count_hint(), Some(2));
}

#[test]
fn test_missing_path_is_skipped() {
    let source = FsImageSource::new(vec![PathBuf::from("/nonexistent/eye.png")], false);
    assert_eq!(source.count_hint(), Some(0));
}
