//! Shared fixtures for crnnkv tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma};

/// Encode a small gradient image in the given format
pub fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = GrayImage::from_fn(width, height, |x, y| {
        Luma([((x * 7 + y * 13) % 256) as u8])
    });

    let mut bytes: Vec<u8> = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

/// Write a PNG image into `dir` and return its path
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, encode_image(width, height, ImageFormat::Png)).unwrap();
    path
}

/// Write arbitrary bytes into `dir` and return the path
pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Write a manifest of `<path>\t<label>` rows
pub fn write_manifest(dir: &Path, rows: &[(PathBuf, &str)]) -> PathBuf {
    let mut text = String::new();
    for (path, label) in rows {
        text.push_str(&format!("{}\t{}\n", path.display(), label));
    }
    let path = dir.join("manifest.tsv");
    fs::write(&path, text).unwrap();
    path
}

/// Write `count` PNGs with labels `word<i>` and a manifest for them
pub fn write_numbered_dataset(dir: &Path, count: usize) -> (PathBuf, Vec<(PathBuf, String)>) {
    let mut rows = Vec::with_capacity(count);
    for i in 0..count {
        let path = write_png(dir, &format!("img_{:05}.png", i), 4 + (i % 5) as u32, 3);
        rows.push((path, format!("word{}", i)));
    }

    let borrowed: Vec<(PathBuf, &str)> = rows
        .iter()
        .map(|(path, label)| (path.clone(), label.as_str()))
        .collect();
    let manifest = write_manifest(dir, &borrowed);
    (manifest, rows)
}

/// Manifest of `count` rows cycling over a handful of images
///
/// Labels carry spaces so normalization is exercised on every row.
pub fn write_cycled_manifest(dir: &Path, count: usize) -> PathBuf {
    let images: Vec<PathBuf> = (0..5)
        .map(|i| write_png(dir, &format!("cycle_{}.png", i), 3 + i, 2 + i))
        .collect();

    let mut text = String::new();
    for i in 0..count {
        text.push_str(&format!(
            "{}\t  row {} of {}  \n",
            images[i % images.len()].display(),
            i,
            count
        ));
    }
    let path = dir.join("cycled.tsv");
    fs::write(&path, text).unwrap();
    path
}
