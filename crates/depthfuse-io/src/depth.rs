//! Depth-map decoding.
//!
//! Supported encodings:
//! - `.json`: a serialized [`DepthMap`] (`width`, `height`, row-major `depths`);
//! - 8/16-bit grayscale images: raw value × `depth_scale`;
//! - 32-bit float RGB(A) images: first channel × `depth_scale`.
//!
//! Zero pixels decode to depth 0, i.e. "no depth".

use anyhow::{bail, Context, Result};
use depthfuse_core::{DepthMap, Real};
use image::DynamicImage;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load a depth map and multiply every sample by `depth_scale`.
pub fn load_depth_map(path: &Path, depth_scale: Real) -> Result<DepthMap> {
    if is_json(path) {
        let file = File::open(path)
            .with_context(|| format!("failed to open depth map {}", path.display()))?;
        let map: DepthMap = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse depth map {}", path.display()))?;
        return Ok(if depth_scale == 1.0 {
            map
        } else {
            map.scaled(depth_scale)
        });
    }

    let img = image::ImageReader::open(path)
        .with_context(|| format!("failed to read depth image {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?;
    depth_map_from_image(&img, depth_scale)
        .with_context(|| format!("unsupported depth image {}", path.display()))
}

/// Convert a decoded image into a depth map.
pub fn depth_map_from_image(img: &DynamicImage, depth_scale: Real) -> Result<DepthMap> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let depths: Vec<Real> = match img {
        DynamicImage::ImageLuma8(buf) => buf
            .pixels()
            .map(|p| Real::from(p.0[0]) * depth_scale)
            .collect(),
        DynamicImage::ImageLuma16(buf) => buf
            .pixels()
            .map(|p| Real::from(p.0[0]) * depth_scale)
            .collect(),
        DynamicImage::ImageRgb32F(buf) => buf
            .pixels()
            .map(|p| Real::from(p.0[0]) * depth_scale)
            .collect(),
        DynamicImage::ImageRgba32F(buf) => buf
            .pixels()
            .map(|p| Real::from(p.0[0]) * depth_scale)
            .collect(),
        other => bail!("pixel format {:?} is not a depth encoding", other.color()),
    };
    Ok(DepthMap::new(width, height, depths)?)
}

/// Write a depth map as JSON.
pub fn save_depth_map_json(path: &Path, map: &DepthMap) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create depth map {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, map)
        .with_context(|| format!("failed to write depth map {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
