//! Image I/O and argument helpers shared by commands.

use anyhow::Context;
use image::{DynamicImage, GrayImage, ImageReader, RgbaImage};
use lumen_core::{Frame, FrameBuffer, FrameDescriptor, PixelFormat};
use std::path::{Path, PathBuf};

/// Parses a `key=value` argument.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        )),
    }
}

/// Decodes an image file into a ready RGBA frame.
pub fn load_frame(path: &Path) -> anyhow::Result<Frame> {
    let img = ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?;

    let rgba = img.to_rgba32f();
    let (width, height) = rgba.dimensions();
    let buffer = FrameBuffer::from_samples(FrameDescriptor::rgba(width, height), rgba.into_raw())
        .with_context(|| format!("unexpected sample count in {}", path.display()))?;
    Ok(Frame::new(buffer))
}

/// Quantizes a frame to 8 bits per sample.
pub fn frame_to_image(frame: &Frame) -> anyhow::Result<DynamicImage> {
    let desc = frame.descriptor();
    let data: Vec<u8> = frame.samples().iter().map(|&s| to_u8(s)).collect();

    match desc.format {
        PixelFormat::Luma => GrayImage::from_raw(desc.width, desc.height, data)
            .map(DynamicImage::ImageLuma8)
            .context("failed to create grayscale image"),
        PixelFormat::Rgba => RgbaImage::from_raw(desc.width, desc.height, data)
            .map(DynamicImage::ImageRgba8)
            .context("failed to create RGBA image"),
    }
}

/// Writes a frame, choosing the encoder from the file extension.
///
/// JPEG has no alpha channel, so RGBA frames lose it there.
pub fn save_frame(frame: &Frame, path: &Path) -> anyhow::Result<()> {
    let mut img = frame_to_image(frame)?;
    if is_jpeg(path) && matches!(img, DynamicImage::ImageRgba8(_)) {
        img = DynamicImage::ImageRgb8(img.to_rgb8());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn to_u8(sample: f32) -> u8 {
    (sample.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
}

/// Where one sink frame of one input is written.
///
/// With a single input written to a file path, a lone sink frame goes to that
/// path and several frames get `_<suffix>` appended to its stem. Otherwise
/// `output` is a directory and each frame is named after the input's stem.
pub fn output_path(
    input: &Path,
    output: &Path,
    to_directory: bool,
    suffix: Option<&str>,
) -> PathBuf {
    if to_directory {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("frame");
        let name = match suffix {
            Some(suffix) => format!("{stem}_{suffix}.png"),
            None => format!("{stem}.png"),
        };
        return output.join(name);
    }

    match suffix {
        None => output.to_path_buf(),
        Some(suffix) => {
            let stem = output
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("frame");
            let ext = output
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("png");
            output.with_file_name(format!("{stem}_{suffix}.{ext}"))
        }
    }
}

/// Suffixes for a run's sink frames, `None` when there is only one.
///
/// A sink reached along several paths produces several frames; repeats are
/// numbered in production order.
pub fn sink_suffixes(sinks: &[&str]) -> Vec<Option<String>> {
    if sinks.len() <= 1 {
        return vec![None; sinks.len()];
    }
    sinks
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let total = sinks.iter().filter(|n| *n == name).count();
            if total == 1 {
                Some((*name).to_string())
            } else {
                let nth = sinks[..i].iter().filter(|n| *n == name).count() + 1;
                Some(format!("{name}_{nth}"))
            }
        })
        .collect()
}
