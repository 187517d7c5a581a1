//! Rendering of fitted windows and atomic image export
//!
//! A window saved as GIF keeps the digits themselves: each pixel's palette
//! index is its window symbol, and the palette maps every assigned symbol to
//! its reference color. Other formats get a plain RGB rendering.

use crate::fitting::assignment::Assignment;
use crate::io::error::{Result, SearchError, file_system, invalid_parameter};
use crate::target::descriptor::TargetDescriptor;
use image::error::{EncodingError, ImageFormatHint};
use image::{DynamicImage, ImageError, ImageFormat, RgbImage};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Paint each target pixel with the color assigned to its window symbol
///
/// Pixels whose symbol has no assignment, which cannot happen for a fit of
/// the same window, are painted black.
pub fn render_window(
    target: &TargetDescriptor,
    symbols: &[u8],
    assignment: &Assignment,
) -> RgbImage {
    let width = target.width();
    RgbImage::from_fn(target.width() as u32, target.height() as u32, |x, y| {
        let pixel = y as usize * width + x as usize;
        symbols
            .get(pixel)
            .and_then(|&symbol| assignment.get(symbol))
            .and_then(|color| target.color(color))
            .unwrap_or_default()
            .into()
    })
}

/// Palette with one RGB entry per symbol of the assignment's alphabet
///
/// Assigned symbols carry their reference color; the rest stay black.
pub fn window_palette(target: &TargetDescriptor, assignment: &Assignment) -> Vec<u8> {
    let mut palette = vec![0u8; assignment.alphabet_size() * 3];
    for (symbol, color) in assignment.assigned() {
        let offset = usize::from(symbol) * 3;
        if let (Some(entry), Some(rgb)) =
            (palette.get_mut(offset..offset + 3), target.color(color))
        {
            entry.copy_from_slice(&rgb.0);
        }
    }
    palette
}

/// Save an image, format chosen by extension, replacing the destination in one
/// rename so readers never see a partial file
///
/// # Errors
///
/// Returns an error if:
/// - The extension does not name a supported image format
/// - The parent directory cannot be created
/// - Encoding or the final rename fails
pub fn save_image(image: &RgbImage, output_path: &Path) -> Result<()> {
    let format = output_format(output_path)?;
    // The GIF encoder only takes RGBA input
    let encoded = if format == ImageFormat::Gif {
        DynamicImage::ImageRgba8(DynamicImage::ImageRgb8(image.clone()).to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.clone())
    };

    replace_file(output_path, |file| {
        encoded
            .write_to(file, format)
            .map_err(|e| SearchError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })
    })
}

/// Save a fitted window
///
/// GIF output is palette-indexed by window symbol, so the digits can be read
/// back from the image; other formats are rendered with [`render_window`].
///
/// # Errors
///
/// Returns an error if:
/// - The extension does not name a supported image format
/// - The target is too large for a GIF frame
/// - Encoding, writing or the final rename fails
pub fn export_window(
    target: &TargetDescriptor,
    symbols: &[u8],
    assignment: &Assignment,
    output_path: &Path,
) -> Result<()> {
    if output_format(output_path)? != ImageFormat::Gif {
        return save_image(&render_window(target, symbols, assignment), output_path);
    }

    let bytes = indexed_gif(target, symbols, assignment, output_path)?;
    replace_file(output_path, |file| {
        file.write_all(&bytes)
            .map_err(|e| file_system(output_path, "write image", e))
    })
}

fn indexed_gif(
    target: &TargetDescriptor,
    symbols: &[u8],
    assignment: &Assignment,
    output_path: &Path,
) -> Result<Vec<u8>> {
    let (Ok(width), Ok(height)) = (
        u16::try_from(target.width()),
        u16::try_from(target.height()),
    ) else {
        return Err(invalid_parameter(
            "target",
            &format!("{}x{}", target.width(), target.height()),
            &"too large for a GIF frame",
        ));
    };

    let frame = gif::Frame::from_indexed_pixels(width, height, symbols.to_vec(), None);
    let palette = window_palette(target, assignment);

    let mut bytes = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut bytes, width, height, &palette)
            .map_err(|e| gif_export_error(output_path, e))?;
        encoder
            .write_frame(&frame)
            .map_err(|e| gif_export_error(output_path, e))?;
    }
    Ok(bytes)
}

fn gif_export_error(path: &Path, error: gif::EncodingError) -> SearchError {
    SearchError::ImageExport {
        path: path.to_path_buf(),
        source: ImageError::Encoding(EncodingError::new(
            ImageFormatHint::Exact(ImageFormat::Gif),
            error,
        )),
    }
}

fn output_format(output_path: &Path) -> Result<ImageFormat> {
    ImageFormat::from_path(output_path).map_err(|e| SearchError::ImageExport {
        path: output_path.to_path_buf(),
        source: e,
    })
}

// Writes through a temporary file in the destination directory, then renames
fn replace_file<F>(output_path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let directory = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&directory)
        .map_err(|e| file_system(&directory, "create directory", e))?;

    let mut temp = NamedTempFile::new_in(&directory)
        .map_err(|e| file_system(&directory, "create temporary image", e))?;
    write(temp.as_file_mut())?;
    temp.persist(output_path)
        .map_err(|e| file_system(output_path, "replace image", e.error))?;
    Ok(())
}
