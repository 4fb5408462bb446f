//! Atomic image persistence.
//!
//! A failing page must not leave a half-written file behind: downstream
//! print tools read the output directory wholesale, and a truncated PNG
//! would silently produce a blank card. Every write goes to a `.tmp`
//! sibling first and is renamed into place only after the encoder has
//! finished — rename within one directory is atomic on the platforms we
//! care about.

use crate::config::OutputFormat;
use crate::error::CardbleedError;
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Create the output directory (and parents) if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), CardbleedError> {
    fs::create_dir_all(dir).map_err(|e| CardbleedError::OutputWriteFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Write `image` to `path` atomically in the given format.
///
/// Returns the number of bytes written.
pub fn write_image(
    image: &RgbaImage,
    path: &Path,
    format: OutputFormat,
) -> Result<u64, CardbleedError> {
    let tmp_path = tmp_sibling(path);

    let write_err = |e: std::io::Error| CardbleedError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let encode = || -> Result<(), CardbleedError> {
        match format {
            OutputFormat::Png => image
                .save_with_format(&tmp_path, format.image_format())
                .map_err(|e| CardbleedError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: std::io::Error::other(e),
                }),
            // JPEG has no alpha channel; flatten before encoding.
            OutputFormat::Jpeg => image::DynamicImage::ImageRgba8(image.clone())
                .into_rgb8()
                .save_with_format(&tmp_path, format.image_format())
                .map_err(|e| CardbleedError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: std::io::Error::other(e),
                }),
        }
    };

    if let Err(e) = encode() {
        // Best-effort cleanup of the partial temp file.
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    let bytes = fs::metadata(&tmp_path).map_err(write_err)?.len();
    fs::rename(&tmp_path, path).map_err(write_err)?;

    debug!("Wrote {} ({} bytes)", path.display(), bytes);
    Ok(bytes)
}

/// Temp-file path next to the final destination (same directory, so the
/// final rename never crosses a filesystem boundary).
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
