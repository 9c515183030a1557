//! Still PNG export of single patches

use crate::io::error::{GaborError, Result, file_system_error};
use crate::stimulus::Patch;
use std::path::Path;

/// Export a patch as an 8-bit grayscale PNG
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_patch_png(patch: &Patch, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| file_system_error(parent, "create directory", e))?;
    }

    patch
        .to_gray_image()
        .save_with_format(output_path, image::ImageFormat::Png)
        .map_err(|e| GaborError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    tracing::info!(path = %output_path.display(), size = patch.size(), "patch exported");
    Ok(())
}
