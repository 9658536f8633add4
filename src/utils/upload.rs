//! # Upload Utilities
//!
//! Image validation and file persistence shared by the listing and profile
//! upload handlers. Uploaded files get UUID-based names inside a per-owner
//! directory and are referenced by relative `/assets/...` paths.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, trace};

use crate::utils::static_object::UPLOAD_DIR;

/// Validates an uploaded image and returns the file extension to store it
/// under.
///
/// Checks the declared content type, rejects empty payloads, and sniffs the
/// magic bytes with the `image` crate. Only PNG, JPG and WEBP are accepted.
pub fn validate_image(content_type: &str, data: &[u8]) -> Result<&'static str, String> {
    if !content_type.starts_with("image/") {
        return Err(format!(
            "File must be an image (image/* content type required), got: {content_type}"
        ));
    }

    if data.is_empty() {
        return Err("Empty file not allowed".to_string());
    }

    let format =
        image::guess_format(data).map_err(|e| format!("Could not detect image format: {e}"))?;

    let extension = match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        ImageFormat::WebP => "webp",
        other => {
            return Err(format!(
                "Only PNG, JPG, and WEBP formats are allowed, got: {other:?}"
            ));
        }
    };

    trace!(?format, extension, "Image format validated");
    Ok(extension)
}

/// Absolute directory for an owner's uploads, e.g. `uploads/exchanges/host_3`.
pub fn owner_dir(category: &str, owner_prefix: &str, owner_id: i64) -> PathBuf {
    Path::new(UPLOAD_DIR.as_str())
        .join(category)
        .join(format!("{owner_prefix}_{owner_id}"))
}

/// Saves image data under `dir` with a fresh UUID-based filename.
///
/// Creates the directory if needed and returns the generated filename.
pub async fn save_image(dir: &Path, extension: &str, data: &[u8]) -> Result<String, std::io::Error> {
    fs::create_dir_all(dir).await?;

    let filename = format!("{}.{extension}", uuid::Uuid::new_v4());
    let full_path = dir.join(&filename);

    debug!(file_path = %full_path.display(), size = data.len(), "Saving file");
    let mut file = fs::File::create(&full_path).await?;
    file.write_all(data).await?;

    Ok(filename)
}

/// The relative path stored in the database and served under `/assets`.
pub fn asset_path(category: &str, owner_prefix: &str, owner_id: i64, filename: &str) -> String {
    format!("/assets/{category}/{owner_prefix}_{owner_id}/{filename}")
}

/// Attempts to remove files written before a failed database insert.
///
/// Logs errors instead of returning them so the original error is preserved.
pub async fn cleanup_files(dir: &Path, filenames: &[String]) {
    for filename in filenames {
        let full_path = dir.join(filename);
        if let Err(e) = fs::remove_file(&full_path).await {
            error!(
                file_path = %full_path.display(),
                error = %e,
                "Failed to clean up file during error recovery"
            );
        }
    }
}
