//! Upload storage
//!
//! Product images and payment proofs live under `{work_dir}/uploads` and
//! are served from `/uploads`. Product images are named by the SHA256 of
//! their stored bytes, so re-uploading the same image reuses the file.
//! Payment proofs always get a fresh name.

use image::DynamicImage;
use serde::Serialize;
use sha2::{Digest, Sha256};
use shared::ErrorCode;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::utils::AppError;

/// Product images: 10MB
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Payment proofs: 5MB
pub const MAX_PROOF_SIZE: usize = 5 * 1024 * 1024;

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for product images
const JPEG_QUALITY: u8 = 85;

/// Hex digits of the content hash kept in proof file names
const PROOF_HASH_PREFIX: usize = 16;

const IMAGES_DIR: &str = "images";
const PAYMENTS_DIR: &str = "payments";

/// A file written to (or found in) the uploads directory
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub filename: String,
    /// Public path, e.g. `/uploads/images/<hash>.jpg`
    pub url: String,
    pub size: usize,
    pub content_type: String,
    /// `false` when identical content was already stored
    #[serde(skip)]
    pub created: bool,
}

/// Create `images/` and `payments/` under the uploads dir
pub fn ensure_dirs(uploads_dir: &Path) -> Result<(), AppError> {
    for sub in [IMAGES_DIR, PAYMENTS_DIR] {
        fs::create_dir_all(uploads_dir.join(sub)).map_err(|e| {
            AppError::with_message(
                ErrorCode::StorageError,
                format!("Failed to create upload directory: {e}"),
            )
        })?;
    }
    Ok(())
}

fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Lower-cased extension of the client file name
fn extension_of(filename: &str) -> Result<String, AppError> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidFileExtension,
                format!("Invalid file extension for: {filename}"),
            )
        })
}

/// Size, extension and decodability checks
fn validate_image(data: &[u8], ext: &str, max_size: usize) -> Result<DynamicImage, AppError> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    if data.len() > max_size {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large. Maximum size is {}MB", max_size / 1024 / 1024),
        )
        .with_detail("maxBytes", max_size));
    }

    if !SUPPORTED_FORMATS.contains(&ext) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{ext}'. Supported: {}",
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    image::load_from_memory(data).map_err(|e| {
        AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("Invalid image file ({ext}): {e}"),
        )
    })
}

fn compress_to_jpeg(img: &DynamicImage) -> Result<Vec<u8>, AppError> {
    let mut buffer = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
        AppError::with_message(
            ErrorCode::ImageProcessingFailed,
            format!("Failed to compress image: {e}"),
        )
    })?;
    Ok(buffer)
}

/// Write `data` as `{dir}/{filename}` unless that file already exists
fn write_once(
    uploads_dir: &Path,
    sub: &str,
    filename: String,
    data: &[u8],
) -> Result<StoredFile, AppError> {
    let dir = uploads_dir.join(sub);
    fs::create_dir_all(&dir).map_err(|e| {
        AppError::with_message(
            ErrorCode::FileStorageFailed,
            format!("Failed to create {sub} directory: {e}"),
        )
    })?;

    let path = dir.join(&filename);
    let created = !path.exists();
    if created {
        fs::write(&path, data).map_err(|e| {
            AppError::with_message(
                ErrorCode::FileStorageFailed,
                format!("Failed to save file: {e}"),
            )
        })?;
    }

    Ok(StoredFile {
        url: format!("/uploads/{sub}/{filename}"),
        content_type: mime_guess::from_path(&path)
            .first_or_octet_stream()
            .to_string(),
        size: data.len(),
        filename,
        created,
    })
}

/// Validate a product image and store it re-encoded as JPEG
pub fn store_product_image(
    uploads_dir: &Path,
    original_name: &str,
    data: &[u8],
) -> Result<StoredFile, AppError> {
    let ext = extension_of(original_name)?;
    let img = validate_image(data, &ext, MAX_IMAGE_SIZE)?;
    let compressed = compress_to_jpeg(&img)?;
    let filename = format!("{}.jpg", calculate_hash(&compressed));
    let stored = write_once(uploads_dir, IMAGES_DIR, filename, &compressed)?;

    tracing::info!(
        original_name = %original_name,
        size = stored.size,
        file = %stored.filename,
        deduplicated = !stored.created,
        "Product image stored"
    );
    Ok(stored)
}

/// Validate a payment proof and store the original bytes
///
/// Every proof gets its own file, so removing it after a failed placement
/// never touches a file an existing order points at.
pub fn store_payment_proof(
    uploads_dir: &Path,
    original_name: &str,
    data: &[u8],
) -> Result<StoredFile, AppError> {
    let ext = extension_of(original_name)?;
    validate_image(data, &ext, MAX_PROOF_SIZE).map_err(|e| {
        let code = match e.code {
            ErrorCode::FileTooLarge | ErrorCode::EmptyFile => e.code,
            _ => ErrorCode::PaymentProofInvalid,
        };
        AppError::with_message(code, e.message)
    })?;
    let ext = if ext == "jpeg" { "jpg".to_string() } else { ext };
    let filename = format!(
        "{}-{}.{ext}",
        shared::util::snowflake_id(),
        &calculate_hash(data)[..PROOF_HASH_PREFIX]
    );
    let stored = write_once(uploads_dir, PAYMENTS_DIR, filename, data)?;

    tracing::info!(
        original_name = %original_name,
        size = stored.size,
        file = %stored.filename,
        "Payment proof stored"
    );
    Ok(stored)
}

/// Resolve a public `/uploads/...` URL to a path inside `uploads_dir`
fn resolve_url(uploads_dir: &Path, url: &str) -> Option<PathBuf> {
    let relative = url.strip_prefix("/uploads/")?;
    let mut path = uploads_dir.to_path_buf();
    for part in relative.split('/') {
        if part.is_empty() || part == "." || part == ".." {
            return None;
        }
        path.push(part);
    }
    Some(path)
}

/// Best-effort removal of a stored upload
pub fn remove_upload(uploads_dir: &Path, url: &str) {
    let Some(path) = resolve_url(uploads_dir, url) else {
        tracing::warn!(url = %url, "Refusing to remove upload outside uploads dir");
        return;
    };
    match fs::remove_file(&path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Upload removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload"),
    }
}
