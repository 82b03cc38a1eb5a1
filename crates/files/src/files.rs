//! Uploads directory service implementation
//!
//! [`UploadsService`] owns the uploads directory. It accepts doctor uploads (validated for
//! media type and size) and files generated by the server, writes them under a
//! timestamp-derived name, and returns a [`FileMetadata`] record describing the result.
//!
//! # Write semantics
//!
//! Writes go through an async file handle and complete only once the bytes are flushed.
//! There is no retry, timeout, or cleanup: a failed write may leave a partial file behind.

use crate::{FilesError, ALLOWED_MEDIA_TYPES, MAX_UPLOAD_BYTES, UPLOADS_URL_PREFIX};
use carebook_types::NonEmptyText;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Metadata for a stored file
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FileMetadata {
    /// Name of the file inside the uploads directory
    pub filename: NonEmptyText,

    /// URL path the file is served under (`/uploads/<filename>`)
    pub public_path: NonEmptyText,

    /// Hexadecimal SHA-256 digest of the content
    pub sha256: String,

    /// Size of the file in bytes
    pub size_bytes: u64,

    /// Detected media type (MIME type), if available
    ///
    /// Best-effort detection from magic bytes, falling back to the declared type.
    pub media_type: Option<NonEmptyText>,

    /// Original filename supplied by the client, if any
    pub original_filename: Option<NonEmptyText>,

    /// UTC timestamp when the file was stored
    pub stored_at: DateTime<Utc>,
}

/// Builds `<prefix><unix-millis><extension>`, e.g. `prescription_1718031245200.pdf`.
///
/// `extension` includes its leading dot, or is empty.
pub fn timestamp_filename(prefix: &str, extension: &str) -> String {
    format!("{}{}{}", prefix, Utc::now().timestamp_millis(), extension)
}

fn extension_for(media_type: &str) -> &'static str {
    match media_type {
        "image/jpeg" | "image/jpg" => ".jpg",
        "image/png" => ".png",
        "application/pdf" => ".pdf",
        _ => "",
    }
}

/// Service for the uploads directory
///
/// The directory is created lazily on the first write.
#[derive(Debug, Clone)]
pub struct UploadsService {
    directory: PathBuf,
}

impl UploadsService {
    /// Creates a service rooted at `directory`. No I/O happens here.
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
        }
    }

    /// Stores a doctor upload.
    ///
    /// The declared content type must be one of [`ALLOWED_MEDIA_TYPES`]; when the magic bytes
    /// identify a type, that type must be allowed too. The stored name is the arrival time in
    /// milliseconds followed by the extension of the accepted media type. The client's
    /// filename only survives in [`FileMetadata::original_filename`].
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the media type is not accepted,
    /// - the upload is larger than [`MAX_UPLOAD_BYTES`],
    /// - the uploads directory cannot be created or the file cannot be written.
    pub async fn store_upload(
        &self,
        original_filename: &str,
        declared_content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<FileMetadata, FilesError> {
        let declared = declared_content_type.trim().to_ascii_lowercase();
        if !ALLOWED_MEDIA_TYPES.contains(&declared.as_str()) {
            return Err(FilesError::UnsupportedMediaType(declared));
        }

        let accepted = match infer::get(&bytes) {
            Some(kind) if !ALLOWED_MEDIA_TYPES.contains(&kind.mime_type()) => {
                return Err(FilesError::UnsupportedMediaType(kind.mime_type().to_string()));
            }
            Some(kind) => kind.mime_type(),
            None => declared.as_str(),
        };

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(FilesError::TooLarge {
                size: bytes.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let filename = timestamp_filename("", extension_for(accepted));

        let mut metadata = self.write(&filename, &bytes).await?;
        metadata.original_filename = NonEmptyText::new(original_filename).ok();
        if metadata.media_type.is_none() {
            metadata.media_type = NonEmptyText::new(&declared).ok();
        }

        tracing::info!(
            "stored upload {} ({} bytes)",
            metadata.filename,
            metadata.size_bytes
        );
        Ok(metadata)
    }

    /// Writes a server-generated file (for example a rendered prescription PDF).
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if `filename` is not a plain file name or the write fails.
    pub async fn write_generated(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<FileMetadata, FilesError> {
        self.write(filename, bytes).await
    }

    async fn write(&self, filename: &str, bytes: &[u8]) -> Result<FileMetadata, FilesError> {
        let path = self.file_path(filename)?;

        tokio::fs::create_dir_all(&self.directory).await?;

        let mut file = tokio::fs::File::create(&path).await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        let sha256 = hex::encode(Sha256::digest(bytes));
        let media_type = infer::get(bytes).and_then(|kind| NonEmptyText::new(kind.mime_type()).ok());
        let filename_text = NonEmptyText::new(filename)
            .map_err(|_| FilesError::InvalidFilename(filename.to_string()))?;
        let public_path = NonEmptyText::new(format!("{}/{}", UPLOADS_URL_PREFIX, filename))
            .map_err(|_| FilesError::InvalidFilename(filename.to_string()))?;

        Ok(FileMetadata {
            filename: filename_text,
            public_path,
            sha256,
            size_bytes: bytes.len() as u64,
            media_type,
            original_filename: None,
            stored_at: Utc::now(),
        })
    }

    /// Joins a plain file name onto the uploads directory, rejecting separators and `..`.
    fn file_path(&self, filename: &str) -> Result<PathBuf, FilesError> {
        let trimmed = filename.trim();
        if trimmed.is_empty()
            || trimmed == "."
            || trimmed.contains("..")
            || trimmed.contains(['/', '\\'])
        {
            return Err(FilesError::InvalidFilename(filename.to_string()));
        }
        Ok(self.directory.join(trimmed))
    }
}
