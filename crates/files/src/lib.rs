//! Carebook uploads storage
//!
//! All binary files attached to prescriptions live in a single flat uploads directory that is
//! served statically under `/uploads`:
//!
//! ```text
//! uploads/
//! ├── 1718031245123.pdf             # doctor upload, named by arrival time
//! └── prescription_1718031245200.pdf # generated from prescription text
//! ```
//!
//! File names are millisecond timestamps rather than content hashes. Two files written in
//! the same millisecond with the same extension would collide; nothing prevents that.
//!
//! ## Example Usage
//!
//! ```no_run
//! use carebook_files::UploadsService;
//! use std::path::Path;
//!
//! # async fn demo() -> Result<(), carebook_files::FilesError> {
//! let uploads = UploadsService::new(Path::new("uploads"));
//! let meta = uploads
//!     .store_upload("scan.pdf", "application/pdf", b"%PDF-1.4\n".to_vec())
//!     .await?;
//! println!("served at {}", meta.public_path);
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;

pub use constants::{ALLOWED_MEDIA_TYPES, MAX_UPLOAD_BYTES, UPLOADS_URL_PREFIX};
pub use files::{timestamp_filename, FileMetadata, UploadsService};

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Declared or detected media type is not accepted
    #[error("Unsupported file format. Only JPEG, PNG, and PDF are allowed. (got {0})")]
    UnsupportedMediaType(String),

    /// Upload exceeds [`MAX_UPLOAD_BYTES`]
    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    /// File name would escape the uploads directory or is empty
    #[error("Invalid file name: {0}")]
    InvalidFilename(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
