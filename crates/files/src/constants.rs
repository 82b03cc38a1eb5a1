/// URL prefix under which the uploads directory is served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Media types accepted for uploaded prescription files.
pub const ALLOWED_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg", "application/pdf"];
