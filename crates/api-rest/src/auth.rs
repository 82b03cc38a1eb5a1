//! Identity extractors.
//!
//! Doctors present their id in the `dtoken` header and patients in `token`. Admin routes
//! require `x-api-key` to match the configured admin key; with no key configured every
//! admin request is refused.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use carebook_core::RecordId;

use crate::{error::ApiError, AppState};

pub const DOCTOR_TOKEN_HEADER: &str = "dtoken";
pub const PATIENT_TOKEN_HEADER: &str = "token";
pub const ADMIN_KEY_HEADER: &str = "x-api-key";

/// The calling doctor.
#[derive(Debug, Clone, Copy)]
pub struct DoctorAuth(pub RecordId);

/// The calling patient.
#[derive(Debug, Clone, Copy)]
pub struct PatientAuth(pub RecordId);

/// Proof that the caller holds the admin key.
#[derive(Debug, Clone, Copy)]
pub struct AdminKey;

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn header_id(parts: &Parts, name: &str) -> Result<RecordId, ApiError> {
    let raw = header_str(parts, name).ok_or(ApiError::NotAuthorized)?;
    RecordId::parse(raw).map_err(|_| ApiError::NotAuthorized)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for DoctorAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_id(parts, DOCTOR_TOKEN_HEADER).map(Self)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PatientAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_id(parts, PATIENT_TOKEN_HEADER).map(Self)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.cfg.admin_api_key() else {
            tracing::warn!("admin request refused: no admin key configured");
            return Err(ApiError::NotAuthorized);
        };

        match header_str(parts, ADMIN_KEY_HEADER) {
            Some(provided) if provided == expected => Ok(AdminKey),
            _ => Err(ApiError::NotAuthorized),
        }
    }
}
