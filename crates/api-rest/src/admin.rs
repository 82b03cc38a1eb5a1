//! `/api/admin` handlers. All of them require [`AdminKey`].

use axum::extract::State;
use axum::response::Json;
use carebook_core::services::NewDoctor;

use crate::auth::AdminKey;
use crate::dto::{AddDoctorReq, ChangeAvailabilityReq, DoctorRes};
use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::{parse_id, AppState};

#[utoipa::path(
    post,
    path = "/api/admin/add-doctor",
    params(("x-api-key" = String, Header, description = "Admin API key")),
    request_body = AddDoctorReq,
    responses((status = 200, description = "Added doctor", body = DoctorRes))
)]
pub async fn add_doctor(
    State(state): State<AppState>,
    _admin: AdminKey,
    JsonBody(req): JsonBody<AddDoctorReq>,
) -> ApiResult<DoctorRes> {
    let doctor = state.directory.add_doctor(NewDoctor {
        name: req.name,
        email: req.email,
        speciality: req.speciality,
        degree: req.degree,
        experience: req.experience,
        about: req.about,
        fees: req.fees,
    })?;

    Ok(Json(DoctorRes {
        success: true,
        message: "Doctor Added".into(),
        doctor: doctor.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/admin/change-availability",
    params(("x-api-key" = String, Header, description = "Admin API key")),
    request_body = ChangeAvailabilityReq,
    responses((status = 200, description = "Updated doctor", body = DoctorRes))
)]
pub async fn change_availability(
    State(state): State<AppState>,
    _admin: AdminKey,
    JsonBody(req): JsonBody<ChangeAvailabilityReq>,
) -> ApiResult<DoctorRes> {
    let doctor_id = parse_id(&req.doc_id)?;
    let doctor = state.directory.change_availability(doctor_id)?;

    Ok(Json(DoctorRes {
        success: true,
        message: "Availability Changed".into(),
        doctor: doctor.into(),
    }))
}
