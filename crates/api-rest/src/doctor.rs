//! `/api/doctor` handlers.

use axum::extract::{Path, State};
use axum::response::Json;
use carebook_core::models::PrescriptionType;
use carebook_core::services::{AddPrescription, UploadedFile};

use crate::auth::DoctorAuth;
use crate::dto::{
    AddPrescriptionForm, AppointmentIdReq, AppointmentsRes, DashboardRes, DoctorRes, DoctorsRes,
    MessageRes, PrescriptionRes, PrescriptionsRes, ProfileRes, UpdateProfileReq,
};
use crate::error::{ApiError, ApiResult};
use crate::extract::{Form, JsonBody};
use crate::{parse_id, AppState};

#[utoipa::path(
    get,
    path = "/api/doctor/list",
    responses((status = 200, description = "All doctors", body = DoctorsRes))
)]
pub async fn list_doctors(State(state): State<AppState>) -> ApiResult<DoctorsRes> {
    let doctors = state.directory.list_doctors()?;
    Ok(Json(DoctorsRes {
        success: true,
        doctors: doctors.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/doctor/appointments",
    params(("dtoken" = String, Header, description = "Doctor id")),
    responses((status = 200, description = "The doctor's appointments", body = AppointmentsRes))
)]
pub async fn appointments(
    State(state): State<AppState>,
    DoctorAuth(doctor_id): DoctorAuth,
) -> ApiResult<AppointmentsRes> {
    let appointments = state.appointments.list_for_doctor(doctor_id)?;
    Ok(Json(AppointmentsRes {
        success: true,
        appointments: appointments.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/doctor/profile",
    params(("dtoken" = String, Header, description = "Doctor id")),
    responses((status = 200, description = "The calling doctor's record", body = ProfileRes))
)]
pub async fn profile(
    State(state): State<AppState>,
    DoctorAuth(doctor_id): DoctorAuth,
) -> ApiResult<ProfileRes> {
    let doctor = state.directory.get_doctor(doctor_id)?;
    Ok(Json(ProfileRes {
        success: true,
        profile_data: doctor.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/doctor/update-profile",
    params(("dtoken" = String, Header, description = "Doctor id")),
    request_body = UpdateProfileReq,
    responses((status = 200, description = "Updated doctor", body = DoctorRes))
)]
/// Edits the calling doctor's profile.
///
/// Existing appointments and prescriptions keep the doctor snapshot taken when they were
/// created.
pub async fn update_profile(
    State(state): State<AppState>,
    DoctorAuth(doctor_id): DoctorAuth,
    JsonBody(req): JsonBody<UpdateProfileReq>,
) -> ApiResult<DoctorRes> {
    let doctor = state
        .directory
        .update_doctor_profile(doctor_id, req.into())?;
    Ok(Json(DoctorRes {
        success: true,
        message: "Profile Updated".into(),
        doctor: doctor.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/doctor/dashboard",
    params(("dtoken" = String, Header, description = "Doctor id")),
    responses((status = 200, description = "Practice summary", body = DashboardRes))
)]
pub async fn dashboard(
    State(state): State<AppState>,
    DoctorAuth(doctor_id): DoctorAuth,
) -> ApiResult<DashboardRes> {
    state.directory.get_doctor(doctor_id)?;
    let dashboard = state.appointments.dashboard(doctor_id)?;
    Ok(Json(DashboardRes {
        success: true,
        dash_data: dashboard.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/doctor/complete-appointment",
    params(("dtoken" = String, Header, description = "Doctor id")),
    request_body = AppointmentIdReq,
    responses((status = 200, description = "Outcome", body = MessageRes))
)]
pub async fn complete_appointment(
    State(state): State<AppState>,
    DoctorAuth(doctor_id): DoctorAuth,
    JsonBody(req): JsonBody<AppointmentIdReq>,
) -> ApiResult<MessageRes> {
    let appointment_id = parse_id(&req.appointment_id)?;
    state.appointments.complete(doctor_id, appointment_id)?;
    Ok(Json(MessageRes::ok("Appointment Completed")))
}

#[utoipa::path(
    post,
    path = "/api/doctor/cancel-appointment",
    params(("dtoken" = String, Header, description = "Doctor id")),
    request_body = AppointmentIdReq,
    responses((status = 200, description = "Outcome", body = MessageRes))
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    DoctorAuth(doctor_id): DoctorAuth,
    JsonBody(req): JsonBody<AppointmentIdReq>,
) -> ApiResult<MessageRes> {
    let appointment_id = parse_id(&req.appointment_id)?;
    state.appointments.cancel_by_doctor(doctor_id, appointment_id)?;
    Ok(Json(MessageRes::ok("Appointment Cancelled")))
}

#[utoipa::path(
    post,
    path = "/api/doctor/add-prescription",
    params(("dtoken" = String, Header, description = "Doctor id")),
    request_body(content = AddPrescriptionForm, content_type = "multipart/form-data"),
    responses((status = 200, description = "Outcome", body = MessageRes))
)]
/// Adds a prescription from a multipart form.
///
/// Unknown form fields are ignored. A blank `prescriptionType` counts as not given.
pub async fn add_prescription(
    State(state): State<AppState>,
    DoctorAuth(doctor_id): DoctorAuth,
    Form(mut multipart): Form,
) -> ApiResult<MessageRes> {
    let mut appointment_id = None;
    let mut prescription_text = None;
    let mut prescription_type = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "appointmentId" => appointment_id = Some(field_text(field).await?),
            "prescriptionText" => prescription_text = Some(field_text(field).await?),
            "prescriptionType" => {
                let raw = field_text(field).await?;
                if !raw.trim().is_empty() {
                    prescription_type = Some(raw.parse::<PrescriptionType>()?);
                }
            }
            "prescriptionFile" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                if !bytes.is_empty() {
                    file = Some(UploadedFile {
                        filename,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => tracing::debug!("ignoring form field {}", other),
        }
    }

    let appointment_id = appointment_id
        .ok_or_else(|| ApiError::BadRequest("appointmentId is required".into()))?;
    let appointment_id = parse_id(&appointment_id)?;

    state
        .prescriptions
        .add_prescription(
            doctor_id,
            AddPrescription {
                appointment_id,
                prescription_text,
                prescription_type,
                file,
            },
        )
        .await?;

    Ok(Json(MessageRes::ok("Prescription added successfully")))
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

#[utoipa::path(
    get,
    path = "/api/doctor/prescriptions",
    params(("dtoken" = String, Header, description = "Doctor id")),
    responses((status = 200, description = "The doctor's prescriptions", body = PrescriptionsRes))
)]
pub async fn prescriptions(
    State(state): State<AppState>,
    DoctorAuth(doctor_id): DoctorAuth,
) -> ApiResult<PrescriptionsRes> {
    let prescriptions = state.prescriptions.doctor_prescriptions(doctor_id)?;
    Ok(Json(PrescriptionsRes {
        success: true,
        prescriptions: prescriptions.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/doctor/patient-prescriptions/{patientId}",
    params(
        ("dtoken" = String, Header, description = "Doctor id"),
        ("patientId" = String, Path, description = "Patient id")
    ),
    responses((status = 200, description = "The patient's prescriptions", body = PrescriptionsRes))
)]
pub async fn patient_prescriptions(
    State(state): State<AppState>,
    DoctorAuth(_doctor_id): DoctorAuth,
    Path(patient_id): Path<String>,
) -> ApiResult<PrescriptionsRes> {
    let patient_id = parse_id(&patient_id)?;
    let prescriptions = state.prescriptions.patient_prescriptions(patient_id)?;
    Ok(Json(PrescriptionsRes {
        success: true,
        prescriptions: prescriptions.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/doctor/prescription/{prescriptionId}",
    params(
        ("dtoken" = String, Header, description = "Doctor id"),
        ("prescriptionId" = String, Path, description = "Prescription id")
    ),
    responses((status = 200, description = "One prescription", body = PrescriptionRes))
)]
pub async fn prescription(
    State(state): State<AppState>,
    DoctorAuth(_doctor_id): DoctorAuth,
    Path(prescription_id): Path<String>,
) -> ApiResult<PrescriptionRes> {
    let prescription_id = parse_id(&prescription_id)?;
    let prescription = state.prescriptions.get_prescription(prescription_id)?;
    Ok(Json(PrescriptionRes {
        success: true,
        prescription: prescription.into(),
    }))
}
