//! `/api/user` handlers.

use axum::extract::State;
use axum::response::Json;
use carebook_core::services::NewPatient;
use chrono::NaiveDate;

use crate::auth::PatientAuth;
use crate::dto::{
    AppointmentIdReq, AppointmentRes, AppointmentsRes, BookAppointmentReq, MessageRes,
    PaymentCallbackReq, PrescriptionsRes, RegisterReq, RegisterRes,
};
use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::{parse_id, AppState};

#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterReq,
    responses((status = 200, description = "Registered; token is the patient id", body = RegisterRes))
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterReq>,
) -> ApiResult<RegisterRes> {
    let dob = match req.dob.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ApiError::BadRequest(format!("dob must be YYYY-MM-DD, got '{}'", raw)))?,
        ),
        None => None,
    };

    let patient = state.directory.add_patient(NewPatient {
        name: req.name,
        email: req.email,
        phone: req.phone,
        gender: req.gender,
        dob,
    })?;

    Ok(Json(RegisterRes {
        success: true,
        message: "Registered".into(),
        token: patient.id.to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/user/book-appointment",
    params(("token" = String, Header, description = "Patient id")),
    request_body = BookAppointmentReq,
    responses((status = 200, description = "Booked appointment", body = AppointmentRes))
)]
pub async fn book_appointment(
    State(state): State<AppState>,
    PatientAuth(patient_id): PatientAuth,
    JsonBody(req): JsonBody<BookAppointmentReq>,
) -> ApiResult<AppointmentRes> {
    let doctor_id = parse_id(&req.doc_id)?;
    let appointment =
        state
            .appointments
            .book(patient_id, doctor_id, &req.slot_date, &req.slot_time)?;

    Ok(Json(AppointmentRes {
        success: true,
        message: "Appointment Booked".into(),
        appointment: appointment.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/user/appointments",
    params(("token" = String, Header, description = "Patient id")),
    responses((status = 200, description = "The patient's appointments", body = AppointmentsRes))
)]
pub async fn appointments(
    State(state): State<AppState>,
    PatientAuth(patient_id): PatientAuth,
) -> ApiResult<AppointmentsRes> {
    let appointments = state.appointments.list_for_patient(patient_id)?;
    Ok(Json(AppointmentsRes {
        success: true,
        appointments: appointments.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/user/cancel-appointment",
    params(("token" = String, Header, description = "Patient id")),
    request_body = AppointmentIdReq,
    responses((status = 200, description = "Outcome", body = MessageRes))
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    PatientAuth(patient_id): PatientAuth,
    JsonBody(req): JsonBody<AppointmentIdReq>,
) -> ApiResult<MessageRes> {
    let appointment_id = parse_id(&req.appointment_id)?;
    state
        .appointments
        .cancel_by_patient(patient_id, appointment_id)?;
    Ok(Json(MessageRes::ok("Appointment Cancelled")))
}

#[utoipa::path(
    post,
    path = "/api/user/payment-callback",
    params(("token" = String, Header, description = "Patient id")),
    request_body = PaymentCallbackReq,
    responses((status = 200, description = "Outcome", body = MessageRes))
)]
/// Payment gateway result for an appointment.
///
/// An unpaid result is reported with `success: false` and leaves the appointment unchanged.
pub async fn payment_callback(
    State(state): State<AppState>,
    PatientAuth(patient_id): PatientAuth,
    JsonBody(req): JsonBody<PaymentCallbackReq>,
) -> ApiResult<MessageRes> {
    let appointment_id = parse_id(&req.appointment_id)?;
    let appointment = state
        .appointments
        .confirm_payment(patient_id, appointment_id, req.paid)?;

    if appointment.payment {
        Ok(Json(MessageRes::ok("Payment Successful")))
    } else {
        Ok(Json(MessageRes {
            success: false,
            message: "Payment Failed".into(),
        }))
    }
}

#[utoipa::path(
    get,
    path = "/api/user/prescriptions",
    params(("token" = String, Header, description = "Patient id")),
    responses((status = 200, description = "The patient's prescriptions", body = PrescriptionsRes))
)]
pub async fn prescriptions(
    State(state): State<AppState>,
    PatientAuth(patient_id): PatientAuth,
) -> ApiResult<PrescriptionsRes> {
    let prescriptions = state.prescriptions.patient_prescriptions(patient_id)?;
    Ok(Json(PrescriptionsRes {
        success: true,
        prescriptions: prescriptions.into_iter().map(Into::into).collect(),
    }))
}
