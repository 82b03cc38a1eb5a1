//! # Carebook REST API
//!
//! HTTP surface for Carebook, built on axum.
//!
//! Handles:
//! - doctor, patient and admin endpoints under `/api`
//! - identity headers (`dtoken`, `token`, `x-api-key`)
//! - the `{success, message}` envelope returned with HTTP 200 for every outcome
//! - static serving of `/uploads` and the OpenAPI/Swagger documentation
//!
//! Business rules live in `carebook-core`.

#![warn(rust_2018_idioms)]

pub mod admin;
pub mod auth;
pub mod doctor;
pub mod dto;
pub mod error;
pub mod extract;
pub mod user;

#[cfg(test)]
mod tests;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use carebook_core::services::{AppointmentService, DirectoryService, PrescriptionService};
use carebook_core::{CareError, CoreConfig, RecordId};
use carebook_files::{MAX_UPLOAD_BYTES, UPLOADS_URL_PREFIX};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dto::{HealthRes, NotFoundRes};
use crate::error::ApiError;

/// Room for multipart framing and text fields on top of the file itself.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    directory: DirectoryService,
    appointments: AppointmentService,
    prescriptions: PrescriptionService,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            directory: DirectoryService::new(cfg.clone()),
            appointments: AppointmentService::new(cfg.clone()),
            prescriptions: PrescriptionService::new(cfg.clone()),
            cfg,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        doctor::list_doctors,
        doctor::appointments,
        doctor::profile,
        doctor::update_profile,
        doctor::dashboard,
        doctor::complete_appointment,
        doctor::cancel_appointment,
        doctor::add_prescription,
        doctor::prescriptions,
        doctor::patient_prescriptions,
        doctor::prescription,
        user::register,
        user::book_appointment,
        user::appointments,
        user::cancel_appointment,
        user::payment_callback,
        user::prescriptions,
        admin::add_doctor,
        admin::change_availability,
    ),
    components(schemas(
        dto::MessageRes,
        dto::HealthRes,
        dto::DoctorsRes,
        dto::DoctorRes,
        dto::AppointmentsRes,
        dto::AppointmentRes,
        dto::PrescriptionsRes,
        dto::PrescriptionRes,
        dto::RegisterRes,
        dto::ProfileRes,
        dto::DashboardRes,
        dto::NotFoundRes,
        dto::AppointmentIdReq,
        dto::RegisterReq,
        dto::BookAppointmentReq,
        dto::PaymentCallbackReq,
        dto::AddDoctorReq,
        dto::ChangeAvailabilityReq,
        dto::UpdateProfileReq,
        dto::AddPrescriptionForm,
        dto::DoctorDto,
        dto::DoctorSnapshotDto,
        dto::PatientSnapshotDto,
        dto::AppointmentDto,
        dto::DashboardDto,
        dto::PrescriptionDto,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let doctor_routes = Router::new()
        .route("/list", get(doctor::list_doctors))
        .route("/appointments", get(doctor::appointments))
        .route("/profile", get(doctor::profile))
        .route("/update-profile", post(doctor::update_profile))
        .route("/dashboard", get(doctor::dashboard))
        .route("/complete-appointment", post(doctor::complete_appointment))
        .route("/cancel-appointment", post(doctor::cancel_appointment))
        .route(
            "/add-prescription",
            post(doctor::add_prescription).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/prescriptions", get(doctor::prescriptions))
        .route(
            "/patient-prescriptions/:patient_id",
            get(doctor::patient_prescriptions),
        )
        .route("/prescription/:prescription_id", get(doctor::prescription));

    let user_routes = Router::new()
        .route("/register", post(user::register))
        .route("/book-appointment", post(user::book_appointment))
        .route("/appointments", get(user::appointments))
        .route("/cancel-appointment", post(user::cancel_appointment))
        .route("/payment-callback", post(user::payment_callback))
        .route("/prescriptions", get(user::prescriptions));

    let admin_routes = Router::new()
        .route("/add-doctor", post(admin::add_doctor))
        .route("/change-availability", post(admin::change_availability));

    let uploads = ServeDir::new(state.cfg.uploads_dir());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/doctor", doctor_routes)
        .nest("/api/user", user_routes)
        .nest("/api/admin", admin_routes)
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub(crate) fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    RecordId::parse(raw.trim()).map_err(|e| ApiError::Care(CareError::from(e)))
}

async fn root() -> &'static str {
    "API WORKING"
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health check response", body = HealthRes))
)]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Carebook REST API is alive".into(),
    })
}

async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<NotFoundRes>) {
    tracing::warn!("route not found: {} {}", method, uri);
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundRes {
            error: "Route not found".into(),
        }),
    )
}
