//! Wire types.
//!
//! Field names are camelCase and record ids are serialised as `_id`, matching what the web
//! client already reads.

use carebook_core::models::{
    Appointment, Doctor, DoctorSnapshot, PatientSnapshot, Prescription,
};
use carebook_core::services::{DoctorDashboard, DoctorProfileUpdate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// ENVELOPES
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub success: bool,
    pub message: String,
}

impl MessageRes {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DoctorsRes {
    pub success: bool,
    pub doctors: Vec<DoctorDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DoctorRes {
    pub success: bool,
    pub message: String,
    pub doctor: DoctorDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentsRes {
    pub success: bool,
    pub appointments: Vec<AppointmentDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentRes {
    pub success: bool,
    pub message: String,
    pub appointment: AppointmentDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionsRes {
    pub success: bool,
    pub prescriptions: Vec<PrescriptionDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionRes {
    pub success: bool,
    pub prescription: PrescriptionDto,
}

/// `token` is the patient id to send back in the `token` header.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRes {
    pub success: bool,
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRes {
    pub success: bool,
    pub profile_data: DoctorDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRes {
    pub success: bool,
    pub dash_data: DashboardDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotFoundRes {
    pub error: String,
}

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentIdReq {
    pub appointment_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub dob: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentReq {
    pub doc_id: String,
    /// `D_M_YYYY`.
    pub slot_date: String,
    pub slot_time: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallbackReq {
    pub appointment_id: String,
    pub paid: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddDoctorReq {
    pub name: String,
    pub email: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAvailabilityReq {
    pub doc_id: String,
}

/// Omitted fields keep their stored value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileReq {
    pub name: Option<String>,
    pub speciality: Option<String>,
    pub degree: Option<String>,
    pub experience: Option<String>,
    pub about: Option<String>,
    pub fees: Option<u32>,
    pub available: Option<bool>,
}

impl From<UpdateProfileReq> for DoctorProfileUpdate {
    fn from(req: UpdateProfileReq) -> Self {
        Self {
            name: req.name,
            speciality: req.speciality,
            degree: req.degree,
            experience: req.experience,
            about: req.about,
            fees: req.fees,
            available: req.available,
        }
    }
}

/// Multipart form for `POST /api/doctor/add-prescription`. Documentation only; the handler
/// reads the fields one by one.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPrescriptionForm {
    pub appointment_id: String,
    pub prescription_text: Option<String>,
    /// `text`, `file` or `both`.
    pub prescription_type: Option<String>,
    /// JPEG, PNG or PDF, up to 10 MiB.
    #[schema(value_type = Option<String>, format = Binary)]
    pub prescription_file: Option<Vec<u8>>,
}

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: u32,
    pub available: bool,
    /// Unix milliseconds.
    pub date: i64,
}

impl From<Doctor> for DoctorDto {
    fn from(d: Doctor) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.into_inner(),
            email: d.email.to_string(),
            speciality: d.speciality,
            degree: d.degree,
            experience: d.experience,
            about: d.about,
            fees: d.fees,
            available: d.available,
            date: d.date.timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSnapshotDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub speciality: String,
    pub degree: String,
    pub fees: u32,
}

impl From<DoctorSnapshot> for DoctorSnapshotDto {
    fn from(d: DoctorSnapshot) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name,
            email: d.email,
            speciality: d.speciality,
            degree: d.degree,
            fees: d.fees,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientSnapshotDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    /// `YYYY-MM-DD`.
    pub dob: Option<String>,
}

impl From<PatientSnapshot> for PatientSnapshotDto {
    fn from(p: PatientSnapshot) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name,
            email: p.email,
            phone: p.phone,
            gender: p.gender,
            dob: p.dob.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub doc_id: String,
    pub slot_date: String,
    pub slot_time: String,
    pub user_data: PatientSnapshotDto,
    pub doc_data: DoctorSnapshotDto,
    pub amount: u32,
    /// Unix milliseconds.
    pub date: i64,
    pub cancelled: bool,
    pub payment: bool,
    pub is_completed: bool,
}

impl From<Appointment> for AppointmentDto {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id.to_string(),
            user_id: a.user_id.to_string(),
            doc_id: a.doc_id.to_string(),
            slot_date: a.slot_date,
            slot_time: a.slot_time,
            user_data: a.user_data.into(),
            doc_data: a.doc_data.into(),
            amount: a.amount,
            date: a.date.timestamp_millis(),
            cancelled: a.cancelled,
            payment: a.payment,
            is_completed: a.is_completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub appointments: usize,
    pub earnings: u64,
    pub patients: usize,
    pub latest_appointments: Vec<AppointmentDto>,
}

impl From<DoctorDashboard> for DashboardDto {
    fn from(d: DoctorDashboard) -> Self {
        Self {
            appointments: d.appointments,
            earnings: d.earnings,
            patients: d.patients,
            latest_appointments: d.latest_appointments.into_iter().map(Into::into).collect(),
        }
    }
}

/// `prescriptionFile` and `attachment` are empty strings when absent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub appointment_id: String,
    pub doctor_id: String,
    pub patient_id: String,
    pub prescription_text: String,
    pub prescription_file: String,
    pub attachment: String,
    /// `text`, `file` or `both`.
    pub prescription_type: String,
    /// RFC 3339.
    pub created_at: String,
    pub doctor_data: DoctorSnapshotDto,
    pub patient_data: PatientSnapshotDto,
}

impl From<Prescription> for PrescriptionDto {
    fn from(p: Prescription) -> Self {
        Self {
            id: p.id.to_string(),
            appointment_id: p.appointment_id.to_string(),
            doctor_id: p.doctor_id.to_string(),
            patient_id: p.patient_id.to_string(),
            prescription_text: p.prescription_text,
            prescription_file: p.prescription_file.unwrap_or_default(),
            attachment: p.attachment.unwrap_or_default(),
            prescription_type: p.prescription_type.to_string(),
            created_at: p.created_at.to_rfc3339(),
            doctor_data: p.doctor_data.into(),
            patient_data: p.patient_data.into(),
        }
    }
}
