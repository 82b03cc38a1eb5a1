use crate::constants::APPOINTMENTS_COLLECTION;
use crate::models::{DoctorSnapshot, PatientSnapshot};
use crate::store::Document;
use carebook_uuid::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A patient–doctor booking.
///
/// `payment`, `cancelled` and `is_completed` are independent flags. Nothing stops a
/// cancelled appointment from also being marked completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    pub user_id: RecordId,
    pub doc_id: RecordId,
    /// `D_M_YYYY`, e.g. `15_6_2025`.
    pub slot_date: String,
    /// Free-form time label, e.g. `10:30 AM`.
    pub slot_time: String,
    pub user_data: PatientSnapshot,
    pub doc_data: DoctorSnapshot,
    pub amount: u32,
    /// When the booking was made.
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub payment: bool,
    #[serde(default)]
    pub is_completed: bool,
}

impl Document for Appointment {
    const COLLECTION: &'static str = APPOINTMENTS_COLLECTION;

    fn id(&self) -> RecordId {
        self.id
    }
}
