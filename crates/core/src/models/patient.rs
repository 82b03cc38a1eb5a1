use crate::constants::PATIENTS_COLLECTION;
use crate::store::Document;
use carebook_types::{EmailAddress, NonEmptyText};
use carebook_uuid::RecordId;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: RecordId,
    pub name: NonEmptyText,
    pub email: EmailAddress,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
}

impl Document for Patient {
    const COLLECTION: &'static str = PATIENTS_COLLECTION;

    fn id(&self) -> RecordId {
        self.id
    }
}

impl Patient {
    /// Age in whole years on `today`, or `None` without a date of birth (or if `today`
    /// precedes it).
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let dob = self.dob?;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }

    /// Splits the stored name into first name and the rest, the way the prescription form
    /// pre-fills its fields.
    pub fn first_and_last_name(&self) -> (String, String) {
        let mut parts = self.name.as_str().split(' ');
        let first = parts.next().unwrap_or_default().to_string();
        let last = parts.collect::<Vec<_>>().join(" ");
        (first, last)
    }
}

/// Patient fields copied into appointments and prescriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
}

impl From<&Patient> for PatientSnapshot {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.to_string(),
            email: patient.email.to_string(),
            phone: patient.phone.clone(),
            gender: patient.gender.clone(),
            dob: patient.dob,
        }
    }
}
