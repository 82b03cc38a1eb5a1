//! Doctor and patient records.

use crate::models::{Doctor, Patient};
use crate::store::DocumentStore;
use crate::{CareError, CareResult, CoreConfig};
use carebook_types::{EmailAddress, NonEmptyText};
use carebook_uuid::RecordId;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

/// Input for [`DirectoryService::add_doctor`].
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: u32,
}

/// Input for [`DirectoryService::add_patient`].
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
}

/// Profile fields a doctor may edit. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct DoctorProfileUpdate {
    pub name: Option<String>,
    pub speciality: Option<String>,
    pub degree: Option<String>,
    pub experience: Option<String>,
    pub about: Option<String>,
    pub fees: Option<u32>,
    pub available: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct DirectoryService {
    store: DocumentStore,
}

impl DirectoryService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            store: DocumentStore::new(cfg.data_dir()),
        }
    }

    /// Adds a doctor. New doctors are available for booking.
    ///
    /// # Errors
    ///
    /// Returns `CareError::Text` for a blank name or malformed email, and
    /// `CareError::AlreadyRegistered` if another doctor uses the same email.
    pub fn add_doctor(&self, input: NewDoctor) -> CareResult<Doctor> {
        let name = NonEmptyText::new(&input.name)?;
        let email = EmailAddress::parse(&input.email)?;

        if !self.store.list(|d: &Doctor| d.email == email)?.is_empty() {
            return Err(CareError::AlreadyRegistered(email.to_string()));
        }

        let doctor = Doctor {
            id: RecordId::new(),
            name,
            email,
            speciality: input.speciality.trim().to_string(),
            degree: input.degree.trim().to_string(),
            experience: input.experience.trim().to_string(),
            about: input.about.trim().to_string(),
            fees: input.fees,
            available: true,
            date: Utc::now(),
        };
        self.store.insert(&doctor)?;

        tracing::info!("added doctor {} ({})", doctor.id, doctor.name);
        Ok(doctor)
    }

    /// All doctors, ordered by name.
    pub fn list_doctors(&self) -> CareResult<Vec<Doctor>> {
        let mut doctors: Vec<Doctor> = self.store.list(|_| true)?;
        doctors.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(doctors)
    }

    pub fn get_doctor(&self, doctor_id: RecordId) -> CareResult<Doctor> {
        self.store
            .get(doctor_id)?
            .ok_or(CareError::DoctorNotFound)
    }

    /// Flips whether the doctor accepts new bookings and returns the updated record.
    pub fn change_availability(&self, doctor_id: RecordId) -> CareResult<Doctor> {
        let doctor = self
            .store
            .update(doctor_id, CareError::DoctorNotFound, |d: &mut Doctor| {
                d.available = !d.available
            })?;
        tracing::info!(
            "doctor {} availability set to {}",
            doctor.id,
            doctor.available
        );
        Ok(doctor)
    }

    /// Applies a doctor's own profile edits and returns the stored record.
    ///
    /// Snapshots already copied into appointments and prescriptions keep the old values.
    ///
    /// # Errors
    ///
    /// Returns `CareError::Text` for a blank name and `DoctorNotFound` for an unknown id.
    pub fn update_doctor_profile(
        &self,
        doctor_id: RecordId,
        update: DoctorProfileUpdate,
    ) -> CareResult<Doctor> {
        let name = update.name.as_deref().map(NonEmptyText::new).transpose()?;
        let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string());
        let speciality = trimmed(update.speciality);
        let degree = trimmed(update.degree);
        let experience = trimmed(update.experience);
        let about = trimmed(update.about);

        let doctor = self
            .store
            .update(doctor_id, CareError::DoctorNotFound, |d: &mut Doctor| {
                if let Some(name) = name {
                    d.name = name;
                }
                if let Some(speciality) = speciality {
                    d.speciality = speciality;
                }
                if let Some(degree) = degree {
                    d.degree = degree;
                }
                if let Some(experience) = experience {
                    d.experience = experience;
                }
                if let Some(about) = about {
                    d.about = about;
                }
                if let Some(fees) = update.fees {
                    d.fees = fees;
                }
                if let Some(available) = update.available {
                    d.available = available;
                }
            })?;

        tracing::info!("doctor {} updated their profile", doctor.id);
        Ok(doctor)
    }

    /// Registers a patient.
    ///
    /// # Errors
    ///
    /// Same validation as [`add_doctor`](Self::add_doctor), checked against patients.
    pub fn add_patient(&self, input: NewPatient) -> CareResult<Patient> {
        let name = NonEmptyText::new(&input.name)?;
        let email = EmailAddress::parse(&input.email)?;

        if !self.store.list(|p: &Patient| p.email == email)?.is_empty() {
            return Err(CareError::AlreadyRegistered(email.to_string()));
        }

        let blank_to_none = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        let patient = Patient {
            id: RecordId::new(),
            name,
            email,
            phone: blank_to_none(input.phone),
            gender: blank_to_none(input.gender),
            dob: input.dob,
        };
        self.store.insert(&patient)?;

        tracing::info!("registered patient {}", patient.id);
        Ok(patient)
    }

    pub fn get_patient(&self, patient_id: RecordId) -> CareResult<Patient> {
        self.store
            .get(patient_id)?
            .ok_or(CareError::PatientNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::DoctorProfileUpdate;
    use crate::services::fixtures::{clinic, new_doctor, new_patient};
    use crate::CareError;
    use carebook_types::TextError;
    use carebook_uuid::RecordId;

    #[test]
    fn add_doctor_then_list_sorted() {
        let c = clinic();
        c.directory
            .add_doctor(new_doctor("Zara Khan", "zara@example.com"))
            .unwrap();
        c.directory
            .add_doctor(new_doctor("Amit Patel", "amit@example.com"))
            .unwrap();

        let names: Vec<String> = c
            .directory
            .list_doctors()
            .unwrap()
            .into_iter()
            .map(|d| d.name.into_inner())
            .collect();
        assert_eq!(names, vec!["Amit Patel", "Zara Khan"]);
    }

    #[test]
    fn add_doctor_rejects_duplicate_email() {
        let c = clinic();
        c.directory
            .add_doctor(new_doctor("Amit Patel", "amit@example.com"))
            .unwrap();
        let err = c
            .directory
            .add_doctor(new_doctor("Someone Else", "AMIT@example.com"))
            .unwrap_err();
        assert!(matches!(err, CareError::AlreadyRegistered(_)));
    }

    #[test]
    fn add_doctor_validates_name_and_email() {
        let c = clinic();
        let err = c
            .directory
            .add_doctor(new_doctor("  ", "blank@example.com"))
            .unwrap_err();
        assert!(matches!(err, CareError::Text(TextError::Empty)));

        let err = c
            .directory
            .add_doctor(new_doctor("Amit Patel", "not-an-email"))
            .unwrap_err();
        assert!(matches!(err, CareError::Text(TextError::InvalidEmail(_))));
    }

    #[test]
    fn change_availability_toggles() {
        let c = clinic();
        let doctor = c
            .directory
            .add_doctor(new_doctor("Amit Patel", "amit@example.com"))
            .unwrap();
        assert!(doctor.available);

        let doctor = c.directory.change_availability(doctor.id).unwrap();
        assert!(!doctor.available);
        assert!(!c.directory.get_doctor(doctor.id).unwrap().available);

        let err = c.directory.change_availability(RecordId::new()).unwrap_err();
        assert!(matches!(err, CareError::DoctorNotFound));
    }

    #[test]
    fn add_patient_drops_blank_optionals() {
        let c = clinic();
        let mut input = new_patient("Ann Lee", "ann@example.com");
        input.phone = Some("   ".into());

        let patient = c.directory.add_patient(input).unwrap();
        assert_eq!(patient.phone, None);
        assert_eq!(patient.gender.as_deref(), Some("Female"));
        assert_eq!(c.directory.get_patient(patient.id).unwrap(), patient);
    }

    #[test]
    fn get_missing_records() {
        let c = clinic();
        assert!(matches!(
            c.directory.get_doctor(RecordId::new()),
            Err(CareError::DoctorNotFound)
        ));
        assert!(matches!(
            c.directory.get_patient(RecordId::new()),
            Err(CareError::PatientNotFound)
        ));
    }

    #[test]
    fn update_doctor_profile_changes_only_given_fields() {
        let c = clinic();
        let doctor = c
            .directory
            .add_doctor(new_doctor("Amit Patel", "amit@example.com"))
            .unwrap();

        let updated = c
            .directory
            .update_doctor_profile(
                doctor.id,
                DoctorProfileUpdate {
                    fees: Some(75),
                    available: Some(false),
                    about: Some("  Family medicine.  ".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.fees, 75);
        assert!(!updated.available);
        assert_eq!(updated.about, "Family medicine.");
        assert_eq!(updated.name, doctor.name);
        assert_eq!(updated.speciality, doctor.speciality);
        assert_eq!(c.directory.get_doctor(doctor.id).unwrap(), updated);
    }

    #[test]
    fn update_doctor_profile_rejects_blank_name_and_unknown_doctor() {
        let c = clinic();
        let doctor = c
            .directory
            .add_doctor(new_doctor("Amit Patel", "amit@example.com"))
            .unwrap();

        let err = c
            .directory
            .update_doctor_profile(
                doctor.id,
                DoctorProfileUpdate {
                    name: Some(" ".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CareError::Text(TextError::Empty)));
        assert_eq!(c.directory.get_doctor(doctor.id).unwrap().name, doctor.name);

        let err = c
            .directory
            .update_doctor_profile(RecordId::new(), DoctorProfileUpdate::default())
            .unwrap_err();
        assert!(matches!(err, CareError::DoctorNotFound));
    }
}
