//! Prescriptions and their link to appointments.
//!
//! Adding a prescription performs up to four independent writes with no transaction between
//! them: the uploaded file, the generated PDF, the prescription record and the appointment's
//! completion flag. A failure part-way leaves the earlier writes in place.

use crate::models::{
    Appointment, Doctor, DoctorSnapshot, Patient, PatientSnapshot, Prescription, PrescriptionType,
};
use crate::pdf::{generate_prescription_pdf, PrescriptionPdfData};
use crate::prescription_text::parse_prescription_text;
use crate::store::DocumentStore;
use crate::{CareError, CareResult, CoreConfig};
use carebook_files::UploadsService;
use carebook_uuid::RecordId;
use chrono::Utc;
use std::sync::Arc;

/// A file attached to a prescription submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Input for [`PrescriptionService::add_prescription`].
#[derive(Debug, Clone)]
pub struct AddPrescription {
    pub appointment_id: RecordId,
    pub prescription_text: Option<String>,
    pub prescription_type: Option<PrescriptionType>,
    pub file: Option<UploadedFile>,
}

#[derive(Clone, Debug)]
pub struct PrescriptionService {
    store: DocumentStore,
    uploads: UploadsService,
}

impl PrescriptionService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            store: DocumentStore::new(cfg.data_dir()),
            uploads: UploadsService::new(cfg.uploads_dir()),
        }
    }

    /// Records a prescription for one of the doctor's appointments and marks the appointment
    /// completed.
    ///
    /// The stored type is the requested type, else `file` when a file was uploaded, else
    /// `text`; text together with a file is always `both`. When the requested type is `text`
    /// or `both` and the text is non-empty, a PDF is rendered from it. A rendered PDF
    /// replaces the upload as `prescription_file` and sets the type to `both`. Rendering
    /// errors are logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// - `AppointmentNotFound` if the appointment does not exist
    /// - `Unauthorized` if it belongs to another doctor
    /// - `DoctorNotFound` / `PatientNotFound` if either party has gone
    /// - `Files` if the upload is rejected or cannot be written
    pub async fn add_prescription(
        &self,
        doctor_id: RecordId,
        input: AddPrescription,
    ) -> CareResult<Prescription> {
        let appointment: Appointment = self
            .store
            .get(input.appointment_id)?
            .ok_or(CareError::AppointmentNotFound)?;
        if appointment.doc_id != doctor_id {
            return Err(CareError::Unauthorized);
        }

        let doctor: Doctor = self
            .store
            .get(doctor_id)?
            .ok_or(CareError::DoctorNotFound)?;
        let patient: Patient = self
            .store
            .get(appointment.user_id)?
            .ok_or(CareError::PatientNotFound)?;

        let text = input.prescription_text.unwrap_or_default();
        let has_text = !text.is_empty();

        let upload = match input.file {
            Some(file) => Some(
                self.uploads
                    .store_upload(&file.filename, &file.content_type, file.bytes)
                    .await?,
            ),
            None => None,
        };
        let attachment = upload.map(|meta| meta.public_path.into_inner());

        let mut prescription_type = input.prescription_type.unwrap_or(if attachment.is_some() {
            PrescriptionType::File
        } else {
            PrescriptionType::Text
        });
        if has_text && attachment.is_some() {
            prescription_type = PrescriptionType::Both;
        }
        let mut prescription_file = attachment.clone();

        let wants_pdf = matches!(
            input.prescription_type,
            Some(PrescriptionType::Text | PrescriptionType::Both)
        );
        if has_text && wants_pdf {
            let parsed = parse_prescription_text(&text);
            let data = PrescriptionPdfData {
                doctor_name: doctor.name.to_string(),
                doctor_speciality: doctor.speciality.clone(),
                patient_name: patient.name.to_string(),
                patient_age: parsed.age,
                treatment: parsed.treatment,
                prescription_text: text.clone(),
                date: Utc::now(),
            };

            match generate_prescription_pdf(&self.uploads, &data).await {
                Ok(path) => {
                    prescription_file = Some(path);
                    prescription_type = PrescriptionType::Both;
                }
                Err(e) => {
                    tracing::error!(
                        "PDF generation failed for appointment {}: {}",
                        appointment.id,
                        e
                    );
                }
            }
        }

        let prescription = Prescription {
            id: RecordId::new(),
            appointment_id: appointment.id,
            doctor_id,
            patient_id: appointment.user_id,
            prescription_text: text,
            prescription_file,
            attachment,
            prescription_type,
            created_at: Utc::now(),
            doctor_data: DoctorSnapshot::from(&doctor),
            patient_data: PatientSnapshot::from(&patient),
        };
        self.store.insert(&prescription)?;
        tracing::info!(
            "prescription {} ({}) added for appointment {}",
            prescription.id,
            prescription.prescription_type,
            appointment.id
        );

        if !appointment.is_completed {
            self.store.update(
                appointment.id,
                CareError::AppointmentNotFound,
                |a: &mut Appointment| a.is_completed = true,
            )?;
        }

        Ok(prescription)
    }

    /// Prescriptions issued by a doctor, newest first.
    ///
    /// Matches on the doctor id or on the doctor's name as recorded in the prescription, so
    /// another doctor with the same name sees these records too.
    pub fn doctor_prescriptions(&self, doctor_id: RecordId) -> CareResult<Vec<Prescription>> {
        let doctor: Doctor = self
            .store
            .get(doctor_id)?
            .ok_or(CareError::DoctorNotFound)?;
        let name = doctor.name.as_str();

        let mut prescriptions = self.store.list(|p: &Prescription| {
            p.doctor_id == doctor_id || p.doctor_data.name == name
        })?;
        prescriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        tracing::debug!(
            "found {} prescriptions for doctor {}",
            prescriptions.len(),
            doctor_id
        );
        Ok(prescriptions)
    }

    /// Prescriptions issued to a patient, newest first.
    pub fn patient_prescriptions(&self, patient_id: RecordId) -> CareResult<Vec<Prescription>> {
        let mut prescriptions = self
            .store
            .list(|p: &Prescription| p.patient_id == patient_id)?;
        prescriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(prescriptions)
    }

    pub fn get_prescription(&self, prescription_id: RecordId) -> CareResult<Prescription> {
        self.store
            .get(prescription_id)?
            .ok_or(CareError::PrescriptionNotFound)
    }
}
