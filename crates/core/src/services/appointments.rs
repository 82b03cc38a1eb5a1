//! Booking lifecycle: book, complete, cancel and mark paid.
//!
//! Ownership is checked on every state change. A doctor may only complete or cancel their own
//! appointments and a patient may only cancel their own.

use crate::models::{Appointment, Doctor, DoctorSnapshot, Patient, PatientSnapshot};
use crate::store::DocumentStore;
use crate::validation::{validate_slot_date, validate_slot_time};
use crate::{CareError, CareResult, CoreConfig};
use carebook_uuid::RecordId;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

/// How many recent appointments a dashboard shows.
pub const DASHBOARD_LATEST: usize = 5;

/// Summary of a doctor's practice.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorDashboard {
    /// Every appointment booked with the doctor, cancelled ones included.
    pub appointments: usize,
    /// Sum of fees over appointments that are paid or completed.
    pub earnings: u64,
    /// Distinct patients who have booked.
    pub patients: usize,
    /// Most recently booked first, at most [`DASHBOARD_LATEST`].
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Clone, Debug)]
pub struct AppointmentService {
    store: DocumentStore,
}

impl AppointmentService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            store: DocumentStore::new(cfg.data_dir()),
        }
    }

    /// Books a slot for a patient.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a malformed slot date or time
    /// - `PatientNotFound` / `DoctorNotFound`
    /// - `DoctorUnavailable` if the doctor is not taking bookings
    /// - `SlotUnavailable` if a non-cancelled appointment already holds the slot
    pub fn book(
        &self,
        patient_id: RecordId,
        doctor_id: RecordId,
        slot_date: &str,
        slot_time: &str,
    ) -> CareResult<Appointment> {
        let date = validate_slot_date(slot_date)?;
        let time = validate_slot_time(slot_time)?;
        let slot_date = slot_date.trim();
        let slot_time = slot_time.trim();

        let patient: Patient = self
            .store
            .get(patient_id)?
            .ok_or(CareError::PatientNotFound)?;
        let doctor: Doctor = self
            .store
            .get(doctor_id)?
            .ok_or(CareError::DoctorNotFound)?;

        if !doctor.available {
            return Err(CareError::DoctorUnavailable);
        }

        // Slots are compared as parsed values so `15_06_2025 10:30 am` and
        // `15_6_2025 10:30 AM` collide.
        let taken = self.store.list(|a: &Appointment| {
            a.doc_id == doctor_id
                && !a.cancelled
                && validate_slot_date(&a.slot_date).is_ok_and(|d| d == date)
                && validate_slot_time(&a.slot_time).is_ok_and(|t| t == time)
        })?;
        if !taken.is_empty() {
            return Err(CareError::SlotUnavailable);
        }

        let appointment = Appointment {
            id: RecordId::new(),
            user_id: patient.id,
            doc_id: doctor.id,
            slot_date: slot_date.to_string(),
            slot_time: slot_time.to_string(),
            user_data: PatientSnapshot::from(&patient),
            doc_data: DoctorSnapshot::from(&doctor),
            amount: doctor.fees,
            date: Utc::now(),
            cancelled: false,
            payment: false,
            is_completed: false,
        };
        self.store.insert(&appointment)?;

        tracing::info!(
            "booked appointment {} with doctor {} on {} at {}",
            appointment.id,
            doctor.id,
            appointment.slot_date,
            appointment.slot_time
        );
        Ok(appointment)
    }

    /// Appointments for a doctor, most recently booked first.
    pub fn list_for_doctor(&self, doctor_id: RecordId) -> CareResult<Vec<Appointment>> {
        let mut appointments = self.store.list(|a: &Appointment| a.doc_id == doctor_id)?;
        appointments.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(appointments)
    }

    /// Appointments for a patient, most recently booked first.
    pub fn list_for_patient(&self, patient_id: RecordId) -> CareResult<Vec<Appointment>> {
        let mut appointments = self.store.list(|a: &Appointment| a.user_id == patient_id)?;
        appointments.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(appointments)
    }

    pub fn dashboard(&self, doctor_id: RecordId) -> CareResult<DoctorDashboard> {
        let mut appointments = self.list_for_doctor(doctor_id)?;

        let earnings = appointments
            .iter()
            .filter(|a| a.is_completed || a.payment)
            .map(|a| u64::from(a.amount))
            .sum();
        let patients = appointments
            .iter()
            .map(|a| a.user_id)
            .collect::<HashSet<_>>()
            .len();
        let count = appointments.len();
        appointments.truncate(DASHBOARD_LATEST);

        Ok(DoctorDashboard {
            appointments: count,
            earnings,
            patients,
            latest_appointments: appointments,
        })
    }

    /// Marks an appointment completed.
    ///
    /// Returns `MarkFailed` if the appointment is missing or belongs to another doctor.
    pub fn complete(&self, doctor_id: RecordId, appointment_id: RecordId) -> CareResult<()> {
        let appointment: Appointment = self
            .store
            .get(appointment_id)?
            .ok_or(CareError::MarkFailed)?;
        if appointment.doc_id != doctor_id {
            return Err(CareError::MarkFailed);
        }

        self.store
            .update(appointment_id, CareError::MarkFailed, |a: &mut Appointment| {
                a.is_completed = true
            })?;
        tracing::info!("appointment {} completed", appointment_id);
        Ok(())
    }

    /// Cancels an appointment on the doctor's side.
    ///
    /// Returns `CancellationFailed` if the appointment is missing or belongs to another
    /// doctor.
    pub fn cancel_by_doctor(
        &self,
        doctor_id: RecordId,
        appointment_id: RecordId,
    ) -> CareResult<()> {
        let appointment: Appointment = self
            .store
            .get(appointment_id)?
            .ok_or(CareError::CancellationFailed)?;
        if appointment.doc_id != doctor_id {
            return Err(CareError::CancellationFailed);
        }

        self.mark_cancelled(appointment_id)
    }

    /// Cancels an appointment on the patient's side.
    pub fn cancel_by_patient(
        &self,
        patient_id: RecordId,
        appointment_id: RecordId,
    ) -> CareResult<()> {
        let appointment: Appointment = self
            .store
            .get(appointment_id)?
            .ok_or(CareError::AppointmentNotFound)?;
        if appointment.user_id != patient_id {
            return Err(CareError::Unauthorized);
        }

        self.mark_cancelled(appointment_id)
    }

    /// Records the outcome of a payment made by the patient who booked the appointment.
    ///
    /// An unpaid outcome leaves the appointment untouched. Returns the appointment as
    /// stored afterwards, or `Unauthorized` for another patient's appointment.
    pub fn confirm_payment(
        &self,
        patient_id: RecordId,
        appointment_id: RecordId,
        paid: bool,
    ) -> CareResult<Appointment> {
        let appointment: Appointment = self
            .store
            .get(appointment_id)?
            .ok_or(CareError::AppointmentNotFound)?;
        if appointment.user_id != patient_id {
            return Err(CareError::Unauthorized);
        }
        if appointment.cancelled {
            return Err(CareError::AppointmentCancelled);
        }
        if !paid {
            tracing::warn!("payment for appointment {} was not completed", appointment_id);
            return Ok(appointment);
        }

        let appointment = self.store.update(
            appointment_id,
            CareError::AppointmentNotFound,
            |a: &mut Appointment| a.payment = true,
        )?;
        tracing::info!("appointment {} paid", appointment_id);
        Ok(appointment)
    }

    fn mark_cancelled(&self, appointment_id: RecordId) -> CareResult<()> {
        self.store.update(
            appointment_id,
            CareError::AppointmentNotFound,
            |a: &mut Appointment| a.cancelled = true,
        )?;
        tracing::info!("appointment {} cancelled", appointment_id);
        Ok(())
    }
}
