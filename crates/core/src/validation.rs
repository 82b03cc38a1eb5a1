//! Input validation utilities.
//!
//! Checks applied to booking input before anything is written.

use crate::{CareError, CareResult};
use chrono::{NaiveDate, NaiveTime};

/// Validates a slot date in `D_M_YYYY` form (leading zeros optional) and returns it.
///
/// # Errors
///
/// Returns `CareError::InvalidInput` if the value is not a real calendar date.
pub fn validate_slot_date(slot_date: &str) -> CareResult<NaiveDate> {
    let trimmed = slot_date.trim();
    let parts: Vec<&str> = trimmed.split('_').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(CareError::InvalidInput(format!(
            "slotDate must look like D_M_YYYY, got '{}'",
            slot_date
        )));
    };

    let parse = |v: &str| v.parse::<u32>().ok();
    match (parse(day), parse(month), year.parse::<i32>().ok()) {
        (Some(d), Some(m), Some(y)) if year.len() == 4 => NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| {
                CareError::InvalidInput(format!("slotDate is not a calendar date: '{}'", slot_date))
            }),
        _ => Err(CareError::InvalidInput(format!(
            "slotDate must look like D_M_YYYY, got '{}'",
            slot_date
        ))),
    }
}

/// Validates a slot time such as `10:30 AM` or `14:00`.
pub fn validate_slot_time(slot_time: &str) -> CareResult<NaiveTime> {
    let trimmed = slot_time.trim();
    NaiveTime::parse_from_str(trimmed, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| {
            CareError::InvalidInput(format!(
                "slotTime must look like 10:30 AM or 14:00, got '{}'",
                slot_time
            ))
        })
}
