//! Prescription text: the labelled free-text format shared by the prescription form and the
//! server.
//!
//! The form flattens its fields into one blob:
//!
//! ```text
//! Patient: Ann Lee
//! Age: 34
//! Treatment: Seasonal allergies
//! Medications: Cetirizine 10mg once daily, Saline nasal spray
//! Date: 2025-06-15
//! ```
//!
//! The server stores that blob verbatim and re-derives age, treatment and medications from
//! it line by line. Values are taken as the text between the first and second colon of a
//! line, so a value that itself contains a colon (for example `3:00 PM`) comes back
//! truncated. Nothing is escaped on the way in.

use chrono::NaiveDate;

pub const PATIENT_LABEL: &str = "Patient:";
pub const AGE_LABEL: &str = "Age:";
pub const TREATMENT_LABEL: &str = "Treatment:";
pub const MEDICATIONS_LABEL: &str = "Medications:";
pub const DATE_LABEL: &str = "Date:";

/// Medications value written when no medication was added.
pub const NO_MEDICATIONS: &str = "None prescribed";

/// Structured fields collected by the prescription form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrescriptionForm {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub treatment: String,
    pub medications: Vec<String>,
    pub date_signed: NaiveDate,
}

impl PrescriptionForm {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        age: impl Into<String>,
        treatment: impl Into<String>,
        date_signed: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age: age.into(),
            treatment: treatment.into(),
            medications: Vec::new(),
            date_signed,
        }
    }

    /// Appends a medication line. Blank input is ignored; returns whether it was added.
    pub fn add_medication(&mut self, medication: &str) -> bool {
        let medication = medication.trim();
        if medication.is_empty() {
            return false;
        }
        self.medications.push(medication.to_string());
        true
    }

    /// True when every field the form marks as required is filled in.
    pub fn is_complete(&self) -> bool {
        [&self.first_name, &self.last_name, &self.age, &self.treatment]
            .iter()
            .all(|v| !v.trim().is_empty())
    }

    /// Flattens the form into the labelled text blob.
    pub fn render(&self) -> String {
        let medications = if self.medications.is_empty() {
            NO_MEDICATIONS.to_string()
        } else {
            self.medications.join(", ")
        };

        [
            format!("{} {} {}", PATIENT_LABEL, self.first_name, self.last_name),
            format!("{} {}", AGE_LABEL, self.age),
            format!("{} {}", TREATMENT_LABEL, self.treatment),
            format!("{} {}", MEDICATIONS_LABEL, medications),
            format!("{} {}", DATE_LABEL, self.date_signed.format("%Y-%m-%d")),
        ]
        .join("\n")
    }
}

/// Fields recovered from a prescription text blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPrescription {
    /// Value of the last line containing `Age:`, empty if none.
    pub age: String,
    /// Value of the last line containing `Treatment:` (and not `Age:`), empty if none.
    pub treatment: String,
    /// The line holding `Medications:` followed by every later non-blank line, untrimmed.
    pub medication_lines: Vec<String>,
    /// All lines not in `medication_lines`, joined with `\n`.
    pub other_text: String,
}

impl ParsedPrescription {
    pub fn has_medications(&self) -> bool {
        !self.medication_lines.is_empty()
    }

    /// Bullet entries for the PDF: the header line's value (if non-empty) followed by every
    /// subsequent section line, trimmed.
    pub fn medication_bullets(&self) -> Vec<String> {
        self.medication_lines
            .iter()
            .enumerate()
            .filter_map(|(index, line)| {
                let entry = if index == 0 && line.contains(MEDICATIONS_LABEL) {
                    label_value(line)
                } else {
                    line.trim().to_string()
                };
                (!entry.is_empty()).then_some(entry)
            })
            .collect()
    }

    /// The comma-separated medications on the header line, with [`NO_MEDICATIONS`] mapped to
    /// an empty list.
    pub fn medication_list(&self) -> Vec<String> {
        let Some(header) = self.medication_lines.first() else {
            return Vec::new();
        };
        let value = label_value(header);
        if value.is_empty() || value == NO_MEDICATIONS {
            return Vec::new();
        }
        value
            .split(',')
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect()
    }
}

/// Text between the first and second colon of `line`, trimmed.
fn label_value(line: &str) -> String {
    line.split(':').nth(1).unwrap_or_default().trim().to_string()
}

/// Re-derives the prescription fields from a text blob.
pub fn parse_prescription_text(text: &str) -> ParsedPrescription {
    let mut parsed = ParsedPrescription::default();
    let lines: Vec<&str> = text.split('\n').collect();

    for line in &lines {
        if line.contains(AGE_LABEL) {
            parsed.age = label_value(line);
        } else if line.contains(TREATMENT_LABEL) {
            parsed.treatment = label_value(line);
        }
    }

    if text.contains(MEDICATIONS_LABEL) {
        let mut in_section = false;
        for line in &lines {
            if !in_section && line.contains(MEDICATIONS_LABEL) {
                in_section = true;
                parsed.medication_lines.push(line.to_string());
            } else if in_section && !line.trim().is_empty() {
                parsed.medication_lines.push(line.to_string());
            }
        }

        parsed.other_text = lines
            .iter()
            .filter(|line| !parsed.medication_lines.iter().any(|m| m == *line))
            .copied()
            .collect::<Vec<_>>()
            .join("\n");
    } else {
        parsed.other_text = text.to_string();
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> PrescriptionForm {
        let mut form = PrescriptionForm::new(
            "Ann",
            "Lee",
            "34",
            "Seasonal allergies",
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        );
        form.add_medication("Cetirizine 10mg once daily");
        form.add_medication("  Saline nasal spray  ");
        form
    }

    #[test]
    fn render_produces_labelled_lines() {
        let text = sample_form().render();
        assert_eq!(
            text,
            "Patient: Ann Lee\n\
             Age: 34\n\
             Treatment: Seasonal allergies\n\
             Medications: Cetirizine 10mg once daily, Saline nasal spray\n\
             Date: 2025-06-15"
        );
    }

    #[test]
    fn render_without_medications_says_none_prescribed() {
        let form = PrescriptionForm::new(
            "Ann",
            "Lee",
            "34",
            "Rest",
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        );
        assert!(form.render().contains("Medications: None prescribed"));
    }

    #[test]
    fn add_medication_ignores_blank() {
        let mut form = sample_form();
        assert!(!form.add_medication("   "));
        assert_eq!(form.medications.len(), 2);
    }

    #[test]
    fn is_complete_requires_core_fields() {
        let mut form = sample_form();
        assert!(form.is_complete());
        form.treatment = "  ".into();
        assert!(!form.is_complete());
    }

    #[test]
    fn well_formed_text_round_trips() {
        let form = sample_form();
        let parsed = parse_prescription_text(&form.render());

        assert_eq!(parsed.age, form.age);
        assert_eq!(parsed.treatment, form.treatment);
        assert_eq!(parsed.medication_list(), form.medications);
    }

    #[test]
    fn round_trip_holds_across_varied_inputs() {
        let cases = [
            ("Bo", "Ng", "7", "Otitis media", vec!["Amoxicillin 250mg three times daily"]),
            ("Zoë", "Ångström", "81", "Hypertension", vec!["Amlodipine 5mg", "Low salt diet"]),
            ("Sam", "O'Neil", "45", "Lower back pain", vec![]),
        ];

        for (first, last, age, treatment, meds) in cases {
            let mut form = PrescriptionForm::new(
                first,
                last,
                age,
                treatment,
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            );
            for med in &meds {
                form.add_medication(med);
            }

            let parsed = parse_prescription_text(&form.render());
            assert_eq!(parsed.age, age);
            assert_eq!(parsed.treatment, treatment);
            assert_eq!(parsed.medication_list(), meds);
        }
    }

    #[test]
    fn colon_in_treatment_truncates_value() {
        // Known boundary: values are cut at their first colon.
        let mut form = sample_form();
        form.treatment = "Insulin at 8:00 AM".into();

        let parsed = parse_prescription_text(&form.render());
        assert_eq!(parsed.treatment, "Insulin at 8");
        assert_ne!(parsed.treatment, form.treatment);
    }

    #[test]
    fn colon_in_medication_truncates_list() {
        let mut form = sample_form();
        form.medications = vec!["Ibuprofen 400mg at 3:00 PM".into()];

        let parsed = parse_prescription_text(&form.render());
        assert_eq!(parsed.medication_list(), vec!["Ibuprofen 400mg at 3".to_string()]);
    }

    #[test]
    fn medication_section_takes_following_non_blank_lines() {
        let text = "Age: 50\nMedications: Aspirin\nMetformin 500mg\n\nWarfarin\nReview in 2 weeks";
        let parsed = parse_prescription_text(text);

        assert_eq!(
            parsed.medication_bullets(),
            vec!["Aspirin", "Metformin 500mg", "Warfarin", "Review in 2 weeks"]
        );
        assert_eq!(parsed.other_text, "Age: 50\n");
    }

    #[test]
    fn formatted_date_line_lands_in_medication_section() {
        let parsed = parse_prescription_text(&sample_form().render());
        assert_eq!(parsed.medication_lines.last().unwrap(), "Date: 2025-06-15");
        assert_eq!(
            parsed.other_text,
            "Patient: Ann Lee\nAge: 34\nTreatment: Seasonal allergies"
        );
    }

    #[test]
    fn empty_header_value_is_not_a_bullet() {
        let parsed = parse_prescription_text("Medications:\nParacetamol 1g");
        assert_eq!(parsed.medication_bullets(), vec!["Paracetamol 1g"]);
        assert_eq!(parsed.medication_list(), Vec::<String>::new());
    }

    #[test]
    fn text_without_labels_is_all_other_text() {
        let parsed = parse_prescription_text("Take rest and fluids.");
        assert_eq!(parsed, ParsedPrescription {
            other_text: "Take rest and fluids.".into(),
            ..Default::default()
        });
        assert!(!parsed.has_medications());
    }

    #[test]
    fn line_with_age_and_treatment_only_sets_age() {
        let parsed = parse_prescription_text("Age: 30 Treatment: none");
        assert_eq!(parsed.age, "30 Treatment");
        assert_eq!(parsed.treatment, "");
    }
}
