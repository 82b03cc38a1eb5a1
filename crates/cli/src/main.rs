use carebook_core::constants::{DEFAULT_DATA_DIR, DEFAULT_UPLOADS_DIR};
use carebook_core::pdf::{render_prescription_pdf, PrescriptionPdfData};
use carebook_core::prescription_text::{parse_prescription_text, PrescriptionForm};
use carebook_core::services::{DirectoryService, NewDoctor, NewPatient};
use carebook_core::{CoreConfig, RecordId};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "carebook")]
#[command(about = "Carebook appointments and prescriptions CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a doctor
    AddDoctor {
        name: String,
        email: String,
        speciality: String,
        degree: String,
        /// Consultation fee
        fees: u32,
        /// e.g. "4 Years"
        #[arg(long, default_value = "")]
        experience: String,
        #[arg(long, default_value = "")]
        about: String,
    },
    /// Register a patient
    AddPatient {
        name: String,
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<NaiveDate>,
    },
    /// List all doctors
    ListDoctors,
    /// Print prescription text the way the prescription form builds it
    FormatPrescription {
        first_name: String,
        last_name: String,
        age: String,
        treatment: String,
        /// May be repeated
        #[arg(long = "medication")]
        medications: Vec<String>,
        /// Date signed (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print prescription text with name and age filled in from a registered patient
    PrefillPrescription {
        patient_id: String,
        treatment: String,
        /// May be repeated
        #[arg(long = "medication")]
        medications: Vec<String>,
        /// Date signed (YYYY-MM-DD, default today); the age is worked out on this date
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Render a prescription text file to PDF
    RenderPdf {
        /// File holding the prescription text
        input: PathBuf,
        /// Where to write the PDF
        output: PathBuf,
        #[arg(long)]
        doctor: String,
        #[arg(long, default_value = "")]
        speciality: String,
        #[arg(long)]
        patient: String,
    },
}

fn directory_service() -> Result<DirectoryService, Box<dyn std::error::Error>> {
    let data_dir = std::env::var("CAREBOOK_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let uploads_dir =
        std::env::var("CAREBOOK_UPLOADS_DIR").unwrap_or_else(|_| DEFAULT_UPLOADS_DIR.into());
    let cfg = CoreConfig::new(PathBuf::from(data_dir), PathBuf::from(uploads_dir), None)?;
    Ok(DirectoryService::new(Arc::new(cfg)))
}

fn print_form(mut form: PrescriptionForm, medications: &[String]) {
    for medication in medications {
        form.add_medication(medication);
    }
    if !form.is_complete() {
        eprintln!("Warning: patient name, age and treatment should all be filled in");
    }
    println!("{}", form.render());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carebook_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::AddDoctor {
            name,
            email,
            speciality,
            degree,
            fees,
            experience,
            about,
        }) => {
            let service = directory_service()?;
            match service.add_doctor(NewDoctor {
                name,
                email,
                speciality,
                degree,
                experience,
                about,
                fees,
            }) {
                Ok(doctor) => println!("Added doctor {} with ID: {}", doctor.name, doctor.id),
                Err(e) => eprintln!("Error adding doctor: {}", e),
            }
        }
        Some(Commands::AddPatient {
            name,
            email,
            phone,
            gender,
            dob,
        }) => {
            let service = directory_service()?;
            match service.add_patient(NewPatient {
                name,
                email,
                phone,
                gender,
                dob,
            }) {
                Ok(patient) => println!("Registered patient with ID: {}", patient.id),
                Err(e) => eprintln!("Error registering patient: {}", e),
            }
        }
        Some(Commands::ListDoctors) => {
            let doctors = directory_service()?.list_doctors()?;
            if doctors.is_empty() {
                println!("No doctors found.");
            } else {
                for doctor in doctors {
                    println!(
                        "ID: {}, Name: {}, Speciality: {}, Fees: {}, Available: {}",
                        doctor.id, doctor.name, doctor.speciality, doctor.fees, doctor.available
                    );
                }
            }
        }
        Some(Commands::FormatPrescription {
            first_name,
            last_name,
            age,
            treatment,
            medications,
            date,
        }) => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let form = PrescriptionForm::new(first_name, last_name, age, treatment, date);
            print_form(form, &medications);
        }
        Some(Commands::PrefillPrescription {
            patient_id,
            treatment,
            medications,
            date,
        }) => {
            let patient = directory_service()?.get_patient(RecordId::parse(patient_id.trim())?)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let (first_name, last_name) = patient.first_and_last_name();
            let age = patient
                .age_on(date)
                .map(|years| years.to_string())
                .unwrap_or_default();
            let form = PrescriptionForm::new(first_name, last_name, age, treatment, date);
            print_form(form, &medications);
        }
        Some(Commands::RenderPdf {
            input,
            output,
            doctor,
            speciality,
            patient,
        }) => {
            let text = std::fs::read_to_string(&input)?;
            let parsed = parse_prescription_text(&text);
            let rendered = render_prescription_pdf(&PrescriptionPdfData {
                doctor_name: doctor,
                doctor_speciality: speciality,
                patient_name: patient,
                patient_age: parsed.age,
                treatment: parsed.treatment,
                prescription_text: text,
                date: Utc::now(),
            })?;
            std::fs::write(&output, &rendered.bytes)?;
            println!(
                "Wrote {} ({} page{})",
                output.display(),
                rendered.pages,
                if rendered.pages == 1 { "" } else { "s" }
            );
        }
        None => {
            println!("No command given. Use --help for usage.");
        }
    }

    Ok(())
}
