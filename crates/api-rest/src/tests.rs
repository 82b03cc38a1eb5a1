use super::*;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const ADMIN_KEY: &str = "test-admin-key";
const BOUNDARY: &str = "carebook-test-boundary";

struct TestApp {
    _temp: TempDir,
    app: Router,
}

fn test_app(admin_key: Option<&str>) -> TestApp {
    let temp = TempDir::new().unwrap();
    let cfg = CoreConfig::new(
        temp.path().join("data"),
        temp.path().join("uploads"),
        admin_key.map(str::to_string),
    )
    .unwrap();
    TestApp {
        app: router(AppState::new(Arc::new(cfg))),
        _temp: temp,
    }
}

impl TestApp {
    async fn send(&self, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn json(&self, req: Request<Body>) -> Value {
        let (status, bytes) = self.send(req).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn add_doctor(&self, name: &str, email: &str) -> String {
        let body = self
            .json(post_json(
                "/api/admin/add-doctor",
                &[("x-api-key", ADMIN_KEY)],
                json!({
                    "name": name,
                    "email": email,
                    "speciality": "Dermatologist",
                    "degree": "MBBS",
                    "experience": "3 Years",
                    "about": "Skin care.",
                    "fees": 40
                }),
            ))
            .await;
        assert_eq!(body["success"], true, "{body}");
        body["doctor"]["_id"].as_str().unwrap().to_string()
    }

    async fn register(&self, name: &str, email: &str) -> String {
        let body = self
            .json(post_json(
                "/api/user/register",
                &[],
                json!({ "name": name, "email": email, "dob": "1990-06-15" }),
            ))
            .await;
        assert_eq!(body["success"], true, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Doctor, patient and a booked appointment. Returns (doctor id, patient id, appointment id).
    async fn booked(&self) -> (String, String, String) {
        let doctor = self.add_doctor("Emily Larson", "emily@example.com").await;
        let patient = self.register("Ann Lee", "ann@example.com").await;
        let body = self
            .json(post_json(
                "/api/user/book-appointment",
                &[("token", patient.as_str())],
                json!({ "docId": doctor, "slotDate": "20_6_2025", "slotTime": "11:00 AM" }),
            ))
            .await;
        assert_eq!(body["success"], true, "{body}");
        let appointment = body["appointment"]["_id"].as_str().unwrap().to_string();
        (doctor, patient, appointment)
    }
}

fn post_json(uri: &str, headers: &[(&str, &str)], body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_with(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_raw(uri: &str, headers: &[(&str, &str)], content_type: &str, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

fn multipart(uri: &str, doctor: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("dtoken", doctor)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

const PRESCRIPTION_TEXT: &str = "Patient: Ann Lee\nAge: 35\nTreatment: Eczema\n\
                                 Medications: Hydrocortisone cream 1%\nDate: 2025-06-20";
const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF\n";

#[tokio::test]
async fn root_and_health() {
    let t = test_app(Some(ADMIN_KEY));

    let (status, body) = t.send(get_with("/", &[])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"API WORKING");

    let health = t.json(get_with("/health", &[])).await;
    assert_eq!(health["ok"], true);
}

#[tokio::test]
async fn unknown_route_is_404_json() {
    let t = test_app(Some(ADMIN_KEY));
    let (status, body) = t.send(get_with("/api/nowhere", &[])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "error": "Route not found" }));
}

#[tokio::test]
async fn admin_routes_require_matching_key() {
    let t = test_app(Some(ADMIN_KEY));
    let req = || {
        json!({
            "name": "Emily Larson", "email": "emily@example.com", "speciality": "Dermatologist",
            "degree": "MBBS", "experience": "3 Years", "about": "", "fees": 40
        })
    };

    let body = t
        .json(post_json("/api/admin/add-doctor", &[], req()))
        .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not Authorized Login Again");

    let body = t
        .json(post_json("/api/admin/add-doctor", &[("x-api-key", "wrong")], req()))
        .await;
    assert_eq!(body["success"], false);

    let locked = test_app(None);
    let body = locked
        .json(post_json("/api/admin/add-doctor", &[("x-api-key", "")], req()))
        .await;
    assert_eq!(body["success"], false);

    let doctor = t.add_doctor("Emily Larson", "emily2@example.com").await;
    let list = t.json(get_with("/api/doctor/list", &[])).await;
    assert_eq!(list["doctors"][0]["_id"], doctor);
    assert_eq!(list["doctors"][0]["available"], true);
}

#[tokio::test]
async fn change_availability_blocks_booking() {
    let t = test_app(Some(ADMIN_KEY));
    let doctor = t.add_doctor("Emily Larson", "emily@example.com").await;
    let patient = t.register("Ann Lee", "ann@example.com").await;

    let body = t
        .json(post_json(
            "/api/admin/change-availability",
            &[("x-api-key", ADMIN_KEY)],
            json!({ "docId": doctor }),
        ))
        .await;
    assert_eq!(body["doctor"]["available"], false);

    let body = t
        .json(post_json(
            "/api/user/book-appointment",
            &[("token", patient.as_str())],
            json!({ "docId": doctor, "slotDate": "20_6_2025", "slotTime": "11:00 AM" }),
        ))
        .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Doctor not available");
}

#[tokio::test]
async fn errors_use_success_false_envelope() {
    let t = test_app(Some(ADMIN_KEY));
    let (doctor, _, _) = t.booked().await;

    let body = t.json(get_with("/api/doctor/appointments", &[])).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not Authorized Login Again");

    let missing = RecordId::new().to_string();
    let body = t
        .json(multipart(
            "/api/doctor/add-prescription",
            &doctor,
            &[
                Part::Text("appointmentId", &missing),
                Part::Text("prescriptionText", PRESCRIPTION_TEXT),
            ],
        ))
        .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Appointment not found");

    let body = t
        .json(get_with(
            &format!("/api/doctor/prescription/{}", RecordId::new()),
            &[("dtoken", doctor.as_str())],
        ))
        .await;
    assert_eq!(body["message"], "Prescription not found");
}

#[tokio::test]
async fn text_prescription_completes_appointment() {
    let t = test_app(Some(ADMIN_KEY));
    let (doctor, patient, appointment) = t.booked().await;

    let body = t
        .json(multipart(
            "/api/doctor/add-prescription",
            &doctor,
            &[
                Part::Text("appointmentId", &appointment),
                Part::Text("prescriptionText", PRESCRIPTION_TEXT),
                Part::Text("prescriptionType", ""),
            ],
        ))
        .await;
    assert_eq!(body, json!({ "success": true, "message": "Prescription added successfully" }));

    let body = t
        .json(get_with("/api/user/prescriptions", &[("token", patient.as_str())]))
        .await;
    let prescription = &body["prescriptions"][0];
    assert_eq!(prescription["prescriptionType"], "text");
    assert_eq!(prescription["prescriptionFile"], "");
    assert_eq!(prescription["appointmentId"], appointment);
    assert_eq!(prescription["doctorData"]["name"], "Emily Larson");
    assert_eq!(prescription["patientData"]["dob"], "1990-06-15");

    let body = t
        .json(get_with("/api/doctor/appointments", &[("dtoken", doctor.as_str())]))
        .await;
    assert_eq!(body["appointments"][0]["isCompleted"], true);

    let by_id = t
        .json(get_with(
            &format!(
                "/api/doctor/prescription/{}",
                prescription["_id"].as_str().unwrap()
            ),
            &[("dtoken", doctor.as_str())],
        ))
        .await;
    assert_eq!(by_id["prescription"]["_id"], prescription["_id"]);

    let for_patient = t
        .json(get_with(
            &format!("/api/doctor/patient-prescriptions/{patient}"),
            &[("dtoken", doctor.as_str())],
        ))
        .await;
    assert_eq!(for_patient["prescriptions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn text_and_file_prescription_serves_generated_pdf() {
    let t = test_app(Some(ADMIN_KEY));
    let (doctor, _, appointment) = t.booked().await;

    let body = t
        .json(multipart(
            "/api/doctor/add-prescription",
            &doctor,
            &[
                Part::Text("appointmentId", &appointment),
                Part::Text("prescriptionText", PRESCRIPTION_TEXT),
                Part::Text("prescriptionType", "both"),
                Part::File {
                    name: "prescriptionFile",
                    filename: "scan.pdf",
                    content_type: "application/pdf",
                    bytes: PDF_BYTES,
                },
            ],
        ))
        .await;
    assert_eq!(body["success"], true, "{body}");

    let body = t
        .json(get_with("/api/doctor/prescriptions", &[("dtoken", doctor.as_str())]))
        .await;
    let prescription = &body["prescriptions"][0];
    assert_eq!(prescription["prescriptionType"], "both");
    let pdf_path = prescription["prescriptionFile"].as_str().unwrap();
    assert!(pdf_path.starts_with("/uploads/prescription_"), "{pdf_path}");
    let attachment = prescription["attachment"].as_str().unwrap();
    assert!(attachment.starts_with("/uploads/") && attachment.ends_with(".pdf"));

    let (status, pdf) = t.send(get_with(pdf_path, &[])).await;
    assert_eq!(status, StatusCode::OK);
    assert!(pdf.starts_with(b"%PDF"));

    let (status, upload) = t.send(get_with(attachment, &[])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(upload, PDF_BYTES);
}

#[tokio::test]
async fn rejected_upload_type_reports_failure() {
    let t = test_app(Some(ADMIN_KEY));
    let (doctor, patient, appointment) = t.booked().await;

    let body = t
        .json(multipart(
            "/api/doctor/add-prescription",
            &doctor,
            &[
                Part::Text("appointmentId", &appointment),
                Part::File {
                    name: "prescriptionFile",
                    filename: "notes.txt",
                    content_type: "text/plain",
                    bytes: b"take two",
                },
            ],
        ))
        .await;
    assert_eq!(body["success"], false);

    let body = t
        .json(get_with("/api/user/prescriptions", &[("token", patient.as_str())]))
        .await;
    assert!(body["prescriptions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn patient_cancel_and_payment() {
    let t = test_app(Some(ADMIN_KEY));
    let (_, patient, appointment) = t.booked().await;

    let body = t
        .json(post_json(
            "/api/user/payment-callback",
            &[("token", patient.as_str())],
            json!({ "appointmentId": appointment, "paid": true }),
        ))
        .await;
    assert_eq!(body["message"], "Payment Successful");

    let body = t
        .json(post_json(
            "/api/user/cancel-appointment",
            &[("token", patient.as_str())],
            json!({ "appointmentId": appointment }),
        ))
        .await;
    assert_eq!(body["success"], true);

    let body = t
        .json(get_with("/api/user/appointments", &[("token", patient.as_str())]))
        .await;
    let stored = &body["appointments"][0];
    assert_eq!(stored["cancelled"], true);
    assert_eq!(stored["payment"], true);
    assert_eq!(stored["amount"], 40);
}

#[tokio::test]
async fn malformed_json_bodies_use_envelope() {
    let t = test_app(Some(ADMIN_KEY));
    let (_, patient, _) = t.booked().await;

    let cases = [
        ("application/json", r#"{"wrongField":1}"#),
        ("application/json", "{not json"),
        ("text/plain", r#"{"appointmentId":"x"}"#),
    ];
    for (content_type, raw) in cases {
        let body = t
            .json(post_raw(
                "/api/user/cancel-appointment",
                &[("token", patient.as_str())],
                content_type,
                raw,
            ))
            .await;
        assert_eq!(body["success"], false, "{content_type} {raw}");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    let body = t
        .json(post_raw(
            "/api/admin/add-doctor",
            &[("x-api-key", ADMIN_KEY)],
            "application/json",
            r#"{"name":"Emily Larson"}"#,
        ))
        .await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn non_multipart_prescription_uses_envelope() {
    let t = test_app(Some(ADMIN_KEY));
    let (doctor, patient, appointment) = t.booked().await;

    let body = t
        .json(post_json(
            "/api/doctor/add-prescription",
            &[("dtoken", doctor.as_str())],
            json!({ "appointmentId": appointment, "prescriptionText": PRESCRIPTION_TEXT }),
        ))
        .await;
    assert_eq!(body["success"], false);

    let body = t
        .json(get_with("/api/user/prescriptions", &[("token", patient.as_str())]))
        .await;
    assert!(body["prescriptions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn payment_for_another_patients_appointment_is_refused() {
    let t = test_app(Some(ADMIN_KEY));
    let (_, patient, appointment) = t.booked().await;
    let intruder = t.register("Bo Chen", "bo@example.com").await;

    let body = t
        .json(post_json(
            "/api/user/payment-callback",
            &[("token", intruder.as_str())],
            json!({ "appointmentId": appointment, "paid": true }),
        ))
        .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unauthorized action");

    let body = t
        .json(get_with("/api/user/appointments", &[("token", patient.as_str())]))
        .await;
    assert_eq!(body["appointments"][0]["payment"], false);
}

#[tokio::test]
async fn doctor_profile_edit_and_dashboard() {
    let t = test_app(Some(ADMIN_KEY));
    let (doctor, patient, appointment) = t.booked().await;

    let body = t
        .json(get_with("/api/doctor/profile", &[("dtoken", doctor.as_str())]))
        .await;
    assert_eq!(body["profileData"]["name"], "Emily Larson");
    assert_eq!(body["profileData"]["fees"], 40);

    let body = t
        .json(post_json(
            "/api/doctor/update-profile",
            &[("dtoken", doctor.as_str())],
            json!({ "name": "Emily Larson-Reyes", "fees": 55, "available": false }),
        ))
        .await;
    assert_eq!(body["success"], true, "{body}");
    assert_eq!(body["doctor"]["name"], "Emily Larson-Reyes");
    assert_eq!(body["doctor"]["about"], "Skin care.");

    let body = t
        .json(get_with("/api/doctor/profile", &[("dtoken", doctor.as_str())]))
        .await;
    assert_eq!(body["profileData"]["fees"], 55);
    assert_eq!(body["profileData"]["available"], false);

    let body = t
        .json(get_with("/api/user/appointments", &[("token", patient.as_str())]))
        .await;
    assert_eq!(body["appointments"][0]["docData"]["name"], "Emily Larson");
    assert_eq!(body["appointments"][0]["amount"], 40);

    let body = t
        .json(post_json(
            "/api/user/payment-callback",
            &[("token", patient.as_str())],
            json!({ "appointmentId": appointment, "paid": true }),
        ))
        .await;
    assert_eq!(body["success"], true);

    let body = t
        .json(get_with("/api/doctor/dashboard", &[("dtoken", doctor.as_str())]))
        .await;
    let dash = &body["dashData"];
    assert_eq!(dash["appointments"], 1);
    assert_eq!(dash["earnings"], 40);
    assert_eq!(dash["patients"], 1);
    assert_eq!(dash["latestAppointments"][0]["_id"], appointment);

    let body = t
        .json(get_with(
            "/api/doctor/dashboard",
            &[("dtoken", RecordId::new().to_string().as_str())],
        ))
        .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Doctor not found");
}
