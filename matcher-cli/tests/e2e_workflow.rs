//! End-to-end workflow tests for matcher-cli.
//!
//! These tests drive complete user workflows, either through the
//! interactive session or against a stand-in HTTP matching service.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a Command for the matcher binary.
fn matcher() -> Command {
    let mut cmd: Command = cargo_bin_cmd!("matcher").into();
    cmd.env_remove("MATCHER_API_URL")
        .env_remove("MATCHER_MAX_UPLOAD_MB")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn documents(temp: &TempDir) -> (String, String) {
    let resume = temp.path().join("resume.pdf");
    let job = temp.path().join("job.docx");
    fs::write(&resume, b"%PDF-1.7 Senior Python Engineer").unwrap();
    fs::write(&job, b"PK\x03\x04 Backend Engineer").unwrap();
    (
        resume.to_str().unwrap().to_string(),
        job.to_str().unwrap().to_string(),
    )
}

fn upload_body(file_id: &str, filename: &str, file_type: &str) -> String {
    serde_json::json!({
        "file_id": file_id,
        "filename": filename,
        "file_type": file_type,
        "upload_timestamp": "2024-05-01T10:00:00.123456",
        "extracted_text": "Python, React, SQL"
    })
    .to_string()
}

fn analyze_body() -> String {
    serde_json::json!({
        "resume_id": "res-1",
        "job_id": "job-1",
        "results": {
            "match_score": 64.0,
            "similarity_score": 0.71,
            "matched_skills": [
                {"skill": "python", "matched": true, "frequency": 3},
                {"skill": "sql", "matched": true}
            ],
            "missing_skills": ["kubernetes", "go"],
            "experience_match": true,
            "education_match": false,
            "explanation": "Solid backend overlap.",
            "timestamp": "2024-05-01T10:00:05"
        },
        "recommendations": ["Add Kubernetes experience"]
    })
    .to_string()
}

// ============================================================================
// Interactive Session Tests
// ============================================================================

#[test]
fn test_e2e_interactive_upload_analyze_another() {
    let temp = TempDir::new().unwrap();
    let (resume, job) = documents(&temp);
    let script = format!("resume {resume}\njob {job}\nanalyze\nanother\nquit\n");

    let output = matcher()
        .args(["interactive", "--mock", "--format", "json"])
        .write_stdin(script)
        .output()
        .unwrap();

    assert!(output.status.success());
    let screens: Vec<serde_json::Value> = serde_json::Deserializer::from_slice(&output.stdout)
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(screens.len(), 4);

    // Step 1: Resume uploaded, analyze still disabled
    assert_eq!(screens[0]["screen"], "upload");
    assert_eq!(screens[0]["resume"]["status"], "uploaded");
    assert_eq!(screens[0]["job"]["status"], "empty");
    assert_eq!(screens[0]["analyze_enabled"], false);

    // Step 2: Both uploaded
    assert_eq!(screens[1]["analyze_enabled"], true);

    // Step 3: Report screen
    assert_eq!(screens[2]["screen"], "report");
    assert_eq!(screens[2]["band"], "strong");

    // Step 4: Analyze another returns to the empty form
    assert_eq!(screens[3]["screen"], "upload");
    assert_eq!(screens[3]["resume"]["status"], "empty");
    assert_eq!(screens[3]["job"]["status"], "empty");
    assert_eq!(screens[3]["error"], serde_json::Value::Null);
}

#[test]
fn test_e2e_interactive_analyze_too_early_shows_error() {
    let temp = TempDir::new().unwrap();
    let (resume, _) = documents(&temp);
    let script = format!("resume {resume}\nanalyze\n");

    matcher()
        .args(["interactive", "--mock", "--quiet"])
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Please upload both resume and job description",
        ))
        .stdout(predicate::str::contains("waiting for both uploads"));
}

#[test]
fn test_e2e_interactive_rejected_file_then_retry() {
    let temp = TempDir::new().unwrap();
    let (resume, job) = documents(&temp);
    let notes = temp.path().join("job.txt");
    fs::write(&notes, b"plain text").unwrap();
    let script = format!(
        "resume {resume}\njob {}\njob {job}\nstatus\n",
        notes.to_str().unwrap()
    );

    let output = matcher()
        .args(["interactive", "--mock", "-f", "json"])
        .write_stdin(script)
        .output()
        .unwrap();

    assert!(output.status.success());
    let screens: Vec<serde_json::Value> = serde_json::Deserializer::from_slice(&output.stdout)
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(screens[1]["job"]["status"], "failed");
    assert!(screens[1]["error"]
        .as_str()
        .unwrap()
        .contains("PDF or DOCX"));
    assert_eq!(screens[2]["job"]["status"], "uploaded");
    assert_eq!(screens[2]["error"], serde_json::Value::Null);
    assert_eq!(screens[3]["analyze_enabled"], true);
}

#[test]
fn test_e2e_interactive_report_rejects_new_upload() {
    let temp = TempDir::new().unwrap();
    let (resume, job) = documents(&temp);
    let notes = temp.path().join("notes.txt");
    fs::write(&notes, b"plain text").unwrap();
    let script = format!(
        "resume {resume}\njob {job}\nanalyze\nresume {}\nanalyze\nstatus\n",
        notes.to_str().unwrap()
    );

    let output = matcher()
        .args(["interactive", "--mock", "--format", "json"])
        .write_stdin(script)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("type 'another' to start a new match").count(), 2);

    // The rejected actions render nothing; status still shows the report
    let screens: Vec<serde_json::Value> = serde_json::Deserializer::from_slice(&output.stdout)
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(screens.len(), 4);
    assert_eq!(screens[2]["screen"], "report");
    assert_eq!(screens[3], screens[2]);
}

// ============================================================================
// HTTP Service Tests
// ============================================================================

#[test]
fn test_e2e_analyze_against_http_service() {
    let mut server = Server::new();
    let resume_mock = server
        .mock("POST", "/api/upload/resume")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data".into()),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(upload_body("res-1", "resume.pdf", "resume"))
        .create();
    let job_mock = server
        .mock("POST", "/api/upload/job")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(upload_body("job-1", "job.docx", "job_description"))
        .create();
    let analyze_mock = server
        .mock("POST", "/api/match/analyze")
        .match_body(Matcher::Json(serde_json::json!({
            "resume_id": "res-1",
            "job_id": "job-1"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(analyze_body())
        .create();

    let temp = TempDir::new().unwrap();
    let (resume, job) = documents(&temp);

    matcher()
        .args(["analyze", "--api-url"])
        .arg(format!("{}/api", server.url()))
        .args([&resume, &job])
        .assert()
        .success()
        .stdout(predicate::str::contains("64.0%"))
        .stdout(predicate::str::contains("moderate match"))
        .stdout(predicate::str::contains("2/4"))
        .stdout(predicate::str::contains("kubernetes"))
        .stdout(predicate::str::contains("Add Kubernetes experience"))
        .stdout(predicate::str::contains("2024-05-01 10:00:05 UTC"));

    resume_mock.assert();
    job_mock.assert();
    analyze_mock.assert();
}

#[test]
fn test_e2e_api_url_from_environment() {
    let mut server = Server::new();
    let health_mock = server
        .mock("GET", "/api/match/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "operational", "services": {"nlp": "ready"}}"#)
        .create();

    matcher()
        .env("MATCHER_API_URL", format!("{}/api", server.url()))
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("operational"))
        .stdout(predicate::str::contains("nlp:"));

    health_mock.assert();
}

#[test]
fn test_e2e_analysis_rejection_surfaces_detail() {
    let mut server = Server::new();
    server
        .mock("POST", "/api/upload/resume")
        .with_status(200)
        .with_body(upload_body("res-1", "resume.pdf", "resume"))
        .create();
    server
        .mock("POST", "/api/upload/job")
        .with_status(200)
        .with_body(upload_body("job-1", "job.docx", "job_description"))
        .create();
    server
        .mock("POST", "/api/match/analyze")
        .with_status(500)
        .with_body(r#"{"detail": "Matching failed: model unavailable"}"#)
        .create();

    let temp = TempDir::new().unwrap();
    let (resume, job) = documents(&temp);

    // Exit code 69 = EX_UNAVAILABLE
    matcher()
        .args(["analyze", "--api-url"])
        .arg(format!("{}/api", server.url()))
        .args([&resume, &job])
        .assert()
        .code(69)
        .stderr(predicate::str::contains("model unavailable"));
}

#[test]
fn test_e2e_upload_rejection_uses_generic_message() {
    let mut server = Server::new();
    let upload_mock = server
        .mock("POST", "/api/upload/resume")
        .with_status(422)
        .with_body(r#"{"detail": [{"loc": ["body", "file"], "msg": "field required"}]}"#)
        .create();

    let temp = TempDir::new().unwrap();
    let (resume, _) = documents(&temp);

    matcher()
        .args(["upload", "--api-url"])
        .arg(format!("{}/api", server.url()))
        .arg(&resume)
        .assert()
        .code(69)
        .stderr(predicate::str::contains("Upload failed"));

    upload_mock.assert();
}

#[test]
fn test_e2e_unreachable_service_returns_unavailable() {
    let temp = TempDir::new().unwrap();
    let (resume, _) = documents(&temp);

    matcher()
        .args(["upload", "--api-url", "http://127.0.0.1:9/api", &resume])
        .assert()
        .code(69)
        .stderr(predicate::str::contains("Network error"));
}
