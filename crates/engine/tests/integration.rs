use std::path::PathBuf;

use idrecon_engine::config::MatchConfig;
use idrecon_engine::engine::{build_input, run};
use idrecon_engine::field::FieldKind;
use idrecon_engine::model::{FieldBucket, FieldReport, Verdict};

const EPS: f64 = 1e-9;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

fn load_and_run(user_fixture: &str, document_fixture: &str) -> Verdict {
    let config = MatchConfig::from_toml(&read_fixture("aadhaar.match.toml")).unwrap();
    let input = build_input(
        &config,
        &read_fixture(user_fixture),
        &read_fixture(document_fixture),
    )
    .unwrap();
    run(&config, &input)
}

fn report_for<'a>(verdict: &'a Verdict, field: FieldKind) -> &'a FieldReport {
    verdict
        .fields
        .iter()
        .find(|r| r.field == field)
        .unwrap_or_else(|| panic!("no report for field '{field}'"))
}

// -------------------------------------------------------------------------
// Scenario tests
// -------------------------------------------------------------------------

#[test]
fn clean_extraction_passes_all_fields() {
    let verdict = load_and_run("user-clean.json", "document-clean.json");

    assert!(verdict.overall_pass);
    assert_eq!(verdict.summary.fields_total, 3);
    assert_eq!(verdict.summary.matched, 3);
    assert_eq!(verdict.summary.mismatched, 0);
    assert_eq!(verdict.summary.user_blank, 0);

    for report in &verdict.fields {
        assert_eq!(report.bucket, FieldBucket::Matched);
        assert!((report.score - 100.0).abs() < EPS);
    }

    // Case and whitespace differences are absorbed by normalization, so the
    // name scores a clean 100 despite "Ravi Kumar" vs "ravi   kumar".
    let name = report_for(&verdict, FieldKind::Name);
    assert!((name.char_score - 100.0).abs() < EPS);
    assert!((name.token_score.unwrap() - 100.0).abs() < EPS);
}

#[test]
fn single_ocr_digit_error_fails_only_the_id() {
    let verdict = load_and_run("user-clean.json", "document-ocr-error.json");

    assert!(!verdict.overall_pass);
    assert_eq!(verdict.summary.matched, 2);
    assert_eq!(verdict.summary.mismatched, 1);

    let id = report_for(&verdict, FieldKind::IdNumber);
    assert_eq!(id.bucket, FieldBucket::Mismatched);
    // 11 of 12 digits align: 2 * 11 / 24 * 100
    assert!((id.char_score - 2.0 * 11.0 / 24.0 * 100.0).abs() < EPS);
    assert!(id.char_score < id.threshold);

    // The name survives the shouty OCR casing.
    let name = report_for(&verdict, FieldKind::Name);
    assert_eq!(name.bucket, FieldBucket::Matched);
}

#[test]
fn blank_user_field_is_reported_but_not_fatal() {
    let verdict = load_and_run("user-blank-dob.json", "document-clean.json");

    // The blank date of birth cannot veto the verdict; the two fields the
    // user actually filled in both match.
    assert!(verdict.overall_pass);
    assert_eq!(verdict.summary.matched, 2);
    assert_eq!(verdict.summary.mismatched, 0);
    assert_eq!(verdict.summary.user_blank, 1);

    let dob = report_for(&verdict, FieldKind::DateOfBirth);
    assert_eq!(dob.bucket, FieldBucket::UserBlank);
    assert!(!dob.matched);
}

#[test]
fn loosened_id_threshold_accepts_the_ocr_error() {
    let toml = r#"
name = "Lenient KYC"

[fields.name]
document_key = "Name"

[fields.id_number]
document_key = "Aadhaar"
threshold = 90.0

[fields.date_of_birth]
document_key = "DOB"
"#;
    let config = MatchConfig::from_toml(toml).unwrap();
    let input = build_input(
        &config,
        &read_fixture("user-clean.json"),
        &read_fixture("document-ocr-error.json"),
    )
    .unwrap();
    let verdict = run(&config, &input);

    // 91.67 clears a 90.0 bar even though it fails the default 98.0.
    assert!(verdict.overall_pass);
    let id = report_for(&verdict, FieldKind::IdNumber);
    assert_eq!(id.bucket, FieldBucket::Matched);
    assert!((id.threshold - 90.0).abs() < EPS);
}

#[test]
fn restricted_config_only_reports_configured_fields() {
    let toml = r#"
name = "Name Only"

[fields.name]
document_key = "Name"
"#;
    let config = MatchConfig::from_toml(toml).unwrap();
    let input = build_input(
        &config,
        &read_fixture("user-clean.json"),
        &read_fixture("document-clean.json"),
    )
    .unwrap();
    let verdict = run(&config, &input);

    assert!(verdict.overall_pass);
    assert_eq!(verdict.summary.fields_total, 1);
    assert_eq!(verdict.fields[0].field, FieldKind::Name);
}

// -------------------------------------------------------------------------
// Golden JSON snapshot tests — lock the output schema
// -------------------------------------------------------------------------

/// Strip volatile fields (run_at, engine_version) from JSON for stable comparison.
fn stabilize_json(verdict: &Verdict) -> serde_json::Value {
    let mut val = serde_json::to_value(verdict).unwrap();
    if let Some(meta) = val.get_mut("meta") {
        meta["run_at"] = serde_json::Value::String("REDACTED".into());
        meta["engine_version"] = serde_json::Value::String("REDACTED".into());
    }
    val
}

fn golden_path(name: &str) -> PathBuf {
    fixtures_dir().join(format!("golden-{name}.json"))
}

/// Compare verdict against golden file. If golden doesn't exist, create it and pass.
/// If it exists, assert equality.
fn assert_golden(name: &str, verdict: &Verdict) {
    let stable = stabilize_json(verdict);
    let json = serde_json::to_string_pretty(&stable).unwrap();
    let path = golden_path(name);

    if path.exists() {
        let expected = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("cannot read golden file {}: {e}", path.display()));
        assert_eq!(
            json.trim(),
            expected.trim(),
            "golden JSON mismatch for '{}'. If the schema change is intentional, delete {} and re-run.",
            name,
            path.display()
        );
    } else {
        // Create golden file on first run
        std::fs::write(&path, &json)
            .unwrap_or_else(|e| panic!("cannot write golden file {}: {e}", path.display()));
        eprintln!("created golden file: {}", path.display());
    }
}

#[test]
fn golden_ocr_error_verdict() {
    let verdict = load_and_run("user-clean.json", "document-ocr-error.json");

    // Structural assertions first
    assert!(!verdict.overall_pass);
    assert_eq!(verdict.summary.mismatched, 1);

    assert_golden("ocr-error", &verdict);
}

#[test]
fn golden_verdict_schema_fields() {
    // Verify specific schema fields exist in the JSON output
    let verdict = load_and_run("user-clean.json", "document-ocr-error.json");
    let json = serde_json::to_value(&verdict).unwrap();

    // Meta must have expected fields
    let meta = &json["meta"];
    assert!(meta["config_name"].is_string());
    assert!(meta["engine_version"].is_string());
    assert!(meta["run_at"].is_string());

    assert!(json["overall_pass"].is_boolean());

    // Summary must have all count fields
    let summary = &json["summary"];
    for field in ["fields_total", "matched", "mismatched", "user_blank"] {
        assert!(
            summary[field].is_number(),
            "summary.{} must be a number, got {:?}",
            field,
            summary[field]
        );
    }
    assert!(summary["bucket_counts"].is_object());

    // Field reports must have expected shape
    for report in json["fields"].as_array().unwrap() {
        assert!(report["field"].is_string());
        assert!(report["user_value"].is_string());
        assert!(report["document_value"].is_string());
        assert!(report["char_score"].is_number());
        assert!(report["score"].is_number());
        assert!(report["threshold"].is_number());
        assert!(report["matched"].is_boolean());
        assert!(report["bucket"].is_string());

        for segment in report["diff"].as_array().unwrap() {
            assert!(segment["kind"].is_string());
            assert!(segment["user_text"].is_string());
            assert!(segment["document_text"].is_string());
        }
    }

    // token_score is a name-only concept: present there, absent elsewhere.
    let name = &json["fields"][0];
    assert_eq!(name["field"], "name");
    assert!(name["token_score"].is_number());

    let id = &json["fields"][1];
    assert_eq!(id["field"], "id_number");
    assert!(id.get("token_score").is_none());
}
