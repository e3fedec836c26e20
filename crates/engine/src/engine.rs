use serde_json::Value;

use crate::config::MatchConfig;
use crate::diff;
use crate::error::EngineError;
use crate::evidence::compute_summary;
use crate::field::FieldKind;
use crate::model::{FieldBucket, FieldPair, FieldReport, ReconInput, Verdict, VerdictMeta};
use crate::similarity::score_field;

/// Reconcile every configured field pair and aggregate the verdict.
///
/// Total for well-typed input: normalization, scoring, and diffing are
/// defined for every string, so nothing here can fail. A mismatch is an
/// outcome, not an error.
pub fn run(config: &MatchConfig, input: &ReconInput) -> Verdict {
    let mut fields = Vec::new();
    for pair in &input.pairs {
        // Pairs for fields outside the configured table carry no policy.
        if !config.fields.contains_key(pair.field.as_str()) {
            continue;
        }
        fields.push(reconcile_field(config, pair));
    }

    // Blank fields contribute no information either way, and a verdict
    // with no informative field cannot pass.
    let informative: Vec<&FieldReport> = fields
        .iter()
        .filter(|report| report.bucket != FieldBucket::UserBlank)
        .collect();
    let overall_pass = !informative.is_empty() && informative.iter().all(|report| report.matched);

    let summary = compute_summary(&fields);

    Verdict {
        meta: VerdictMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        overall_pass,
        summary,
        fields,
    }
}

fn reconcile_field(config: &MatchConfig, pair: &FieldPair) -> FieldReport {
    let kind = pair.field;
    let normalized = kind.normalize_pair(pair);
    let scores = score_field(kind, &normalized.user, &normalized.document, &config.weights);
    let threshold = config.threshold_for(kind);

    let (matched, bucket) = if normalized.user.is_empty() {
        (false, FieldBucket::UserBlank)
    } else if scores.score >= threshold {
        (true, FieldBucket::Matched)
    } else {
        (false, FieldBucket::Mismatched)
    };

    FieldReport {
        field: kind,
        user_value: pair.user_value.clone(),
        document_value: pair.document_value.clone(),
        char_score: scores.char_score,
        token_score: scores.token_score,
        score: scores.score,
        threshold,
        matched,
        bucket,
        // Scores judge the normalized values; the diff shows the raw ones.
        diff: diff::align(&pair.user_value, &pair.document_value),
    }
}

/// Assemble field pairs from the two JSON records.
///
/// The user record is a flat object keyed by canonical field names. The
/// document record is either a flat object or the extractor's envelope
/// `{"fields": {...}}`; a top-level `fields` object takes precedence.
/// Missing keys become empty values. Unknown canonical names in the user
/// record are caller errors; extra keys in the document record are data
/// the config does not track and are ignored.
pub fn build_input(
    config: &MatchConfig,
    user_json: &str,
    document_json: &str,
) -> Result<ReconInput, EngineError> {
    let user_fields = parse_object("user", user_json)?;
    for key in user_fields.keys() {
        key.parse::<FieldKind>()?;
    }
    let document_fields = document_field_map(document_json)?;

    let mut pairs = Vec::new();
    for kind in config.enabled_fields() {
        let user_value = string_value("user", &user_fields, kind.as_str())?;
        let document_value =
            string_value("document", &document_fields, config.document_key_for(kind))?;
        pairs.push(FieldPair {
            field: kind,
            user_value,
            document_value,
        });
    }
    Ok(ReconInput { pairs })
}

fn parse_object(
    side: &'static str,
    input: &str,
) -> Result<serde_json::Map<String, Value>, EngineError> {
    let value: Value = serde_json::from_str(input).map_err(|e| EngineError::InputParse {
        side,
        detail: e.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(EngineError::InputParse {
            side,
            detail: format!("expected a JSON object, got {}", json_type_name(&other)),
        }),
    }
}

fn document_field_map(input: &str) -> Result<serde_json::Map<String, Value>, EngineError> {
    let mut map = parse_object("document", input)?;
    match map.remove("fields") {
        Some(Value::Object(inner)) => Ok(inner),
        Some(other) => Err(EngineError::InputParse {
            side: "document",
            detail: format!("'fields' must be a JSON object, got {}", json_type_name(&other)),
        }),
        None => Ok(map),
    }
}

fn string_value(
    side: &'static str,
    map: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<String, EngineError> {
    match map.get(key) {
        None => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(EngineError::InputParse {
            side,
            detail: format!(
                "value for '{key}' must be a string, got {}",
                json_type_name(other)
            ),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
