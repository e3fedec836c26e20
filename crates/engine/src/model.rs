use std::collections::BTreeMap;

use serde::Serialize;

use crate::diff::DiffSegment;
use crate::field::FieldKind;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One field to reconcile: the value the user typed alongside the value
/// extracted from the document. Raw, as received; either side may be empty.
#[derive(Debug, Clone)]
pub struct FieldPair {
    pub field: FieldKind,
    pub user_value: String,
    pub document_value: String,
}

/// Pre-assembled pairs in canonical field order.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub pairs: Vec<FieldPair>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldBucket {
    Matched,
    Mismatched,
    /// The user left the field blank. Never matched, excluded from the
    /// overall verdict, still reported.
    UserBlank,
}

impl std::fmt::Display for FieldBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::Mismatched => write!(f, "mismatched"),
            Self::UserBlank => write!(f, "user_blank"),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-field report
// ---------------------------------------------------------------------------

/// Full evidence for one field: scores against the normalized values,
/// diff against the raw values.
#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub field: FieldKind,
    pub user_value: String,
    pub document_value: String,
    pub char_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_score: Option<f64>,
    /// The decision score compared against `threshold`: the weighted blend
    /// for the name field, the character score for everything else.
    pub score: f64,
    pub threshold: f64,
    pub matched: bool,
    pub bucket: FieldBucket,
    pub diff: Vec<DiffSegment>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct VerdictSummary {
    pub fields_total: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub user_blank: usize,
    pub bucket_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerdictMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub meta: VerdictMeta,
    pub overall_pass: bool,
    pub summary: VerdictSummary,
    pub fields: Vec<FieldReport>,
}
