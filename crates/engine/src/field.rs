use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::FieldPair;

/// The closed set of identity fields the engine reconciles.
///
/// Each kind carries its own normalization rule and default threshold,
/// dispatched through exhaustive matches — adding a field kind is a
/// compile-checked, localized change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Name,
    IdNumber,
    DateOfBirth,
}

/// Canonical field order used for reporting.
pub const ALL_FIELDS: [FieldKind; 3] = [
    FieldKind::Name,
    FieldKind::IdNumber,
    FieldKind::DateOfBirth,
];

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::IdNumber => "id_number",
            Self::DateOfBirth => "date_of_birth",
        }
    }

    /// Normalize a raw field value into its canonical comparable form.
    ///
    /// Total over all inputs: any string, including the empty string, maps
    /// to a defined result, and the empty string only ever maps to itself.
    pub fn normalize(&self, raw: &str) -> String {
        match self {
            // Trim, lowercase, collapse internal whitespace runs.
            Self::Name => raw
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
            // Identifier digits must survive byte-for-byte; only whitespace goes.
            Self::IdNumber => raw.chars().filter(|c| !c.is_whitespace()).collect(),
            // No reformatting: format agreement is a scoring signal, not corrected.
            Self::DateOfBirth => raw.trim().to_string(),
        }
    }

    pub fn normalize_pair(&self, pair: &FieldPair) -> NormalizedPair {
        NormalizedPair {
            user: self.normalize(&pair.user_value),
            document: self.normalize(&pair.document_value),
        }
    }

    /// Default decision threshold; the id number is near-exact because a
    /// single-digit transcription error must not pass an identity check.
    pub fn default_threshold(&self) -> f64 {
        match self {
            Self::Name => 90.0,
            Self::IdNumber => 98.0,
            Self::DateOfBirth => 95.0,
        }
    }

    /// Whether the token-level score participates in this field's decision.
    pub fn uses_token_score(&self) -> bool {
        matches!(self, Self::Name)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "id_number" => Ok(Self::IdNumber),
            "date_of_birth" => Ok(Self::DateOfBirth),
            other => Err(EngineError::UnknownField(other.to_string())),
        }
    }
}

/// A field pair after normalization; immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPair {
    pub user: String,
    pub document: String,
}
