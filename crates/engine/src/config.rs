use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::error::EngineError;
use crate::field::{FieldKind, ALL_FIELDS};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Matching policy: which fields participate, how the name score is
/// blended, and the per-field decision thresholds. Every key is optional;
/// an empty document yields the default policy over all three fields.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub weights: NameWeights,
    /// Keyed by canonical field name. An explicit table restricts
    /// reconciliation to the listed fields; omitting it enables all three.
    #[serde(default = "default_fields")]
    pub fields: BTreeMap<String, FieldRule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldRule {
    /// Key under which the document extractor reports this field.
    /// Defaults to the canonical field name.
    #[serde(default)]
    pub document_key: Option<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

// ---------------------------------------------------------------------------
// Name weights
// ---------------------------------------------------------------------------

/// Blend of the character and token scores for the name field.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NameWeights {
    #[serde(rename = "char", default = "default_char_weight")]
    pub char_weight: f64,
    #[serde(rename = "token", default = "default_token_weight")]
    pub token_weight: f64,
}

impl Default for NameWeights {
    fn default() -> Self {
        Self {
            char_weight: default_char_weight(),
            token_weight: default_token_weight(),
        }
    }
}

fn default_char_weight() -> f64 {
    0.6
}

fn default_token_weight() -> f64 {
    0.4
}

fn default_name() -> String {
    "identity match".to_string()
}

fn default_fields() -> BTreeMap<String, FieldRule> {
    ALL_FIELDS
        .iter()
        .map(|kind| (kind.as_str().to_string(), FieldRule::default()))
        .collect()
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            weights: NameWeights::default(),
            fields: default_fields(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.fields.is_empty() {
            return Err(EngineError::ConfigValidation(
                "at least one field must be configured".into(),
            ));
        }

        // Field keys must name recognized kinds.
        for key in self.fields.keys() {
            key.parse::<FieldKind>()?;
        }

        let w = &self.weights;
        if !(0.0..=1.0).contains(&w.char_weight) || !(0.0..=1.0).contains(&w.token_weight) {
            return Err(EngineError::ConfigValidation(format!(
                "weights must lie within [0, 1], got char={} token={}",
                w.char_weight, w.token_weight
            )));
        }
        let sum = w.char_weight + w.token_weight;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(EngineError::ConfigValidation(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }

        for (key, rule) in &self.fields {
            if let Some(threshold) = rule.threshold {
                if !(0.0..=100.0).contains(&threshold) {
                    return Err(EngineError::ConfigValidation(format!(
                        "threshold for '{key}' must lie within [0, 100], got {threshold}"
                    )));
                }
            }
            if let Some(document_key) = &rule.document_key {
                if document_key.trim().is_empty() {
                    return Err(EngineError::ConfigValidation(format!(
                        "document_key for '{key}' must not be empty"
                    )));
                }
            }
        }

        // Two fields reading the same document key would reconcile one
        // extracted value twice.
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for kind in self.enabled_fields() {
            let document_key = self.document_key_for(kind);
            if !seen.insert(document_key) {
                return Err(EngineError::ConfigValidation(format!(
                    "document_key '{document_key}' is assigned to more than one field"
                )));
            }
        }

        Ok(())
    }

    /// Configured fields in canonical reporting order.
    pub fn enabled_fields(&self) -> Vec<FieldKind> {
        ALL_FIELDS
            .into_iter()
            .filter(|kind| self.fields.contains_key(kind.as_str()))
            .collect()
    }

    pub fn threshold_for(&self, kind: FieldKind) -> f64 {
        self.fields
            .get(kind.as_str())
            .and_then(|rule| rule.threshold)
            .unwrap_or_else(|| kind.default_threshold())
    }

    pub fn document_key_for(&self, kind: FieldKind) -> &str {
        self.fields
            .get(kind.as_str())
            .and_then(|rule| rule.document_key.as_deref())
            .unwrap_or_else(|| kind.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
