use std::collections::BTreeSet;

use crate::config::NameWeights;
use crate::diff;
use crate::field::FieldKind;

/// Scores for one normalized pair. `score` is the value compared against
/// the field threshold; `token_score` is only present for field kinds that
/// blend it in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub char_score: f64,
    pub token_score: Option<f64>,
    pub score: f64,
}

/// Edit-based ratio `2 * M / (len(a) + len(b)) * 100` over Unicode scalar
/// values, with M the total matched length found by the block-matching
/// engine. Both empty scores 100.0, exactly one empty scores 0.0.
///
/// The greedy block search is direction-sensitive when equally long
/// candidate runs compete, so M is taken from the better of the two scan
/// directions. That keeps the ratio symmetric in its arguments.
pub fn char_similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 100.0;
    }
    let matched = diff::match_total(&a_chars, &b_chars).max(diff::match_total(&b_chars, &a_chars));
    2.0 * matched as f64 / total as f64 * 100.0
}

/// Jaccard ratio over whitespace-split token sets, scaled to [0, 100].
/// Duplicate tokens collapse and order is irrelevant, so a swapped-order
/// name still scores 100.0.
pub fn token_similarity(a: &str, b: &str) -> f64 {
    let a_tokens: BTreeSet<&str> = a.split_whitespace().collect();
    let b_tokens: BTreeSet<&str> = b.split_whitespace().collect();
    if a_tokens.is_empty() && b_tokens.is_empty() {
        return 100.0;
    }
    let intersection = a_tokens.intersection(&b_tokens).count();
    let union = a_tokens.union(&b_tokens).count();
    intersection as f64 / union as f64 * 100.0
}

/// Score one pair of normalized values according to its field kind.
pub fn score_field(
    kind: FieldKind,
    user: &str,
    document: &str,
    weights: &NameWeights,
) -> ScoreBreakdown {
    let char_score = char_similarity(user, document);
    if kind.uses_token_score() {
        let token_score = token_similarity(user, document);
        ScoreBreakdown {
            char_score,
            token_score: Some(token_score),
            score: weights.char_weight * char_score + weights.token_weight * token_score,
        }
    } else {
        ScoreBreakdown {
            char_score,
            token_score: None,
            score: char_score,
        }
    }
}
