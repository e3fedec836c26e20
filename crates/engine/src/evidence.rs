use std::collections::BTreeMap;

use crate::model::{FieldBucket, FieldReport, VerdictSummary};

/// Compute summary statistics from per-field reports.
pub fn compute_summary(fields: &[FieldReport]) -> VerdictSummary {
    let mut bucket_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut matched = 0;
    let mut mismatched = 0;
    let mut user_blank = 0;

    for report in fields {
        *bucket_counts.entry(report.bucket.to_string()).or_insert(0) += 1;

        match report.bucket {
            FieldBucket::Matched => matched += 1,
            FieldBucket::Mismatched => mismatched += 1,
            FieldBucket::UserBlank => user_blank += 1,
        }
    }

    VerdictSummary {
        fields_total: fields.len(),
        matched,
        mismatched,
        user_blank,
        bucket_counts,
    }
}
