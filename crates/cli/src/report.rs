//! Human rendering of a reconciliation verdict.
//!
//! Pure functions of the verdict, so the report can be unit-tested without
//! a terminal. The JSON output is the machine contract; this is the view a
//! reviewer reads on stderr.

use idrecon_engine::diff::{DiffSegment, SegmentKind};
use idrecon_engine::model::{FieldReport, Verdict};

/// Render the full stderr report: one block per field, then the overall
/// verdict line.
pub fn render_verdict(verdict: &Verdict) -> String {
    let mut out = String::new();
    for report in &verdict.fields {
        out.push_str(&render_field(report));
    }

    let s = &verdict.summary;
    let overall = if verdict.overall_pass { "PASS" } else { "FAIL" };
    out.push_str(&format!(
        "verdict: {} — {} matched, {} mismatched, {} blank of {} fields\n",
        overall, s.matched, s.mismatched, s.user_blank, s.fields_total,
    ));
    out
}

/// One field: a score line, then the raw-value diff indented under it.
fn render_field(report: &FieldReport) -> String {
    let compare = if report.matched { ">=" } else { "< " };
    let mut block = format!(
        "{:<14} {:<11} {:>5.1} {} {:.1}",
        report.field.as_str(),
        report.bucket.to_string(),
        report.score,
        compare,
        report.threshold,
    );
    if let Some(token) = report.token_score {
        block.push_str(&format!(
            "  (char {:.1}, token {:.1})",
            report.char_score, token
        ));
    }
    block.push('\n');
    block.push_str("  ");
    block.push_str(&wdiff(&report.diff));
    block.push('\n');
    block
}

/// wdiff-style markup: `[-…-]` is user-only text, `{+…+}` document-only.
pub fn wdiff(segments: &[DiffSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment.kind {
            SegmentKind::Equal => out.push_str(&segment.user_text),
            SegmentKind::Replace => {
                out.push_str("[-");
                out.push_str(&segment.user_text);
                out.push_str("-]{+");
                out.push_str(&segment.document_text);
                out.push_str("+}");
            }
            SegmentKind::DeleteFromUser => {
                out.push_str("[-");
                out.push_str(&segment.user_text);
                out.push_str("-]");
            }
            SegmentKind::InsertFromDocument => {
                out.push_str("{+");
                out.push_str(&segment.document_text);
                out.push_str("+}");
            }
        }
    }
    out
}
