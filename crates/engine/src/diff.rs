//! Character-level alignment between a user-typed value and a
//! document-extracted value.
//!
//! One block-matching engine feeds both the similarity ratio and the
//! rendered diff, so the score a reviewer sees and the highlighting they
//! see can never disagree.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Equal,
    Replace,
    DeleteFromUser,
    InsertFromDocument,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Replace => "replace",
            Self::DeleteFromUser => "delete_from_user",
            Self::InsertFromDocument => "insert_from_document",
        }
    }
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One aligned span. `InsertFromDocument` leaves `user_text` empty,
/// `DeleteFromUser` leaves `document_text` empty, `Equal` carries the same
/// text on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    pub kind: SegmentKind,
    pub user_text: String,
    pub document_text: String,
}

// ---------------------------------------------------------------------------
// Matching blocks
// ---------------------------------------------------------------------------

/// A maximal run of identical characters at `user[user_start..+len]` and
/// `document[document_start..+len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Block {
    pub user_start: usize,
    pub document_start: usize,
    pub len: usize,
}

/// Longest contiguous match inside the window, ties resolved to the
/// leftmost start in the user string, then the leftmost in the document
/// string. Both resolutions fall out of the strict `>` below: the scan
/// visits user positions, then document positions, in ascending order.
fn longest_block(
    user: &[char],
    document: &[char],
    ulo: usize,
    uhi: usize,
    dlo: usize,
    dhi: usize,
) -> Block {
    let mut best = Block {
        user_start: ulo,
        document_start: dlo,
        len: 0,
    };
    let width = dhi - dlo;
    // run_len[j - dlo] = length of the common run ending at (i - 1, j - 1).
    let mut run_len = vec![0usize; width];

    for i in ulo..uhi {
        let mut next_run = vec![0usize; width];
        for j in dlo..dhi {
            if user[i] != document[j] {
                continue;
            }
            let k = if j > dlo { run_len[j - dlo - 1] } else { 0 } + 1;
            next_run[j - dlo] = k;
            if k > best.len {
                best = Block {
                    user_start: i + 1 - k,
                    document_start: j + 1 - k,
                    len: k,
                };
            }
        }
        run_len = next_run;
    }

    best
}

/// All matching blocks, ordered and non-overlapping on both sides.
///
/// Finds the longest match of the full window, then works the unmatched
/// prefix and suffix windows until no match of length >= 1 remains.
/// Blocks touching on both sides are merged, so the equal segments they
/// become are never adjacent.
pub(crate) fn matching_blocks(user: &[char], document: &[char]) -> Vec<Block> {
    let mut windows = vec![(0usize, user.len(), 0usize, document.len())];
    let mut found: Vec<Block> = Vec::new();

    while let Some((ulo, uhi, dlo, dhi)) = windows.pop() {
        let block = longest_block(user, document, ulo, uhi, dlo, dhi);
        if block.len == 0 {
            continue;
        }
        // A one-sided prefix or suffix window cannot contain a match.
        if ulo < block.user_start && dlo < block.document_start {
            windows.push((ulo, block.user_start, dlo, block.document_start));
        }
        if block.user_start + block.len < uhi && block.document_start + block.len < dhi {
            windows.push((
                block.user_start + block.len,
                uhi,
                block.document_start + block.len,
                dhi,
            ));
        }
        found.push(block);
    }

    found.sort_by_key(|b| (b.user_start, b.document_start));

    let mut blocks: Vec<Block> = Vec::with_capacity(found.len());
    for b in found {
        match blocks.last_mut() {
            Some(prev)
                if prev.user_start + prev.len == b.user_start
                    && prev.document_start + prev.len == b.document_start =>
            {
                prev.len += b.len;
            }
            _ => blocks.push(b),
        }
    }
    blocks
}

/// Total matched character count M used by the similarity ratio.
pub(crate) fn match_total(user: &[char], document: &[char]) -> usize {
    matching_blocks(user, document).iter().map(|b| b.len).sum()
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Gap-free alignment of two raw strings.
///
/// The concatenated `user_text` of all segments reconstructs `user`
/// exactly; likewise `document_text` for `document`. Operates on Unicode
/// scalar values, so multi-byte input never splits mid-character.
pub fn align(user: &str, document: &str) -> Vec<DiffSegment> {
    fn span(chars: &[char], lo: usize, hi: usize) -> String {
        chars[lo..hi].iter().collect()
    }

    let user_chars: Vec<char> = user.chars().collect();
    let document_chars: Vec<char> = document.chars().collect();
    let blocks = matching_blocks(&user_chars, &document_chars);

    let mut segments = Vec::new();
    let mut u = 0usize;
    let mut d = 0usize;

    for block in &blocks {
        push_gap(
            &mut segments,
            span(&user_chars, u, block.user_start),
            span(&document_chars, d, block.document_start),
        );
        let equal = span(&user_chars, block.user_start, block.user_start + block.len);
        segments.push(DiffSegment {
            kind: SegmentKind::Equal,
            user_text: equal.clone(),
            document_text: equal,
        });
        u = block.user_start + block.len;
        d = block.document_start + block.len;
    }
    push_gap(
        &mut segments,
        span(&user_chars, u, user_chars.len()),
        span(&document_chars, d, document_chars.len()),
    );

    segments
}

fn push_gap(segments: &mut Vec<DiffSegment>, user_text: String, document_text: String) {
    let kind = match (user_text.is_empty(), document_text.is_empty()) {
        (true, true) => return,
        (false, false) => SegmentKind::Replace,
        (false, true) => SegmentKind::DeleteFromUser,
        (true, false) => SegmentKind::InsertFromDocument,
    };
    segments.push(DiffSegment {
        kind,
        user_text,
        document_text,
    });
}
