use std::collections::BTreeSet;

/// Hard cap on diff records handed to the model. Lines past this point are
/// invisible to the reviewer; callers must not assume they were seen.
pub const MAX_CONTEXT_LINES: usize = 300;

/// Origin of a line within the new-file side of a unified diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrigin {
    Added,
    Context,
}

/// One line of a file's patch, addressed by its line number in the new
/// file version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    /// Line number in the new file version
    pub number: u64,
    /// Line text with the diff marker stripped
    pub content: String,
    /// Whether the line was added or is unchanged context
    pub origin: LineOrigin,
}

/// Result of parsing one file's patch: the ordered context records plus the
/// set of line numbers an inline comment may attach to.
#[derive(Debug, Clone, Default)]
pub struct ParsedPatch {
    pub lines: Vec<DiffLine>,
    pub valid_comment_lines: BTreeSet<u64>,
}

impl ParsedPatch {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True when the patch contains at least one added line; a file with only
    /// context lines has nothing to review.
    pub fn has_added_lines(&self) -> bool {
        self.lines.iter().any(|l| l.origin == LineOrigin::Added)
    }

    /// Render the records as `Line N: content` text for the review prompt.
    pub fn diff_context(&self) -> String {
        self.lines
            .iter()
            .map(|l| format!("Line {}: {}", l.number, l.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse a unified-diff patch for a single file.
///
/// Walks the patch keeping a running new-file line counter: a `@@` hunk
/// header resets it to `new_start - 1`, added (`+`) and context (` `) lines
/// advance it, removed lines and metadata never touch it. Only added lines
/// are eligible for inline comments (GitHub's side="RIGHT" contract), so only
/// their numbers enter `valid_comment_lines`. The record sequence is capped
/// at [`MAX_CONTEXT_LINES`] to bound prompt size.
///
/// A patch with no hunk headers yields an empty result; a malformed hunk
/// header leaves the counter unchanged rather than failing the file.
pub fn parse_patch(patch: &str) -> ParsedPatch {
    let mut parsed = ParsedPatch::default();
    let mut new_line: u64 = 0;

    for line in patch.lines() {
        if line.starts_with("@@") {
            if let Some(start) = hunk_new_start(line) {
                new_line = start.saturating_sub(1);
            }
        } else if let Some(content) = line.strip_prefix('+') {
            new_line += 1;
            parsed.lines.push(DiffLine {
                number: new_line,
                content: content.to_string(),
                origin: LineOrigin::Added,
            });
            parsed.valid_comment_lines.insert(new_line);
        } else if let Some(content) = line.strip_prefix(' ') {
            new_line += 1;
            parsed.lines.push(DiffLine {
                number: new_line,
                content: content.to_string(),
                origin: LineOrigin::Context,
            });
        }
        // Removed lines ('-') and metadata don't advance the new-file counter.
    }

    parsed.lines.truncate(MAX_CONTEXT_LINES);
    parsed
}

/// Extract the new-file starting line from a `@@ -a,b +c,d @@` hunk header.
/// Returns None when the header doesn't carry a parseable `+start` range.
fn hunk_new_start(header: &str) -> Option<u64> {
    let inner = header.strip_prefix("@@")?;
    let inner = match inner.find("@@") {
        Some(end) => &inner[..end],
        None => inner,
    };
    let range = inner.split_whitespace().find_map(|p| p.strip_prefix('+'))?;
    let start = match range.split_once(',') {
        Some((start, _count)) => start,
        None => range,
    };
    start.parse::<u64>().ok()
}
