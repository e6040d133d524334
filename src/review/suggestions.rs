use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::warn;

use crate::llm::strip_code_fences;

/// One model-proposed inline comment, decoded from the JSON array the
/// review call returns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Suggestion {
    pub line: u64,
    pub comment: String,
}

/// Parse the model reply into suggestions.
///
/// Strict-then-fallback: the reply must decode to a JSON array (anything
/// else yields `None` and the file gets zero comments), but each element is
/// decoded individually so one malformed entry doesn't sink the batch.
pub fn parse_suggestions(raw: &str) -> Option<Vec<Suggestion>> {
    let text = strip_code_fences(raw);
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            warn!(%err, "model reply is not valid JSON");
            return None;
        }
    };
    let Some(entries) = value.as_array() else {
        warn!("model reply is not a JSON array");
        return None;
    };
    Some(
        entries
            .iter()
            .filter_map(|entry| match serde_json::from_value(entry.clone()) {
                Ok(suggestion) => Some(suggestion),
                Err(err) => {
                    warn!(%err, "dropping malformed suggestion entry");
                    None
                }
            })
            .collect(),
    )
}

/// Keep only suggestions targeting commentable (added) lines, then truncate
/// to the per-file cap. Order is preserved; there is no re-ranking.
pub fn validate_suggestions(
    suggestions: Vec<Suggestion>,
    valid_lines: &BTreeSet<u64>,
    max_comments: usize,
) -> Vec<Suggestion> {
    suggestions
        .into_iter()
        .filter(|s| {
            let valid = valid_lines.contains(&s.line);
            if !valid {
                warn!(line = s.line, "dropping suggestion for line not in diff");
            }
            valid
        })
        .take(max_comments)
        .collect()
}

/// Trim the comment and make sure it reads as a sentence.
pub fn normalize_comment(comment: &str) -> String {
    let trimmed = comment.trim();
    if trimmed.is_empty() || trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}
