//! Turning raw model text into JSON values and bullet lists.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// How a raw completion was turned into JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The whole text (minus Markdown code fences) was valid JSON.
    Strict(Value),
    /// The text was not JSON, but a balanced `{...}` substring inside it was.
    ExtractedFallback(Value),
    Failed,
}

impl ParseOutcome {
    pub fn mode(&self) -> &'static str {
        match self {
            ParseOutcome::Strict(_) => "strict",
            ParseOutcome::ExtractedFallback(_) => "extracted",
            ParseOutcome::Failed => "failed",
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            ParseOutcome::Strict(v) | ParseOutcome::ExtractedFallback(v) => Some(v),
            ParseOutcome::Failed => None,
        }
    }
}

pub fn parse_json_response(text: &str) -> ParseOutcome {
    if let Ok(value) = serde_json::from_str::<Value>(strip_json_fences(text)) {
        return ParseOutcome::Strict(value);
    }

    match extract_json_object(text) {
        Some(value) => ParseOutcome::ExtractedFallback(value),
        None => ParseOutcome::Failed,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Finds the first balanced `{...}` span that parses as JSON.
///
/// Braces inside JSON string literals are ignored while scanning. If the span
/// starting at one `{` does not parse, scanning resumes at the next `{`.
fn extract_json_object(text: &str) -> Option<Value> {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(end) = balanced_end(&text[start..]) {
            if let Ok(value) = serde_json::from_str::<Value>(&text[start..start + end]) {
                return Some(value);
            }
        }
        search_from = start + 1;
    }
    None
}

/// Byte length of the balanced object at the start of `s` (which begins with `{`).
fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•\-*]\s*").expect("bullet marker regex is valid"));

/// Keeps lines starting with `•`, `-` or `*` (after trimming) and strips the marker.
/// Everything else is dropped.
pub fn extract_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| BULLET_MARKER.is_match(line))
        .map(|line| BULLET_MARKER.replace(line, "").trim().to_string())
        .collect()
}
