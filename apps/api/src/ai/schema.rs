//! Response schemas for the three JSON-producing AI operations, plus the validator
//! that turns untrusted provider output into them.
//!
//! Validation walks a `serde_json::Value` by hand so failures can name the exact
//! field path (`improvementSuggestions[1].priority`) rather than a serde position.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSuggestion {
    pub original: String,
    pub improved: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSuggestion {
    pub section: String,
    pub content: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub keywords: Vec<String>,
    pub suggestions: Vec<KeywordSuggestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    pub section: String,
    pub suggestion: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    /// 0 – 100
    pub overall_score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
}

/// A provider payload that does not match the expected shape.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid field `{path}`: expected {expected}")]
pub struct SchemaError {
    pub path: String,
    pub expected: &'static str,
}

impl SchemaError {
    fn new(path: impl Into<String>, expected: &'static str) -> Self {
        Self {
            path: path.into(),
            expected,
        }
    }
}

/// A response type that can be validated out of an untyped JSON value.
pub trait Schema: Sized {
    fn validate(value: &Value) -> Result<Self, SchemaError>;
}

impl Schema for ContentSuggestion {
    fn validate(value: &Value) -> Result<Self, SchemaError> {
        let obj = as_object(value, "$")?;
        Ok(ContentSuggestion {
            original: required_str(obj, "", "original")?,
            improved: required_str(obj, "", "improved")?,
            explanation: required_str(obj, "", "explanation")?,
        })
    }
}

impl Schema for KeywordAnalysis {
    fn validate(value: &Value) -> Result<Self, SchemaError> {
        let obj = as_object(value, "$")?;

        let mut seen = HashSet::new();
        let keywords = string_array(obj, "", "keywords")?
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .collect();

        let suggestions = required_array(obj, "", "suggestions")?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("suggestions[{i}]");
                let entry = as_object(item, &path)?;
                Ok(KeywordSuggestion {
                    section: required_str(entry, &path, "section")?,
                    content: required_str(entry, &path, "content")?,
                    reason: required_str(entry, &path, "reason")?,
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        Ok(KeywordAnalysis {
            keywords,
            suggestions,
        })
    }
}

impl Schema for ResumeAnalysis {
    fn validate(value: &Value) -> Result<Self, SchemaError> {
        let obj = as_object(value, "$")?;

        let overall_score = score(obj)?;
        let strengths = string_array(obj, "", "strengths")?;
        let weaknesses = string_array(obj, "", "weaknesses")?;

        let improvement_suggestions = required_array(obj, "", "improvementSuggestions")?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("improvementSuggestions[{i}]");
                let entry = as_object(item, &path)?;
                let priority_raw = required_str(entry, &path, "priority")?;
                let priority = Priority::parse(&priority_raw).ok_or_else(|| {
                    SchemaError::new(
                        field_path(&path, "priority"),
                        "one of \"high\", \"medium\", \"low\"",
                    )
                })?;
                Ok(ImprovementSuggestion {
                    section: required_str(entry, &path, "section")?,
                    suggestion: required_str(entry, &path, "suggestion")?,
                    priority,
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        Ok(ResumeAnalysis {
            overall_score,
            strengths,
            weaknesses,
            improvement_suggestions,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field helpers
// ────────────────────────────────────────────────────────────────────────────

fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, SchemaError> {
    value
        .as_object()
        .ok_or_else(|| SchemaError::new(path, "an object"))
}

fn required_str(obj: &Map<String, Value>, parent: &str, key: &str) -> Result<String, SchemaError> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SchemaError::new(field_path(parent, key), "a string"))
}

fn required_array<'a>(
    obj: &'a Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<&'a Vec<Value>, SchemaError> {
    obj.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaError::new(field_path(parent, key), "an array"))
}

fn string_array(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<Vec<String>, SchemaError> {
    let path = field_path(parent, key);
    required_array(obj, parent, key)?
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| SchemaError::new(format!("{path}[{i}]"), "a string"))
        })
        .collect()
}

/// Fractional scores are rounded; anything outside 0..=100 is rejected.
fn score(obj: &Map<String, Value>) -> Result<u8, SchemaError> {
    let raw = obj
        .get("overallScore")
        .and_then(Value::as_f64)
        .ok_or_else(|| SchemaError::new("overallScore", "a number"))?;
    let rounded = raw.round();
    if !(0.0..=100.0).contains(&rounded) {
        return Err(SchemaError::new(
            "overallScore",
            "a number between 0 and 100",
        ));
    }
    Ok(rounded as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analysis_fixture() -> Value {
        json!({
            "overallScore": 82,
            "strengths": ["Clear structure"],
            "weaknesses": ["Few metrics"],
            "improvementSuggestions": [
                {"section": "Experience", "suggestion": "Quantify impact", "priority": "high"},
                {"section": "Summary", "suggestion": "Tighten wording", "priority": "low"}
            ]
        })
    }

    #[test]
    fn test_content_suggestion_valid() {
        let value = json!({"original": "a", "improved": "b", "explanation": "c", "extra": 1});
        let parsed = ContentSuggestion::validate(&value).unwrap();
        assert_eq!(parsed.improved, "b");
    }

    #[test]
    fn test_content_suggestion_missing_field_named() {
        let value = json!({"original": "a", "explanation": "c"});
        let err = ContentSuggestion::validate(&value).unwrap_err();
        assert_eq!(err.path, "improved");
    }

    #[test]
    fn test_content_suggestion_wrong_type() {
        let value = json!({"original": "a", "improved": 5, "explanation": "c"});
        let err = ContentSuggestion::validate(&value).unwrap_err();
        assert_eq!(err.path, "improved");
        assert_eq!(err.expected, "a string");
    }

    #[test]
    fn test_non_object_root_rejected() {
        let err = ContentSuggestion::validate(&json!(["a"])).unwrap_err();
        assert_eq!(err.path, "$");
    }

    #[test]
    fn test_keyword_analysis_dedups_preserving_order() {
        let value = json!({
            "keywords": ["agile", "scrum", "agile", "kanban"],
            "suggestions": []
        });
        let parsed = KeywordAnalysis::validate(&value).unwrap();
        assert_eq!(parsed.keywords, vec!["agile", "scrum", "kanban"]);
    }

    #[test]
    fn test_keyword_analysis_nested_path_in_error() {
        let value = json!({
            "keywords": ["agile"],
            "suggestions": [
                {"section": "Summary", "content": "x", "reason": "y"},
                {"section": "Skills", "content": "x"}
            ]
        });
        let err = KeywordAnalysis::validate(&value).unwrap_err();
        assert_eq!(err.path, "suggestions[1].reason");
    }

    #[test]
    fn test_keyword_analysis_non_string_keyword() {
        let value = json!({"keywords": ["agile", 3], "suggestions": []});
        let err = KeywordAnalysis::validate(&value).unwrap_err();
        assert_eq!(err.path, "keywords[1]");
    }

    #[test]
    fn test_resume_analysis_valid() {
        let parsed = ResumeAnalysis::validate(&analysis_fixture()).unwrap();
        assert_eq!(parsed.overall_score, 82);
        assert_eq!(parsed.improvement_suggestions[0].priority, Priority::High);
        assert_eq!(parsed.improvement_suggestions[1].priority, Priority::Low);
    }

    #[test]
    fn test_resume_analysis_rejects_score_above_100() {
        let mut value = analysis_fixture();
        value["overallScore"] = json!(101);
        let err = ResumeAnalysis::validate(&value).unwrap_err();
        assert_eq!(err.path, "overallScore");
    }

    #[test]
    fn test_resume_analysis_rejects_negative_score() {
        let mut value = analysis_fixture();
        value["overallScore"] = json!(-3);
        assert!(ResumeAnalysis::validate(&value).is_err());
    }

    #[test]
    fn test_resume_analysis_rejects_string_score() {
        let mut value = analysis_fixture();
        value["overallScore"] = json!("82");
        let err = ResumeAnalysis::validate(&value).unwrap_err();
        assert_eq!(err.expected, "a number");
    }

    #[test]
    fn test_resume_analysis_rounds_fractional_score() {
        let mut value = analysis_fixture();
        value["overallScore"] = json!(77.6);
        assert_eq!(ResumeAnalysis::validate(&value).unwrap().overall_score, 78);
    }

    #[test]
    fn test_resume_analysis_rejects_unknown_priority() {
        let mut value = analysis_fixture();
        value["improvementSuggestions"][1]["priority"] = json!("urgent");
        let err = ResumeAnalysis::validate(&value).unwrap_err();
        assert_eq!(err.path, "improvementSuggestions[1].priority");
    }

    #[test]
    fn test_resume_analysis_serializes_camel_case() {
        let parsed = ResumeAnalysis::validate(&analysis_fixture()).unwrap();
        let out = serde_json::to_value(&parsed).unwrap();
        assert_eq!(out["overallScore"], 82);
        assert_eq!(out["improvementSuggestions"][0]["priority"], "high");
    }
}
