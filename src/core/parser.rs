use crate::domain::model::{CandidateCount, CandidateSet};
use serde::Deserialize;
use thiserror::Error;

/// Why a model response was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("response is not a valid JSON object: {0}")]
    Malformed(String),

    #[error("response is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("expected {expected} words, got {actual}")]
    WordCountMismatch { expected: usize, actual: usize },

    #[error("{words} words but {explanations} explanations")]
    ExplanationCountMismatch { words: usize, explanations: usize },
}

#[derive(Debug, Deserialize)]
struct RawCandidateSet {
    domain: Option<String>,
    sub_domain: Option<String>,
    difficulty_level: Option<serde_json::Value>,
    difficulty_levels: Option<serde_json::Value>,
    words: Option<Vec<String>>,
    explanations: Option<Vec<String>>,
}

/// Decodes and shape-checks one model response.
///
/// Term content is passed through as-is.
pub fn parse(raw: &str, expected: CandidateCount) -> Result<CandidateSet, ParseFailure> {
    let body = strip_code_fence(raw);
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ParseFailure::Malformed(e.to_string()))?;
    // derived Deserialize would also take a struct written as a JSON array
    if !value.is_object() {
        return Err(ParseFailure::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    let parsed: RawCandidateSet =
        serde_json::from_value(value).map_err(|e| ParseFailure::Malformed(e.to_string()))?;

    let domain = parsed.domain.ok_or(ParseFailure::MissingField("domain"))?;
    let words = parsed.words.ok_or(ParseFailure::MissingField("words"))?;
    let explanations = parsed
        .explanations
        .ok_or(ParseFailure::MissingField("explanations"))?;

    if words.len() != expected.size() {
        return Err(ParseFailure::WordCountMismatch {
            expected: expected.size(),
            actual: words.len(),
        });
    }
    if explanations.len() != words.len() {
        return Err(ParseFailure::ExplanationCountMismatch {
            words: words.len(),
            explanations: explanations.len(),
        });
    }

    // metadata only; an odd value here is not worth failing the request
    let difficulty_level = parsed
        .difficulty_level
        .or(parsed.difficulty_levels)
        .and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

    Ok(CandidateSet {
        domain,
        sub_domain: parsed.sub_domain,
        difficulty_level,
        words,
        explanations,
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
