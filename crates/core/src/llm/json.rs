use crate::domain::analysis::{AnalysisResult, MAX_CONFIDENCE, MIN_CONFIDENCE};
use crate::error::ParseError;
use serde_json::{Map, Value};

pub const SUMMARY_UNAVAILABLE: &str = "Analysis summary unavailable";
pub const KEY_INSIGHTS_UNAVAILABLE: &str = "Key insights unavailable";
pub const RECOMMENDATIONS_UNAVAILABLE: &str = "Recommendations unavailable";
pub const DEFAULT_CONFIDENCE: u8 = 5;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Pick the part of a model reply that should hold the JSON payload.
pub fn extract_json(text: &str) -> &str {
    if let Some((_, after)) = text.split_once(JSON_FENCE) {
        return after.split(FENCE).next().unwrap_or(after);
    }

    if let Some((_, after)) = text.split_once(FENCE) {
        let inner = after.split(FENCE).next().unwrap_or(after);
        return strip_info_string(inner);
    }

    text
}

// "```JSON\n{...}" or "```javascript\n{...}": drop the language tag line.
fn strip_info_string(inner: &str) -> &str {
    let Some((first_line, rest)) = inner.split_once('\n') else {
        return inner;
    };
    let tag = first_line.trim();
    if tag.starts_with('{') || tag.starts_with('[') {
        inner
    } else {
        rest
    }
}

// Best-effort recovery for prose around an object: first '{' to last '}'.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

pub fn normalize(raw: &str) -> Result<AnalysisResult, ParseError> {
    let extracted = extract_json(raw).trim();

    let parsed = match serde_json::from_str::<Value>(extracted) {
        Ok(v) => v,
        Err(first_err) => brace_span(extracted)
            .and_then(|span| serde_json::from_str::<Value>(span).ok())
            .ok_or_else(|| ParseError {
                detail: format!("reply is not valid JSON: {first_err}"),
                raw_output: raw.to_string(),
            })?,
    };

    let Value::Object(fields) = parsed else {
        return Err(ParseError {
            detail: "reply JSON is not an object".to_string(),
            raw_output: raw.to_string(),
        });
    };

    Ok(coerce_fields(&fields))
}

/// Each field falls back on its own; one malformed field never discards the others.
fn coerce_fields(fields: &Map<String, Value>) -> AnalysisResult {
    AnalysisResult {
        summary: coerce_summary(fields.get("summary")),
        key_insights: coerce_lines(fields.get("keyInsights"), KEY_INSIGHTS_UNAVAILABLE),
        recommendations: coerce_lines(fields.get("recommendations"), RECOMMENDATIONS_UNAVAILABLE),
        confidence: coerce_confidence(fields.get("confidence")),
    }
}

fn coerce_summary(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => SUMMARY_UNAVAILABLE.to_string(),
    }
}

fn coerce_lines(value: Option<&Value>, unavailable: &str) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return vec![unavailable.to_string()];
    };

    let lines: Vec<String> = items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        vec![unavailable.to_string()]
    } else {
        lines
    }
}

fn coerce_confidence(value: Option<&Value>) -> u8 {
    match value.and_then(Value::as_f64) {
        Some(n) => n
            .clamp(f64::from(MIN_CONFIDENCE), f64::from(MAX_CONFIDENCE))
            .round() as u8,
        None => DEFAULT_CONFIDENCE,
    }
}
