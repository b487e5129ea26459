//! Normalization of quiz payloads.
//!
//! Two record conventions are accepted and may be mixed within one record:
//!
//! * flat: `{"Q-1": "...", "OP-A": "...", .., "OP-D": "...", "Answer": "B"}`
//! * nested: `{"question": "...", "options": {"A": "..", ..}, "answer": "B"}`
//!
//! Each field is looked up flat-first, then nested.

use serde_json::{Map, Value};

use quiz_core::model::{OptionLabel, Question, QuizSet};

use crate::error::{EntryError, WireError};

/// Key under which a wrapped payload carries its question list.
pub const WRAPPER_KEY: &str = "Quiz";

/// Turn a decoded payload (bare list or `{"Quiz": [...]}`) into a `QuizSet`.
///
/// # Errors
///
/// Returns `WireError` when the payload has no question list, the list is
/// empty, or any record matches neither convention.
pub fn normalize_payload(payload: &Value) -> Result<QuizSet, WireError> {
    let records = match payload {
        Value::Array(items) => items,
        Value::Object(map) => match map.get(WRAPPER_KEY) {
            Some(Value::Array(items)) => items,
            _ => return Err(WireError::NotAList { key: WRAPPER_KEY }),
        },
        _ => return Err(WireError::NotAList { key: WRAPPER_KEY }),
    };

    let questions = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            normalize_record(record).map_err(|source| WireError::Entry { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    QuizSet::new(questions).map_err(|_| WireError::Empty)
}

/// Normalize a single question record.
///
/// # Errors
///
/// Returns `EntryError` naming the first field that could not be resolved.
pub fn normalize_record(record: &Value) -> Result<Question, EntryError> {
    let Value::Object(map) = record else {
        return Err(EntryError::NotAnObject);
    };

    let prompt = flat_prompt(map)
        .or_else(|| text(map.get("question")))
        .ok_or(EntryError::MissingPrompt)?;

    let nested_options = map.get("options").and_then(Value::as_object);
    let mut options: [String; 4] = Default::default();
    for (slot, label) in options.iter_mut().zip(OptionLabel::ALL) {
        *slot = text(map.get(&format!("OP-{label}")))
            .or_else(|| nested_options.and_then(|opts| text(opts.get(label.as_str()))))
            .ok_or(EntryError::MissingOption(label))?;
    }

    let answer = text(map.get("Answer"))
        .or_else(|| text(map.get("answer")))
        .ok_or(EntryError::MissingAnswer)?;
    let correct = resolve_answer(&answer, &options)?;

    Ok(Question::new(prompt, options, correct)?)
}

/// The first `Q-<n>` field holding text. Records normally carry exactly one.
fn flat_prompt(map: &Map<String, Value>) -> Option<String> {
    map.iter()
        .filter(|(key, _)| is_flat_prompt_key(key))
        .find_map(|(_, value)| text(Some(value)))
}

fn is_flat_prompt_key(key: &str) -> bool {
    key.strip_prefix("Q-")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Strings are taken as-is; numbers are rendered. Blank text counts as absent.
fn text(value: Option<&Value>) -> Option<String> {
    let raw = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!raw.is_empty()).then_some(raw)
}

/// The answer is normally a label; some feeds repeat the option text instead.
fn resolve_answer(answer: &str, options: &[String; 4]) -> Result<OptionLabel, EntryError> {
    if let Ok(label) = answer.parse::<OptionLabel>() {
        return Ok(label);
    }
    OptionLabel::ALL
        .into_iter()
        .zip(options)
        .find_map(|(label, text)| (text.trim() == answer.trim()).then_some(label))
        .ok_or_else(|| EntryError::UnknownAnswer(answer.to_string()))
}
