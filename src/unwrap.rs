//! Extraction of a single answer string from loosely-shaped provider payloads.
//!
//! Self-hosted inference servers disagree on where the generated text lives
//! (`generated_text`, `text`, `content`, OpenAI-style `choices`, ...). Instead
//! of nested conditionals, each candidate location is a [`Probe`]: a key to
//! look up on the top-level object and an extractor applied to its value.
//! Probes are tried in order and the first hit wins.

use serde_json::Value;

type Extractor = fn(&Value) -> Option<String>;

/// A single `(key, extractor)` lookup against a JSON object.
#[derive(Clone, Copy)]
pub struct Probe {
    key: &'static str,
    extract: Extractor,
}

impl Probe {
    /// Accepts whatever value sits under `key`.
    pub const fn field(key: &'static str) -> Self {
        Self {
            key,
            extract: value_text,
        }
    }

    /// Uses a custom extractor on the value under `key`.
    pub const fn with(key: &'static str, extract: Extractor) -> Self {
        Self { key, extract }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    fn apply(&self, object: &serde_json::Map<String, Value>) -> Option<String> {
        object.get(self.key).and_then(self.extract)
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe").field("key", &self.key).finish()
    }
}

/// Probes used for answers returned by the model under evaluation.
pub const ANSWER_PROBES: &[Probe] = &[
    Probe::field("generated_text"),
    Probe::field("text"),
    Probe::field("content"),
    Probe::field("message"),
    Probe::field("response"),
];

/// Probes for an OpenAI-style chat-completions body.
pub const CHAT_COMPLETION_PROBES: &[Probe] = &[
    Probe::with("choices", first_choice_message),
    Probe::with("choices", first_choice_text),
];

/// Probes used for a self-hosted evaluator, which may also speak the
/// OpenAI chat or completion shapes.
pub const LOCAL_EVALUATOR_PROBES: &[Probe] = &[
    Probe::with("choices", first_choice_message),
    Probe::with("choices", first_choice_text),
    Probe::field("generated_text"),
    Probe::field("text"),
    Probe::field("content"),
];

/// Returns the answer text held by `value` using [`ANSWER_PROBES`].
///
/// Never fails: objects without a recognised key are serialized whole,
/// strings are returned unchanged and any other value is stringified.
pub fn response_text(value: &Value) -> String {
    unwrap_with(value, ANSWER_PROBES)
}

/// Same as [`response_text`] with a caller-supplied probe list.
pub fn unwrap_with(value: &Value, probes: &[Probe]) -> String {
    match value {
        Value::Object(object) => probes
            .iter()
            .find_map(|probe| probe.apply(object))
            .unwrap_or_else(|| value.to_string()),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Unwraps a raw HTTP body: JSON bodies go through the probes, anything
/// else is taken as plain text.
pub fn body_text(body: &str, probes: &[Probe]) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => unwrap_with(&value, probes),
        Err(_) => body.to_string(),
    }
}

fn value_text(value: &Value) -> Option<String> {
    Some(match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

fn first_choice(value: &Value) -> Option<&Value> {
    value.as_array()?.first()
}

fn first_choice_message(value: &Value) -> Option<String> {
    first_choice(value)?
        .get("message")?
        .get("content")
        .and_then(value_text)
}

fn first_choice_text(value: &Value) -> Option<String> {
    first_choice(value)?.get("text").and_then(value_text)
}
