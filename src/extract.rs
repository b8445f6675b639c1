use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// Greedy span from the first `{` to the last `}`, across newlines.
///
/// This is not a balanced-brace parse: a reply holding two separate objects
/// yields one unparsable span and falls back to the raw text.
static JSON_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(\{.*\})").expect("Invalid JSON block regex"));

/// Model reply normalized for display: either the JSON object found in the
/// text, or the text itself under a single `raw` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Extracted {
    Parsed(Map<String, Value>),
    Raw { raw: String },
}

impl Extracted {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Extracted::Parsed(_))
    }

    /// The result as a JSON mapping
    pub fn to_value(&self) -> Value {
        match self {
            Extracted::Parsed(map) => Value::Object(map.clone()),
            Extracted::Raw { raw } => {
                let mut map = Map::new();
                map.insert("raw".to_string(), Value::String(raw.clone()));
                Value::Object(map)
            }
        }
    }

    /// Look up a top-level key of a parsed result
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Extracted::Parsed(map) => map.get(key),
            Extracted::Raw { .. } => None,
        }
    }
}

/// Best-effort extraction of a JSON object from free-form model output.
pub fn extract_json(text: &str) -> Extracted {
    if let Some(block) = JSON_BLOCK_REGEX.captures(text).and_then(|cap| cap.get(1)) {
        if let Ok(map) = serde_json::from_str::<Map<String, Value>>(block.as_str()) {
            return Extracted::Parsed(map);
        }
    }

    Extracted::Raw {
        raw: text.to_string(),
    }
}
