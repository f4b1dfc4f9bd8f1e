//! JSON configuration document
//!
//! Field layout of the document exchanged with configuration tools:
//!
//! ```text
//! {
//!   "Pin": 4,
//!   "Mode":    { "current": "Pullup",  "options": ["Input", ...] },
//!   "Trigger": { "current": "Falling", "options": ["Disabled", ...] },
//!   "id": 1,
//!   "taskName": "door",
//!   "taskPeriod": 100,
//!   "taskEnabled": true
//! }
//! ```
//!
//! `options` is informational. It is always written on encode and ignored
//! on decode.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::types::{InputConfig, PinMode, TaskConfig, TriggerType, MAX_TASK_NAME_LEN};

/// Errors from decoding a configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Not valid JSON, or a field is missing or has the wrong type
    Syntax,
    /// `Mode.current` is not one of the mode options
    UnknownMode,
    /// `Trigger.current` is not one of the trigger options
    UnknownTrigger,
    /// `taskName` longer than the name buffer
    NameTooLong,
}

/// A selected value together with the option set it was picked from
#[derive(Debug, Serialize, Deserialize)]
struct Choice {
    current: String,
    #[serde(default, skip_deserializing)]
    options: Vec<&'static str>,
}

impl Choice {
    fn new(current: &'static str, options: impl Iterator<Item = &'static str>) -> Self {
        Self {
            current: String::from(current),
            options: options.collect(),
        }
    }
}

/// Wire form of [`InputConfig`]
#[derive(Debug, Serialize, Deserialize)]
struct Document {
    #[serde(rename = "Pin")]
    pin: u8,
    #[serde(rename = "Mode")]
    mode: Choice,
    #[serde(rename = "Trigger")]
    trigger: Choice,
    id: i32,
    #[serde(rename = "taskName")]
    task_name: String,
    #[serde(rename = "taskPeriod")]
    task_period: u32,
    #[serde(rename = "taskEnabled")]
    task_enabled: bool,
}

impl From<&InputConfig> for Document {
    fn from(config: &InputConfig) -> Self {
        Self {
            pin: config.pin,
            mode: Choice::new(config.mode.name(), PinMode::ALL.into_iter().map(PinMode::name)),
            trigger: Choice::new(
                config.trigger.name(),
                TriggerType::ALL.into_iter().map(TriggerType::name),
            ),
            id: config.id,
            task_name: String::from(config.task.name.as_str()),
            task_period: config.task.period_ms,
            task_enabled: config.task.enabled,
        }
    }
}

impl TryFrom<Document> for InputConfig {
    type Error = DecodeError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        let mode = PinMode::from_name(&doc.mode.current).ok_or(DecodeError::UnknownMode)?;
        let trigger =
            TriggerType::from_name(&doc.trigger.current).ok_or(DecodeError::UnknownTrigger)?;

        let mut name = heapless::String::<MAX_TASK_NAME_LEN>::new();
        name.push_str(&doc.task_name)
            .map_err(|_| DecodeError::NameTooLong)?;

        Ok(InputConfig {
            pin: doc.pin,
            mode,
            trigger,
            id: doc.id,
            task: TaskConfig {
                name,
                period_ms: doc.task_period,
                enabled: doc.task_enabled,
            },
        })
    }
}

/// Encode a configuration as a JSON document
pub fn encode(config: &InputConfig) -> String {
    // Serializing plain strings and integers into a String cannot fail
    serde_json::to_string(&Document::from(config)).unwrap_or_default()
}

/// Decode a JSON document into a fresh configuration
///
/// Nothing is returned unless every field is present and valid, so callers
/// can assign the result without risking a half-applied config.
pub fn decode(input: &str) -> Result<InputConfig, DecodeError> {
    let doc: Document = serde_json::from_str(input).map_err(|_| DecodeError::Syntax)?;
    InputConfig::try_from(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOOR: &str = r#"{
        "Pin": 4,
        "Mode": { "current": "Pullup" },
        "Trigger": { "current": "Falling" },
        "id": 12,
        "taskName": "door",
        "taskPeriod": 250,
        "taskEnabled": true
    }"#;

    #[test]
    fn test_decode() {
        let config = decode(DOOR).unwrap();
        assert_eq!(config.pin, 4);
        assert_eq!(config.mode, PinMode::Pullup);
        assert_eq!(config.trigger, TriggerType::Falling);
        assert_eq!(config.id, 12);
        assert_eq!(config.task.name.as_str(), "door");
        assert_eq!(config.task.period_ms, 250);
        assert!(config.task.enabled);
    }

    #[test]
    fn test_encode_lists_options() {
        let config = decode(DOOR).unwrap();
        let json = encode(&config);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["Pin"], 4);
        assert_eq!(value["Mode"]["current"], "Pullup");
        assert_eq!(value["Mode"]["options"].as_array().unwrap().len(), 4);
        assert_eq!(value["Mode"]["options"][3], "Open Drain");
        assert_eq!(value["Trigger"]["current"], "Falling");
        assert_eq!(value["Trigger"]["options"].as_array().unwrap().len(), 8);
        assert_eq!(value["Trigger"]["options"][7], "High with Wakeup");
        assert_eq!(value["taskName"], "door");
        assert_eq!(value["taskPeriod"], 250);
        assert_eq!(value["taskEnabled"], true);
    }

    #[test]
    fn test_encoded_document_decodes_to_same_config() {
        let config = decode(DOOR).unwrap();
        assert_eq!(decode(&encode(&config)).unwrap(), config);
    }

    #[test]
    fn test_unknown_names() {
        let bad_trigger = DOOR.replace("\"Falling\"", "\"Sideways\"");
        assert_eq!(decode(&bad_trigger), Err(DecodeError::UnknownTrigger));

        let bad_mode = DOOR.replace("\"Pullup\"", "\"Pull Up\"");
        assert_eq!(decode(&bad_mode), Err(DecodeError::UnknownMode));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(decode(""), Err(DecodeError::Syntax));
        assert_eq!(decode("{\"Pin\": 4"), Err(DecodeError::Syntax));

        // Missing field
        let no_id = DOOR.replace("\"id\": 12,", "");
        assert_eq!(decode(&no_id), Err(DecodeError::Syntax));

        // Pin out of u8 range
        let big_pin = DOOR.replace("\"Pin\": 4", "\"Pin\": 300");
        assert_eq!(decode(&big_pin), Err(DecodeError::Syntax));
    }

    #[test]
    fn test_name_too_long() {
        let long = DOOR.replace("\"door\"", "\"a-task-name-that-does-not-fit-in-32\"");
        assert_eq!(decode(&long), Err(DecodeError::NameTooLong));
    }
}
