//! Simulated character state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The character the program drives.
///
/// Mutated in place by the interpreter; every trace snapshot is a deep clone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterState {
    pub x: i64,
    pub y: i64,
    /// Cumulative horizontal displacement.
    pub move_total: i64,
    pub max_y: i64,
    pub min_y: i64,
    pub jump_count: i64,
    pub messages: Vec<String>,
}

impl CharacterState {
    /// Fresh state for one run, seeded from optional overrides.
    ///
    /// `max_y`/`min_y` are re-clamped so the initial `y` always lies
    /// between them.
    pub fn from_overrides(overrides: Option<&StateOverrides>) -> Self {
        let o = overrides.cloned().unwrap_or_default();
        let mut state = Self {
            x: o.x.unwrap_or(0),
            y: o.y.unwrap_or(0),
            move_total: o.move_total.unwrap_or(0),
            max_y: o.max_y.unwrap_or(0),
            min_y: o.min_y.unwrap_or(0),
            jump_count: o.jump_count.unwrap_or(0),
            messages: o.messages.unwrap_or_default(),
        };
        state.update_vertical_extremes();
        state
    }

    /// Widen `max_y`/`min_y` to include the current `y`.
    pub fn update_vertical_extremes(&mut self) {
        if self.y > self.max_y {
            self.max_y = self.y;
        }
        if self.y < self.min_y {
            self.min_y = self.y;
        }
    }

    /// Final entry of the message log, or `""` when nothing was said.
    pub fn last_message(&self) -> &str {
        self.messages.last().map(String::as_str).unwrap_or("")
    }
}

/// Partial initial state for a test case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_y: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_y: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<String>>,
}

impl StateOverrides {
    /// Read overrides from an untrusted JSON payload.
    ///
    /// Fields of the wrong JSON type are ignored; a non-object yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            x: int_field(obj, "x"),
            y: int_field(obj, "y"),
            move_total: int_field(obj, "moveTotal"),
            max_y: int_field(obj, "maxY"),
            min_y: int_field(obj, "minY"),
            jump_count: int_field(obj, "jumpCount"),
            messages: obj.get("messages").and_then(Value::as_array).map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            }),
        })
    }
}

/// Integer field of a JSON object; finite floats are rounded.
pub(crate) fn int_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = obj.get(key)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.round() as i64)
    })
}
