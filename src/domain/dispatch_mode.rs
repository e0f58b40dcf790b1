//! Dispatch mode selection for the event router.
//!
//! Upstream configuration has historically been loosely typed: a boolean,
//! the string `"data"`, or the string `"passthrough"`. [`DispatchMode`]
//! normalizes every accepted representation into a closed enum so that the
//! router's branch decision is an exhaustive `match`.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Which branches of the router are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "Value")]
pub enum DispatchMode {
    /// Router takes no action on any message.
    None,
    /// Only `:get:` data requests are handled.
    DataOnly,
    /// Every message is republished with its socket back-reference.
    PassthroughOnly,
    /// Data requests are handled; everything else is passed through.
    #[default]
    Both,
}

impl DispatchMode {
    /// Returns `true` unless the mode is [`DispatchMode::None`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns `true` if `:get:` data requests are answered.
    #[must_use]
    pub const fn handles_data(self) -> bool {
        matches!(self, Self::DataOnly | Self::Both)
    }

    /// Returns `true` if messages may be republished as passthrough events.
    #[must_use]
    pub const fn handles_passthrough(self) -> bool {
        matches!(self, Self::PassthroughOnly | Self::Both)
    }

    /// Returns the canonical configuration string for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "false",
            Self::DataOnly => "data",
            Self::PassthroughOnly => "passthrough",
            Self::Both => "true",
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for DispatchMode {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Both } else { Self::None }
    }
}

/// Configuration-string form. `"true"`/`"1"` and `"false"`/`"0"` are read
/// as booleans; everything else follows the JSON string rules.
impl From<&str> for DispatchMode {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "true" | "1" => Self::Both,
            "false" | "0" | "" => Self::None,
            "data" => Self::DataOnly,
            "passthrough" => Self::PassthroughOnly,
            _ => Self::Both,
        }
    }
}

/// Falsy JSON values disable the router; unrecognized truthy values enable
/// both branches.
impl From<Value> for DispatchMode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Bool(b) => Self::from(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f != 0.0 && !f.is_nan() => Self::Both,
                _ => Self::None,
            },
            Value::String(s) => match s.as_str() {
                "" => Self::None,
                "data" => Self::DataOnly,
                "passthrough" => Self::PassthroughOnly,
                _ => Self::Both,
            },
            Value::Array(_) | Value::Object(_) => Self::Both,
        }
    }
}
