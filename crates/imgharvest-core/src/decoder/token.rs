//! Opaque lazy-load tokens.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One entry of the page's encoded token array.
///
/// The shape is not constrained; the value is handed to the decoder as-is.
/// `Display` renders it the way the page script coerces it when
/// concatenating with a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedToken(pub Value);

impl EncodedToken {
    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl From<&str> for EncodedToken {
    fn from(s: &str) -> Self {
        EncodedToken(Value::String(s.to_string()))
    }
}

impl From<String> for EncodedToken {
    fn from(s: String) -> Self {
        EncodedToken(Value::String(s))
    }
}

impl fmt::Display for EncodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_coerced(f, &self.0, true)
    }
}

/// `top_level` distinguishes a bare `null` ("null") from a null array element ("").
fn write_coerced(f: &mut fmt::Formatter<'_>, value: &Value, top_level: bool) -> fmt::Result {
    match value {
        Value::Null if top_level => f.write_str("null"),
        Value::Null => Ok(()),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Number(n) => match n.as_f64() {
            // Script number text: `1e3` and `2.0` print as `1000` and `2`.
            Some(x) if !n.is_i64() && !n.is_u64() => {
                if x == 0.0 {
                    f.write_str("0")
                } else {
                    write!(f, "{x}")
                }
            }
            _ => write!(f, "{n}"),
        },
        Value::String(s) => f.write_str(s),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write_coerced(f, item, false)?;
            }
            Ok(())
        }
        Value::Object(_) => f.write_str("[object Object]"),
    }
}
