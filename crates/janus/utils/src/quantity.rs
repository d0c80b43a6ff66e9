//! Hex quantities and JSON truthiness, the two conversions the transaction builder relies on.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("Cannot hexlify negative value {0}")]
    Negative(String),
    #[error("Cannot hexlify non-integer value {0}")]
    NotAnInteger(String),
    #[error("Invalid hex quantity {0}")]
    InvalidHex(String),
    #[error("Quantity {0} does not fit in 256 bits")]
    Overflow(String),
    #[error("Cannot hexlify a JSON {0}")]
    UnsupportedType(&'static str),
}

/// An unsigned quantity rendered as lowercase `0x` prefixed hex with an even number of digits.
///
/// Zero is rendered as `0x00`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HexQuantity(U256);

impl HexQuantity {
    pub const ZERO: Self = Self(U256::ZERO);

    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<U256> for HexQuantity {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<u64> for HexQuantity {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Display for HexQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = format!("{:x}", self.0);
        if digits.len() % 2 == 1 {
            write!(f, "0x0{digits}")
        } else {
            write!(f, "0x{digits}")
        }
    }
}

impl FromStr for HexQuantity {
    type Err = QuantityError;

    /// Parses `0x` prefixed hex, or decimal digits otherwise.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.starts_with('-') {
            return Err(QuantityError::Negative(s.to_string()));
        }

        if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            // A bare `0x` is the empty byte string, i.e. zero.
            if digits.is_empty() {
                return Ok(Self::ZERO);
            }
            if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(QuantityError::InvalidHex(s.to_string()));
            }
            return U256::from_str_radix(digits, 16)
                .map(Self)
                .map_err(|_| QuantityError::Overflow(s.to_string()));
        }

        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QuantityError::NotAnInteger(s.to_string()));
        }

        U256::from_str_radix(s, 10).map(Self).map_err(|_| QuantityError::Overflow(s.to_string()))
    }
}

impl Serialize for HexQuantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexQuantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Converts a numeric JSON value into a [`HexQuantity`].
///
/// Accepts non-negative whole numbers of any size, decimal strings and `0x` prefixed hex strings.
/// Numbers written with a fraction or an exponent are accepted as long as they hold a whole value,
/// so `2.0` and `21e3` are fine while `1.5` is not. Hex strings are re-encoded canonically, so
/// `"0x1"` becomes `0x01` and `"0x0001"` becomes `0x01`.
pub fn hexlify(value: &Value) -> Result<HexQuantity, QuantityError> {
    match value {
        Value::Number(number) => {
            if let Some(n) = number.as_u64() {
                return Ok(HexQuantity::from(n));
            }
            if number.as_i64().is_some() {
                return Err(QuantityError::Negative(number.to_string()));
            }
            // `serde_json` preserves arbitrary precision, so the text holds the exact digits.
            whole_number(&number.to_string())
        }
        Value::String(text) => text.parse(),
        other => Err(QuantityError::UnsupportedType(kind_of(other))),
    }
}

/// Reads a JSON number literal (`-12.50e+3`) as an exact whole value.
fn whole_number(text: &str) -> Result<HexQuantity, QuantityError> {
    let not_an_integer = || QuantityError::NotAnInteger(text.to_string());

    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (mantissa, exponent) = match unsigned.split_once(|c: char| c == 'e' || c == 'E') {
        Some((mantissa, exponent)) => {
            (mantissa, exponent.parse::<i64>().map_err(|_| not_an_integer())?)
        }
        None => (unsigned, 0),
    };
    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut digits = format!("{integer}{fraction}");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_an_integer());
    }

    let mut exponent = exponent.saturating_sub(fraction.len() as i64);
    while exponent < 0 && digits.ends_with('0') {
        digits.pop();
        exponent += 1;
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(HexQuantity::ZERO);
    }
    if negative {
        return Err(QuantityError::Negative(text.to_string()));
    }
    if exponent < 0 {
        return Err(not_an_integer());
    }
    // 2^256 has 78 decimal digits.
    if digits.len() as i64 + exponent > 78 {
        return Err(QuantityError::Overflow(text.to_string()));
    }

    let digits = format!("{digits}{}", "0".repeat(exponent as usize));
    U256::from_str_radix(&digits, 10)
        .map(HexQuantity)
        .map_err(|_| QuantityError::Overflow(text.to_string()))
}

/// JavaScript truthiness of a JSON value.
///
/// `null`, `false`, `0` and `""` are falsy, everything else (including `"0"`, `[]` and `{}`) is
/// truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
