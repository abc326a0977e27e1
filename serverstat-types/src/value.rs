//! Leaf and node values found in a server status document.

use core::fmt;

use crate::StatusTree;

/// A leaf value stored in flattened statistics.
///
/// Only `Int` and `Float` are considered numeric; booleans and strings are
/// carried through but never take part in rate or delta arithmetic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Check if the value takes part in rate arithmetic.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::Float(_))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

/// A node in a raw status tree.
///
/// `Long` is the 64-bit counter wrapper some servers use for large counters
/// (e.g. `NumberLong` / `{"$numberLong": "..."}`). It is unwrapped into a
/// plain integer when the tree is flattened.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Long(i64),
    Text(String),
    Array(Vec<StatusValue>),
    Document(StatusTree),
}

impl StatusValue {
    /// Check if this node has children.
    pub fn is_nested(&self) -> bool {
        matches!(self, StatusValue::Array(_) | StatusValue::Document(_))
    }
}

impl From<i64> for StatusValue {
    fn from(v: i64) -> Self {
        StatusValue::Int(v)
    }
}

impl From<i32> for StatusValue {
    fn from(v: i32) -> Self {
        StatusValue::Int(v as i64)
    }
}

impl From<f64> for StatusValue {
    fn from(v: f64) -> Self {
        StatusValue::Float(v)
    }
}

impl From<bool> for StatusValue {
    fn from(v: bool) -> Self {
        StatusValue::Bool(v)
    }
}

impl From<&str> for StatusValue {
    fn from(v: &str) -> Self {
        StatusValue::Text(v.to_string())
    }
}

impl From<String> for StatusValue {
    fn from(v: String) -> Self {
        StatusValue::Text(v)
    }
}

impl From<StatusTree> for StatusValue {
    fn from(v: StatusTree) -> Self {
        StatusValue::Document(v)
    }
}

impl From<Vec<StatusValue>> for StatusValue {
    fn from(v: Vec<StatusValue>) -> Self {
        StatusValue::Array(v)
    }
}
