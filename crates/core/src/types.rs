//! Data type definitions for Tabula tables.
//!
//! A column either declares one of these types or is untyped
//! (`Option<DataType>::None`), in which case written values are stored as is.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Declared type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 64-bit floating point number
    Number,
    /// UTF-8 string
    String,
    /// Boolean (true/false)
    Boolean,
    /// Date and time without a zone, compared by millisecond timestamp
    Date,
}

impl DataType {
    /// Returns the lowercase name used in schema records.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Number => "number",
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "number" => Ok(DataType::Number),
            "string" => Ok(DataType::String),
            "boolean" => Ok(DataType::Boolean),
            "date" => Ok(DataType::Date),
            other => Err(format!("unknown data type: {}", other)),
        }
    }
}
