//! Tabula Core - Value types, coercion and errors for Tabula data tables.
//!
//! This crate provides the foundational types shared by the table and
//! dataset layers:
//!
//! - `DataType`: Declared column types (Number, String, Boolean, Date)
//! - `Value`: Runtime values stored in row cells
//! - `Record`: Ordered key-value snapshots of a row
//! - `coerce`: Write-time coercion of values to a declared type
//! - `Error`: Error types for table operations
//!
//! # Example
//!
//! ```rust
//! use tabula_core::{coerce, DataType, Record, Value};
//!
//! let v = coerce("42".into(), DataType::Number).unwrap();
//! assert_eq!(v, Value::Number(42.0));
//!
//! let record = Record::new().with("id", 1).with("name", "Alice");
//! assert_eq!(record.get("name"), Some(&Value::from("Alice")));
//! ```

pub mod coerce;
mod error;
mod record;
mod types;
mod value;

pub use coerce::{coerce, parse_date};
pub use error::{Error, ObjectKind, Result};
pub use record::Record;
pub use types::DataType;
pub use value::Value;
