//! Error types for Tabula tables and datasets.

use crate::types::DataType;
use core::fmt;
use thiserror::Error;

/// Result type alias for Tabula operations.
pub type Result<T> = core::result::Result<T, Error>;

/// The kind of named object an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Table,
    Column,
    Relation,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectKind::Table => "Table",
            ObjectKind::Column => "Column",
            ObjectKind::Relation => "Relation",
        })
    }
}

/// Error types for Tabula operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A table, column or relation with this name already exists.
    #[error("{kind} already exists: {name}")]
    DuplicateName { kind: ObjectKind, name: String },
    /// A table, column or relation name does not resolve.
    #[error("{kind} not found: {name}")]
    NotFound { kind: ObjectKind, name: String },
    /// Null written to a column that does not allow it.
    #[error("Null not allowed in column: {column}")]
    NullNotAllowed { column: String },
    /// A written value has no representation in the column's type.
    #[error("Cannot convert {value:?} to {expected} for column {column}")]
    TypeCoercion {
        column: String,
        expected: DataType,
        value: String,
    },
    /// Positional access outside valid bounds.
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Invalid operation.
    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },
}

impl Error {
    /// Creates a duplicate table error.
    pub fn duplicate_table(name: impl Into<String>) -> Self {
        Error::DuplicateName {
            kind: ObjectKind::Table,
            name: name.into(),
        }
    }

    /// Creates a duplicate column error.
    pub fn duplicate_column(name: impl Into<String>) -> Self {
        Error::DuplicateName {
            kind: ObjectKind::Column,
            name: name.into(),
        }
    }

    /// Creates a duplicate relation error.
    pub fn duplicate_relation(name: impl Into<String>) -> Self {
        Error::DuplicateName {
            kind: ObjectKind::Relation,
            name: name.into(),
        }
    }

    /// Creates a table not found error.
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Error::NotFound {
            kind: ObjectKind::Table,
            name: name.into(),
        }
    }

    /// Creates a column not found error.
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Error::NotFound {
            kind: ObjectKind::Column,
            name: name.into(),
        }
    }

    /// Creates a relation not found error.
    pub fn relation_not_found(name: impl Into<String>) -> Self {
        Error::NotFound {
            kind: ObjectKind::Relation,
            name: name.into(),
        }
    }

    /// Creates a null constraint error.
    pub fn null_not_allowed(column: impl Into<String>) -> Self {
        Error::NullNotAllowed {
            column: column.into(),
        }
    }

    /// Creates a coercion error for a value that does not fit `expected`.
    pub fn type_coercion(column: impl Into<String>, expected: DataType, value: impl fmt::Display) -> Self {
        Error::TypeCoercion {
            column: column.into(),
            expected,
            value: value.to_string(),
        }
    }

    /// Creates an index out of range error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { index, len }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns true for any `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
