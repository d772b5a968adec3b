//! Named parent → child links between table columns.

use core::fmt;
use tabula_core::{Error, Result};
use tabula_table::{Column, Row};

/// A non-owning handle to a column: the owning table's name and the column
/// name, resolved against a dataset when used.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Builds a handle to a column attached to a table.
    pub fn of(column: &Column) -> Result<Self> {
        let table = column.table().ok_or_else(|| {
            Error::invalid_operation(format!("column {} is not attached to a table", column.name()))
        })?;
        Ok(Self::new(table, column.name()))
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// A named, directed link from a parent table's column to a child table's
/// column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    name: String,
    parent: ColumnRef,
    child: ColumnRef,
}

impl Relation {
    /// Creates a relation between two columns attached to tables.
    pub fn new(name: impl Into<String>, parent: &Column, child: &Column) -> Result<Self> {
        Ok(Self::between(name, ColumnRef::of(parent)?, ColumnRef::of(child)?))
    }

    /// Creates a relation from column handles.
    pub fn between(name: impl Into<String>, parent: ColumnRef, child: ColumnRef) -> Self {
        Self {
            name: name.into(),
            parent,
            child,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parent(&self) -> &ColumnRef {
        &self.parent
    }

    #[inline]
    pub fn child(&self) -> &ColumnRef {
        &self.child
    }

    pub fn parent_table(&self) -> &str {
        &self.parent.table
    }

    pub fn parent_column(&self) -> &str {
        &self.parent.column
    }

    pub fn child_table(&self) -> &str {
        &self.child.table
    }

    pub fn child_column(&self) -> &str {
        &self.child.column
    }

    /// Returns true if either end is in `table`.
    pub fn involves(&self, table: &str) -> bool {
        self.parent.table == table || self.child.table == table
    }

    /// Checks whether `child_row` belongs to `parent_row` under this
    /// relation: both columns must resolve and hold strictly equal values.
    pub fn is_valid(&self, parent_row: &Row, child_row: &Row) -> bool {
        match (parent_row.get(self.parent_column()), child_row.get(self.child_column())) {
            (Ok(parent), Ok(child)) => parent == child,
            _ => false,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} -> {})", self.name, self.parent, self.child)
    }
}
