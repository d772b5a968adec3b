//! Row structure for Tabula tables.
//!
//! A row holds one value per column of its table, in column order, plus the
//! change-tracking state: a lazily filled snapshot of the values each column
//! held before its first change since the last checkpoint.

use crate::column::Column;
use crate::columns::ColumnCollection;
use core::fmt;
use core::ops::{Deref, DerefMut};
use hashbrown::HashMap;
use tabula_core::{coerce, Error, Record, Result, Value};

/// Pending-change status of a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowState {
    /// Created since the last checkpoint.
    Added,
    /// Written to since the last checkpoint.
    Modified,
    /// Marked for removal at the next checkpoint.
    Deleted,
    /// No pending change.
    Unchanged,
}

/// Addresses a cell by column name or by zero-based column position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKey<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for ColumnKey<'a> {
    fn from(name: &'a str) -> Self {
        ColumnKey::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnKey<'a> {
    fn from(name: &'a String) -> Self {
        ColumnKey::Name(name.as_str())
    }
}

impl From<usize> for ColumnKey<'_> {
    fn from(index: usize) -> Self {
        ColumnKey::Index(index)
    }
}

impl fmt::Display for ColumnKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Name(name) => f.write_str(name),
            ColumnKey::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// A row in a table.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Current values, aligned with the owning table's column order.
    values: Vec<(String, Value)>,
    /// Values held before the first change since the last checkpoint.
    original_values: HashMap<String, Value>,
    state: RowState,
}

impl Row {
    /// Creates a row holding every column's default value, in state Added.
    pub(crate) fn new(columns: &ColumnCollection) -> Self {
        Self {
            values: columns
                .iter()
                .map(|c| (c.name().to_string(), c.get_default_value().clone()))
                .collect(),
            original_values: HashMap::new(),
            state: RowState::Added,
        }
    }

    /// Gets a value by column name or position.
    pub fn get<'k>(&self, key: impl Into<ColumnKey<'k>>) -> Result<&Value> {
        let key = key.into();
        let found = match key {
            ColumnKey::Name(name) => self.values.iter().find(|(n, _)| n == name),
            ColumnKey::Index(index) => self.values.get(index),
        };
        found
            .map(|(_, v)| v)
            .ok_or_else(|| Error::column_not_found(key.to_string()))
    }

    /// Returns the value a column held before its first change since the
    /// last checkpoint, or its current value if it was not changed.
    pub fn original(&self, name: &str) -> Result<&Value> {
        match self.original_values.get(name) {
            Some(value) => Ok(value),
            None => self.get(name),
        }
    }

    /// Returns the pre-change snapshot.
    #[inline]
    pub fn original_values(&self) -> &HashMap<String, Value> {
        &self.original_values
    }

    /// Returns whether a column was written since the last checkpoint.
    pub fn is_changed(&self, name: &str) -> bool {
        self.original_values.contains_key(name)
    }

    /// Returns the row state.
    #[inline]
    pub fn state(&self) -> RowState {
        self.state
    }

    /// Iterates over `(column, value)` pairs in column order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns the number of values in this row.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copies the current values into a plain record.
    pub fn to_record(&self) -> Record {
        self.values.iter().map(|(n, v)| (n.clone(), v.clone())).collect()
    }

    /// Makes the current values the clean checkpoint.
    pub fn accept_changes(&mut self) {
        self.original_values.clear();
        self.state = RowState::Unchanged;
    }

    /// Restores every snapshotted value and returns to the clean state.
    pub fn reject_changes(&mut self) {
        for (name, original) in self.original_values.drain() {
            if let Some((_, slot)) = self.values.iter_mut().find(|(n, _)| *n == name) {
                *slot = original;
            }
        }
        self.state = RowState::Unchanged;
    }

    /// Marks the row Deleted.
    pub fn delete(&mut self) {
        self.state = RowState::Deleted;
    }

    /// Validates, coerces and stores a value, tracking the change.
    ///
    /// Every successful write leaves the row Modified, Added rows included.
    pub(crate) fn write(&mut self, column: &Column, value: Value) -> Result<()> {
        let index = self.position(column.name())?;
        let value = validate(column, value)?;
        let (name, slot) = &mut self.values[index];
        if !self.original_values.contains_key(name.as_str()) {
            self.original_values.insert(name.clone(), slot.clone());
        }
        *slot = value;
        self.state = RowState::Modified;
        Ok(())
    }

    /// Validates, coerces and stores a value without tracking it. Used while
    /// a row is being constructed.
    pub(crate) fn assign(&mut self, column: &Column, value: Value) -> Result<()> {
        let index = self.position(column.name())?;
        self.values[index].1 = validate(column, value)?;
        Ok(())
    }

    pub(crate) fn push_column(&mut self, name: &str, default: Value) {
        self.values.push((name.to_string(), default));
    }

    pub(crate) fn remove_column(&mut self, name: &str) {
        self.values.retain(|(n, _)| n != name);
        self.original_values.remove(name);
    }

    /// Re-lays this row's values out in `columns` order: known values are
    /// kept, missing columns get defaults, unknown columns are dropped.
    pub(crate) fn conform(mut self, columns: &ColumnCollection) -> Row {
        let mut values = Vec::with_capacity(columns.count());
        for column in columns.iter() {
            let value = match self.values.iter_mut().find(|(n, _)| n == column.name()) {
                Some((_, v)) => core::mem::replace(v, Value::Null),
                None => column.get_default_value().clone(),
            };
            values.push((column.name().to_string(), value));
        }
        self.original_values.retain(|name, _| columns.contains(name));
        self.values = values;
        self
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.values
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| Error::column_not_found(name))
    }
}

/// Applies nullability and type rules of `column` to a written value.
fn validate(column: &Column, value: Value) -> Result<Value> {
    if value.is_null() {
        if !column.allows_null() {
            return Err(Error::null_not_allowed(column.name()));
        }
        return Ok(Value::Null);
    }
    match column.data_type() {
        None => Ok(value),
        Some(data_type) => coerce(value.clone(), data_type)
            .ok_or_else(|| Error::type_coercion(column.name(), data_type, &value)),
    }
}

/// A row borrowed together with its table's columns, so writes can be
/// validated against the column definitions.
pub struct RowMut<'a> {
    columns: &'a ColumnCollection,
    row: &'a mut Row,
}

impl<'a> RowMut<'a> {
    pub(crate) fn new(columns: &'a ColumnCollection, row: &'a mut Row) -> Self {
        Self { columns, row }
    }

    /// Writes a value to a column, coercing it to the column's type.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let column = self.columns.get(name)?;
        self.row.write(column, value.into())
    }
}

impl Deref for RowMut<'_> {
    type Target = Row;

    fn deref(&self) -> &Row {
        self.row
    }
}

impl DerefMut for RowMut<'_> {
    fn deref_mut(&mut self) -> &mut Row {
        self.row
    }
}
