//! Ordered column set of one table.

use crate::column::Column;
use crate::rows::RowCollection;
use hashbrown::HashMap;
use tabula_core::{Error, Result};

/// The ordered set of columns owned by one table.
///
/// Ordinals always form the dense sequence `0..count` in iteration order.
/// Adding or removing a column is propagated to every row of the table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnCollection {
    columns: Vec<Column>,
    /// Column name → position in `columns`.
    positions: HashMap<String, usize>,
}

impl ColumnCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a column by name.
    pub fn get(&self, name: &str) -> Result<&Column> {
        self.find(name).ok_or_else(|| Error::column_not_found(name))
    }

    /// Gets a column by name, if present.
    pub fn find(&self, name: &str) -> Option<&Column> {
        self.positions.get(name).map(|&i| &self.columns[i])
    }

    /// Gets a column by ordinal.
    pub fn at(&self, ordinal: usize) -> Option<&Column> {
        self.columns.get(ordinal)
    }

    /// Returns the ordinal of a column.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Checks if a column exists.
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Returns the number of columns.
    #[inline]
    pub fn count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates over columns in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Returns all column names in ordinal order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Result<&mut Column> {
        match self.positions.get(name) {
            Some(&i) => Ok(&mut self.columns[i]),
            None => Err(Error::column_not_found(name)),
        }
    }

    /// Adds a column owned by `table`, back-filling its default into `rows`.
    pub(crate) fn add(
        &mut self,
        mut column: Column,
        table: &str,
        rows: &mut RowCollection,
    ) -> Result<&Column> {
        if self.contains(column.name()) {
            return Err(Error::duplicate_column(column.name()));
        }
        let ordinal = self.columns.len();
        column.set_ordinal(ordinal);
        column.attach(table);

        for row in rows.iter_mut() {
            row.push_column(column.name(), column.get_default_value().clone());
        }

        self.positions.insert(column.name().to_string(), ordinal);
        self.columns.push(column);
        Ok(&self.columns[ordinal])
    }

    /// Removes a column, stripping its value from `rows` and renumbering the
    /// remaining columns.
    pub(crate) fn remove(&mut self, name: &str, rows: &mut RowCollection) -> Result<Column> {
        let index = self
            .positions
            .remove(name)
            .ok_or_else(|| Error::column_not_found(name))?;
        let mut column = self.columns.remove(index);
        column.detach();

        for row in rows.iter_mut() {
            row.remove_column(name);
        }

        self.reindex();
        Ok(column)
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (i, column) in self.columns.iter_mut().enumerate() {
            column.set_ordinal(i);
            self.positions.insert(column.name().to_string(), i);
        }
    }
}
