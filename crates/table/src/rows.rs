//! Ordered row sequence of one table.

use crate::row::Row;
use core::cmp::Ordering;
use tabula_core::{Error, Result};

/// The ordered rows owned by one table.
///
/// Insertion order is kept except where a sort reorders the rows in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowCollection {
    rows: Vec<Row>,
}

impl RowCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Gets a row by position.
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Gets a row by position, failing with `IndexOutOfRange`.
    pub fn at(&self, index: usize) -> Result<&Row> {
        self.rows
            .get(index)
            .ok_or_else(|| Error::index_out_of_range(index, self.rows.len()))
    }

    /// Iterates over rows in order.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Returns the first row matching `predicate`.
    pub fn find<P: Fn(&Row) -> bool>(&self, predicate: P) -> Option<&Row> {
        self.rows.iter().find(|&r| predicate(r))
    }

    /// Returns the position of the first row matching `predicate`.
    pub fn position<P: Fn(&Row) -> bool>(&self, predicate: P) -> Option<usize> {
        self.rows.iter().position(|r| predicate(r))
    }

    /// Returns every row matching `predicate`, in order.
    pub fn filter<P: Fn(&Row) -> bool>(&self, predicate: P) -> Vec<&Row> {
        self.rows.iter().filter(|&r| predicate(r)).collect()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.iter_mut()
    }

    pub(crate) fn push(&mut self, row: Row) -> &mut Row {
        self.rows.push(row);
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<Row> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    pub(crate) fn retain<P: FnMut(&Row) -> bool>(&mut self, predicate: P) {
        self.rows.retain(predicate);
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }

    pub(crate) fn sort_by<F: FnMut(&Row, &Row) -> Ordering>(&mut self, compare: F) {
        self.rows.sort_by(compare);
    }

    pub(crate) fn into_vec(self) -> Vec<Row> {
        self.rows
    }
}
