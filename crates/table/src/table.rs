//! Table: columns and rows kept consistent under mutation.

use crate::column::Column;
use crate::columns::ColumnCollection;
use crate::criteria::RowFilter;
use crate::row::{Row, RowMut, RowState};
use crate::rows::RowCollection;
use crate::sort::{compare_rows, nulls_last, SortCriterion, SortOrder};
use core::cmp::Ordering;
use tabula_core::{DataType, Error, Record, Result, Value};
use tracing::{debug, trace};

/// The accepted shapes of a new row.
#[derive(Clone, Debug)]
pub enum RowInput {
    /// A row built elsewhere; conformed to this table's columns.
    Row(Row),
    /// Values assigned by column ordinal; extra values are ignored.
    Values(Vec<Value>),
    /// Values by column name; unknown names are ignored.
    Record(Record),
}

impl From<Row> for RowInput {
    fn from(row: Row) -> Self {
        RowInput::Row(row)
    }
}

impl From<Vec<Value>> for RowInput {
    fn from(values: Vec<Value>) -> Self {
        RowInput::Values(values)
    }
}

impl From<Record> for RowInput {
    fn from(record: Record) -> Self {
        RowInput::Record(record)
    }
}

/// A typed, change-tracked in-memory table.
///
/// `Clone` is a deep copy: column definitions, row values, pre-change
/// snapshots and row states are all duplicated.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    name: String,
    /// Carried in the schema record; name lookups are always exact.
    case_sensitive: bool,
    columns: ColumnCollection,
    rows: RowCollection,
    primary_key: Vec<String>,
}

impl Table {
    /// Creates an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            case_sensitive: false,
            columns: ColumnCollection::new(),
            rows: RowCollection::new(),
            primary_key: Vec::new(),
        }
    }

    /// Creates a table from uniform records, inferring the columns from the
    /// first record.
    pub fn from_records(
        name: impl Into<String>,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<Self> {
        let mut table = Table::new(name);
        table.load_records(records)?;
        Ok(table)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    /// Returns the column set.
    #[inline]
    pub fn columns(&self) -> &ColumnCollection {
        &self.columns
    }

    /// Returns the row sequence.
    #[inline]
    pub fn rows(&self) -> &RowCollection {
        &self.rows
    }

    /// Adds a column and back-fills its default into every row. A column
    /// built as a primary key joins the table's primary key.
    pub fn add_column(&mut self, column: impl Into<Column>) -> Result<&Column> {
        let column = self.columns.add(column.into(), &self.name, &mut self.rows)?;
        if column.is_primary_key() && !self.primary_key.iter().any(|k| k == column.name()) {
            self.primary_key.push(column.name().to_string());
        }
        debug!(table = %self.name, column = %column.name(), ordinal = column.ordinal(), "column added");
        Ok(column)
    }

    /// Removes a column and strips its value from every row.
    pub fn remove_column(&mut self, name: &str) -> Result<Column> {
        let column = self.columns.remove(name, &mut self.rows)?;
        self.primary_key.retain(|k| k != name);
        debug!(table = %self.name, column = %name, "column removed");
        Ok(column)
    }

    pub fn column_exists(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Gets a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns.get(name)
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns.get_mut(name)
    }

    /// Marks the (possibly composite) primary key. Every name must be an
    /// existing column; an empty slice clears the key.
    pub fn set_primary_key(&mut self, names: &[&str]) -> Result<()> {
        for name in names {
            self.columns.get(name)?;
        }
        for old in core::mem::take(&mut self.primary_key) {
            if let Ok(column) = self.columns.get_mut(&old) {
                column.set_primary_key(false);
            }
        }
        for name in names {
            self.columns.get_mut(name)?.set_primary_key(true);
            self.primary_key.push((*name).to_string());
        }
        Ok(())
    }

    /// Returns the primary key column names.
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// Creates a detached row holding every column's default, in state Added.
    pub fn new_row(&self) -> Row {
        Row::new(&self.columns)
    }

    /// Binds a detached row to this table's columns so it can be written.
    pub fn edit_row<'a>(&'a self, row: &'a mut Row) -> RowMut<'a> {
        RowMut::new(&self.columns, row)
    }

    /// Appends a row.
    ///
    /// Every supplied value goes through the validation and coercion of
    /// `RowMut::set`; on failure the table is left unchanged. Filling a new
    /// row is construction rather than a change, so rows built from values
    /// or records stay Added with an empty snapshot and only a later write
    /// moves them to Modified.
    ///
    /// A `Row` is conformed to this table's columns first. Cells still
    /// holding their column default are the table's own back-fill and are
    /// not re-validated, so a `new_row()` is always accepted.
    pub fn add_row(&mut self, input: impl Into<RowInput>) -> Result<&Row> {
        let row = match input.into() {
            RowInput::Row(row) => {
                let mut row = row.conform(&self.columns);
                for column in self.columns.iter() {
                    let value = row.get(column.name())?;
                    if value != column.get_default_value() {
                        let value = value.clone();
                        row.assign(column, value)?;
                    }
                }
                row
            }
            RowInput::Values(values) => {
                let mut row = Row::new(&self.columns);
                for (column, value) in self.columns.iter().zip(values) {
                    row.assign(column, value)?;
                }
                row
            }
            RowInput::Record(record) => {
                let mut row = Row::new(&self.columns);
                for (name, value) in record {
                    if let Some(column) = self.columns.find(&name) {
                        row.assign(column, value)?;
                    }
                }
                row
            }
        };
        Ok(&*self.rows.push(row))
    }

    /// Removes the row at `index`. Out of range is a no-op returning `None`.
    pub fn remove_row(&mut self, index: usize) -> Option<Row> {
        let removed = self.rows.remove(index);
        trace!(table = %self.name, index, removed = removed.is_some(), "remove row");
        removed
    }

    /// Gets a row by position.
    pub fn row(&self, index: usize) -> Result<&Row> {
        self.rows.at(index)
    }

    /// Gets a writable row by position.
    pub fn row_mut(&mut self, index: usize) -> Result<RowMut<'_>> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or_else(|| Error::index_out_of_range(index, len))?;
        Ok(RowMut::new(&self.columns, row))
    }

    /// Writes one cell.
    pub fn set_value(&mut self, index: usize, column: &str, value: impl Into<Value>) -> Result<()> {
        self.row_mut(index)?.set(column, value)
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Removes every row, keeping the columns.
    pub fn clear(&mut self) {
        self.rows.clear();
        debug!(table = %self.name, "rows cleared");
    }

    /// Returns every row matching `filter`, in table order.
    pub fn find_rows<F: RowFilter + ?Sized>(&self, filter: &F) -> Vec<&Row> {
        self.rows.filter(|row| filter.matches(row))
    }

    /// Returns the first row matching `filter`.
    pub fn find_one<F: RowFilter + ?Sized>(&self, filter: &F) -> Option<&Row> {
        self.rows.find(|row| filter.matches(row))
    }

    /// Returns value snapshots of the rows matching `filter`.
    pub fn select<F: RowFilter + ?Sized>(&self, filter: &F) -> Vec<Record> {
        self.rows
            .iter()
            .filter(|row| filter.matches(row))
            .map(Row::to_record)
            .collect()
    }

    /// Sorts rows in place by one column, nulls last.
    pub fn sort(&mut self, column: &str, order: SortOrder) -> Result<()> {
        let data_type = self.columns.get(column)?.data_type();
        trace!(table = %self.name, column, ?order, "sort");
        self.rows
            .sort_by(|a, b| compare_rows(a, b, column, data_type, order));
        Ok(())
    }

    /// Sorts rows in place with a caller-supplied comparator.
    pub fn sort_with<F>(&mut self, compare: F)
    where
        F: FnMut(&Row, &Row) -> Ordering,
    {
        self.rows.sort_by(compare);
    }

    /// Sorts rows in place by a derived key, computed at comparison time.
    /// Null keys sort last.
    pub fn sort_by<K>(&mut self, key: K, order: SortOrder)
    where
        K: Fn(&Row) -> Value,
    {
        self.rows
            .sort_by(|a, b| nulls_last(&key(a), &key(b), order, |x, y| x.sort_cmp(y)));
    }

    /// Sorts rows in place by several columns; the first criterion that
    /// distinguishes two rows decides.
    pub fn sort_multiple(&mut self, criteria: &[SortCriterion]) -> Result<()> {
        let mut keys = Vec::with_capacity(criteria.len());
        for c in criteria {
            keys.push((c.column.as_str(), self.columns.get(&c.column)?.data_type(), c.order));
        }
        trace!(table = %self.name, keys = keys.len(), "multi-column sort");
        self.rows.sort_by(|a, b| {
            keys.iter().fold(Ordering::Equal, |ord, &(column, data_type, order)| {
                ord.then_with(|| compare_rows(a, b, column, data_type, order))
            })
        });
        Ok(())
    }

    /// Copies the columns and primary key without any rows.
    pub fn clone_structure(&self) -> Table {
        Table {
            name: self.name.clone(),
            case_sensitive: self.case_sensitive,
            columns: self.columns.clone(),
            rows: RowCollection::new(),
            primary_key: self.primary_key.clone(),
        }
    }

    /// Drops Deleted rows and makes every other row's current values its
    /// clean checkpoint.
    pub fn accept_changes(&mut self) {
        self.rows.retain(|row| row.state() != RowState::Deleted);
        for row in self.rows.iter_mut() {
            row.accept_changes();
        }
    }

    /// Drops Added rows and restores every other row to its checkpoint.
    pub fn reject_changes(&mut self) {
        self.rows.retain(|row| row.state() != RowState::Added);
        for row in self.rows.iter_mut() {
            row.reject_changes();
        }
    }

    /// Returns the rows with a pending change.
    pub fn get_changes(&self) -> Vec<&Row> {
        self.rows.filter(|row| row.state() != RowState::Unchanged)
    }

    /// Appends uniform records, returning how many rows were added.
    ///
    /// A table without columns first takes them from the first record's
    /// keys, typed after that record's values (null fields become strings).
    pub fn load_records(&mut self, records: impl IntoIterator<Item = Record>) -> Result<usize> {
        let mut added = 0;
        for record in records {
            if self.columns.is_empty() {
                for (name, value) in record.iter() {
                    let data_type = value.data_type().unwrap_or(DataType::String);
                    self.add_column(Column::new(name, data_type))?;
                }
            }
            self.add_row(record)?;
            added += 1;
        }
        debug!(table = %self.name, rows = added, "records loaded");
        Ok(added)
    }

    /// Appends a row that already matches this table's columns, keeping its
    /// state and snapshot.
    pub(crate) fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub(crate) fn into_rows(self) -> Vec<Row> {
        self.rows.into_vec()
    }
}
