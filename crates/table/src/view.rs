//! Filtered and sorted projections of a shared table.
//!
//! A view owns only its filter and sort settings. Rows are recomputed from
//! the live table on every access, so mutations of the table are visible
//! immediately and nothing is cached.

use crate::criteria::RowFilter;
use crate::row::Row;
use crate::sort::SortOrder;
use crate::table::Table;
use core::cmp::Ordering;
use std::cell::RefCell;
use std::rc::Rc;
use tabula_core::{Error, Record, Result, Value};

/// The ordering a view applies to its rows.
pub enum ViewSort {
    /// By one column, nulls last.
    Column { column: String, order: SortOrder },
    /// By a caller-supplied comparator.
    Comparator(Box<dyn Fn(&Row, &Row) -> Ordering>),
    /// By a derived key, nulls last.
    Key {
        key: Box<dyn Fn(&Row) -> Value>,
        order: SortOrder,
    },
}

impl ViewSort {
    pub fn column(column: impl Into<String>, order: SortOrder) -> Self {
        ViewSort::Column {
            column: column.into(),
            order,
        }
    }

    pub fn comparator<F>(compare: F) -> Self
    where
        F: Fn(&Row, &Row) -> Ordering + 'static,
    {
        ViewSort::Comparator(Box::new(compare))
    }

    pub fn key<K>(key: K, order: SortOrder) -> Self
    where
        K: Fn(&Row) -> Value + 'static,
    {
        ViewSort::Key {
            key: Box::new(key),
            order,
        }
    }
}

impl core::fmt::Debug for ViewSort {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ViewSort::Column { column, order } => f
                .debug_struct("Column")
                .field("column", column)
                .field("order", order)
                .finish(),
            ViewSort::Comparator(_) => f.write_str("Comparator(..)"),
            ViewSort::Key { order, .. } => f.debug_struct("Key").field("order", order).finish_non_exhaustive(),
        }
    }
}

/// A read-only, recomputed projection of one table.
pub struct View {
    table: Rc<RefCell<Table>>,
    filter: Option<Box<dyn RowFilter>>,
    sort: Option<ViewSort>,
}

impl View {
    /// Creates an unfiltered, unsorted view.
    pub fn new(table: Rc<RefCell<Table>>) -> Self {
        Self {
            table,
            filter: None,
            sort: None,
        }
    }

    /// Sets the filter while building.
    pub fn with_filter(mut self, filter: impl RowFilter + 'static) -> Self {
        self.set_filter(filter);
        self
    }

    /// Sets the sort while building.
    pub fn with_sort(mut self, sort: ViewSort) -> Self {
        self.set_sort(sort);
        self
    }

    /// Returns the shared table.
    pub fn table(&self) -> &Rc<RefCell<Table>> {
        &self.table
    }

    /// Replaces the filter.
    pub fn set_filter(&mut self, filter: impl RowFilter + 'static) -> &mut Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Replaces the sort.
    pub fn set_sort(&mut self, sort: ViewSort) -> &mut Self {
        self.sort = Some(sort);
        self
    }

    pub fn clear_filter(&mut self) -> &mut Self {
        self.filter = None;
        self
    }

    pub fn clear_sort(&mut self) -> &mut Self {
        self.sort = None;
        self
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn sort(&self) -> Option<&ViewSort> {
        self.sort.as_ref()
    }

    /// Computes the current rows: the table's rows that pass the filter, in
    /// sort order if a sort is set, otherwise in table order.
    ///
    /// Fails with `NotFound` if the sort names a column the table no longer
    /// has.
    pub fn get_rows(&self) -> Result<Vec<Row>> {
        let table = self.table.borrow();
        let rows = table
            .rows()
            .iter()
            .filter(|row| self.filter.as_deref().map_or(true, |f| f.matches(row)))
            .cloned();

        let Some(sort) = &self.sort else {
            return Ok(rows.collect());
        };

        let mut scratch = table.clone_structure();
        for row in rows {
            scratch.push_row(row);
        }
        match sort {
            ViewSort::Column { column, order } => scratch.sort(column, *order)?,
            ViewSort::Comparator(compare) => scratch.sort_with(|a, b| compare(a, b)),
            ViewSort::Key { key, order } => scratch.sort_by(|row| key(row), *order),
        }
        Ok(scratch.into_rows())
    }

    /// Returns the number of rows currently in the view.
    pub fn count(&self) -> Result<usize> {
        if self.sort.is_none() {
            let table = self.table.borrow();
            return Ok(match self.filter.as_deref() {
                Some(filter) => table.find_rows(filter).len(),
                None => table.row_count(),
            });
        }
        Ok(self.get_rows()?.len())
    }

    /// Returns the row at `index` of the current rows.
    pub fn row(&self, index: usize) -> Result<Row> {
        let mut rows = self.get_rows()?;
        let len = rows.len();
        if index >= len {
            return Err(Error::index_out_of_range(index, len));
        }
        Ok(rows.swap_remove(index))
    }

    /// Materializes the current rows into a new, independent table with the
    /// source's structure.
    pub fn to_table(&self) -> Result<Table> {
        let rows = self.get_rows()?;
        let mut table = self.table.borrow().clone_structure();
        for row in rows {
            table.push_row(row);
        }
        Ok(table)
    }

    /// Snapshots the current rows as plain records.
    pub fn to_array(&self) -> Result<Vec<Record>> {
        Ok(self.get_rows()?.iter().map(Row::to_record).collect())
    }
}

impl core::fmt::Debug for View {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("View")
            .field("table", &self.table.borrow().name())
            .field("filtered", &self.filter.is_some())
            .field("sort", &self.sort)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criteria;
    use tabula_core::DataType;

    fn shared() -> Rc<RefCell<Table>> {
        let mut table = Table::new("scores");
        table.add_column(("player", DataType::String)).unwrap();
        table.add_column(("points", DataType::Number)).unwrap();
        for (player, points) in [("ann", 12), ("bob", 7), ("cid", 30), ("dee", 7)] {
            table
                .add_row(Record::new().with("player", player).with("points", points))
                .unwrap();
        }
        Rc::new(RefCell::new(table))
    }

    fn players(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|r| r.get("player").unwrap().to_string()).collect()
    }

    #[test]
    fn test_unfiltered_view_mirrors_table() {
        let view = View::new(shared());
        assert_eq!(players(&view.get_rows().unwrap()), vec!["ann", "bob", "cid", "dee"]);
        assert_eq!(view.count().unwrap(), 4);
    }

    #[test]
    fn test_filter_and_sort() {
        let mut view = View::new(shared());
        view.set_filter(Criteria::new().gte("points", 10))
            .set_sort(ViewSort::column("points", SortOrder::Desc));
        assert_eq!(players(&view.get_rows().unwrap()), vec!["cid", "ann"]);
        assert_eq!(view.count().unwrap(), 2);
        assert_eq!(view.row(1).unwrap().get("player").unwrap(), &Value::from("ann"));
        assert_eq!(view.row(2).unwrap_err(), Error::index_out_of_range(2, 2));
    }

    #[test]
    fn test_builder_construction() {
        let view = View::new(shared())
            .with_filter(Criteria::new().gte("points", 10))
            .with_sort(ViewSort::column("points", SortOrder::Desc));
        assert!(view.has_filter());
        assert!(view.sort().is_some());
        assert_eq!(players(&view.get_rows().unwrap()), vec!["cid", "ann"]);

        let low = View::new(shared()).with_filter(|row: &Row| {
            row.get("points").unwrap() == &Value::from(7)
        });
        assert_eq!(players(&low.get_rows().unwrap()), vec!["bob", "dee"]);
    }

    #[test]
    fn test_sort_leaves_table_order_alone() {
        let table = shared();
        let mut view = View::new(Rc::clone(&table));
        view.set_sort(ViewSort::column("player", SortOrder::Desc));
        assert_eq!(players(&view.get_rows().unwrap()), vec!["dee", "cid", "bob", "ann"]);
        let first = table.borrow().row(0).unwrap().get("player").unwrap().clone();
        assert_eq!(first, Value::from("ann"));
    }

    #[test]
    fn test_comparator_and_key_sorts() {
        let mut view = View::new(shared());
        view.set_sort(ViewSort::comparator(|a, b| {
            let name = |r: &Row| r.get("player").unwrap().to_string();
            name(b).cmp(&name(a))
        }));
        assert_eq!(players(&view.get_rows().unwrap()), vec!["dee", "cid", "bob", "ann"]);

        view.set_sort(ViewSort::key(
            |row| row.get("points").cloned().unwrap_or(Value::Null),
            SortOrder::Asc,
        ));
        // Ties keep table order.
        assert_eq!(players(&view.get_rows().unwrap()), vec!["bob", "dee", "ann", "cid"]);
    }

    #[test]
    fn test_recomputes_on_every_access() {
        let table = shared();
        let mut view = View::new(Rc::clone(&table));
        view.set_filter(|row: &Row| row.get("points").unwrap() == &Value::from(7));

        let first = view.get_rows().unwrap();
        assert_eq!(first, view.get_rows().unwrap());
        assert_eq!(players(&first), vec!["bob", "dee"]);

        table.borrow_mut().set_value(0, "points", 7).unwrap();
        assert_eq!(players(&view.get_rows().unwrap()), vec!["ann", "bob", "dee"]);

        view.clear_filter();
        assert_eq!(view.count().unwrap(), 4);
    }

    #[test]
    fn test_sort_on_removed_column_fails() {
        let table = shared();
        let mut view = View::new(Rc::clone(&table));
        view.set_sort(ViewSort::column("points", SortOrder::Asc));
        table.borrow_mut().remove_column("points").unwrap();
        assert!(view.get_rows().unwrap_err().is_not_found());
        view.clear_sort();
        assert_eq!(view.get_rows().unwrap().len(), 4);
    }

    #[test]
    fn test_materialize() {
        let table = shared();
        let mut view = View::new(Rc::clone(&table));
        view.set_filter(Criteria::new().lt("points", 10));

        let copy = view.to_table().unwrap();
        assert_eq!(copy.row_count(), 2);
        assert_eq!(copy.columns(), table.borrow().columns());

        let records = view.to_array().unwrap();
        assert_eq!(records[0].get("player"), Some(&Value::from("bob")));

        table.borrow_mut().clear();
        assert_eq!(copy.row_count(), 2);
        assert!(view.to_array().unwrap().is_empty());
    }
}
