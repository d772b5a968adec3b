//! Tabula Table - typed, change-tracked in-memory tables and views.
//!
//! This crate provides the table layer of Tabula:
//!
//! - `Column` / `ColumnCollection`: Column definitions and the ordered column set
//! - `Row` / `RowCollection`: Row values with change tracking, and the row sequence
//! - `Table`: Row creation, search, sorting, cloning and change checkpoints
//! - `Criteria` / `RowFilter`: Per-column criteria and predicate filters
//! - `TableSchema`: Schema export, import, comparison and reconciliation
//! - `View`: Filtered and sorted projections recomputed on every access
//!
//! # Example
//!
//! ```rust
//! use tabula_core::{DataType, Record, Value};
//! use tabula_table::{Criteria, SortOrder, Table};
//!
//! let mut users = Table::new("Users");
//! users.add_column(("id", DataType::Number)).unwrap();
//! users.add_column(("name", DataType::String)).unwrap();
//! users.add_column(("age", DataType::Number)).unwrap();
//! users.set_primary_key(&["id"]).unwrap();
//!
//! users.add_row(Record::new().with("id", 1).with("name", "A").with("age", 30)).unwrap();
//! users.add_row(Record::new().with("id", 2).with("name", "B").with("age", 25)).unwrap();
//!
//! users.sort("age", SortOrder::Asc).unwrap();
//! assert_eq!(users.row(0).unwrap().get("name").unwrap(), &Value::from("B"));
//!
//! let older = users.find_rows(&Criteria::new().gt("age", 26));
//! assert_eq!(older.len(), 1);
//! ```

mod column;
mod columns;
pub mod criteria;
mod row;
mod rows;
pub mod schema;
pub mod sort;
mod table;
mod view;

pub use column::Column;
pub use columns::ColumnCollection;
pub use criteria::{Criteria, Criterion, Operator, RowFilter};
pub use row::{ColumnKey, Row, RowMut, RowState};
pub use rows::RowCollection;
pub use schema::{
    ColumnSchema, NullabilityMismatch, SchemaDiff, SchemaUpdate, TableSchema, TypeMismatch,
    UniqueConstraint,
};
pub use sort::{SortCriterion, SortOrder};
pub use table::{RowInput, Table};
pub use view::{View, ViewSort};
