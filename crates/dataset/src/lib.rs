//! Tabula Dataset - multi-table datasets with parent/child relations.
//!
//! A `Dataset` owns named tables and the `Relation`s declared between their
//! columns, and navigates from a parent row to its child rows and back.
//!
//! # Example
//!
//! ```rust
//! use tabula_core::{DataType, Record};
//! use tabula_dataset::Dataset;
//! use tabula_table::Table;
//!
//! let mut parents = Table::new("parents");
//! parents.add_column(("id", DataType::Number)).unwrap();
//! parents.add_row(Record::new().with("id", 7)).unwrap();
//!
//! let mut children = Table::new("children");
//! children.add_column(("pid", DataType::Number)).unwrap();
//! children.add_row(Record::new().with("pid", 7)).unwrap();
//! children.add_row(Record::new().with("pid", 8)).unwrap();
//!
//! let mut dataset = Dataset::new("family");
//! dataset.add_table(parents).unwrap();
//! dataset.add_table(children).unwrap();
//! dataset.relate("kids", "parents", "id", "children", "pid").unwrap();
//!
//! let parent = dataset.table("parents").unwrap().row(0).unwrap();
//! assert_eq!(dataset.get_child_rows(parent, "kids").unwrap().len(), 1);
//! ```

mod dataset;
mod relation;

pub use dataset::Dataset;
pub use relation::{ColumnRef, Relation};
