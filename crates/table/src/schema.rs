//! Structural schema records and schema reconciliation.
//!
//! A `TableSchema` is the plain description of a table's structure that
//! crosses the crate boundary; any serde format can persist it. Tables can be
//! rebuilt from it, compared against it and reconciled towards it.

use crate::column::Column;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use tabula_core::{DataType, Result, Value};
use tracing::debug;

/// Description of one column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub name: String,
    /// `None` for an untyped column.
    pub data_type: Option<DataType>,
    pub allow_null: bool,
    #[serde(default = "null_value")]
    pub default_value: Value,
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub unique: bool,
    pub ordinal: usize,
    pub caption: String,
}

fn null_value() -> Value {
    Value::Null
}

impl ColumnSchema {
    fn from_column(column: &Column) -> Self {
        Self {
            name: column.name().to_string(),
            data_type: column.data_type(),
            allow_null: column.allows_null(),
            default_value: column.get_default_value().clone(),
            expression: column.get_expression().map(str::to_string),
            read_only: column.is_read_only(),
            unique: column.is_unique(),
            ordinal: column.ordinal(),
            caption: column.get_caption().to_string(),
        }
    }

    fn to_column(&self) -> Column {
        let mut column = Column::with_type(self.name.as_str(), self.data_type)
            .allow_null(self.allow_null)
            .default_value(self.default_value.clone())
            .read_only(self.read_only)
            .unique(self.unique);
        if self.caption != self.name {
            column = column.caption(self.caption.as_str());
        }
        if let Some(expression) = &self.expression {
            column = column.expression(expression.as_str());
        }
        column
    }
}

/// A derived uniqueness constraint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueConstraint {
    pub name: String,
    pub columns: Vec<String>,
    pub primary_key: bool,
}

/// Structural description of a table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub table_name: String,
    #[serde(default)]
    pub case_sensitive: bool,
    pub columns: Vec<ColumnSchema>,
    #[serde(default)]
    pub primary_key: Option<Vec<String>>,
    /// Derived from the columns and primary key; ignored on import.
    #[serde(default)]
    pub unique_constraints: Vec<UniqueConstraint>,
}

impl TableSchema {
    /// Looks up a column description by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A column present on both sides with different declared types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMismatch {
    pub column: String,
    /// Type in the schema compared against.
    pub expected: Option<DataType>,
    /// Type in this table.
    pub actual: Option<DataType>,
}

/// A column present on both sides with different nullability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NullabilityMismatch {
    pub column: String,
    pub expected: bool,
    pub actual: bool,
}

/// The structural differences between a table and a schema.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    /// In the schema, not in the table.
    pub missing_columns: Vec<String>,
    /// In the table, not in the schema.
    pub extra_columns: Vec<String>,
    pub type_mismatches: Vec<TypeMismatch>,
    pub nullability_mismatches: Vec<NullabilityMismatch>,
}

impl SchemaDiff {
    /// Returns true if no difference was found.
    pub fn is_identical(&self) -> bool {
        self.missing_columns.is_empty()
            && self.extra_columns.is_empty()
            && self.type_mismatches.is_empty()
            && self.nullability_mismatches.is_empty()
    }
}

/// What a reconciliation changed, phase by phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaUpdate {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

impl SchemaUpdate {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

impl Table {
    /// Describes this table's structure.
    pub fn export_schema(&self) -> TableSchema {
        let columns: Vec<ColumnSchema> = self.columns().iter().map(ColumnSchema::from_column).collect();

        let mut unique_constraints = Vec::new();
        if !self.primary_key().is_empty() {
            unique_constraints.push(UniqueConstraint {
                name: format!("pk{}", capitalize(self.name())),
                columns: self.primary_key().to_vec(),
                primary_key: true,
            });
        }
        for column in self.columns().iter() {
            if column.is_unique() && !column.is_primary_key() {
                unique_constraints.push(UniqueConstraint {
                    name: format!("uq{}{}", capitalize(self.name()), capitalize(column.name())),
                    columns: vec![column.name().to_string()],
                    primary_key: false,
                });
            }
        }

        TableSchema {
            table_name: self.name().to_string(),
            case_sensitive: self.case_sensitive(),
            columns,
            primary_key: (!self.primary_key().is_empty()).then(|| self.primary_key().to_vec()),
            unique_constraints,
        }
    }

    /// Rebuilds an empty table from a schema. Columns are added in ordinal
    /// order.
    pub fn import_schema(schema: &TableSchema) -> Result<Table> {
        let mut table = Table::new(schema.table_name.as_str());
        table.set_case_sensitive(schema.case_sensitive);

        let mut columns: Vec<&ColumnSchema> = schema.columns.iter().collect();
        columns.sort_by_key(|c| c.ordinal);
        for column in columns {
            table.add_column(column.to_column())?;
        }

        if let Some(key) = &schema.primary_key {
            let names: Vec<&str> = key.iter().map(String::as_str).collect();
            table.set_primary_key(&names)?;
        }
        debug!(table = %schema.table_name, columns = schema.columns.len(), "schema imported");
        Ok(table)
    }

    /// Diffs this table against `other`.
    pub fn compare_schema(&self, other: &TableSchema) -> SchemaDiff {
        let mut diff = SchemaDiff::default();

        for expected in &other.columns {
            match self.columns().find(&expected.name) {
                None => diff.missing_columns.push(expected.name.clone()),
                Some(actual) => {
                    if actual.data_type() != expected.data_type {
                        diff.type_mismatches.push(TypeMismatch {
                            column: expected.name.clone(),
                            expected: expected.data_type,
                            actual: actual.data_type(),
                        });
                    }
                    if actual.allows_null() != expected.allow_null {
                        diff.nullability_mismatches.push(NullabilityMismatch {
                            column: expected.name.clone(),
                            expected: expected.allow_null,
                            actual: actual.allows_null(),
                        });
                    }
                }
            }
        }

        diff.extra_columns = self
            .columns()
            .iter()
            .filter(|c| other.column(c.name()).is_none())
            .map(|c| c.name().to_string())
            .collect();

        diff
    }

    /// Reconciles this table towards `source`.
    ///
    /// Runs three phases in order: add missing columns (if `add_missing`),
    /// remove extra columns (if `remove_extra`), then align the type and
    /// nullability of shared columns. Earlier phases are not undone when a
    /// later one fails. Only column removal touches row values.
    pub fn update_schema(
        &mut self,
        source: &TableSchema,
        add_missing: bool,
        remove_extra: bool,
    ) -> Result<SchemaUpdate> {
        let diff = self.compare_schema(source);
        let mut update = SchemaUpdate::default();

        if add_missing {
            for name in &diff.missing_columns {
                if let Some(column) = source.column(name) {
                    self.add_column(column.to_column())?;
                    update.added.push(name.clone());
                }
            }
            debug!(table = %self.name(), added = update.added.len(), "schema add phase");
        }

        if remove_extra {
            for name in &diff.extra_columns {
                self.remove_column(name)?;
                update.removed.push(name.clone());
            }
            debug!(table = %self.name(), removed = update.removed.len(), "schema remove phase");
        }

        for mismatch in &diff.type_mismatches {
            self.column_mut(&mismatch.column)?.set_data_type(mismatch.expected);
            update.modified.push(mismatch.column.clone());
        }
        for mismatch in &diff.nullability_mismatches {
            self.column_mut(&mismatch.column)?.set_allow_null(mismatch.expected);
            if !update.modified.contains(&mismatch.column) {
                update.modified.push(mismatch.column.clone());
            }
        }
        debug!(table = %self.name(), modified = update.modified.len(), "schema modify phase");

        Ok(update)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}
