//! Column definition for Tabula tables.

use tabula_core::{DataType, Value};

/// A column definition.
///
/// Columns are built detached and become part of a table through
/// `Table::add_column`, which assigns the ordinal and records the owning
/// table's name as a back-reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Column name, unique within its table.
    name: String,
    /// Declared type; `None` stores written values unchanged.
    data_type: Option<DataType>,
    /// Whether this column allows null values.
    allow_null: bool,
    /// Value given to the column in new rows.
    default_value: Value,
    /// Display caption; defaults to the name.
    caption: Option<String>,
    /// Opaque expression text, never evaluated.
    expression: Option<String>,
    read_only: bool,
    unique: bool,
    primary_key: bool,
    /// Position among sibling columns (0-based).
    ordinal: usize,
    /// Name of the owning table, if attached.
    table: Option<String>,
}

impl Column {
    /// Creates a new typed column definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self::with_type(name, Some(data_type))
    }

    /// Creates a column that stores values without coercion.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::with_type(name, None)
    }

    /// Creates a column with an optional declared type.
    pub fn with_type(name: impl Into<String>, data_type: Option<DataType>) -> Self {
        Self {
            name: name.into(),
            data_type,
            allow_null: true,
            default_value: Value::Null,
            caption: None,
            expression: None,
            read_only: false,
            unique: false,
            primary_key: false,
            ordinal: 0,
            table: None,
        }
    }

    /// Sets whether this column allows null values.
    pub fn allow_null(mut self, allow_null: bool) -> Self {
        self.allow_null = allow_null;
        self
    }

    /// Sets the default value for this column.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Sets the display caption.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Sets the expression text.
    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Sets the read-only flag.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Sets whether values in this column must be unique.
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Marks this column as (part of) the primary key.
    ///
    /// A primary key column is also unique and does not allow null.
    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.set_primary_key(primary_key);
        self
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[inline]
    pub fn data_type(&self) -> Option<DataType> {
        self.data_type
    }

    /// Returns whether this column allows null values.
    #[inline]
    pub fn allows_null(&self) -> bool {
        self.allow_null
    }

    /// Returns the default value for this column.
    #[inline]
    pub fn get_default_value(&self) -> &Value {
        &self.default_value
    }

    /// Returns the caption, falling back to the name.
    pub fn get_caption(&self) -> &str {
        self.caption.as_deref().unwrap_or(&self.name)
    }

    /// Returns the expression text.
    pub fn get_expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[inline]
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    #[inline]
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Returns the column position (0-based).
    #[inline]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Returns the name of the owning table, if attached.
    #[inline]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub(crate) fn set_ordinal(&mut self, ordinal: usize) {
        self.ordinal = ordinal;
    }

    pub(crate) fn attach(&mut self, table: &str) {
        self.table = Some(table.to_string());
    }

    pub(crate) fn detach(&mut self) {
        self.table = None;
    }

    pub(crate) fn set_data_type(&mut self, data_type: Option<DataType>) {
        self.data_type = data_type;
    }

    pub(crate) fn set_allow_null(&mut self, allow_null: bool) {
        self.allow_null = allow_null;
    }

    pub(crate) fn set_primary_key(&mut self, primary_key: bool) {
        self.primary_key = primary_key;
        if primary_key {
            self.unique = true;
            self.allow_null = false;
        }
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::untyped(name)
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column::untyped(name)
    }
}

impl From<(&str, DataType)> for Column {
    fn from((name, data_type): (&str, DataType)) -> Self {
        Column::new(name, data_type)
    }
}
