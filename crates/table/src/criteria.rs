//! Row filtering by predicate or by per-column criteria.
//!
//! A `Criteria` is a conjunction of `(column, Criterion)` entries. The shape of
//! every entry (equality, pattern, operator, predicate) is fixed when the
//! criteria are built, so matching a row never has to inspect its input.

use crate::row::Row;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tabula_core::{Error, Result, Value};

/// Anything that can decide whether a row matches.
pub trait RowFilter {
    fn matches(&self, row: &Row) -> bool;
}

impl<F> RowFilter for F
where
    F: Fn(&Row) -> bool,
{
    fn matches(&self, row: &Row) -> bool {
        self(row)
    }
}

/// A comparison operator with its operand.
#[derive(Clone, Debug, PartialEq)]
pub enum Operator {
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Ne(Value),
    In(Vec<Value>),
    /// Substring containment on the display form.
    Contains(Value),
}

impl Operator {
    fn test(&self, value: &Value) -> bool {
        use core::cmp::Ordering::*;
        match self {
            Operator::Gt(operand) => value.compare(operand) == Some(Greater),
            Operator::Gte(operand) => matches!(value.compare(operand), Some(Greater | Equal)),
            Operator::Lt(operand) => value.compare(operand) == Some(Less),
            Operator::Lte(operand) => matches!(value.compare(operand), Some(Less | Equal)),
            Operator::Ne(operand) => value != operand,
            Operator::In(options) => options.iter().any(|o| o == value),
            Operator::Contains(operand) => {
                !value.is_null() && value.to_string().contains(&operand.to_string())
            }
        }
    }
}

/// The test applied to one column's value.
pub enum Criterion {
    /// Strict equality.
    Equals(Value),
    /// Regular expression tested against the display form of non-null values.
    Pattern(Regex),
    Operator(Operator),
    Predicate(Box<dyn Fn(&Value) -> bool>),
}

impl Criterion {
    /// Tests a single value.
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Criterion::Equals(expected) => value == expected,
            Criterion::Pattern(regex) => !value.is_null() && regex.is_match(&value.to_string()),
            Criterion::Operator(op) => op.test(value),
            Criterion::Predicate(f) => f(value),
        }
    }
}

impl core::fmt::Debug for Criterion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Criterion::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
            Criterion::Pattern(r) => f.debug_tuple("Pattern").field(&r.as_str()).finish(),
            Criterion::Operator(op) => f.debug_tuple("Operator").field(op).finish(),
            Criterion::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A conjunction of per-column criteria.
///
/// A row matches when every entry matches; a column the row does not have
/// fails its entry.
#[derive(Debug, Default)]
pub struct Criteria {
    entries: Vec<(String, Criterion)>,
}

impl Criteria {
    /// Creates empty criteria, which match every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    pub fn with(mut self, column: impl Into<String>, criterion: Criterion) -> Self {
        self.entries.push((column.into(), criterion));
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(column, Criterion::Equals(value.into()))
    }

    pub fn ne(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(column, Operator::Ne(value.into()))
    }

    pub fn gt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(column, Operator::Gt(value.into()))
    }

    pub fn gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(column, Operator::Gte(value.into()))
    }

    pub fn lt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(column, Operator::Lt(value.into()))
    }

    pub fn lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(column, Operator::Lte(value.into()))
    }

    pub fn is_in<V: Into<Value>>(
        self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.op(column, Operator::In(values.into_iter().map(Into::into).collect()))
    }

    pub fn contains(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.op(column, Operator::Contains(value.into()))
    }

    pub fn pattern(self, column: impl Into<String>, regex: Regex) -> Self {
        self.with(column, Criterion::Pattern(regex))
    }

    /// Adds a predicate over the column's value.
    pub fn test<F>(self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        self.with(column, Criterion::Predicate(Box::new(f)))
    }

    fn op(self, column: impl Into<String>, op: Operator) -> Self {
        self.with(column, Criterion::Operator(op))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds criteria from a JSON criteria document.
    ///
    /// Each member maps a column to either a scalar (equality) or an object of
    /// operators: `$gt`, `$gte`, `$lt`, `$lte`, `$ne`, `$in` (array),
    /// `$contains` and `$regex` (pattern string).
    pub fn from_json(doc: &JsonValue) -> Result<Self> {
        let members = doc
            .as_object()
            .ok_or_else(|| Error::invalid_operation("criteria must be a JSON object"))?;

        let mut criteria = Criteria::new();
        for (column, entry) in members {
            match entry {
                JsonValue::Object(ops) => {
                    for (op, operand) in ops {
                        criteria = criteria.with(column.as_str(), parse_operator(op, operand)?);
                    }
                }
                JsonValue::Array(_) => {
                    return Err(Error::invalid_operation(format!(
                        "criteria for column {} must be a scalar or an operator object",
                        column
                    )))
                }
                scalar => {
                    criteria = criteria.with(column.as_str(), Criterion::Equals(operand_value(scalar)?))
                }
            }
        }
        Ok(criteria)
    }
}

impl RowFilter for Criteria {
    fn matches(&self, row: &Row) -> bool {
        self.entries.iter().all(|(column, criterion)| match row.get(column) {
            Ok(value) => criterion.test(value),
            Err(_) => false,
        })
    }
}

fn parse_operator(op: &str, operand: &JsonValue) -> Result<Criterion> {
    let value = || operand_value(operand);
    let op = match op {
        "$gt" => Operator::Gt(value()?),
        "$gte" => Operator::Gte(value()?),
        "$lt" => Operator::Lt(value()?),
        "$lte" => Operator::Lte(value()?),
        "$ne" => Operator::Ne(value()?),
        "$contains" => Operator::Contains(value()?),
        "$in" => {
            let options = operand
                .as_array()
                .ok_or_else(|| Error::invalid_operation("$in expects an array"))?;
            Operator::In(options.iter().map(operand_value).collect::<Result<_>>()?)
        }
        "$regex" => {
            let pattern = operand
                .as_str()
                .ok_or_else(|| Error::invalid_operation("$regex expects a string"))?;
            let regex = Regex::new(pattern)
                .map_err(|e| Error::invalid_operation(format!("invalid pattern {}: {}", pattern, e)))?;
            return Ok(Criterion::Pattern(regex));
        }
        other => {
            return Err(Error::invalid_operation(format!("unknown operator: {}", other)));
        }
    };
    Ok(Criterion::Operator(op))
}

/// Reads a JSON scalar operand as a cell value.
fn operand_value(json: &JsonValue) -> Result<Value> {
    Value::deserialize(json)
        .map_err(|e| Error::invalid_operation(format!("invalid operand {}: {}", json, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::table::Table;
    use serde_json::json;
    use tabula_core::{DataType, Record};

    fn people() -> Table {
        let mut table = Table::new("people");
        table.add_column(Column::new("name", DataType::String)).unwrap();
        table.add_column(Column::new("age", DataType::Number)).unwrap();
        table.add_column(Column::untyped("tag")).unwrap();
        table.add_row(Record::new().with("name", "Ann").with("age", 30).with("tag", "x")).unwrap();
        table.add_row(Record::new().with("name", "Bob").with("age", 25)).unwrap();
        table.add_row(Record::new().with("name", "Cid").with("age", 41).with("tag", 3)).unwrap();
        table
    }

    fn names(rows: Vec<&Row>) -> Vec<String> {
        rows.iter().map(|r| r.get("name").unwrap().to_string()).collect()
    }

    #[test]
    fn test_equality_and_operators() {
        let table = people();
        assert_eq!(names(table.find_rows(&Criteria::new().eq("name", "Bob"))), vec!["Bob"]);
        assert_eq!(names(table.find_rows(&Criteria::new().gt("age", 26))), vec!["Ann", "Cid"]);
        assert_eq!(names(table.find_rows(&Criteria::new().lte("age", 30))), vec!["Ann", "Bob"]);
        assert_eq!(
            names(table.find_rows(&Criteria::new().gte("age", 25).lt("age", 41))),
            vec!["Ann", "Bob"]
        );
        assert_eq!(names(table.find_rows(&Criteria::new().ne("name", "Ann"))), vec!["Bob", "Cid"]);
        assert_eq!(
            names(table.find_rows(&Criteria::new().is_in("age", [25, 41]))),
            vec!["Bob", "Cid"]
        );
    }

    #[test]
    fn test_equality_is_strict() {
        let table = people();
        assert!(table.find_rows(&Criteria::new().eq("tag", "3")).is_empty());
        assert_eq!(names(table.find_rows(&Criteria::new().eq("tag", 3))), vec!["Cid"]);
    }

    #[test]
    fn test_contains_and_pattern() {
        let table = people();
        assert_eq!(names(table.find_rows(&Criteria::new().contains("name", "o"))), vec!["Bob"]);
        let regex = Regex::new("^[AC]").unwrap();
        assert_eq!(names(table.find_rows(&Criteria::new().pattern("name", regex))), vec!["Ann", "Cid"]);
        // Null tags never match a pattern.
        let any = Regex::new(".*").unwrap();
        assert_eq!(table.find_rows(&Criteria::new().pattern("tag", any)).len(), 2);
    }

    #[test]
    fn test_value_predicate() {
        let table = people();
        let found = table.find_rows(&Criteria::new().test("age", |v| v.as_number() == Some(25.0)));
        assert_eq!(names(found), vec!["Bob"]);
    }

    #[test]
    fn test_unknown_column_never_matches() {
        let table = people();
        assert!(table.find_rows(&Criteria::new().eq("missing", 1)).is_empty());
        assert_eq!(table.find_rows(&Criteria::new()).len(), 3);
    }

    #[test]
    fn test_from_json() {
        let table = people();
        let criteria = Criteria::from_json(&json!({ "age": { "$gt": 26, "$lt": 40 } })).unwrap();
        assert_eq!(criteria.len(), 2);
        assert_eq!(names(table.find_rows(&criteria)), vec!["Ann"]);

        let criteria = Criteria::from_json(&json!({ "name": { "$regex": "b$" } })).unwrap();
        assert_eq!(names(table.find_rows(&criteria)), vec!["Bob"]);

        let criteria = Criteria::from_json(&json!({ "name": "Cid", "age": { "$in": [41] } })).unwrap();
        assert_eq!(names(table.find_rows(&criteria)), vec!["Cid"]);
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        assert!(Criteria::from_json(&json!([1, 2])).is_err());
        assert!(Criteria::from_json(&json!({ "a": [1] })).is_err());
        assert!(Criteria::from_json(&json!({ "a": { "$between": 1 } })).is_err());
        assert!(Criteria::from_json(&json!({ "a": { "$in": 1 } })).is_err());
        assert!(Criteria::from_json(&json!({ "a": { "$regex": "(" } })).is_err());
        assert!(Criteria::from_json(&json!({ "a": { "$gt": [1] } })).is_err());
        assert!(Criteria::from_json(&json!({ "a": { "$in": [1, {}] } })).is_err());
    }

    #[test]
    fn test_closure_filter() {
        let table = people();
        let adults = |row: &Row| row.get("age").ok().and_then(Value::as_number).unwrap_or(0.0) >= 30.0;
        assert_eq!(names(table.find_rows(&adults)), vec!["Ann", "Cid"]);
    }
}
