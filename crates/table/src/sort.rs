//! Row ordering for tables and views.

use crate::row::Row;
use core::cmp::Ordering;
use core::str::FromStr;
use tabula_core::{DataType, Value};

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortOrder {
    /// Applies this order to a comparison result.
    #[inline]
    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// One key of a multi-column sort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortCriterion {
    pub column: String,
    pub order: SortOrder,
}

impl SortCriterion {
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Desc)
    }
}

impl From<&str> for SortCriterion {
    fn from(column: &str) -> Self {
        Self::asc(column)
    }
}

/// Orders nulls after every non-null value, whatever the direction; `cmp`
/// decides between two non-null values and is then directed by `order`.
pub fn nulls_last<F>(a: &Value, b: &Value, order: SortOrder, cmp: F) -> Ordering
where
    F: FnOnce(&Value, &Value) -> Ordering,
{
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => order.apply(cmp(a, b)),
    }
}

/// Compares two cell values of a column declared as `data_type`.
///
/// Number columns compare numerically, date columns by timestamp and every
/// other column by the display form of its values.
pub fn compare_typed(a: &Value, b: &Value, data_type: Option<DataType>, order: SortOrder) -> Ordering {
    nulls_last(a, b, order, |a, b| match data_type {
        Some(DataType::Number) => a.sort_cmp(b),
        Some(DataType::Date) => match (a.timestamp_millis(), b.timestamp_millis()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => a.sort_cmp(b),
        },
        _ => locale_cmp(&a.to_string(), &b.to_string()),
    })
}

/// Case-folded string comparison; the raw strings break ties so the order
/// stays total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Compares two rows on the value of one column.
pub(crate) fn compare_rows(
    a: &Row,
    b: &Row,
    column: &str,
    data_type: Option<DataType>,
    order: SortOrder,
) -> Ordering {
    let null = Value::Null;
    let x = a.get(column).unwrap_or(&null);
    let y = b.get(column).unwrap_or(&null);
    compare_typed(x, y, data_type, order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("ASC".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("up".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }

    #[test]
    fn test_nulls_last_both_directions() {
        let one = Value::from(1);
        for order in [SortOrder::Asc, SortOrder::Desc] {
            assert_eq!(
                compare_typed(&Value::Null, &one, Some(DataType::Number), order),
                Ordering::Greater
            );
            assert_eq!(
                compare_typed(&one, &Value::Null, Some(DataType::Number), order),
                Ordering::Less
            );
        }
    }

    #[test]
    fn test_numeric_vs_string_compare() {
        let (a, b) = (Value::from(9), Value::from(10));
        assert_eq!(compare_typed(&a, &b, Some(DataType::Number), SortOrder::Asc), Ordering::Less);
        assert_eq!(compare_typed(&a, &b, Some(DataType::Number), SortOrder::Desc), Ordering::Greater);
        // Display forms: "9" > "10".
        assert_eq!(compare_typed(&a, &b, Some(DataType::String), SortOrder::Asc), Ordering::Greater);
    }

    #[test]
    fn test_locale_cmp_folds_case() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("b", "B"), Ordering::Greater);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_date_compare_by_timestamp() {
        let early = Value::date_from_millis(1_000).unwrap();
        let late = Value::date_from_millis(2_000).unwrap();
        assert_eq!(
            compare_typed(&early, &late, Some(DataType::Date), SortOrder::Asc),
            Ordering::Less
        );
    }
}
