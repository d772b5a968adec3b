//! Property-based tests for tabula-table using proptest.

use proptest::prelude::*;
use tabula_core::{DataType, Record, Value};
use tabula_table::{Column, SortOrder, Table};

#[derive(Clone, Debug)]
enum SchemaOp {
    Add(u8),
    Remove(u8),
}

fn schema_op() -> impl Strategy<Value = SchemaOp> {
    prop_oneof![
        (0u8..12).prop_map(SchemaOp::Add),
        (0u8..12).prop_map(SchemaOp::Remove),
    ]
}

proptest! {
    /// Ordinals stay dense and match iteration order under any add/remove sequence.
    #[test]
    fn ordinals_stay_dense(ops in prop::collection::vec(schema_op(), 1..60)) {
        let mut table = Table::new("t");
        table.add_row(Record::new()).unwrap();
        for op in ops {
            match op {
                SchemaOp::Add(n) => { let _ = table.add_column(format!("c{}", n)); }
                SchemaOp::Remove(n) => { let _ = table.remove_column(&format!("c{}", n)); }
            }
        }
        for (i, column) in table.columns().iter().enumerate() {
            prop_assert_eq!(column.ordinal(), i);
        }
        // Every row carries exactly the current columns, in order.
        let row = table.row(0).unwrap();
        let row_columns: Vec<&str> = row.values().map(|(n, _)| n).collect();
        prop_assert_eq!(row_columns, table.columns().names());
    }

    /// A column added after rows exist is back-filled with its default.
    #[test]
    fn added_column_backfills_default(rows in 0usize..20, default in -1000i64..1000) {
        let mut table = Table::new("t");
        table.add_column(("id", DataType::Number)).unwrap();
        for i in 0..rows {
            table.add_row(vec![Value::from(i as i64)]).unwrap();
        }
        table.add_column(Column::new("d", DataType::Number).default_value(default)).unwrap();
        table.add_row(vec![Value::from(rows as i64)]).unwrap();

        for row in table.rows().iter() {
            prop_assert_eq!(row.get("d").unwrap(), &Value::from(default));
        }
        table.remove_column("d").unwrap();
        for row in table.rows().iter() {
            prop_assert!(row.get("d").is_err());
        }
    }

    /// Sorting a number column orders non-null values and puts nulls last.
    #[test]
    fn number_sort_orders_with_nulls_last(
        values in prop::collection::vec(prop::option::of(-1e6f64..1e6), 0..80),
        desc in any::<bool>()
    ) {
        let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
        let mut table = Table::new("t");
        table.add_column(("n", DataType::Number)).unwrap();
        for v in &values {
            table.add_row(vec![Value::from(*v)]).unwrap();
        }
        table.sort("n", order).unwrap();

        let sorted: Vec<Option<f64>> = table
            .rows()
            .iter()
            .map(|r| r.get("n").unwrap().as_number())
            .collect();
        let non_null = values.iter().filter(|v| v.is_some()).count();
        prop_assert!(sorted[..non_null].iter().all(Option::is_some));
        prop_assert!(sorted[non_null..].iter().all(Option::is_none));
        for pair in sorted[..non_null].windows(2) {
            let (a, b) = (pair[0].unwrap(), pair[1].unwrap());
            if desc { prop_assert!(a >= b); } else { prop_assert!(a <= b); }
        }
    }

    /// Writing a numeric string to a number column stores the number.
    #[test]
    fn numeric_strings_coerce(n in -1_000_000i64..1_000_000) {
        let mut table = Table::new("t");
        table.add_column(Column::new("n", DataType::Number).allow_null(false)).unwrap();
        table.add_row(vec![Value::from(0)]).unwrap();
        table.set_value(0, "n", n.to_string()).unwrap();
        prop_assert_eq!(table.row(0).unwrap().get("n").unwrap(), &Value::Number(n as f64));
        prop_assert!(table.set_value(0, "n", Value::Null).is_err());
    }
}
