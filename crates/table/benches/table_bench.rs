//! Benchmarks for table row insertion, criteria search and sorting.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tabula_core::{DataType, Record, Value};
use tabula_table::{Criteria, SortCriterion, SortOrder, Table};

fn create_table() -> Table {
    let mut table = Table::new("quotes");
    table.add_column(("id", DataType::Number)).unwrap();
    table.add_column(("price", DataType::Number)).unwrap();
    table.add_column(("symbol", DataType::String)).unwrap();
    table.add_column(("sector", DataType::String)).unwrap();
    table.set_primary_key(&["id"]).unwrap();
    table
}

fn populate(table: &mut Table, count: u64) {
    let sectors = ["Tech", "Finance", "Health", "Energy", "Consumer"];
    for i in 1..=count {
        table
            .add_row(
                Record::new()
                    .with("id", i as i64)
                    .with("price", 100.0 + ((i * 7919) % 1000) as f64 * 0.1)
                    .with("symbol", format!("SYM{}", i))
                    .with("sector", sectors[(i as usize) % sectors.len()]),
            )
            .unwrap();
    }
}

fn insert_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_insert");
    for count in [100u64, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut table = create_table();
                populate(&mut table, count);
                black_box(table.row_count())
            });
        });
    }
    group.finish();
}

fn search_benchmark(c: &mut Criterion) {
    let mut table = create_table();
    populate(&mut table, 10_000);
    let criteria = Criteria::new()
        .eq("sector", "Tech")
        .gt("price", 150)
        .lte("price", Value::Number(180.0));

    c.bench_function("find_rows_criteria_10k", |b| {
        b.iter(|| black_box(table.find_rows(black_box(&criteria)).len()))
    });
}

fn sort_benchmark(c: &mut Criterion) {
    let mut table = create_table();
    populate(&mut table, 10_000);

    c.bench_function("sort_number_10k", |b| {
        b.iter(|| {
            let mut copy = table.clone();
            copy.sort("price", SortOrder::Desc).unwrap();
            black_box(copy.row_count())
        })
    });

    c.bench_function("sort_multiple_10k", |b| {
        let keys = [SortCriterion::asc("sector"), SortCriterion::desc("price")];
        b.iter(|| {
            let mut copy = table.clone();
            copy.sort_multiple(&keys).unwrap();
            black_box(copy.row_count())
        })
    });
}

criterion_group!(benches, insert_benchmark, search_benchmark, sort_benchmark);
criterion_main!(benches);
