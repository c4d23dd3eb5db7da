//! Benchmarks for filtering and figure building
//!
//! Run with: cargo bench

use chrono::{Duration, NaiveDate};
use covidboard::data::{date_label, TimeSeriesTable};
use covidboard::figure::{line_chart, AggregateSeries, LineChartSpec};
use covidboard::filters::{DateRange, RegionSelection};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// Weekly table with `weeks` rows and `regions` country columns plus World
fn synthetic_table(weeks: usize, regions: usize) -> TimeSeriesTable {
    let start = NaiveDate::from_ymd_opt(2020, 1, 5).unwrap();

    let mut csv = String::from("date,World");
    for r in 0..regions {
        csv.push_str(&format!(",Region {}", r));
    }
    csv.push('\n');

    for w in 0..weeks {
        csv.push_str(&date_label(start + Duration::weeks(w as i64)));
        csv.push_str(&format!(",{}", w * regions * 10));
        for r in 0..regions {
            csv.push_str(&format!(",{}", w * 10 + r));
        }
        csv.push('\n');
    }

    TimeSeriesTable::from_csv_str("bench", &csv).unwrap()
}

fn bench_date_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("date_filter");

    for weeks in [52, 156, 520] {
        let table = synthetic_table(weeks, 200);
        let range = DateRange::new(weeks / 4, weeks * 3 / 4);

        group.throughput(Throughput::Elements(weeks as u64));
        group.bench_function(format!("apply_{}", weeks), |b| {
            b.iter(|| black_box(range).apply(black_box(&table)).len())
        });
    }

    group.finish();
}

fn bench_line_chart(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_chart");
    let table = synthetic_table(156, 200);
    let slice = DateRange::full(table.unique_dates().len()).apply(&table);
    let overlay = AggregateSeries::from_slice(&slice);

    for count in [1, 10, 50] {
        let selection = RegionSelection::new((0..count).map(|r| format!("Region {}", r)));

        group.bench_function(format!("regions_{}", count), |b| {
            b.iter(|| {
                line_chart(
                    black_box(&slice),
                    black_box(&selection),
                    &LineChartSpec::TOTAL_CASES,
                    Some(&overlay),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_date_filter, bench_line_chart);
criterion_main!(benches);
