use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeSet;
use weather_dashboard::analyzers::CorrelationMatrix;
use weather_dashboard::models::{DateRange, NumericColumn, WeatherRecord, WeatherTable};
use weather_dashboard::processors::{average_by_town, filter, DashboardPipeline};

const TOWNS: [&str; 8] = [
    "Nairobi", "Mombasa", "Kisumu", "Nakuru", "Eldoret", "Garissa", "Nyeri", "Lamu",
];

// Synthetic daily observations for every town
fn create_test_table(towns: usize, days: usize) -> WeatherTable {
    let base_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let mut records = Vec::with_capacity(towns * days);

    for day in 0..days {
        let date = base_date + chrono::Duration::days(day as i64);
        for t in 0..towns {
            let town = format!("{}-{}", TOWNS[t % TOWNS.len()], t / TOWNS.len());
            let avg = 15.0 + (t as f64) * 0.7 + ((day % 30) as f64) * 0.2;
            let mut record = WeatherRecord::builder()
                .town(town)
                .date(date)
                .temperatures(avg - 6.0, avg, avg + 6.0)
                .humidity(40.0 + ((day + t) % 50) as f64)
                .precipitation(((day * 7 + t) % 13) as f64 * 0.5)
                .wind(5.0 + (t % 20) as f64)
                .build()
                .unwrap();
            // Sprinkle some gaps
            if (day + t) % 17 == 0 {
                record.humidity = None;
            }
            records.push(record);
        }
    }

    WeatherTable::new(records).unwrap()
}

fn benchmark_filter(c: &mut Criterion) {
    let table = create_test_table(20, 365);
    let towns: BTreeSet<String> = table.towns().iter().take(5).cloned().collect();
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 9, 30).unwrap(),
    )
    .unwrap();

    c.bench_function("filter_towns_and_dates", |b| {
        b.iter(|| black_box(filter(table.records(), &towns, &range).len()))
    });
}

fn benchmark_average_by_town(c: &mut Criterion) {
    let table = create_test_table(20, 365);

    c.bench_function("average_by_town", |b| {
        b.iter(|| black_box(average_by_town(table.records()).len()))
    });
}

fn benchmark_correlation(c: &mut Criterion) {
    let table = create_test_table(20, 365);
    let subset: Vec<&WeatherRecord> = table.records().iter().collect();

    c.bench_function("correlation_matrix", |b| {
        b.iter(|| black_box(CorrelationMatrix::compute(&subset, &NumericColumn::ALL)))
    });
}

fn benchmark_varying_data_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard_pipeline_by_size");

    for &towns in &[5, 20, 50] {
        group.bench_with_input(BenchmarkId::new("towns", towns), &towns, |b, &towns| {
            let table = create_test_table(towns, 365);
            let selection = table.default_selection();
            let pipeline = DashboardPipeline::default();

            b.iter(|| black_box(pipeline.run(&table, &selection).row_count))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_filter,
    benchmark_average_by_town,
    benchmark_correlation,
    benchmark_varying_data_sizes
);
criterion_main!(benches);
