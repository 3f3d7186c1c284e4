use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ridership_core::{NamedTableSet, Row, Table, PLACEHOLDER_KEY};
use ridership_series::{normalize, DashboardData, View};

fn station_table(size: usize) -> Table {
    (0..size)
        .map(|i| {
            let base = i as i64;
            Row::new()
                .with("Station", format!("Station {i}"))
                .with("Winter", base * 10)
                .with("Spring", base * 11)
                .with("Summer", base * 12)
                .with("Fall", base * 13)
        })
        .collect()
}

fn comparison_table() -> Table {
    ["Winter", "Spring", "Summer", "Fall"]
        .iter()
        .map(|season| {
            Row::new()
                .with(PLACEHOLDER_KEY, *season)
                .with("2023", 1_000_000)
                .with("2024", 1_100_000)
        })
        .collect()
}

fn bench_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for size in [10, 100, 1000, 10000].iter() {
        let table = station_table(*size);
        let rule = View::Ridership2023.rule();

        group.bench_with_input(BenchmarkId::new("pass_through", size), size, |b, _| {
            b.iter(|| normalize(black_box(&table), black_box(&rule)).count())
        });
    }

    let table = comparison_table();
    let rule = View::Comparison.rule();
    group.bench_function("key_rename", |b| {
        b.iter(|| normalize(black_box(&table), black_box(&rule)).count())
    });

    group.finish();
}

fn bench_dashboard(c: &mut Criterion) {
    let tables = NamedTableSet::new([
        ("Ridership_2023", station_table(500)),
        ("Ridership_2024", station_table(500)),
        ("Comparison", comparison_table()),
    ]);

    c.bench_function("dashboard_from_tables", |b| {
        b.iter(|| DashboardData::from_tables(black_box(&tables)))
    });
}

criterion_group!(benches, bench_rules, bench_dashboard);
criterion_main!(benches);
