use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use outbreak_map::data::{Column, Dataset, Observation};
use outbreak_map::engine::{Engine, Metric, Normalization, Selection};
use std::sync::Arc;

const COUNTRIES: usize = 200;
const DAYS: i64 = 120;

fn synthetic_dataset() -> Dataset {
    let start = NaiveDate::from_ymd_opt(2020, 1, 22).unwrap();
    let mut rows = Vec::with_capacity(COUNTRIES * DAYS as usize);
    for c in 0..COUNTRIES {
        let population = 0.1 + c as f64 * 0.7;
        let lat = (c as f64 * 7.3) % 140.0 - 70.0;
        let lon = (c as f64 * 13.1) % 360.0 - 180.0;
        for d in 0..DAYS {
            let cases = (d * d) as f64 * (1.0 + c as f64 % 5.0);
            let deaths = cases * 0.03;
            let recovered = cases * 0.5;
            rows.push(Observation::from_counts(
                &format!("Country {c}"),
                start + Duration::days(d),
                [cases, deaths, recovered, cases - deaths - recovered],
                population,
                (lat, lon),
            ));
        }
    }
    Dataset::new(rows).unwrap()
}

fn bench_engine(c: &mut Criterion) {
    let engine = Engine::new(Arc::new(synthetic_dataset()));
    let total = engine.dataset().total_days();

    c.bench_function("render_cases_last_day", |b| {
        let selection = Selection {
            metric: Metric::ConfirmedCases,
            normalization: Normalization::Absolute,
            day_offset: total,
            population_filter: false,
        };
        b.iter(|| engine.render(black_box(&selection)))
    });

    c.bench_function("render_deaths_rate_filtered", |b| {
        let selection = Selection {
            metric: Metric::Deaths,
            normalization: Normalization::Rate,
            day_offset: total / 2,
            population_filter: true,
        };
        b.iter(|| engine.render(black_box(&selection)))
    });

    c.bench_function("global_max", |b| {
        b.iter(|| engine.dataset().global_max(black_box(Column::ConfirmedCasesRate)))
    });
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
