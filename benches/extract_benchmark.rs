use criterion::{black_box, criterion_group, criterion_main, Criterion};
use paveinsight::models::results::RawPayload;
use paveinsight::services::results::extract_result_data;
use serde_json::json;

/// Build a synthetic road network of `n` segments spread across all bins.
fn synthetic_payload(n: usize) -> RawPayload {
    let features: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            let pci = (i as f64 * 13.7) % 100.0;
            let lng = -96.3 - (i as f64) * 0.001;
            let lat = 30.6 + (i as f64) * 0.001;
            json!({
                "geometry": {
                    "coordinates": [[lng, lat], [lng - 0.001, lat + 0.001]]
                },
                "properties": {
                    "StreetName": format!("Street_{:04}", i),
                    "PCI": pci,
                    "Surface": i % 3
                }
            })
        })
        .collect();

    serde_json::from_value(json!({ "features": features })).expect("valid synthetic payload")
}

fn benchmark_extract(c: &mut Criterion) {
    let small = synthetic_payload(100);
    let large = synthetic_payload(10_000);

    let mut group = c.benchmark_group("result_extraction");

    group.bench_function("district_100_segments", |b| {
        b.iter(|| extract_result_data(black_box(&small)))
    });

    group.bench_function("city_10k_segments", |b| {
        b.iter(|| extract_result_data(black_box(&large)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_extract);
criterion_main!(benches);
