//! Benchmarks for graph extraction and subgraph restriction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lineage_core::{extract, DatasetRef, Event, SchemaField};

/// `pipelines` parallel source -> bronze -> silver -> gold chains, each run `runs` times.
fn medallion_events(pipelines: usize, runs: usize) -> Vec<Event> {
    let schema: Vec<SchemaField> = (0..8)
        .map(|i| SchemaField::new(format!("col{}", i), "STRING"))
        .collect();

    let mut events = Vec::with_capacity(pipelines * runs * 3);
    for run in 0..runs {
        for p in 0..pipelines {
            let source = DatasetRef::new("postgres://prod:5432", format!("public.table_{}", p));
            let bronze = DatasetRef::new("s3://lake", format!("bronze/table_{}", p))
                .with_schema(schema.clone())
                .with_statistics(Some((run * 1000 + p) as u64), Some(1 << 20));
            let silver = DatasetRef::new("s3://lake", format!("silver/table_{}", p));
            let gold = DatasetRef::new("s3://lake", format!("gold/report_{}", p % 10));

            events.push(
                Event::new("lake", format!("ingest_{}", p))
                    .with_input(source)
                    .with_output(bronze.clone()),
            );
            events.push(
                Event::new("lake", format!("curate_{}", p))
                    .with_input(bronze)
                    .with_output(silver.clone()),
            );
            events.push(
                Event::new("lake", format!("report_{}", p))
                    .with_input(silver)
                    .with_output(gold),
            );
        }
    }
    events
}

fn bench_extract(c: &mut Criterion) {
    let events = medallion_events(200, 5);

    c.bench_function("extract_3000_events", |b| {
        b.iter(|| black_box(extract(black_box(&events))))
    });
}

fn bench_restrict(c: &mut Criterion) {
    let graph = extract(&medallion_events(200, 1));

    c.bench_function("restrict_silver_table", |b| {
        b.iter(|| black_box(graph.restrict(black_box("silver/table_42"))))
    });

    c.bench_function("collapse_jobs", |b| {
        b.iter(|| black_box(graph.collapse_jobs()))
    });
}

criterion_group!(benches, bench_extract, bench_restrict);
criterion_main!(benches);
