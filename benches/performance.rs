//! Performance benchmarks for the record store.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keepsake::entities::{Trip, TripCategory, TripStats};
use keepsake::{
    DateWindow, Encoding, FileAdapterConfig, FileStorage, MemoryAdapter, Query, RecordStore,
    SortOrder, StoreConfig,
};
use tempfile::TempDir;

fn sample_trip(i: usize) -> Trip {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let start = base + Duration::days((i * 7 % 1500) as i64);
    let category = TripCategory::ALL[i % TripCategory::ALL.len()];
    let end = start + Duration::days((i % 9) as i64);
    Trip::new(format!("Trip {i}"), format!("City {}", i % 40), start, end)
        .with_category(category)
        .with_notes(format!("notes for trip {i}, visited {} museums", i % 5))
}

fn filled_store(n: usize, encoding: Encoding) -> RecordStore<Trip> {
    let store = RecordStore::open(MemoryAdapter::new(), StoreConfig { key: None, encoding });
    for i in 0..n {
        store.add(sample_trip(i)).unwrap();
    }
    store
}

/// Benchmark add latency, which rewrites the whole collection each time
fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");

    for size in [10, 100, 500] {
        for encoding in [Encoding::Json, Encoding::MessagePack] {
            group.bench_with_input(
                BenchmarkId::new(format!("{encoding:?}"), size),
                &size,
                |b, &size| {
                    let store = filled_store(size, encoding);
                    let mut i = size;
                    b.iter(|| {
                        i += 1;
                        black_box(store.add(sample_trip(i)).unwrap());
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark durable writes to disk
fn bench_file_persist(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_persist");
    group.sample_size(20);

    for size in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::new("records", size), &size, |b, &size| {
            let dir = TempDir::new().unwrap();
            let storage = FileStorage::open(FileAdapterConfig {
                dir: dir.path().join("data"),
                ..Default::default()
            })
            .unwrap();
            let store: RecordStore<Trip> = RecordStore::open_in(&storage, StoreConfig::default());
            for i in 0..size {
                store.add(sample_trip(i)).unwrap();
            }

            b.iter(|| store.sync().unwrap());
        });
    }

    group.finish();
}

/// Benchmark the filter, search, sort pipeline
fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    for size in [100, 1000] {
        let store = filled_store(size, Encoding::Json);
        let query = Query::new()
            .filter(Trip::starting(DateWindow::Year(2021)))
            .search_text("museums")
            .sort_by(Trip::by_title(SortOrder::Ascending));

        group.bench_with_input(BenchmarkId::new("pipeline", size), &size, |b, _| {
            b.iter(|| black_box(store.query(&query)));
        });

        group.bench_with_input(BenchmarkId::new("stats", size), &size, |b, _| {
            b.iter(|| black_box(TripStats::compute(&store.all())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_add, bench_file_persist, bench_query);
criterion_main!(benches);
