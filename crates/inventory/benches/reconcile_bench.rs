use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, TimeZone, Utc};
use stockscan_core::{Attributes, InventoryRecord, Item, ItemCode, LocationId, Timestamp};
use stockscan_inventory::{ImportMode, Resolution, reconcile_item, reconcile_record};

fn at(secs: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
}

fn records(n: usize) -> Vec<InventoryRecord> {
    (0..n)
        .map(|i| InventoryRecord {
            item_code: ItemCode::parse(format!("{:012}", i)).unwrap(),
            location_id: LocationId::parse(format!("loc-{}", i % 16)).unwrap(),
            quantity: (i % 7) as i64 + 1,
            last_scanned: at(i as i64),
        })
        .collect()
}

fn items(n: usize, offset: i64) -> Vec<Item> {
    (0..n)
        .map(|i| Item {
            code: ItemCode::parse(format!("{:012}", i)).unwrap(),
            description: format!("item {i}"),
            attributes: Attributes::default(),
            created_at: at(0),
            updated_at: at(i as i64 + offset),
        })
        .collect()
}

fn bench_record_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_merge");

    for size in [100usize, 1_000, 10_000].iter() {
        let stored = records(*size);
        let incoming = records(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut total = 0i64;
                for (s, i) in stored.iter().zip(incoming.iter()) {
                    if let Resolution::Overwrite(r) =
                        reconcile_record(ImportMode::Merge, Some(s), black_box(i.clone()))
                    {
                        total += r.quantity;
                    }
                }
                total
            })
        });
    }

    group.finish();
}

fn bench_item_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("item_merge");

    for size in [100usize, 1_000, 10_000].iter() {
        let stored = items(*size, 0);
        let incoming = items(*size, 1);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                stored
                    .iter()
                    .zip(incoming.iter())
                    .filter(|(s, i)| {
                        matches!(
                            reconcile_item(ImportMode::Merge, Some(*s), black_box((*i).clone())),
                            Resolution::Overwrite(_)
                        )
                    })
                    .count()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_record_merge, bench_item_merge);
criterion_main!(benches);
