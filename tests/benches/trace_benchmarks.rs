//! # Pharma-Trace Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | trace-modes | `scan` against `trace_from_history` on the same shipment |
//! | creation-tx | `find_by_creation_tx` primary lookup against the legacy change-log scan |
//! | listings | availability listings with and without the secondary index |

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pharma_ledger::prelude::*;
use pharma_tests::fixtures::{ids, PackShape, Scenario};
use serde_json::json;

const SHAPES: [(usize, usize, usize); 3] = [(1, 2, 5), (2, 5, 10), (4, 10, 10)];

fn packed(shape: PackShape) -> Scenario {
    let mut scenario = Scenario::new();
    scenario
        .pack_shipment("SH", shape)
        .expect("benchmark shipment packs");
    scenario
        .order("ORD", &ids(&["SH"]), Party::new("clinic-1", "HospitalMSP"))
        .expect("benchmark order opens");
    scenario
}

fn bench_trace_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace-modes");
    group.measurement_time(Duration::from_secs(5));

    for (cartons, boxes, strips) in SHAPES {
        let shape = PackShape::new(cartons, boxes, strips);
        let scenario = packed(shape);
        let view = scenario.view();
        let label = format!("{}x{}x{}", cartons, boxes, strips);

        group.throughput(Throughput::Elements(shape.record_count() as u64));
        group.bench_with_input(BenchmarkId::new("scan_shipment", &label), &view, |b, view| {
            b.iter(|| black_box(scenario.contract.scan(view, "SH").is_ok()))
        });
        group.bench_with_input(
            BenchmarkId::new("history_walk_shipment", &label),
            &view,
            |b, view| {
                b.iter(|| black_box(scenario.contract.trace_from_history(view, "SH").is_ok()))
            },
        );
        group.bench_with_input(BenchmarkId::new("scan_strip", &label), &view, |b, view| {
            b.iter(|| black_box(scenario.contract.scan(view, "SH-C1-B1-S1").is_ok()))
        });
        group.bench_with_input(
            BenchmarkId::new("history_walk_strip", &label),
            &view,
            |b, view| {
                b.iter(|| {
                    black_box(
                        scenario
                            .contract
                            .trace_from_history(view, "SH-C1-B1-S1")
                            .is_ok(),
                    )
                })
            },
        );
    }

    group.finish();
}

/// A packed shipment plus `legacy` strips written without `creationTxId`,
/// one per transaction. Returns the id of the last legacy transaction.
fn with_legacy_strips(shape: PackShape, legacy: usize) -> (Scenario, String) {
    let mut scenario = packed(shape);
    for n in 0..legacy {
        let doc = json!({
            "docType": "strip",
            "id": format!("L-{}", n),
            "batchNumber": "OLD",
            "medicineType": "Paracetamol 500mg",
            "mfgDate": "2021-01-01",
            "expDate": "2024-01-01",
            "status": "CREATED",
            "createdAt": "2021-02-01T00:00:00Z",
            "updatedAt": "2021-02-01T00:00:00Z",
        });
        scenario
            .run(|_, stub| {
                let key = format!("L-{}", n);
                Ok(stub.put_state(&key, doc.to_string().into_bytes())?)
            })
            .expect("legacy strip writes");
    }
    let last = scenario.last_tx_id();
    (scenario, last)
}

fn bench_creation_tx_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("creation-tx");
    group.measurement_time(Duration::from_secs(5));

    for legacy in [10usize, 100, 500] {
        let (scenario, legacy_tx) = with_legacy_strips(PackShape::new(1, 2, 5), legacy);
        let view = scenario.view();
        let shipment_tx = scenario
            .contract
            .get_item(&view, "SH")
            .map(|r| r.creation_tx_id().to_string())
            .expect("shipment is stored");

        group.throughput(Throughput::Elements(scenario.ledger.len() as u64));
        group.bench_with_input(BenchmarkId::new("primary", legacy), &view, |b, view| {
            b.iter(|| black_box(scenario.contract.find_by_creation_tx(view, &shipment_tx).is_ok()))
        });
        group.bench_with_input(BenchmarkId::new("legacy_scan", legacy), &view, |b, view| {
            b.iter(|| black_box(scenario.contract.find_by_creation_tx(view, &legacy_tx).is_ok()))
        });
        group.bench_with_input(BenchmarkId::new("miss", legacy), &view, |b, view| {
            b.iter(|| black_box(scenario.contract.find_by_creation_tx(view, "tx-none").is_err()))
        });
    }

    group.finish();
}

fn bench_listings(c: &mut Criterion) {
    let mut group = c.benchmark_group("listings");

    let strips: Vec<String> = (0..2_000).map(|n| format!("S-{}", n)).collect();
    let mut plain = Scenario::new();
    plain.create_strips(&strips).expect("strips mint");

    let index = Arc::new(InMemoryIndex::new());
    index.sync_from(&plain.ledger).expect("index syncs");
    let indexed = PharmaContract::default().with_index(Arc::clone(&index));

    let view = plain.view();
    group.throughput(Throughput::Elements(strips.len() as u64));
    group.bench_function("available_strips_ledger_query", |b| {
        b.iter(|| black_box(plain.contract.get_available_strips(&view).map(|s| s.len())))
    });
    group.bench_function("available_strips_secondary_index", |b| {
        b.iter(|| black_box(indexed.get_available_strips(&view).map(|s| s.len())))
    });
    group.bench_function("statistics_secondary_index", |b| {
        b.iter(|| black_box(indexed.get_statistics(&view).map(|s| s.total())))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_trace_modes,
    bench_creation_tx_lookup,
    bench_listings
);
criterion_main!(benches);
