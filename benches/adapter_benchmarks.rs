use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use std::time::Duration;
use tss_bridge::ThresholdKeyAdapter;
use tss_bridge_core::{compress, lift_blinded, DerivationPath, Ed25519, HdCurve, ShareRecord};

fn bench_derivation(c: &mut Criterion) {
    let adapter = ThresholdKeyAdapter::default();
    let master = Ed25519::to_affine(&Ed25519::mul_base(&BigUint::from(0xdead_beef_u64))).unwrap();
    let path = DerivationPath::new(vec![0, 5, 12]);
    let shares: Vec<_> = (1u64..=5)
        .map(|k| Ed25519::to_affine(&Ed25519::mul_base(&BigUint::from(k * 977))).unwrap())
        .collect();
    let records = vec![ShareRecord::new(master.clone(), shares); 5];

    c.bench_function("derive m/0/5/12", |b| {
        b.iter(|| adapter.derive_child(black_box(&path), &master, &[7u8; 32]).unwrap())
    });

    c.bench_function("derive and update 5x5 records", |b| {
        b.iter(|| {
            let mut batch = records.clone();
            adapter.derive_and_update(black_box(&path), &master, &[7u8; 32], &mut batch).unwrap()
        })
    });
}

fn bench_codecs(c: &mut Criterion) {
    let adapter = ThresholdKeyAdapter::default();
    let point = Ed25519::to_affine(&Ed25519::mul_base(&BigUint::from(123_456_789u64))).unwrap();
    let signature = [0x5au8; 64];

    c.bench_function("compress", |b| b.iter(|| compress(black_box(&point.x), black_box(&point.y)).unwrap()));
    c.bench_function("lift blinded", |b| b.iter(|| lift_blinded(&point.x, &point.y, &mut OsRng).unwrap()));
    c.bench_function("export public key", |b| b.iter(|| adapter.export_public_key(black_box(&point)).unwrap()));
    c.bench_function("export signature", |b| b.iter(|| adapter.export_signature(black_box(&signature)).unwrap()));
}

criterion_group!(
    name = adapter_benches;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(3));
    targets = bench_derivation, bench_codecs
);

criterion_main!(adapter_benches);
