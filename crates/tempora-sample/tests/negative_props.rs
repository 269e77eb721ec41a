//! Property-based tests for negative sampling.
//!
//! Invariants:
//! - Negative sets never contain the true destination
//! - Generation is deterministic for a fixed seed
//! - File round-trips preserve every record

use proptest::prelude::*;

use tempora_core::{Split, TemporalDataset, TemporalEdgeList};
use tempora_sample::{
    FixedNegativeSet, GeneratorConfig, NegativeSetGenerator, SamplingStrategy,
};

fn arb_edges() -> impl Strategy<Value = Vec<(u64, u64, u64)>> {
    prop::collection::vec((0u64..20, 0u64..30, 0u64..1_000), 10..150)
}

fn build_dataset(raw: &[(u64, u64, u64)]) -> TemporalDataset {
    let mut edges = TemporalEdgeList::new();
    for &(src, dst, ts) in raw {
        edges.push(src, dst, ts, None, 1.0).unwrap();
    }
    let mut ds = TemporalDataset::new("prop", edges);
    ds.generate_splits(0.15, 0.15).unwrap();
    ds
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn negatives_never_contain_true_destination(
        raw in arb_edges(),
        seed in 0u64..1_000,
        num_neg in 1usize..20,
        hist in proptest::bool::ANY,
    ) {
        let ds = build_dataset(&raw);
        let strategy = if hist {
            SamplingStrategy::HistoricalRandom
        } else {
            SamplingStrategy::Random
        };
        let gen = NegativeSetGenerator::new(
            GeneratorConfig::default()
                .with_num_neg(num_neg)
                .with_strategy(strategy)
                .with_seed(seed),
        );

        for split in [Split::Val, Split::Test] {
            let set = gen.generate(&ds, split).unwrap();
            for r in set.records() {
                prop_assert!(
                    !r.negatives.contains(&r.dst),
                    "true destination {} leaked into negatives at t={}",
                    r.dst, r.ts
                );
                prop_assert!(r.negatives.len() <= num_neg);
            }
        }
    }

    #[test]
    fn generation_deterministic(
        raw in arb_edges(),
        seed in 0u64..1_000,
    ) {
        let ds = build_dataset(&raw);
        let gen = NegativeSetGenerator::new(
            GeneratorConfig::default()
                .with_strategy(SamplingStrategy::HistoricalRandom)
                .with_seed(seed),
        );

        let a = gen.generate(&ds, Split::Test).unwrap();
        let b = gen.generate(&ds, Split::Test).unwrap();

        let xs: Vec<_> = a.records().cloned().collect();
        let ys: Vec<_> = b.records().cloned().collect();
        prop_assert_eq!(xs, ys);
    }

    #[test]
    fn roundtrip_preserves_records(
        raw in arb_edges(),
    ) {
        let ds = build_dataset(&raw);
        let gen = NegativeSetGenerator::new(GeneratorConfig::default().with_num_neg(5));
        let set = gen.generate(&ds, Split::Val).unwrap();

        let dir = tempfile::tempdir().unwrap();
        for name in ["ns.json", "ns.bin"] {
            let path = dir.path().join(name);
            set.save_file(&path).unwrap();
            let back = FixedNegativeSet::load_file(&path).unwrap();

            prop_assert_eq!(back.len(), set.len());
            for r in set.records() {
                prop_assert_eq!(
                    back.get(r.src, r.dst, r.ts),
                    Some(r.negatives.as_slice())
                );
            }
        }
    }
}
