//! Negative-set generation.
//!
//! Walks the full edge stream in time order and, for every positive edge
//! of the target split, draws a fixed budget of negative destinations.
//! Two strategies:
//!
//! - **Random**: uniform draws from the dataset's destination universe.
//! - **HistoricalRandom**: up to half the budget comes from destinations
//!   already seen strictly before the edge's timestamp; the rest is
//!   uniform. Historical negatives are the ones a memorization baseline
//!   scores highly, so they make the ranking task non-trivial.
//!
//! In both cases the true destination and any destination positive for
//! the same source at the same timestamp are excluded, and draws are
//! without replacement. When the candidate pool is smaller than the
//! budget the record is simply shorter.

use std::collections::HashSet;

use rand::prelude::*;
use rand_xorshift::XorShiftRng;

use tempora_core::{NodeId, Split, TemporalDataset};

use crate::fixed::{FixedNegativeSet, NegativeRecord};
use crate::{Error, Result};

/// How negative destinations are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// Uniform over the destination universe.
    Random,
    /// Half historical (seen before the query time), half uniform.
    HistoricalRandom,
}

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Negatives per positive edge (default: 20).
    pub num_neg: usize,
    /// Sampling strategy (default: random).
    pub strategy: SamplingStrategy,
    /// Random seed (default: 42).
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_neg: 20,
            strategy: SamplingStrategy::Random,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    pub fn with_num_neg(mut self, num_neg: usize) -> Self {
        self.num_neg = num_neg;
        self
    }

    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Deterministic negative-set generator.
///
/// # Example
///
/// ```rust,ignore
/// use tempora_core::Split;
/// use tempora_sample::{GeneratorConfig, NegativeSetGenerator, SamplingStrategy};
///
/// let config = GeneratorConfig::default()
///     .with_num_neg(20)
///     .with_strategy(SamplingStrategy::HistoricalRandom);
///
/// let set = NegativeSetGenerator::new(config).generate(&dataset, Split::Val)?;
/// set.save_file("toy_val_ns.json")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct NegativeSetGenerator {
    config: GeneratorConfig,
}

impl NegativeSetGenerator {
    /// Create a generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generate the negative set for one split of a dataset.
    ///
    /// Requires split masks; the full stream is walked so that the
    /// historical pool also covers earlier splits.
    pub fn generate(&self, ds: &TemporalDataset, split: Split) -> Result<FixedNegativeSet> {
        let edges = ds.edges();
        let mask = ds.splits()?.mask(split).to_vec();
        let universe = edges.unique_destinations();
        if universe.is_empty() {
            return Err(Error::EmptyUniverse);
        }

        let mut rng = XorShiftRng::seed_from_u64(self.config.seed);
        let mut set = FixedNegativeSet::new(ds.name(), split, self.config.num_neg);

        // Destinations seen strictly before the current timestamp, in
        // first-seen stream order so draws stay deterministic.
        let mut seen_vec: Vec<NodeId> = Vec::new();
        let mut seen: HashSet<NodeId> = HashSet::new();

        let ts = edges.timestamps();
        let n = edges.len();
        let mut i = 0;
        while i < n {
            let t = ts[i];
            let mut j = i;
            while j < n && ts[j] == t {
                j += 1;
            }

            for e in i..j {
                if !mask[e] {
                    continue;
                }
                let src = edges.sources()[e];
                let dst = edges.destinations()[e];

                let mut excluded: HashSet<NodeId> =
                    edges.destinations_at(src, t).into_iter().collect();
                excluded.insert(dst);

                let negatives = match self.config.strategy {
                    SamplingStrategy::Random => {
                        draw(&universe, &excluded, self.config.num_neg, &mut rng)
                    }
                    SamplingStrategy::HistoricalRandom => {
                        let hist_budget = self.config.num_neg / 2;
                        let historical: Vec<NodeId> = seen_vec
                            .iter()
                            .copied()
                            .filter(|d| !excluded.contains(d))
                            .collect();
                        let mut chosen: Vec<NodeId> = historical
                            .choose_multiple(&mut rng, hist_budget.min(historical.len()))
                            .copied()
                            .collect();

                        let taken: HashSet<NodeId> = chosen.iter().copied().collect();
                        let rnd_budget = self.config.num_neg - chosen.len();
                        let pool: Vec<NodeId> = universe
                            .iter()
                            .copied()
                            .filter(|d| !excluded.contains(d) && !taken.contains(d))
                            .collect();
                        chosen.extend(
                            pool.choose_multiple(&mut rng, rnd_budget.min(pool.len()))
                                .copied(),
                        );
                        chosen
                    }
                };

                set.insert(NegativeRecord {
                    src,
                    dst,
                    ts: t,
                    negatives,
                });
            }

            // Only after the whole timestamp group is processed do its
            // destinations become historical.
            for e in i..j {
                let d = edges.destinations()[e];
                if seen.insert(d) {
                    seen_vec.push(d);
                }
            }
            i = j;
        }

        tracing::debug!(
            split = %split,
            records = set.len(),
            num_neg = self.config.num_neg,
            "generated negative set"
        );
        Ok(set)
    }
}

fn draw(
    universe: &[NodeId],
    excluded: &HashSet<NodeId>,
    budget: usize,
    rng: &mut XorShiftRng,
) -> Vec<NodeId> {
    let pool: Vec<NodeId> = universe
        .iter()
        .copied()
        .filter(|d| !excluded.contains(d))
        .collect();
    pool.choose_multiple(rng, budget.min(pool.len()))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempora_core::TemporalEdgeList;

    fn dataset() -> TemporalDataset {
        let mut edges = TemporalEdgeList::new();
        for t in 0..200u64 {
            edges.push(t % 10, 10 + (t % 17), t, None, 1.0).unwrap();
        }
        let mut ds = TemporalDataset::new("toy", edges);
        ds.generate_splits(0.15, 0.15).unwrap();
        ds
    }

    #[test]
    fn test_requires_splits() {
        let mut edges = TemporalEdgeList::new();
        edges.push(0, 1, 10, None, 1.0).unwrap();
        let ds = TemporalDataset::new("bare", edges);

        let gen = NegativeSetGenerator::default();
        assert!(gen.generate(&ds, Split::Val).is_err());
    }

    #[test]
    fn test_covers_every_split_edge() {
        let ds = dataset();
        let gen = NegativeSetGenerator::new(GeneratorConfig::default().with_num_neg(5));
        let set = gen.generate(&ds, Split::Test).unwrap();

        assert_eq!(set.len(), ds.splits().unwrap().count(Split::Test));
    }

    #[test]
    fn test_true_destination_excluded() {
        let ds = dataset();
        for strategy in [SamplingStrategy::Random, SamplingStrategy::HistoricalRandom] {
            let gen = NegativeSetGenerator::new(
                GeneratorConfig::default().with_strategy(strategy).with_num_neg(10),
            );
            let set = gen.generate(&ds, Split::Val).unwrap();
            for r in set.records() {
                assert!(!r.negatives.contains(&r.dst));
            }
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let ds = dataset();
        let gen = NegativeSetGenerator::new(
            GeneratorConfig::default()
                .with_strategy(SamplingStrategy::HistoricalRandom)
                .with_seed(7),
        );

        let a = gen.generate(&ds, Split::Val).unwrap();
        let b = gen.generate(&ds, Split::Val).unwrap();
        let xs: Vec<_> = a.records().cloned().collect();
        let ys: Vec<_> = b.records().cloned().collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_negatives_unique_within_record() {
        let ds = dataset();
        let gen = NegativeSetGenerator::new(
            GeneratorConfig::default()
                .with_strategy(SamplingStrategy::HistoricalRandom)
                .with_num_neg(12),
        );
        let set = gen.generate(&ds, Split::Test).unwrap();

        for r in set.records() {
            let mut sorted = r.negatives.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), r.negatives.len());
        }
    }

    #[test]
    fn test_historical_negatives_seen_before_query_time() {
        let ds = dataset();
        let num_neg = 8;
        let gen = NegativeSetGenerator::new(
            GeneratorConfig::default()
                .with_strategy(SamplingStrategy::HistoricalRandom)
                .with_num_neg(num_neg),
        );
        let set = gen.generate(&ds, Split::Test).unwrap();

        // Rebuild first-seen times per destination.
        let edges = ds.edges();
        let mut first_seen = std::collections::HashMap::new();
        for i in 0..edges.len() {
            first_seen
                .entry(edges.destinations()[i])
                .or_insert(edges.timestamps()[i]);
        }

        // Every negative is a known destination; the historical half (the
        // prefix of each record) must have been seen strictly earlier.
        for r in set.records() {
            for (k, neg) in r.negatives.iter().enumerate() {
                let seen_at = first_seen[neg];
                if k < num_neg / 2 {
                    assert!(
                        seen_at < r.ts,
                        "historical negative {neg} first seen at {seen_at}, query t={}",
                        r.ts
                    );
                }
            }
        }
    }
}
