//! On-the-fly uniform negative sampling for training.

use rand::prelude::*;
use rand_xorshift::XorShiftRng;

use tempora_core::{NodeId, TemporalEdgeList};

use crate::{Error, Result};

/// Seeded uniform sampler over a dataset's destination range.
///
/// Training does not need the pre-generated negative sets used for
/// evaluation; it draws a fresh uniform destination per positive edge,
/// excluding the true destination. The sampler is deterministic for a
/// fixed seed and call sequence, so runs are reproducible.
///
/// # Example
///
/// ```rust
/// use tempora_sample::RandomDestinationSampler;
///
/// let mut sampler = RandomDestinationSampler::new(0, 9, 42).unwrap();
/// let neg = sampler.sample_for(3).unwrap();
/// assert_ne!(neg, 3);
/// assert!(neg <= 9);
/// ```
#[derive(Debug, Clone)]
pub struct RandomDestinationSampler {
    min_dst: NodeId,
    max_dst: NodeId,
    rng: XorShiftRng,
}

impl RandomDestinationSampler {
    /// Sample uniformly from `[min_dst, max_dst]`.
    pub fn new(min_dst: NodeId, max_dst: NodeId, seed: u64) -> Result<Self> {
        if min_dst > max_dst {
            return Err(Error::EmptyUniverse);
        }
        Ok(Self {
            min_dst,
            max_dst,
            rng: XorShiftRng::seed_from_u64(seed),
        })
    }

    /// Sample over the destination range observed in an edge stream.
    pub fn from_edges(edges: &TemporalEdgeList, seed: u64) -> Result<Self> {
        let (min_dst, max_dst) = edges.destination_range().ok_or(Error::EmptyUniverse)?;
        Self::new(min_dst, max_dst, seed)
    }

    /// One negative destination for a positive edge, never equal to
    /// `true_dst`.
    pub fn sample_for(&mut self, true_dst: NodeId) -> Result<NodeId> {
        if self.min_dst == self.max_dst {
            if self.min_dst == true_dst {
                return Err(Error::EmptyUniverse);
            }
            return Ok(self.min_dst);
        }

        loop {
            let candidate = self.rng.gen_range(self.min_dst..=self.max_dst);
            if candidate != true_dst {
                return Ok(candidate);
            }
        }
    }

    /// `per_pos` negatives for each positive destination, flattened in
    /// input order.
    pub fn sample_batch(&mut self, pos_dst: &[NodeId], per_pos: usize) -> Result<Vec<NodeId>> {
        let mut out = Vec::with_capacity(pos_dst.len() * per_pos);
        for &dst in pos_dst {
            for _ in 0..per_pos {
                out.push(self.sample_for(dst)?);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_returns_true_destination() {
        let mut sampler = RandomDestinationSampler::new(0, 3, 7).unwrap();
        for _ in 0..200 {
            assert_ne!(sampler.sample_for(2).unwrap(), 2);
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let mut a = RandomDestinationSampler::new(0, 100, 42).unwrap();
        let mut b = RandomDestinationSampler::new(0, 100, 42).unwrap();

        let xs = a.sample_batch(&[5, 9, 13], 4).unwrap();
        let ys = b.sample_batch(&[5, 9, 13], 4).unwrap();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_single_node_universe() {
        let mut sampler = RandomDestinationSampler::new(4, 4, 1).unwrap();
        assert_eq!(sampler.sample_for(9).unwrap(), 4);
        assert!(sampler.sample_for(4).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(RandomDestinationSampler::new(5, 4, 1).is_err());
    }
}
