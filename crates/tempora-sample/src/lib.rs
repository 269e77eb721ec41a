//! Negative-edge sampling for temporal link prediction.
//!
//! Ranking a true destination against sampled non-edges is the standard
//! way to score temporal link prediction without scoring every node.
//! Two regimes:
//!
//! - **Training**: fresh uniform negatives per positive edge
//!   ([`RandomDestinationSampler`]), cheap and seeded.
//! - **Evaluation**: pre-generated, on-disk negative sets
//!   ([`FixedNegativeSet`]), so every run ranks against identical
//!   candidates. Sets are produced by [`NegativeSetGenerator`] with a
//!   uniform or historical-aware strategy.
//!
//! The invariant everything here protects: a negative list never
//! contains its true destination.

mod error;
mod fixed;
mod generator;
mod random;

pub use error::{Error, Result};
pub use fixed::{FixedNegativeSet, NegativeRecord};
pub use generator::{GeneratorConfig, NegativeSetGenerator, SamplingStrategy};
pub use random::RandomDestinationSampler;
