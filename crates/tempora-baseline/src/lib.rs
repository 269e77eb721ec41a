//! Heuristic baselines for temporal-graph benchmarks.
//!
//! Learned models need a floor to beat. Two families are provided:
//!
//! - **Node property**: [`PersistentForecaster`] repeats the last
//!   observed label vector; [`MovingAverageForecaster`] keeps a running
//!   mean. Both maintain a per-node dictionary updated online as true
//!   labels stream in.
//! - **Link prediction**: [`EdgeBank`] memorizes observed (src, dst)
//!   pairs, optionally restricted to a sliding time window.
//!
//! [`run_link_baseline`] and [`NodeBaselineRun`] drive the full
//! loader -> sampler -> baseline -> evaluator loop per split, with no
//! lookahead: every prediction precedes the update that would reveal it.

mod edgebank;
mod error;
mod forecast;
mod run;

pub use edgebank::{EdgeBank, MemoryMode};
pub use error::{Error, Result};
pub use forecast::{Forecaster, MovingAverageForecaster, PersistentForecaster};
pub use run::{run_link_baseline, LinkRunConfig, NodeBaselineRun, NodeRunConfig};
