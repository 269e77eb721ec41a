//! Per-node label forecasters.
//!
//! Both baselines keep a rolling state per node and answer point queries
//! from it. The evaluation loop queries before it updates, so a
//! prediction at time t only ever reflects observations strictly before
//! t.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tempora_core::NodeId;

use crate::{Error, Result};

/// A streaming per-node label predictor.
pub trait Forecaster {
    /// Width of the label vectors.
    fn num_classes(&self) -> usize;

    /// Predicted label vector for a node. Nodes with no observation yet
    /// predict the zero vector.
    fn query(&self, node: NodeId) -> Vec<f32>;

    /// Fold one observed label vector into the node's state.
    fn update(&mut self, node: NodeId, observed: &[f32]) -> Result<()>;
}

/// Predicts the last observed label vector; updates overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistentForecaster {
    num_classes: usize,
    state: HashMap<NodeId, Vec<f32>>,
}

impl PersistentForecaster {
    /// Create with the dataset's class count.
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            state: HashMap::new(),
        }
    }

    /// Number of nodes with at least one observation.
    pub fn num_tracked(&self) -> usize {
        self.state.len()
    }
}

impl Forecaster for PersistentForecaster {
    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn query(&self, node: NodeId) -> Vec<f32> {
        self.state
            .get(&node)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.num_classes])
    }

    fn update(&mut self, node: NodeId, observed: &[f32]) -> Result<()> {
        if observed.len() != self.num_classes {
            return Err(Error::WidthMismatch {
                expected: self.num_classes,
                got: observed.len(),
            });
        }
        self.state.insert(node, observed.to_vec());
        Ok(())
    }
}

/// Predicts a running mean; updates fold the observation in with a fixed
/// weight `1/window`.
///
/// The first observation initializes the state directly, after which
/// `v <- v * (window-1)/window + observed/window`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingAverageForecaster {
    num_classes: usize,
    window: u32,
    state: HashMap<NodeId, Vec<f32>>,
}

impl MovingAverageForecaster {
    /// Create with the dataset's class count and averaging window.
    /// A window of 1 degenerates to the persistence baseline.
    pub fn new(num_classes: usize, window: u32) -> Self {
        Self {
            num_classes,
            window: window.max(1),
            state: HashMap::new(),
        }
    }

    /// Averaging window.
    pub fn window(&self) -> u32 {
        self.window
    }

    /// Number of nodes with at least one observation.
    pub fn num_tracked(&self) -> usize {
        self.state.len()
    }
}

impl Forecaster for MovingAverageForecaster {
    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn query(&self, node: NodeId) -> Vec<f32> {
        self.state
            .get(&node)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.num_classes])
    }

    fn update(&mut self, node: NodeId, observed: &[f32]) -> Result<()> {
        if observed.len() != self.num_classes {
            return Err(Error::WidthMismatch {
                expected: self.num_classes,
                got: observed.len(),
            });
        }

        match self.state.get_mut(&node) {
            None => {
                self.state.insert(node, observed.to_vec());
            }
            Some(v) => {
                let w = self.window as f32;
                for (cur, &obs) in v.iter_mut().zip(observed) {
                    *cur = *cur * (w - 1.0) / w + obs / w;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_returns_last_observation() {
        let mut f = PersistentForecaster::new(3);
        assert_eq!(f.query(7), vec![0.0, 0.0, 0.0]);

        f.update(7, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(f.query(7), vec![1.0, 2.0, 3.0]);
        // Repeated queries are stable until the next update.
        assert_eq!(f.query(7), vec![1.0, 2.0, 3.0]);

        f.update(7, &[9.0, 8.0, 7.0]).unwrap();
        assert_eq!(f.query(7), vec![9.0, 8.0, 7.0]);
        // Other nodes are unaffected.
        assert_eq!(f.query(8), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_persistence_rejects_wrong_width() {
        let mut f = PersistentForecaster::new(2);
        assert!(matches!(
            f.update(1, &[1.0]),
            Err(Error::WidthMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_moving_average_folds_observations() {
        let mut f = MovingAverageForecaster::new(1, 2);
        f.update(1, &[4.0]).unwrap();
        assert_eq!(f.query(1), vec![4.0]);

        // v = 4 * 1/2 + 8 / 2 = 6
        f.update(1, &[8.0]).unwrap();
        assert_eq!(f.query(1), vec![6.0]);

        // v = 6 * 1/2 + 0 / 2 = 3
        f.update(1, &[0.0]).unwrap();
        assert_eq!(f.query(1), vec![3.0]);
    }

    #[test]
    fn test_moving_average_converges_to_constant() {
        let mut f = MovingAverageForecaster::new(1, 7);
        for _ in 0..200 {
            f.update(3, &[5.0]).unwrap();
        }
        let v = f.query(3)[0];
        assert!((v - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_window_one_is_persistence() {
        let mut f = MovingAverageForecaster::new(1, 1);
        f.update(1, &[2.0]).unwrap();
        f.update(1, &[10.0]).unwrap();
        assert_eq!(f.query(1), vec![10.0]);
    }
}
