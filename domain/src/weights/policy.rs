//! Weight update policy

use serde::{Deserialize, Serialize};

/// Smoothing constant and bounds for weight updates
///
/// `w ← w·(1-α) + correct·α`, then clamped to `[floor, ceiling]`. The floor
/// keeps a weight from reaching zero, where it could never recover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPolicy {
    /// α in `(0, 1]`
    pub learning_rate: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            floor: 0.1,
            ceiling: 5.0,
        }
    }
}

impl WeightPolicy {
    pub fn new(learning_rate: f64, floor: f64, ceiling: f64) -> Self {
        Self {
            learning_rate,
            floor,
            ceiling,
        }
    }

    pub fn clamp(&self, weight: f64) -> f64 {
        if !weight.is_finite() {
            return self.floor;
        }
        weight.clamp(self.floor, self.ceiling)
    }

    /// One exponential-moving-average step, unclamped
    pub fn ema(&self, current: f64, observed: bool) -> f64 {
        let observed = if observed { 1.0 } else { 0.0 };
        current * (1.0 - self.learning_rate) + observed * self.learning_rate
    }

    /// One weight update step, clamped
    pub fn step(&self, current: f64, correct: bool) -> f64 {
        self.clamp(self.ema(current, correct))
    }
}
