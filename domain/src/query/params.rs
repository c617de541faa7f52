//! Generation parameters forwarded to every agent of a round

use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 64;
pub const DEFAULT_SEED: u64 = 42;

/// Sampling parameters for one dispatch round
///
/// # Example
///
/// ```
/// use quorum_domain::GenerationParams;
///
/// let params = GenerationParams::default().with_temperature(0.7);
/// assert!(params.deterministic);
/// assert_eq!(params.effective_temperature(), 0.0);
///
/// let sampled = params.with_deterministic(false);
/// assert_eq!(sampled.effective_temperature(), 0.7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_tokens: u32,
    pub seed: u64,
    /// Forces temperature 0 on the wire
    pub deterministic: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            seed: DEFAULT_SEED,
            deterministic: true,
        }
    }
}

impl GenerationParams {
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Temperature actually sent to agents
    pub fn effective_temperature(&self) -> f64 {
        if self.deterministic {
            0.0
        } else {
            self.temperature
        }
    }

    /// Parameters for a later round: same sampling, shifted seed
    pub fn for_round(&self, seed_offset: u64) -> Self {
        Self {
            seed: self.seed.wrapping_add(seed_offset),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = GenerationParams::default();
        assert_eq!(params.seed, 42);
        assert_eq!(params.max_tokens, 64);
        assert!(params.deterministic);
    }

    #[test]
    fn test_for_round_shifts_seed_only() {
        let params = GenerationParams::default()
            .with_seed(10)
            .with_deterministic(false)
            .with_temperature(0.9);
        let round2 = params.for_round(7);
        assert_eq!(round2.seed, 17);
        assert_eq!(round2.effective_temperature(), 0.9);

        let wrapped = GenerationParams::default().with_seed(u64::MAX).for_round(1);
        assert_eq!(wrapped.seed, 0);
    }
}
