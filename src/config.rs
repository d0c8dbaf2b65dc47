//! Planner configuration parameters.

use crate::error::RaceError;

/// Exploration constant of the UCB1 formula.
pub const DEFAULT_EXPLORATION_CONSTANT: f64 = std::f64::consts::SQRT_2;
/// Rounds a random playout may last before it is scored as a loss.
pub const DEFAULT_MAX_PLAYOUT_ROUNDS: u32 = 50;
/// Chance that the playout policy plays a card rather than passing.
pub const DEFAULT_PLAYOUT_PLAY_PROBABILITY: f64 = 0.5;

/// Configuration for the Monte Carlo tree search planner.
///
/// The number of iterations is not part of the configuration: callers pass it per decision,
/// which makes it the only strength knob.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Weight of the exploration term in UCB1. Higher values favour rarely visited branches.
    pub exploration_constant: f64,

    /// Upper bound on simulated rounds per playout. Playouts still running at the cap count as
    /// a loss for the planner.
    pub max_playout_rounds: u32,

    /// Probability that the playout actor plays a random card instead of no card.
    pub playout_play_probability: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: DEFAULT_EXPLORATION_CONSTANT,
            max_playout_rounds: DEFAULT_MAX_PLAYOUT_ROUNDS,
            playout_play_probability: DEFAULT_PLAYOUT_PLAY_PROBABILITY,
        }
    }
}

impl MctsConfig {
    /// Builder pattern: set the UCB1 exploration constant.
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Builder pattern: set the playout round cap.
    pub fn with_max_playout_rounds(mut self, rounds: u32) -> Self {
        self.max_playout_rounds = rounds;
        self
    }

    /// Builder pattern: set the playout card-play probability.
    pub fn with_playout_play_probability(mut self, p: f64) -> Self {
        self.playout_play_probability = p;
        self
    }

    /// Rejects values the search cannot work with.
    pub fn validate(&self) -> Result<(), RaceError> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(RaceError::InvalidConfig(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if !(0.0..=1.0).contains(&self.playout_play_probability) {
            return Err(RaceError::InvalidConfig(format!(
                "playout play probability must be within [0, 1], got {}",
                self.playout_play_probability
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MctsConfig::default();
        assert!((config.exploration_constant - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(config.max_playout_rounds, 50);
        assert!((config.playout_play_probability - 0.5).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_methods_override_defaults() {
        let config = MctsConfig::default()
            .with_exploration_constant(0.7)
            .with_max_playout_rounds(10)
            .with_playout_play_probability(1.0);

        assert!((config.exploration_constant - 0.7).abs() < 1e-12);
        assert_eq!(config.max_playout_rounds, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let negative = MctsConfig::default().with_exploration_constant(-1.0);
        assert!(matches!(negative.validate(), Err(RaceError::InvalidConfig(_))));

        let nan = MctsConfig::default().with_exploration_constant(f64::NAN);
        assert!(nan.validate().is_err());

        let probability = MctsConfig::default().with_playout_play_probability(1.5);
        assert!(probability.validate().is_err());
    }
}
