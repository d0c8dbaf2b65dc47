use crate::board::GameState;
use crate::config::MctsConfig;
use crate::error::RaceError;
use crate::random::RandomGenerator;
use crate::turn::{Action, TurnStart, roll_initiative};
use rand::Rng;
use tracing::trace;

/// The fast, random rollout used to score a leaf of the search tree.
///
/// Each simulated round rolls initiative, lets the winner of the roll draw and act at random,
/// and stops at the first win or after the round cap.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomPlayout {
    max_rounds: u32,
    play_probability: f64,
}

impl RandomPlayout {
    pub fn new(max_rounds: u32, play_probability: f64) -> Self {
        Self {
            max_rounds,
            play_probability,
        }
    }

    pub fn from_config(config: &MctsConfig) -> Self {
        Self::new(config.max_playout_rounds, config.playout_play_probability)
    }

    /// Plays `state` out and scores it for `perspective`: `1.0` if that player has won when the
    /// playout stops, `0.0` otherwise, including when the round cap is hit first.
    pub fn run(
        &self,
        state: &mut GameState,
        perspective: usize,
        rng: &mut impl Rng,
    ) -> Result<f64, RaceError> {
        let mut rounds = 0;
        while rounds < self.max_rounds && !state.is_finished() {
            self.play_round(state, rng)?;
            rounds += 1;
        }

        let won = state
            .player(perspective)
            .ok_or(RaceError::UnknownPlayer(perspective))?
            .has_won();
        trace!(rounds, won, "playout finished");
        Ok(if won { 1.0 } else { 0.0 })
    }

    fn play_round(&self, state: &mut GameState, rng: &mut impl Rng) -> Result<(), RaceError> {
        let Some(actor) = roll_initiative(rng).actor else {
            return Ok(());
        };
        if actor >= state.players().len() {
            return Ok(());
        }

        if let TurnStart::Blocked = state.begin_turn(actor, rng)? {
            return Ok(());
        }

        let action = if rng.chance(self.play_probability) {
            let hand_len = state.player(actor).map_or(0, |p| p.hand().len());
            rng.pick_index(hand_len).map_or(Action::NoCard, Action::PlayCard)
        } else {
            Action::NoCard
        };
        state.resolve_turn(actor, action, rng)?;

        if !state.is_finished() {
            state.reset_pieces();
        }
        Ok(())
    }
}

impl Default for RandomPlayout {
    fn default() -> Self {
        Self::from_config(&MctsConfig::default())
    }
}
