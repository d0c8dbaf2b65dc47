use crate::board::GameState;
use crate::error::RaceError;
use crate::random::RandomGenerator;
use crate::turn::Action;
use rand::Rng;
use tracing::trace;

/// Represents a single node in the Monte Carlo search tree.
///
/// Each node owns its own copy of the game state, the statistics gathered by the simulations that
/// went through it, and the actions that have not been turned into children yet. Parent and child
/// links are kept by the tree arena, see [`crate::tree::SearchTree`].
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// The game state that this node represents.
    pub state: GameState,
    /// The action that led to this node from its parent. `None` for the root node.
    pub prev_action: Option<Action>,
    /// The player who performed `prev_action`. `None` for the root node.
    pub acting_player: Option<usize>,
    /// The number of times this node has been visited during the search.
    pub visits: u32,
    /// Sum of the playout results credited to this node, from the planner's point of view.
    pub value: f64,
    untried_actions: Vec<Action>,
}

impl SearchNode {
    /// Creates the root node of a search over `state`.
    pub fn root(state: GameState) -> Self {
        Self::new(state, None, None)
    }

    /// A node whose turn marker is unset or names no seat can only pass. The planner checks its
    /// own seat before searching, so inside a search this falls back only for hand-built states.
    fn new(state: GameState, prev_action: Option<Action>, acting_player: Option<usize>) -> Self {
        let untried_actions = match state.current_turn().map(|p| state.possible_actions(p)) {
            Some(Ok(actions)) => actions,
            Some(Err(err)) => {
                trace!(%err, "turn marker names no seat, node can only pass");
                vec![Action::NoCard]
            }
            None => vec![Action::NoCard],
        };

        Self {
            state,
            prev_action,
            acting_player,
            visits: 0,
            value: 0.0,
            untried_actions,
        }
    }

    /// A node is terminal once its match is finished.
    pub fn is_terminal(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    pub fn untried_actions(&self) -> &[Action] {
        &self.untried_actions
    }

    /// Calculates the win rate of this node.
    pub fn wins_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / f64::from(self.visits)
        }
    }

    /// Calculates the UCB1 value of this node as a child of a node visited `parent_visits` times.
    /// Unvisited nodes rank above everything else.
    pub fn ucb_value(&self, parent_visits: u32, exploration_constant: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }

        let visits = f64::from(self.visits);
        self.wins_rate()
            + exploration_constant * (f64::from(parent_visits).ln() / visits).sqrt()
    }

    /// Removes a uniformly chosen action from the untried set.
    pub(crate) fn take_untried_action(&mut self, rng: &mut impl Rng) -> Option<Action> {
        let index = rng.pick_index(self.untried_actions.len())?;
        Some(self.untried_actions.swap_remove(index))
    }

    /// Builds the child reached by playing `action` for the player to move.
    ///
    /// The turn marker is left untouched: the child is decided by the same player.
    pub(crate) fn spawn_child(&self, action: Action, rng: &mut impl Rng) -> Result<Self, RaceError> {
        let mut state = self.state.clone();
        if let Some(player) = state.current_turn() {
            state.resolve_turn(player, action, rng)?;
        }

        let acting_player = state.current_turn();
        Ok(Self::new(state, Some(action), acting_player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;

    fn root_for(player: usize) -> SearchNode {
        let mut state = GameState::bare();
        state.add_player("Ana", false).unwrap();
        state.add_player("Bot", true).unwrap();
        state.set_current_turn(Some(player));
        SearchNode::root(state)
    }

    #[test]
    fn untried_actions_follow_the_hand() {
        let node = root_for(1);
        assert_eq!(node.untried_actions().len(), 4);
        assert_eq!(node.untried_actions()[0], Action::NoCard);
        assert!(!node.is_fully_expanded());
        assert!(!node.is_terminal());
        assert_eq!(node.prev_action, None);
        assert_eq!(node.acting_player, None);
    }

    #[test]
    fn node_without_turn_only_passes() {
        let node = SearchNode::root(GameState::bare());
        assert_eq!(node.untried_actions(), &[Action::NoCard]);
    }

    #[test]
    fn node_for_missing_seat_only_passes() {
        let mut state = GameState::bare();
        state.add_player("Ana", false).unwrap();
        state.set_current_turn(Some(3));

        let node = SearchNode::root(state);

        assert_eq!(node.untried_actions(), &[Action::NoCard]);
        assert!(!node.is_terminal());
    }

    #[test]
    fn every_untried_action_is_taken_exactly_once() {
        let mut rng = seeded(31);
        let mut node = root_for(0);

        let mut taken = Vec::new();
        while let Some(action) = node.take_untried_action(&mut rng) {
            taken.push(action.index());
        }
        taken.sort_unstable();

        assert_eq!(taken, vec![-1, 0, 1, 2]);
        assert!(node.is_fully_expanded());
    }

    #[test]
    fn child_state_is_independent_from_parent() {
        let mut rng = seeded(32);
        let node = root_for(0);

        let child = node.spawn_child(Action::PlayCard(0), &mut rng).unwrap();

        assert_eq!(child.prev_action, Some(Action::PlayCard(0)));
        assert_eq!(child.acting_player, Some(0));
        assert_eq!(child.state.player(0).unwrap().hand().len(), 2);
        assert_eq!(node.state.player(0).unwrap().hand().len(), 3);
        assert_eq!(node.state.player(0).unwrap().position(), 1);
        assert_eq!(child.untried_actions().len(), 3);
    }

    #[test]
    fn unvisited_node_has_infinite_priority() {
        let mut node = root_for(0);
        assert_eq!(node.ucb_value(10, 1.4), f64::INFINITY);

        node.visits = 4;
        node.value = 2.0;
        let expected = 0.5 + 1.4 * (10f64.ln() / 4.0).sqrt();
        assert!((node.ucb_value(10, 1.4) - expected).abs() < 1e-12);
        assert!((node.wins_rate() - 0.5).abs() < 1e-12);
    }
}
