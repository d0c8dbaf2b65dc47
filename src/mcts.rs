use crate::board::GameState;
use crate::config::MctsConfig;
use crate::error::RaceError;
use crate::playout::RandomPlayout;
use crate::random;
use crate::tree::SearchTree;
use crate::turn::Action;
use ego_tree::NodeId;
use rand::rngs::StdRng;
use tracing::{debug, trace};

/// The automated player's planner.
///
/// Every decision builds a fresh search tree from a copy of the live match, runs a fixed number
/// of select/expand/simulate/backpropagate iterations on it and answers with the most visited
/// root action. The live match is never touched.
pub struct MctsPlanner {
    player_index: usize,
    config: MctsConfig,
    playout: RandomPlayout,
    random: StdRng,
}

/// A builder for creating instances of [`MctsPlanner`].
pub struct MctsPlannerBuilder {
    player_index: usize,
    config: MctsConfig,
    random: Option<StdRng>,
}

impl MctsPlannerBuilder {
    /// Creates a builder for a planner deciding on behalf of `player_index`.
    pub fn new(player_index: usize) -> Self {
        Self {
            player_index,
            config: MctsConfig::default(),
            random: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: MctsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.config.exploration_constant = c;
        self
    }

    pub fn with_max_playout_rounds(mut self, rounds: u32) -> Self {
        self.config.max_playout_rounds = rounds;
        self
    }

    /// Sets the random number generator. Without one the planner is seeded from the OS.
    pub fn with_random_generator(mut self, rng: StdRng) -> Self {
        self.random = Some(rng);
        self
    }

    /// Shorthand for a generator seeded with `seed`.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_random_generator(random::seeded(seed))
    }

    /// Validates the configuration and builds the planner.
    pub fn build(self) -> Result<MctsPlanner, RaceError> {
        self.config.validate()?;
        Ok(MctsPlanner {
            player_index: self.player_index,
            playout: RandomPlayout::from_config(&self.config),
            config: self.config,
            random: self.random.unwrap_or_else(random::from_entropy),
        })
    }
}

impl MctsPlanner {
    /// Returns a new builder for `MctsPlanner`.
    pub fn builder(player_index: usize) -> MctsPlannerBuilder {
        MctsPlannerBuilder::new(player_index)
    }

    /// The seat this planner decides for.
    pub fn player_index(&self) -> usize {
        self.player_index
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Chooses the action for the planner's player in `live`, after `iterations` search
    /// iterations.
    ///
    /// Falls back to [`Action::NoCard`] when nothing was explored, e.g. with zero iterations.
    pub fn plan_action(&mut self, live: &GameState, iterations: u32) -> Result<Action, RaceError> {
        let tree = self.search(live, iterations)?;
        let action = tree.best_action().unwrap_or(Action::NoCard);

        debug!(
            player = self.player_index,
            %action,
            iterations,
            root_visits = tree.root().visits,
            nodes = tree.len(),
            "planned action"
        );
        Ok(action)
    }

    /// Runs the search and hands back the whole tree for inspection.
    pub fn search(&mut self, live: &GameState, iterations: u32) -> Result<SearchTree, RaceError> {
        if live.player(self.player_index).is_none() {
            return Err(RaceError::UnknownPlayer(self.player_index));
        }

        let mut root_state = live.clone();
        root_state.set_current_turn(Some(self.player_index));
        let mut tree = SearchTree::new(root_state);

        for _ in 0..iterations {
            self.do_iteration(&mut tree)?;
        }
        Ok(tree)
    }

    /// Performs one full iteration on `tree` and returns the node the playout started from.
    pub fn do_iteration(&mut self, tree: &mut SearchTree) -> Result<NodeId, RaceError> {
        let selected = self.select(tree);
        let leaf = self.expand(tree, selected)?;
        let result = self.simulate(tree, leaf)?;
        tree.backpropagate(leaf, result);

        trace!(leaf = ?leaf, result, "iteration complete");
        Ok(leaf)
    }

    /// Descends from the root through fully expanded, non-terminal nodes using UCB1.
    fn select(&self, tree: &SearchTree) -> NodeId {
        let root = tree.root_id();
        let mut current = root;

        while let Some(node) = tree.node(current) {
            if node.is_terminal() || !node.is_fully_expanded() {
                break;
            }
            match tree.select_child_ucb(current, self.config.exploration_constant) {
                Some(child) => current = child,
                None => {
                    current = root;
                    break;
                }
            }
        }

        current
    }

    /// Grows one child under `id` when it still has untried actions.
    fn expand(&mut self, tree: &mut SearchTree, id: NodeId) -> Result<NodeId, RaceError> {
        let expandable = tree
            .node(id)
            .is_some_and(|node| !node.is_terminal() && !node.is_fully_expanded());
        if !expandable {
            return Ok(id);
        }

        Ok(tree.expand(id, &mut self.random)?.unwrap_or(id))
    }

    /// Plays a disposable copy of the node's state out and scores it for the planner.
    fn simulate(&mut self, tree: &SearchTree, id: NodeId) -> Result<f64, RaceError> {
        let Some(node) = tree.node(id) else {
            return Ok(0.0);
        };

        let mut scratch = node.state.clone();
        self.playout
            .run(&mut scratch, self.player_index, &mut self.random)
    }
}
