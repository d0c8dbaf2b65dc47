//! Search tree with arena-backed nodes.
//!
//! Nodes live in an [`ego_tree::Tree`] and are addressed by [`NodeId`]. Every node is owned by the
//! arena; parent links are ids used only to walk back towards the root.

use crate::board::GameState;
use crate::error::RaceError;
use crate::mcts_node::SearchNode;
use crate::turn::Action;
use ego_tree::{NodeId, NodeRef, Tree};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct SearchTree {
    tree: Tree<SearchNode>,
}

impl SearchTree {
    /// Creates a tree holding only a root for `state`.
    pub fn new(state: GameState) -> Self {
        Self {
            tree: Tree::new(SearchNode::root(state)),
        }
    }

    /// Returns an immutable reference to the underlying arena.
    pub fn get_tree(&self) -> &Tree<SearchNode> {
        &self.tree
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn root(&self) -> &SearchNode {
        self.tree.root().value()
    }

    pub fn node(&self, id: NodeId) -> Option<&SearchNode> {
        self.tree.get(id).map(|node| node.value())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id)?.parent().map(|parent| parent.id())
    }

    /// Children of `id` in creation order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .get(id)
            .map(|node| node.children().map(|child| child.id()).collect())
            .unwrap_or_default()
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.tree.nodes().count()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Turns one random untried action of `id` into a new child.
    ///
    /// Returns `Ok(None)` for terminal or fully expanded nodes.
    pub fn expand(&mut self, id: NodeId, rng: &mut impl Rng) -> Result<Option<NodeId>, RaceError> {
        let Some(mut node) = self.tree.get_mut(id) else {
            return Ok(None);
        };

        let data = node.value();
        if data.is_terminal() {
            return Ok(None);
        }
        let Some(action) = data.take_untried_action(rng) else {
            return Ok(None);
        };
        let child = data.spawn_child(action, rng)?;

        Ok(Some(node.append(child).id()))
    }

    /// Selects the child of `id` with the best UCB1 value.
    ///
    /// The first child that was never visited wins outright, so every branch is tried once before
    /// any exploitation happens.
    pub fn select_child_ucb(&self, id: NodeId, exploration_constant: f64) -> Option<NodeId> {
        let node = self.tree.get(id)?;
        let parent_visits = node.value().visits;

        let mut best: Option<(NodeId, f64)> = None;
        for child in node.children() {
            let stats = child.value();
            if stats.visits == 0 {
                return Some(child.id());
            }

            let score = stats.ucb_value(parent_visits, exploration_constant);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((child.id(), score));
            }
        }

        best.map(|(child_id, _)| child_id)
    }

    /// Credits `result` to `id` and every ancestor up to the root.
    ///
    /// The result always counts for the planner, whichever player acted at each level.
    pub fn backpropagate(&mut self, id: NodeId, result: f64) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(mut node) = self.tree.get_mut(current) else {
                break;
            };

            let stats = node.value();
            stats.visits += 1;
            stats.value += result;

            cursor = node.parent().map(|parent| parent.id());
        }
    }

    /// The root child with the most visits, ties going to the higher accumulated value and then
    /// to the earlier child.
    pub fn best_child(&self) -> Option<NodeId> {
        let mut best: Option<NodeRef<'_, SearchNode>> = None;
        for child in self.tree.root().children() {
            let is_better = match best {
                None => true,
                Some(current) => {
                    let (candidate, current) = (child.value(), current.value());
                    candidate.visits > current.visits
                        || (candidate.visits == current.visits && candidate.value > current.value)
                }
            };
            if is_better {
                best = Some(child);
            }
        }

        best.map(|node| node.id())
    }

    /// The action leading to [`SearchTree::best_child`].
    pub fn best_action(&self) -> Option<Action> {
        self.best_child()
            .and_then(|id| self.node(id))
            .and_then(|node| node.prev_action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;

    fn tree_for_first_player() -> SearchTree {
        let mut state = GameState::bare();
        state.add_player("Ana", false).unwrap();
        state.add_player("Bot", true).unwrap();
        state.set_current_turn(Some(0));
        SearchTree::new(state)
    }

    #[test]
    fn expansion_stops_when_every_action_is_tried() {
        let mut rng = seeded(41);
        let mut tree = tree_for_first_player();
        let root = tree.root_id();

        let mut created = 0;
        while tree.expand(root, &mut rng).unwrap().is_some() {
            created += 1;
        }

        assert_eq!(created, 4);
        assert_eq!(tree.children(root).len(), 4);
        assert!(tree.root().is_fully_expanded());
        assert_eq!(tree.len(), 5);

        let mut actions: Vec<i32> = tree
            .children(root)
            .into_iter()
            .filter_map(|id| tree.node(id)?.prev_action)
            .map(Action::index)
            .collect();
        actions.sort_unstable();
        assert_eq!(actions, vec![-1, 0, 1, 2]);
    }

    #[test]
    fn terminal_node_is_never_expanded() {
        let mut rng = seeded(42);
        let mut state = GameState::bare();
        state.add_player("Ana", false).unwrap();
        state.add_player("Bot", true).unwrap();
        state.player_mut(0).set_position(63);
        state.set_current_turn(Some(0));
        state.resolve_turn(0, Action::PlayCard(0), &mut rng).unwrap();
        assert!(state.is_finished());

        let mut tree = SearchTree::new(state);
        let root = tree.root_id();

        assert!(tree.root().is_terminal());
        assert_eq!(tree.expand(root, &mut rng).unwrap(), None);
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn unvisited_child_is_selected_first() {
        // arrange
        let mut rng = seeded(43);
        let mut tree = tree_for_first_player();
        let root = tree.root_id();
        let first = tree.expand(root, &mut rng).unwrap().unwrap();
        let second = tree.expand(root, &mut rng).unwrap().unwrap();
        let third = tree.expand(root, &mut rng).unwrap().unwrap();
        for _ in 0..10 {
            tree.backpropagate(first, 1.0);
        }
        tree.backpropagate(third, 1.0);

        // act
        let selected = tree.select_child_ucb(root, std::f64::consts::SQRT_2);

        // assert
        assert_eq!(selected, Some(second));
    }

    #[test]
    fn selection_balances_win_rate_and_exploration() {
        let mut rng = seeded(44);
        let mut tree = tree_for_first_player();
        let root = tree.root_id();
        let strong = tree.expand(root, &mut rng).unwrap().unwrap();
        let weak = tree.expand(root, &mut rng).unwrap().unwrap();
        for _ in 0..5 {
            tree.backpropagate(strong, 1.0);
            tree.backpropagate(weak, 0.0);
        }

        assert_eq!(tree.select_child_ucb(root, 0.0), Some(strong));
        assert_eq!(tree.select_child_ucb(root, std::f64::consts::SQRT_2), Some(strong));
        assert_eq!(tree.select_child_ucb(strong, 1.0), None);
    }

    #[test]
    fn backpropagation_updates_exactly_the_path_to_root() {
        // arrange
        let mut rng = seeded(45);
        let mut tree = tree_for_first_player();
        let root = tree.root_id();
        let child = tree.expand(root, &mut rng).unwrap().unwrap();
        let sibling = tree.expand(root, &mut rng).unwrap().unwrap();
        let grandchild = tree.expand(child, &mut rng).unwrap().unwrap();

        // act
        tree.backpropagate(grandchild, 1.0);
        tree.backpropagate(grandchild, 0.0);

        // assert
        for id in [grandchild, child, root] {
            let node = tree.node(id).unwrap();
            assert_eq!(node.visits, 2);
            assert!((node.value - 1.0).abs() < 1e-12);
        }
        let untouched = tree.node(sibling).unwrap();
        assert_eq!(untouched.visits, 0);
        assert_eq!(untouched.value, 0.0);
        assert_eq!(tree.parent(grandchild), Some(child));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn best_child_prefers_visits_then_value() {
        let mut rng = seeded(46);
        let mut tree = tree_for_first_player();
        let root = tree.root_id();
        let a = tree.expand(root, &mut rng).unwrap().unwrap();
        let b = tree.expand(root, &mut rng).unwrap().unwrap();
        let c = tree.expand(root, &mut rng).unwrap().unwrap();

        tree.backpropagate(a, 1.0);
        tree.backpropagate(a, 1.0);
        tree.backpropagate(b, 0.0);
        tree.backpropagate(b, 0.0);
        tree.backpropagate(b, 0.0);
        tree.backpropagate(c, 1.0);
        assert_eq!(tree.best_child(), Some(b));

        tree.backpropagate(a, 0.0);
        assert_eq!(tree.best_child(), Some(a));
        assert_eq!(tree.best_action(), tree.node(a).unwrap().prev_action);
    }

    #[test]
    fn empty_tree_has_no_best_action() {
        let tree = tree_for_first_player();
        assert_eq!(tree.best_child(), None);
        assert_eq!(tree.best_action(), None);
        assert_eq!(tree.len(), 1);
    }
}
