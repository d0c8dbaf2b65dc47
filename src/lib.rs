//! A two-player race game and the Monte Carlo tree search planner that plays it.
//!
//! Two racers start on square 1 of a 64-square track. Each turn the player who wins the initiative
//! roll draws a card and may play one: the card turns them into a chess piece for that turn, and
//! the piece decides how far they move. Wildcard squares trigger random effects, landing on the
//! opponent sends them back to the start, and the first player to reach square 64 wins.
//!
//! The automated player chooses its card with [`mcts::MctsPlanner`], which searches over copies
//! of the live [`board::GameState`] and never mutates the real match.
//!
//! # Example
//!
//! ```rust
//! use piece_race::board::GameState;
//! use piece_race::mcts::MctsPlanner;
//! use piece_race::random::seeded;
//! use piece_race::turn::TurnStart;
//!
//! // Create a new match with two players
//! let mut rng = seeded(7);
//! let mut game = GameState::new(&mut rng);
//! game.add_player("Ana", false)?;
//! let bot = game.add_player("Bot", true)?;
//!
//! // Create a planner deciding for the bot
//! let mut planner = MctsPlanner::builder(bot).with_seed(42).build()?;
//!
//! // Let the bot take a turn
//! if let TurnStart::Drew(card) = game.begin_turn(bot, &mut rng)? {
//!     println!("Bot drew {card}");
//!     let action = planner.plan_action(&game, 1000)?;
//!     let report = game.resolve_turn(bot, action, &mut rng)?;
//!     println!("Bot played {action} and moved from {} to {}", report.from, report.to);
//! }
//! # Ok::<(), piece_race::error::RaceError>(())
//! ```

/// Contains the `GameState` rule engine: dealing, movement, wildcards and collisions.
pub mod board;
/// Contains the piece types, cards and the standard deck.
pub mod card;
/// Contains the planner configuration.
pub mod config;
/// Contains the crate's error type.
pub mod error;
/// The core module of the planner, containing `MctsPlanner`.
pub mod mcts;
/// Contains the `SearchNode` struct, which represents a node in the search tree.
pub mod mcts_node;
/// Contains the per-player record.
pub mod player;
/// Contains the random playout policy used to score leaves.
pub mod playout;
/// Contains random number helpers shared by the rules and the search.
pub mod random;
/// Contains the arena-backed search tree.
pub mod tree;
/// Contains actions, initiative rolls and turn reports.
pub mod turn;
