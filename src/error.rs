use thiserror::Error;

/// Errors surfaced by the rule engine and the planner.
///
/// None of these are raised by ordinary play: an empty draw pile, a stale card slot or a steal
/// with nothing to take all degrade to a safe default instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RaceError {
    /// The table already seats the maximum number of players.
    #[error("the game already has {max} players")]
    TooManyPlayers { max: usize },

    /// A player index that does not address a seated player.
    #[error("no player at index {0}")]
    UnknownPlayer(usize),

    /// The draw pile was still empty after regenerating the deck.
    #[error("no card left to deal")]
    EmptyDeck,

    /// A planner configuration value outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
