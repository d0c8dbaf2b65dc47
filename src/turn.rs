use crate::card::Card;
use crate::random::RandomGenerator;
use rand::Rng;
use std::fmt;

/// What a player does with their hand on their turn.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Action {
    /// Keep every card and stay a King, so the player does not move.
    NoCard,
    /// Play the card in the given hand slot.
    PlayCard(usize),
}

impl Action {
    /// Numeric form used at the console boundary: `-1` for [`Action::NoCard`], otherwise the
    /// hand slot.
    pub fn index(self) -> i32 {
        match self {
            Action::NoCard => -1,
            Action::PlayCard(slot) => i32::try_from(slot).unwrap_or(i32::MAX),
        }
    }

    /// Reads a numeric choice against a hand of `hand_len` cards. Negative or stale slots become
    /// [`Action::NoCard`].
    pub fn from_index(index: i32, hand_len: usize) -> Self {
        match usize::try_from(index) {
            Ok(slot) if slot < hand_len => Action::PlayCard(slot),
            _ => Action::NoCard,
        }
    }

    /// Clamps this action to a hand of `hand_len` cards.
    pub fn sanitize(self, hand_len: usize) -> Self {
        match self {
            Action::PlayCard(slot) if slot < hand_len => self,
            _ => Action::NoCard,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::NoCard => write!(f, "no card"),
            Action::PlayCard(slot) => write!(f, "card #{slot}"),
        }
    }
}

/// The dice that decide who acts in a round.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Initiative {
    pub rolls: [u8; 2],
    /// The player with the higher die, or `None` on a tie.
    pub actor: Option<usize>,
}

/// Rolls one die per player; the higher roll acts and a tie skips the round.
pub fn roll_initiative(rng: &mut impl Rng) -> Initiative {
    let rolls = [rng.roll_die(), rng.roll_die()];
    let actor = match rolls[0].cmp(&rolls[1]) {
        std::cmp::Ordering::Greater => Some(0),
        std::cmp::Ordering::Less => Some(1),
        std::cmp::Ordering::Equal => None,
    };
    Initiative { rolls, actor }
}

/// How a turn opens for the acting player.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TurnStart {
    /// The player was blocked and forfeits this turn.
    Blocked,
    /// The player drew a card and may now choose an action.
    Drew(Card),
}

/// What happened when an action was resolved.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct TurnReport {
    pub actor: usize,
    /// The action actually applied, after clamping.
    pub action: Action,
    pub from: u8,
    pub to: u8,
    pub won: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;
    use test_case::test_case;

    #[test_case(-1, 3, Action::NoCard)]
    #[test_case(0, 3, Action::PlayCard(0))]
    #[test_case(2, 3, Action::PlayCard(2))]
    #[test_case(3, 3, Action::NoCard ; "stale slot")]
    #[test_case(-7, 3, Action::NoCard ; "negative")]
    #[test_case(0, 0, Action::NoCard ; "empty hand")]
    fn from_index_clamps(index: i32, hand_len: usize, expected: Action) {
        assert_eq!(Action::from_index(index, hand_len), expected);
    }

    #[test]
    fn index_round_trips_boundary_values() {
        assert_eq!(Action::NoCard.index(), -1);
        assert_eq!(Action::PlayCard(4).index(), 4);
        assert_eq!(Action::PlayCard(4).sanitize(2), Action::NoCard);
    }

    #[test]
    fn initiative_follows_the_higher_die() {
        let mut rng = seeded(11);
        for _ in 0..200 {
            let initiative = roll_initiative(&mut rng);
            let [a, b] = initiative.rolls;
            let expected = if a > b {
                Some(0)
            } else if b > a {
                Some(1)
            } else {
                None
            };
            assert_eq!(initiative.actor, expected);
        }
    }
}
