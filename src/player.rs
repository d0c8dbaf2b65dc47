use crate::card::{Card, PieceType};
use std::fmt;

/// First square of the track. Players start here and are sent back here by collisions.
pub const START_SQUARE: u8 = 1;

/// One of the two racers.
///
/// Hand entries are addressed by index; the order carries no meaning beyond staying stable
/// between choosing a slot and removing it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Player {
    name: String,
    hand: Vec<Card>,
    piece: PieceType,
    position: u8,
    won: bool,
    blocked_rounds: u8,
    automated: bool,
}

impl Player {
    /// Creates a player standing on the start square as a King, with an empty hand.
    pub fn new(name: impl Into<String>, automated: bool) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            piece: PieceType::King,
            position: START_SQUARE,
            won: false,
            blocked_rounds: 0,
            automated,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn piece(&self) -> PieceType {
        self.piece
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn blocked_rounds(&self) -> u8 {
        self.blocked_rounds
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked_rounds > 0
    }

    pub fn is_automated(&self) -> bool {
        self.automated
    }

    /// Plays the card at `index`: the player becomes that card's piece and the card leaves the
    /// hand. Returns `None` and changes nothing when the slot does not exist.
    pub fn play_card(&mut self, index: usize) -> Option<Card> {
        if index >= self.hand.len() {
            return None;
        }

        let card = self.hand.remove(index);
        self.piece = card.piece();
        Some(card)
    }

    pub fn receive_card(&mut self, card: Card) {
        self.hand.push(card);
    }

    pub(crate) fn take_card(&mut self, index: usize) -> Option<Card> {
        (index < self.hand.len()).then(|| self.hand.remove(index))
    }

    pub fn reset_piece(&mut self) {
        self.piece = PieceType::King;
    }

    pub(crate) fn set_position(&mut self, position: u8) {
        self.position = position;
    }

    pub(crate) fn block_for(&mut self, rounds: u8) {
        self.blocked_rounds = rounds;
    }

    /// Spends one blocked round. Returns `true` if the player was blocked.
    pub(crate) fn consume_block(&mut self) -> bool {
        if self.blocked_rounds == 0 {
            return false;
        }
        self.blocked_rounds -= 1;
        true
    }

    /// Marks the player as the winner once they reach or pass `finish`.
    pub(crate) fn check_win(&mut self, finish: u8) -> bool {
        if self.position >= finish {
            self.won = true;
        }
        self.won
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on square {} as {}", self.name, self.position, self.piece)?;
        if self.is_blocked() {
            write!(f, " (blocked)")?;
        }
        if self.won {
            write!(f, " (winner)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_starts_as_king_on_first_square() {
        let player = Player::new("Ana", false);
        assert_eq!(player.position(), START_SQUARE);
        assert_eq!(player.piece(), PieceType::King);
        assert!(player.hand().is_empty());
        assert!(!player.has_won());
        assert!(!player.is_blocked());
    }

    #[test]
    fn playing_a_card_transforms_and_removes_it() {
        let mut player = Player::new("Ana", false);
        player.receive_card(Card::new(PieceType::Pawn));
        player.receive_card(Card::new(PieceType::Rook));

        let played = player.play_card(1);

        assert_eq!(played.map(|c| c.piece()), Some(PieceType::Rook));
        assert_eq!(player.piece(), PieceType::Rook);
        assert_eq!(player.hand().len(), 1);
        assert_eq!(player.hand()[0].piece(), PieceType::Pawn);
    }

    #[test]
    fn playing_a_missing_slot_is_ignored() {
        let mut player = Player::new("Ana", false);
        player.receive_card(Card::new(PieceType::Pawn));

        assert!(player.play_card(3).is_none());
        assert_eq!(player.piece(), PieceType::King);
        assert_eq!(player.hand().len(), 1);
    }

    #[test]
    fn block_is_consumed_once() {
        let mut player = Player::new("Bot", true);
        player.block_for(1);

        assert!(player.consume_block());
        assert!(!player.consume_block());
        assert_eq!(player.blocked_rounds(), 0);
    }
}
