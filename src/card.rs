use std::fmt;

/// Number of cards in one freshly generated deck.
pub const DECK_SIZE: usize = 27;

/// The piece a player currently moves as.
///
/// Every player starts each turn as a [`PieceType::King`], which does not move. Playing a card
/// transforms the player into the card's piece for the rest of that turn.
#[derive(Debug, Default, PartialEq, Eq, Hash, Copy, Clone)]
pub enum PieceType {
    #[default]
    King,
    Pawn,
    Knight,
    Rook,
    Bishop,
    Queen,
}

impl PieceType {
    /// Returns how many squares this piece advances in one move.
    pub const fn move_distance(self) -> u8 {
        match self {
            PieceType::King => 0,
            PieceType::Pawn => 1,
            PieceType::Knight => 4,
            PieceType::Rook => 6,
            PieceType::Bishop => 8,
            PieceType::Queen => 12,
        }
    }

    /// Returns the display name of the piece.
    pub const fn name(self) -> &'static str {
        match self {
            PieceType::King => "King",
            PieceType::Pawn => "Pawn",
            PieceType::Knight => "Knight",
            PieceType::Rook => "Rook",
            PieceType::Bishop => "Bishop",
            PieceType::Queen => "Queen",
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A transformation card held in a player's hand.
///
/// The move distance is stored next to the piece so a card may carry its own value, but the rule
/// engine always moves by [`PieceType::move_distance`].
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Card {
    piece: PieceType,
    label: String,
    move_distance: u8,
}

impl Card {
    /// Creates the canonical card for `piece`.
    pub fn new(piece: PieceType) -> Self {
        let move_distance = piece.move_distance();
        Self {
            piece,
            label: format!("{} ({})", piece.name(), move_distance),
            move_distance,
        }
    }

    /// Creates a card whose label and distance are chosen by the caller.
    pub fn custom(piece: PieceType, label: impl Into<String>, move_distance: u8) -> Self {
        Self {
            piece,
            label: label.into(),
            move_distance,
        }
    }

    pub fn piece(&self) -> PieceType {
        self.piece
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn move_distance(&self) -> u8 {
        self.move_distance
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Builds one unshuffled deck: 16 pawns, 3 knights, 3 rooks, 4 bishops and a single queen.
pub fn standard_deck() -> Vec<Card> {
    const COMPOSITION: [(PieceType, usize); 5] = [
        (PieceType::Pawn, 16),
        (PieceType::Knight, 3),
        (PieceType::Rook, 3),
        (PieceType::Bishop, 4),
        (PieceType::Queen, 1),
    ];

    let mut deck = Vec::with_capacity(DECK_SIZE);
    for (piece, count) in COMPOSITION {
        deck.extend(std::iter::repeat_with(|| Card::new(piece)).take(count));
    }
    deck
}
