use crate::card::{Card, PieceType, standard_deck};
use crate::error::RaceError;
use crate::player::{Player, START_SQUARE};
use crate::random::RandomGenerator;
use crate::turn::{Action, TurnReport, TurnStart};
use rand::Rng;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use tracing::{debug, trace, warn};

/// The last square of the track. Reaching or passing it wins the race.
pub const BOARD_SIZE: u8 = 64;
/// How many wildcard squares a fresh board gets.
pub const WILDCARD_COUNT: usize = 8;
/// Largest step of a setback or advance wildcard.
pub const WILDCARD_STEP_MAX: u8 = 5;
pub const MAX_PLAYERS: usize = 2;
/// Cards every player is dealt when they join, outside of the shared deck.
pub const STARTER_HAND: [PieceType; 3] = [PieceType::Queen, PieceType::Rook, PieceType::Knight];

/// The random effect triggered by landing on a wildcard square.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum WildcardEffect {
    /// Move back by the given amount, never behind the start square.
    Setback(u8),
    /// Move forward by the given amount, never past the last square.
    Advance(u8),
    /// Take a random card from the opponent's hand.
    Steal,
    /// Jump to the given square.
    Teleport(u8),
    /// Forfeit the next turn.
    Block,
}

impl WildcardEffect {
    /// Draws one of the five effects with equal probability.
    pub fn roll(rng: &mut impl Rng) -> Self {
        match rng.random_range(0..5) {
            0 => WildcardEffect::Setback(rng.next_range(1, WILDCARD_STEP_MAX)),
            1 => WildcardEffect::Advance(rng.next_range(1, WILDCARD_STEP_MAX)),
            2 => WildcardEffect::Steal,
            3 => WildcardEffect::Teleport(rng.next_range(START_SQUARE, BOARD_SIZE)),
            _ => WildcardEffect::Block,
        }
    }
}

/// The authoritative snapshot of a match.
///
/// Everything is owned by value, so [`Clone`] is a deep copy: hands, the draw pile and the
/// wildcard layout of a clone share nothing with the original. The search relies on this to
/// mutate thousands of speculative copies without touching the real match.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct GameState {
    players: Vec<Player>,
    draw_pile: VecDeque<Card>,
    wildcard_squares: BTreeSet<u8>,
    finished: bool,
    current_turn: Option<usize>,
}

impl GameState {
    /// Creates a match with a freshly shuffled deck and a random wildcard layout.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut state = Self::bare();
        state.refill_draw_pile(rng);
        state.wildcard_squares = Self::roll_wildcard_squares(rng);
        state
    }

    /// Creates a match with no deck and no wildcard squares.
    ///
    /// The deck is still generated on the first draw.
    pub fn bare() -> Self {
        Self::default()
    }

    /// Replaces the wildcard layout. Squares outside the track are dropped.
    pub fn with_wildcard_squares(mut self, squares: impl IntoIterator<Item = u8>) -> Self {
        self.wildcard_squares = squares
            .into_iter()
            .filter(|s| (START_SQUARE..=BOARD_SIZE).contains(s))
            .collect();
        self
    }

    /// Replaces the draw pile; the first card is drawn first.
    pub fn with_draw_pile(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.draw_pile = cards.into_iter().collect();
        self
    }

    /// Picks distinct wildcard squares strictly between the start and the finish.
    fn roll_wildcard_squares(rng: &mut impl Rng) -> BTreeSet<u8> {
        let inner = usize::from(BOARD_SIZE - START_SQUARE - 1);
        rand::seq::index::sample(rng, inner, WILDCARD_COUNT)
            .into_iter()
            .filter_map(|i| u8::try_from(i).ok())
            .map(|i| i + START_SQUARE + 1)
            .collect()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn wildcard_squares(&self) -> &BTreeSet<u8> {
        &self.wildcard_squares
    }

    pub fn is_wildcard(&self, square: u8) -> bool {
        self.wildcard_squares.contains(&square)
    }

    pub fn draw_pile(&self) -> &VecDeque<Card> {
        &self.draw_pile
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The player whose turn is being decided, if any.
    pub fn current_turn(&self) -> Option<usize> {
        self.current_turn
    }

    pub fn set_current_turn(&mut self, player: Option<usize>) {
        self.current_turn = player;
    }

    /// Index of the first player that has won.
    pub fn winner(&self) -> Option<usize> {
        self.players.iter().position(Player::has_won)
    }

    fn seat(&self, index: usize) -> Result<&Player, RaceError> {
        self.players.get(index).ok_or(RaceError::UnknownPlayer(index))
    }

    fn seat_mut(&mut self, index: usize) -> Result<&mut Player, RaceError> {
        self.players
            .get_mut(index)
            .ok_or(RaceError::UnknownPlayer(index))
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self, index: usize) -> &mut Player {
        &mut self.players[index]
    }

    /// Seats a new player on the start square with the starter hand.
    ///
    /// Once the table is full the call changes nothing and reports
    /// [`RaceError::TooManyPlayers`].
    pub fn add_player(&mut self, name: impl Into<String>, automated: bool) -> Result<usize, RaceError> {
        let name = name.into();
        if self.players.len() >= MAX_PLAYERS {
            warn!(%name, "table is full, player not added");
            return Err(RaceError::TooManyPlayers { max: MAX_PLAYERS });
        }

        let mut player = Player::new(name, automated);
        for piece in STARTER_HAND {
            player.receive_card(Card::new(piece));
        }
        self.players.push(player);
        Ok(self.players.len() - 1)
    }

    /// Replaces the draw pile with a full, shuffled deck.
    pub fn refill_draw_pile(&mut self, rng: &mut impl Rng) {
        let mut deck = standard_deck();
        rng.shuffle_slice(&mut deck);
        self.draw_pile = deck.into();
        debug!(cards = self.draw_pile.len(), "draw pile regenerated");
    }

    /// Hands the front card of the draw pile to `player`, regenerating the deck first if the pile
    /// ran out. Returns a copy of the dealt card.
    pub fn deal_card(&mut self, player: usize, rng: &mut impl Rng) -> Result<Card, RaceError> {
        self.seat(player)?;
        let card = match self.draw_pile.pop_front() {
            Some(card) => card,
            None => {
                self.refill_draw_pile(rng);
                self.draw_pile.pop_front().ok_or(RaceError::EmptyDeck)?
            }
        };
        self.seat_mut(player)?.receive_card(card.clone());
        Ok(card)
    }

    /// Moves `player` by their current piece's distance and settles any wildcard chain.
    ///
    /// The position is not capped here: a player who overshoots the finish keeps the overshoot
    /// and is marked as won. Returns the settled position.
    pub fn move_player(&mut self, player: usize, rng: &mut impl Rng) -> Result<u8, RaceError> {
        let distance = self.seat(player)?.piece().move_distance();
        if distance > 0 {
            let mover = self.seat_mut(player)?;
            mover.set_position(mover.position().saturating_add(distance));

            loop {
                let mover = self.seat(player)?;
                let square = mover.position();
                if mover.has_won() || !self.is_wildcard(square) {
                    break;
                }

                self.resolve_wildcard(player, rng)?;
                // A chain only continues when the effect lands on another square.
                if self.seat(player)?.position() == square {
                    break;
                }
            }
        }

        let mover = self.seat_mut(player)?;
        mover.check_win(BOARD_SIZE);
        Ok(mover.position())
    }

    /// Rolls a wildcard effect and applies it to `player`.
    pub fn resolve_wildcard(
        &mut self,
        player: usize,
        rng: &mut impl Rng,
    ) -> Result<WildcardEffect, RaceError> {
        let effect = WildcardEffect::roll(rng);
        self.apply_wildcard(player, effect, rng)?;
        Ok(effect)
    }

    /// Applies a specific wildcard effect to `player`.
    pub fn apply_wildcard(
        &mut self,
        player: usize,
        effect: WildcardEffect,
        rng: &mut impl Rng,
    ) -> Result<(), RaceError> {
        self.seat(player)?;
        match effect {
            WildcardEffect::Setback(steps) => {
                let target = self.seat(player)?.position().saturating_sub(steps);
                self.seat_mut(player)?.set_position(target.max(START_SQUARE));
            }
            WildcardEffect::Advance(steps) => {
                let target = self.seat(player)?.position().saturating_add(steps);
                self.seat_mut(player)?.set_position(target.min(BOARD_SIZE));
            }
            WildcardEffect::Steal => self.steal_card(player, rng),
            WildcardEffect::Teleport(square) => {
                self.seat_mut(player)?.set_position(square.clamp(START_SQUARE, BOARD_SIZE));
            }
            WildcardEffect::Block => self.seat_mut(player)?.block_for(1),
        }

        let target = self.seat_mut(player)?;
        target.check_win(BOARD_SIZE);
        trace!(player, ?effect, position = target.position(), "wildcard resolved");
        Ok(())
    }

    fn steal_card(&mut self, thief: usize, rng: &mut impl Rng) {
        let Some(victim) = (0..self.players.len()).find(|&i| i != thief) else {
            return;
        };
        let Some(slot) = rng.pick_index(self.players[victim].hand().len()) else {
            return;
        };
        if let Some(card) = self.players[victim].take_card(slot) {
            self.players[thief].receive_card(card);
        }
    }

    /// Sends every other player sharing `active`'s square back to the start.
    ///
    /// Nothing happens while `active` is on the start square or has already won. Returns the
    /// players that were sent back.
    pub fn resolve_collisions(&mut self, active: usize) -> Result<Vec<usize>, RaceError> {
        let mover = self.seat(active)?;
        let square = mover.position();
        if square == START_SQUARE || mover.has_won() {
            return Ok(Vec::new());
        }

        let mut bumped = Vec::new();
        for (index, other) in self.players.iter_mut().enumerate() {
            if index != active && other.position() == square {
                other.set_position(START_SQUARE);
                bumped.push(index);
            }
        }
        if !bumped.is_empty() {
            trace!(active, square, ?bumped, "collision");
        }
        Ok(bumped)
    }

    /// All legal actions for `player`: no card, then every hand slot.
    pub fn possible_actions(&self, player: usize) -> Result<Vec<Action>, RaceError> {
        let hand_len = self.seat(player)?.hand().len();
        let mut actions = Vec::with_capacity(hand_len + 1);
        actions.push(Action::NoCard);
        actions.extend((0..hand_len).map(Action::PlayCard));
        Ok(actions)
    }

    /// Plays the chosen card, if any. Stale slots fall back to [`Action::NoCard`].
    pub fn apply_action(&mut self, player: usize, action: Action) -> Result<Action, RaceError> {
        let mover = self.seat_mut(player)?;
        let action = action.sanitize(mover.hand().len());
        if let Action::PlayCard(slot) = action {
            mover.play_card(slot);
        }
        Ok(action)
    }

    /// Opens `player`'s turn: a blocked player forfeits it, anyone else draws a card.
    pub fn begin_turn(&mut self, player: usize, rng: &mut impl Rng) -> Result<TurnStart, RaceError> {
        self.current_turn = Some(player);
        if self.seat_mut(player)?.consume_block() {
            return Ok(TurnStart::Blocked);
        }
        self.deal_card(player, rng).map(TurnStart::Drew)
    }

    /// Resolves `action` for `player`: play the card, move, settle collisions and check for a
    /// win. If the match goes on, the player turns back into a King.
    pub fn resolve_turn(
        &mut self,
        player: usize,
        action: Action,
        rng: &mut impl Rng,
    ) -> Result<TurnReport, RaceError> {
        let from = self.seat(player)?.position();
        let action = self.apply_action(player, action)?;
        let to = self.move_player(player, rng)?;
        self.resolve_collisions(player)?;

        let won = self.seat(player)?.has_won();
        if won {
            self.finished = true;
        } else {
            self.seat_mut(player)?.reset_piece();
        }

        Ok(TurnReport {
            actor: player,
            action,
            from,
            to,
            won,
        })
    }

    /// Turns every player back into a King.
    pub fn reset_pieces(&mut self) {
        self.players.iter_mut().for_each(Player::reset_piece);
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, player) in self.players.iter().enumerate() {
            write!(f, "[{index}] {player} | hand:")?;
            for card in player.hand() {
                write!(f, " {card}")?;
            }
            writeln!(f)?;
        }
        let squares: Vec<String> = self.wildcard_squares.iter().map(u8::to_string).collect();
        writeln!(f, "wildcards: {}", squares.join(", "))?;
        write!(f, "draw pile: {} cards", self.draw_pile.len())
    }
}
