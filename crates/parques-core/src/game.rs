//! Turn sequencing and game rules.
//!
//! This module contains the `GameEngine`, the only stateful rules authority:
//! it owns the turn order and ranking, rolls the die, works out which pieces
//! may move, applies the chosen move and handles captures and completion.

use crate::board::{Board, Snapshot};
use crate::dice::{Dice, DiceSource, MAX_ROLL, MIN_ROLL};
use crate::events::GameEvent;
use crate::piece::{Color, Piece};
use crate::player::Player;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Players needed before the first turn
pub const MIN_PLAYERS: usize = 2;

/// Index recorded for a turn in which nothing could move
pub const NO_MOVE_INDEX: i32 = -1;

/// Errors returned by the engine
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Game is over")]
    GameOver,

    #[error("Need at least 2 players to play")]
    NotEnoughPlayers,

    #[error("Color {0} is already taken")]
    ColorTaken(Color),

    #[error("Players cannot join a game in progress")]
    GameInProgress,

    #[error("No player with color {0}")]
    UnknownPlayer(Color),

    #[error("Dice value {0} is not between 1 and 6")]
    InvalidDiceValue(u8),

    #[error("Choice {index} is out of range for {movable} movable pieces")]
    InvalidChoice { index: usize, movable: usize },

    #[error("Player abandoned the choice")]
    ChoiceAborted,
}

/// A game session: board, players and the state of the last turn.
pub struct GameEngine {
    board: Board,
    /// Registered players, in registration order
    players: Vec<Player>,
    /// Players still racing; the front is the player who acted last
    turn_order: VecDeque<Color>,
    /// Players in the order they finished
    ranking: Vec<Color>,
    dice: Box<dyn DiceSource>,
    dice_value: Option<u8>,
    current_player: Option<Color>,
    movable: Vec<Piece>,
    chosen_index: Option<usize>,
    chosen_piece: Option<Piece>,
    captured: Vec<Piece>,
    finished: bool,
    turns_played: u32,
}

impl GameEngine {
    /// Create an empty game with a fair, entropy-seeded die
    pub fn new() -> Self {
        Self::with_dice(Dice::new())
    }

    /// Create an empty game whose rolls repeat for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_dice(Dice::with_seed(seed))
    }

    pub fn with_dice(dice: impl DiceSource + 'static) -> Self {
        Self {
            board: Board::new(),
            players: Vec::new(),
            turn_order: VecDeque::new(),
            ranking: Vec::new(),
            dice: Box::new(dice),
            dice_value: None,
            current_player: None,
            movable: Vec::new(),
            chosen_index: None,
            chosen_piece: None,
            captured: Vec::new(),
            finished: false,
            turns_played: 0,
        }
    }

    // ==================== Setup ====================

    /// Register a player and put its pieces in the pool.
    ///
    /// Turn order follows registration order.
    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.turns_played > 0 {
            return Err(GameError::GameInProgress);
        }
        let color = player.color();
        if self.player(color).is_some() {
            return Err(GameError::ColorTaken(color));
        }

        for piece in player.pieces() {
            self.board.put_in_pool(*piece);
        }
        self.turn_order.push_back(color);
        self.players.push(player);
        debug!(%color, players = self.players.len(), "player added");
        Ok(())
    }

    /// Colors nobody has taken yet, sorted by name
    pub fn available_colors(&self) -> Vec<Color> {
        let mut colors: Vec<Color> = Color::ALL
            .into_iter()
            .filter(|color| self.player(*color).is_none())
            .collect();
        colors.sort_by_key(|color| color.name());
        colors
    }

    // ==================== Accessors ====================

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Non-finished pieces grouped by position, for rendering
    pub fn snapshot(&self) -> Snapshot {
        self.board.snapshot()
    }

    /// All registered players, in registration order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, color: Color) -> Option<&Player> {
        self.players.iter().find(|p| p.color() == color)
    }

    fn player_mut(&mut self, color: Color) -> Result<&mut Player, GameError> {
        self.players
            .iter_mut()
            .find(|p| p.color() == color)
            .ok_or(GameError::UnknownPlayer(color))
    }

    /// Players still racing, starting with the one who acted last
    pub fn turn_order(&self) -> Vec<Color> {
        self.turn_order.iter().copied().collect()
    }

    /// Die value of the last turn
    pub fn dice_value(&self) -> Option<u8> {
        self.dice_value
    }

    /// Player who acted in the last turn
    pub fn current_player(&self) -> Option<&Player> {
        self.current_player.and_then(|color| self.player(color))
    }

    /// Pieces that could move in the last turn, pool exit first
    pub fn movable_pieces(&self) -> &[Piece] {
        &self.movable
    }

    /// Index into [`GameEngine::movable_pieces`] chosen in the last turn
    pub fn chosen_index(&self) -> Option<usize> {
        self.chosen_index
    }

    /// The chosen index in recorded form, [`NO_MOVE_INDEX`] when nothing moved
    pub fn recorded_index(&self) -> i32 {
        self.chosen_index
            .map_or(NO_MOVE_INDEX, |index| index as i32)
    }

    pub fn chosen_piece(&self) -> Option<Piece> {
        self.chosen_piece
    }

    /// Opponent pieces sent back to the pool in the last turn
    pub fn captured_pieces(&self) -> &[Piece] {
        &self.captured
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Players in the order they finished
    pub fn ranking(&self) -> &[Color] {
        &self.ranking
    }

    pub fn ranked_players(&self) -> Vec<&Player> {
        self.ranking
            .iter()
            .filter_map(|color| self.player(*color))
            .collect()
    }

    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    // ==================== Rules ====================

    /// Pieces of `color` that may move with `roll`.
    ///
    /// On a maximum roll the first pooled piece (in slot order) comes first;
    /// at most one pooled piece is ever offered. The remaining entries are the
    /// pieces in play that stay inside their lane, in slot order.
    pub fn legal_pieces(&self, color: Color, roll: u8) -> Vec<Piece> {
        let Some(player) = self.player(color) else {
            return Vec::new();
        };

        let mut movable = Vec::new();
        if roll == MAX_ROLL {
            if let Some(pooled) = player.pieces().iter().find(|p| self.board.is_in_pool(p)) {
                movable.push(*pooled);
            }
        }
        movable.extend(
            player
                .pieces()
                .iter()
                .filter(|p| !self.board.is_in_pool(p) && self.board.can_move(p, roll))
                .copied(),
        );
        movable
    }

    /// Play one turn.
    ///
    /// `index` and `dice_value` replay a recorded turn: when given, neither
    /// the die nor the player's strategy is consulted. An error leaves the
    /// game exactly as it was before the call.
    pub fn play_turn(
        &mut self,
        index: Option<usize>,
        dice_value: Option<u8>,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.finished {
            return Err(GameError::GameOver);
        }
        if self.turn_order.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }
        if let Some(value) = dice_value {
            if !(MIN_ROLL..=MAX_ROLL).contains(&value) {
                return Err(GameError::InvalidDiceValue(value));
            }
        }

        // The same player goes again after a maximum roll.
        let rotate = self.dice_value != Some(MAX_ROLL);
        let color = if rotate {
            self.turn_order[1]
        } else {
            self.turn_order[0]
        };

        let roll = match dice_value {
            Some(value) => value,
            None => self.dice.roll(),
        };
        debug_assert!((MIN_ROLL..=MAX_ROLL).contains(&roll), "die out of range");

        let movable = self.legal_pieces(color, roll);
        let chosen_index = if movable.is_empty() {
            None
        } else {
            let index = match index {
                Some(index) => index,
                None => self
                    .player_mut(color)?
                    .choose_piece(roll, &movable)
                    .ok_or(GameError::ChoiceAborted)?,
            };
            if index >= movable.len() {
                return Err(GameError::InvalidChoice {
                    index,
                    movable: movable.len(),
                });
            }
            Some(index)
        };

        // Commit the turn.
        if rotate {
            self.turn_order.rotate_left(1);
        }
        self.turns_played += 1;
        self.dice_value = Some(roll);
        self.current_player = Some(color);
        self.captured.clear();
        self.chosen_index = chosen_index;
        self.chosen_piece = chosen_index.map(|i| movable[i]);
        self.movable = movable;

        let mut events = vec![GameEvent::DiceRolled {
            player: color,
            value: roll,
        }];
        match self.chosen_piece {
            Some(piece) => self.apply_move(piece, roll, &mut events)?,
            None => events.push(GameEvent::NoMovablePieces { player: color }),
        }

        debug!(
            turn = self.turns_played,
            %color,
            roll,
            chosen = ?self.chosen_piece,
            captured = self.captured.len(),
            "turn played"
        );
        Ok(events)
    }

    fn apply_move(
        &mut self,
        piece: Piece,
        roll: u8,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        if roll == MAX_ROLL && self.board.is_in_pool(&piece) {
            self.board.put_at_start(piece);
            events.push(GameEvent::PieceEntered {
                piece,
                to: self.board.position(&piece),
            });
            self.capture_at(piece, events);
            return Ok(());
        }

        let from = self.board.position(&piece);
        let to = self.board.move_piece(piece, roll);
        if from.private == 0 && to.private > 0 {
            events.push(GameEvent::PieceEnteredLane { piece, to });
        } else {
            events.push(GameEvent::PieceMoved { piece, from, to });
        }

        if self.board.has_finished(&piece) {
            events.push(GameEvent::PieceFinished { piece });
            self.finish_piece(piece, events)?;
        } else {
            self.capture_at(piece, events);
        }
        Ok(())
    }

    fn finish_piece(&mut self, piece: Piece, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
        let color = piece.color;
        let player = self.player_mut(color)?;
        player.remove_piece(&piece);
        if !player.has_finished() {
            return Ok(());
        }

        self.ranking.push(color);
        self.turn_order.retain(|c| *c != color);
        info!(%color, rank = self.ranking.len(), "player finished");
        events.push(GameEvent::PlayerFinished {
            player: color,
            rank: self.ranking.len(),
        });

        if self.turn_order.len() == 1 {
            self.ranking.extend(self.turn_order.iter().copied());
            self.finished = true;
            info!(ranking = ?self.ranking, "game finished");
            events.push(GameEvent::GameFinished {
                ranking: self.ranking.clone(),
            });
        }
        Ok(())
    }

    /// Send opponents sharing `piece`'s square back to the pool
    fn capture_at(&mut self, piece: Piece, events: &mut Vec<GameEvent>) {
        for other in self.board.pieces_sharing_position(&piece) {
            if other.color != piece.color {
                self.board.put_in_pool(other);
                self.captured.push(other);
                debug!(captured = %other, by = %piece, "piece captured");
                events.push(GameEvent::PieceCaptured { piece: other, by: piece });
            }
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("board", &self.board)
            .field("players", &self.players)
            .field("turn_order", &self.turn_order)
            .field("ranking", &self.ranking)
            .field("dice_value", &self.dice_value)
            .field("current_player", &self.current_player)
            .field("movable", &self.movable)
            .field("chosen_index", &self.chosen_index)
            .field("captured", &self.captured)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
