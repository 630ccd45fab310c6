//! Parqués - a four-color cross-and-circle race game engine
//!
//! This crate provides the rules of the game:
//! - Fixed board geometry shared by every board
//! - Board positions and movement arithmetic (track wraparound, private lanes)
//! - Players and their piece-choice strategies
//! - The turn state machine: repeat turns on a six, pool exits, captures,
//!   completion and ranking
//! - Game records for saving, continuing and replaying games
//!
//! # Modules
//!
//! - [`piece`]: Colors and piece identities
//! - [`geometry`]: Start squares and end boundaries per color
//! - [`board`]: Piece positions and moves
//! - [`dice`]: The die and the `DiceSource` seam
//! - [`player`]: Players and choice strategies
//! - [`events`]: What happened during a turn
//! - [`game`]: The game engine
//! - [`record`]: Roster and turn history persistence

pub mod board;
pub mod dice;
pub mod events;
pub mod game;
pub mod geometry;
pub mod piece;
pub mod player;
pub mod record;

// Re-export commonly used types
pub use board::{Board, Position, PositionKind, Snapshot};
pub use dice::{Dice, DiceSource, LoadedDice, MAX_ROLL, MIN_ROLL};
pub use events::GameEvent;
pub use game::{GameEngine, GameError, NO_MOVE_INDEX};
pub use geometry::{Geometry, LANE_LENGTH, TRACK_LENGTH};
pub use piece::{Color, Piece, PIECES_PER_COLOR};
pub use player::{ChoiceDelegate, ChoiceRequest, ChoiceStrategy, Player};
pub use record::{GameRecord, RecordError, RosterEntry, TurnRecord};
