//! Events produced by playing a turn.
//!
//! The engine's accessors describe where a turn left the game; the events
//! describe what happened during it, in order, for narration.

use crate::board::Position;
use crate::piece::{Color, Piece};
use serde::{Deserialize, Serialize};

/// Something that happened during a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The die was rolled (or a recorded value replayed)
    DiceRolled { player: Color, value: u8 },

    /// Nothing could move with this roll
    NoMovablePieces { player: Color },

    /// A pooled piece left the pool onto its start square
    PieceEntered { piece: Piece, to: Position },

    /// A piece moved along the track or within its lane
    PieceMoved {
        piece: Piece,
        from: Position,
        to: Position,
    },

    /// A piece turned off the shared track into its private lane
    PieceEnteredLane { piece: Piece, to: Position },

    /// A piece was sent back to the pool by an opponent
    PieceCaptured { piece: Piece, by: Piece },

    /// A piece reached the end of its lane
    PieceFinished { piece: Piece },

    /// A player has no pieces left; `rank` starts at 1
    PlayerFinished { player: Color, rank: usize },

    /// Only one player was left; the game is over
    GameFinished { ranking: Vec<Color> },
}
