//! Piece positions and movement arithmetic.
//!
//! The board only knows where pieces are and how a roll moves them. Turn
//! order, pool exits and captures are decided by [`crate::game`].

use crate::geometry::Geometry;
use crate::piece::Piece;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Where a piece stands, as a `(common, private)` pair.
///
/// `(0, 0)` is the pool. On the shared track `private` is 0; once the piece
/// turns into its lane `common` is pinned to the color's end boundary and
/// `private` counts lane squares, reaching [`Geometry::lane_length`] when the
/// piece finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub common: u8,
    pub private: u8,
}

impl Position {
    /// The pool, for pieces not yet in play
    pub const POOL: Position = Position {
        common: 0,
        private: 0,
    };

    pub fn new(common: u8, private: u8) -> Self {
        Self { common, private }
    }

    /// Classify this position
    pub fn kind(&self) -> PositionKind {
        let lane_length = Geometry::standard().lane_length();
        if *self == Position::POOL {
            PositionKind::Pool
        } else if self.private == 0 {
            PositionKind::Track(self.common)
        } else if self.private < lane_length {
            PositionKind::Lane(self.private)
        } else {
            PositionKind::Finished
        }
    }
}

/// The four states a piece can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionKind {
    Pool,
    /// On the shared track at the given square
    Track(u8),
    /// In the private lane at the given lane square
    Lane(u8),
    Finished,
}

/// Occupied positions mapped to the pieces standing there
pub type Snapshot = BTreeMap<Position, Vec<Piece>>;

/// Holds the position of every piece in play.
#[derive(Debug, Clone)]
pub struct Board {
    geometry: &'static Geometry,
    positions: HashMap<Piece, Position>,
}

impl Board {
    /// Create an empty board over the standard geometry
    pub fn new() -> Self {
        Self {
            geometry: Geometry::standard(),
            positions: HashMap::new(),
        }
    }

    pub fn geometry(&self) -> &'static Geometry {
        self.geometry
    }

    /// Current position of a piece; pieces never placed read as pooled
    pub fn position(&self, piece: &Piece) -> Position {
        self.positions.get(piece).copied().unwrap_or(Position::POOL)
    }

    pub(crate) fn place(&mut self, piece: Piece, position: Position) {
        self.positions.insert(piece, position);
    }

    pub fn put_in_pool(&mut self, piece: Piece) {
        self.place(piece, Position::POOL);
    }

    /// Put a piece on its color's start square
    pub fn put_at_start(&mut self, piece: Piece) {
        let start = self.geometry.start(piece.color);
        self.place(piece, Position::new(start, 0));
    }

    pub fn is_in_pool(&self, piece: &Piece) -> bool {
        self.position(piece) == Position::POOL
    }

    /// Whether `roll` keeps the piece inside its lane.
    ///
    /// Only restrictive once the piece is in its lane, since `private` is 0
    /// everywhere on the shared track.
    pub fn can_move(&self, piece: &Piece, roll: u8) -> bool {
        self.position(piece).private + roll <= self.geometry.lane_length()
    }

    /// Advance a piece by `roll` squares and return its new position.
    ///
    /// Callers check [`Board::can_move`] first; pooled pieces are never moved
    /// through here.
    pub fn move_piece(&mut self, piece: Piece, roll: u8) -> Position {
        let Position {
            mut common,
            mut private,
        } = self.position(&piece);
        let end = self.geometry.end(piece.color);

        if private > 0 {
            private += roll;
        } else if common <= end && common + roll > end {
            private = roll - (end - common);
            common = end;
        } else {
            common += roll;
            if common > self.geometry.track_length() {
                common -= self.geometry.track_length();
            }
        }

        let position = Position::new(common, private);
        self.place(piece, position);
        position
    }

    pub fn has_finished(&self, piece: &Piece) -> bool {
        self.position(piece).private == self.geometry.lane_length()
    }

    /// All pieces at the same position as `piece`, itself included
    pub fn pieces_sharing_position(&self, piece: &Piece) -> Vec<Piece> {
        let position = self.position(piece);
        let mut pieces: Vec<Piece> = self
            .positions
            .iter()
            .filter(|(_, p)| **p == position)
            .map(|(piece, _)| *piece)
            .collect();
        pieces.sort();
        pieces
    }

    /// Positions of every piece that has not finished, grouped by square
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for (piece, position) in &self.positions {
            if position.private != self.geometry.lane_length() {
                snapshot.entry(*position).or_default().push(*piece);
            }
        }
        for pieces in snapshot.values_mut() {
            pieces.sort();
        }
        snapshot
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
