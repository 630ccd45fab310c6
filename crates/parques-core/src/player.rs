//! Players and how they pick which piece to move.
//!
//! A player is either a computer, which picks uniformly among the movable
//! pieces, or delegates the decision to a callback supplied by whatever is
//! driving the game (a terminal prompt, a test).

use crate::piece::{Color, Piece};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// What a player is asked when more than one piece can move
#[derive(Debug, Clone, Copy)]
pub struct ChoiceRequest<'a> {
    pub color: Color,
    pub name: &'a str,
    pub dice_value: u8,
    pub movable: &'a [Piece],
}

/// Callback deciding between movable pieces.
///
/// Returns an index into `movable`, or `None` to abandon the choice (for
/// example when the person at the keyboard quits).
pub type ChoiceDelegate = Box<dyn FnMut(&ChoiceRequest<'_>) -> Option<usize>>;

/// How a player chooses among several movable pieces
pub enum ChoiceStrategy {
    /// Uniformly random (computer player)
    Random(StdRng),
    /// Ask someone else
    Delegate(ChoiceDelegate),
}

impl fmt::Debug for ChoiceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceStrategy::Random(_) => f.write_str("Random"),
            ChoiceStrategy::Delegate(_) => f.write_str("Delegate"),
        }
    }
}

/// A seat at the table
#[derive(Debug)]
pub struct Player {
    color: Color,
    name: Option<String>,
    /// Pieces that have not finished, in slot order
    pieces: Vec<Piece>,
    strategy: ChoiceStrategy,
}

impl Player {
    /// A computer player with an entropy-seeded RNG
    pub fn computer(color: Color) -> Self {
        Self::with_strategy(color, None, ChoiceStrategy::Random(StdRng::from_entropy()))
    }

    /// A computer player whose choices repeat for a given seed
    pub fn computer_with_seed(color: Color, seed: u64) -> Self {
        Self::with_strategy(
            color,
            None,
            ChoiceStrategy::Random(StdRng::seed_from_u64(seed)),
        )
    }

    /// A computer player for a session seed.
    ///
    /// Each color draws from `seed + color index`, so seats in the same
    /// session do not mirror each other. Without a seed this is [`Player::computer`].
    pub fn computer_for_session(color: Color, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                Self::computer_with_seed(color, seed.wrapping_add(color.order_index() as u64))
            }
            None => Self::computer(color),
        }
    }

    /// A player whose choices come from `delegate`
    pub fn delegated<F>(color: Color, name: impl Into<String>, delegate: F) -> Self
    where
        F: FnMut(&ChoiceRequest<'_>) -> Option<usize> + 'static,
    {
        Self::with_strategy(
            color,
            Some(name.into()),
            ChoiceStrategy::Delegate(Box::new(delegate)),
        )
    }

    pub fn with_strategy(color: Color, name: Option<String>, strategy: ChoiceStrategy) -> Self {
        Self {
            color,
            name,
            pieces: color.pieces(),
            strategy,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Display name; unnamed computers are called "computer"
    pub fn name(&self) -> &str {
        match (&self.name, &self.strategy) {
            (Some(name), _) => name,
            (None, ChoiceStrategy::Random(_)) => "computer",
            (None, ChoiceStrategy::Delegate(_)) => "",
        }
    }

    /// The name as given at construction
    pub fn given_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_computer(&self) -> bool {
        matches!(self.strategy, ChoiceStrategy::Random(_))
    }

    /// Pieces still in play (including pooled ones)
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn has_finished(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Drop a piece that reached the end of its lane
    pub(crate) fn remove_piece(&mut self, piece: &Piece) {
        self.pieces.retain(|p| p != piece);
    }

    /// Pick one of `movable`.
    ///
    /// A single candidate is returned without consulting the strategy. The
    /// delegate's answer is passed through unchecked; the engine validates it.
    pub fn choose_piece(&mut self, dice_value: u8, movable: &[Piece]) -> Option<usize> {
        match movable.len() {
            0 => None,
            1 => Some(0),
            len => {
                let color = self.color;
                let name = match &self.name {
                    Some(name) => name.as_str(),
                    None => "computer",
                };
                match &mut self.strategy {
                    ChoiceStrategy::Random(rng) => Some(rng.gen_range(0..len)),
                    ChoiceStrategy::Delegate(delegate) => delegate(&ChoiceRequest {
                        color,
                        name,
                        dice_value,
                        movable,
                    }),
                }
            }
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.color)
    }
}
