//! Saving and replaying games.
//!
//! A [`GameRecord`] holds the roster and, for every turn played, the die
//! value and the index chosen from that turn's movable pieces. Because the
//! movable list is rebuilt the same way on replay, those two numbers are all
//! that is needed to reproduce a game exactly.

use crate::game::{GameEngine, GameError, NO_MOVE_INDEX};
use crate::piece::Color;
use crate::player::{ChoiceRequest, Player};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors from loading, saving or replaying a record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed game record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Replay failed at turn {turn}: {source}")]
    Replay { turn: usize, source: GameError },

    #[error(transparent)]
    Game(#[from] GameError),
}

/// One seat of the saved roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub color: Color,
    pub name: Option<String>,
    pub is_computer: bool,
}

/// One recorded turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub dice_value: u8,
    /// Index into the turn's movable pieces, or -1 when nothing could move
    pub index: i32,
}

impl TurnRecord {
    pub fn new(dice_value: u8, index: Option<usize>) -> Self {
        Self {
            dice_value,
            index: index.map_or(NO_MOVE_INDEX, |i| i as i32),
        }
    }

    /// The index as passed to [`GameEngine::play_turn`]
    pub fn choice(&self) -> Option<usize> {
        usize::try_from(self.index).ok()
    }
}

/// Roster plus turn history of one game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub roster: Vec<RosterEntry>,
    pub history: Vec<TurnRecord>,
}

impl GameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a player's seat; call in registration order
    pub fn add_player(&mut self, player: &Player) {
        self.roster.push(RosterEntry {
            color: player.color(),
            name: player.given_name().map(str::to_owned),
            is_computer: player.is_computer(),
        });
    }

    /// Remember every player registered with `game`
    pub fn add_players(&mut self, game: &GameEngine) {
        for player in game.players() {
            self.add_player(player);
        }
    }

    pub fn add_turn(&mut self, dice_value: u8, index: Option<usize>) {
        self.history.push(TurnRecord::new(dice_value, index));
    }

    /// Remember the turn `game` just played
    pub fn record_turn(&mut self, game: &GameEngine) {
        if let Some(dice_value) = game.dice_value() {
            self.add_turn(dice_value, game.chosen_index());
        }
    }

    /// Rebuild the roster's players in order.
    ///
    /// Computer seats choose randomly, seeded from `seed` when one is given;
    /// every other seat gets a delegate from `make_delegate`.
    pub fn players<F, D>(&self, seed: Option<u64>, mut make_delegate: F) -> Vec<Player>
    where
        F: FnMut(&RosterEntry) -> D,
        D: FnMut(&ChoiceRequest<'_>) -> Option<usize> + 'static,
    {
        self.roster
            .iter()
            .map(|entry| {
                if entry.is_computer {
                    Player::computer_for_session(entry.color, seed)
                } else {
                    let name = entry.name.clone().unwrap_or_default();
                    Player::delegated(entry.color, name, make_delegate(entry))
                }
            })
            .collect()
    }

    /// Register the roster's players with `game`
    pub fn register_players<F, D>(
        &self,
        game: &mut GameEngine,
        seed: Option<u64>,
        make_delegate: F,
    ) -> Result<(), RecordError>
    where
        F: FnMut(&RosterEntry) -> D,
        D: FnMut(&ChoiceRequest<'_>) -> Option<usize> + 'static,
    {
        for player in self.players(seed, make_delegate) {
            game.add_player(player)?;
        }
        Ok(())
    }

    /// Play every recorded turn on `game`, calling `after_turn` after each
    pub fn replay_with<F>(
        &self,
        game: &mut GameEngine,
        mut after_turn: F,
    ) -> Result<(), RecordError>
    where
        F: FnMut(&GameEngine),
    {
        for (turn, record) in self.history.iter().enumerate() {
            game.play_turn(record.choice(), Some(record.dice_value))
                .map_err(|source| RecordError::Replay { turn, source })?;
            after_turn(game);
        }
        debug!(turns = self.history.len(), "record replayed");
        Ok(())
    }

    pub fn replay_into(&self, game: &mut GameEngine) -> Result<(), RecordError> {
        self.replay_with(game, |_| {})
    }

    pub fn save<W: Write>(&self, writer: W) -> Result<(), RecordError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load<R: Read>(reader: R) -> Result<Self, RecordError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        Self::load(BufReader::new(File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> GameRecord {
        GameRecord {
            roster: vec![
                RosterEntry {
                    color: Color::Blue,
                    name: Some("Ana".to_string()),
                    is_computer: false,
                },
                RosterEntry {
                    color: Color::Red,
                    name: None,
                    is_computer: true,
                },
            ],
            history: vec![TurnRecord::new(6, Some(0)), TurnRecord::new(2, None)],
        }
    }

    #[test]
    fn test_turn_record_index() {
        assert_eq!(TurnRecord::new(3, None).index, -1);
        assert_eq!(TurnRecord::new(3, None).choice(), None);
        assert_eq!(TurnRecord::new(6, Some(2)).choice(), Some(2));
    }

    #[test]
    fn test_json_format() {
        let mut buffer = Vec::new();
        sample().save(&mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["roster"][0]["color"], "blue");
        assert_eq!(json["roster"][1]["name"], serde_json::Value::Null);
        assert_eq!(json["history"][1]["index"], -1);

        let loaded = GameRecord::load(buffer.as_slice()).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_malformed_record() {
        let err = GameRecord::load("{\"roster\": 3}".as_bytes()).unwrap_err();
        assert!(matches!(err, RecordError::Json(_)));
    }

    #[test]
    fn test_players_follow_roster() {
        let players = sample().players(None, |_| |_: &ChoiceRequest<'_>| Some(0));
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].color(), Color::Blue);
        assert_eq!(players[0].name(), "Ana");
        assert!(!players[0].is_computer());
        assert!(players[1].is_computer());
    }

    #[test]
    fn test_roster_from_game() {
        let mut game = GameEngine::with_seed(4);
        game.add_player(Player::delegated(Color::Blue, "Ana", |_| Some(0)))
            .unwrap();
        game.add_player(Player::computer(Color::Red)).unwrap();

        let mut record = GameRecord::new();
        record.add_players(&game);
        assert_eq!(record.roster, sample().roster);
    }

    #[test]
    fn test_replay_reports_failing_turn() {
        let mut record = sample();
        record.history.push(TurnRecord {
            dice_value: 9,
            index: -1,
        });
        let mut game = GameEngine::new();
        record
            .register_players(&mut game, None, |_| |_: &ChoiceRequest<'_>| Some(0))
            .unwrap();
        let err = record.replay_into(&mut game).unwrap_err();
        assert!(matches!(
            err,
            RecordError::Replay {
                turn: 2,
                source: GameError::InvalidDiceValue(9)
            }
        ));
    }
}
