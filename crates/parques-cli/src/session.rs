//! Interactive sessions: start a new game, continue a saved one or watch a
//! recorded one.

use crate::config::CliConfig;
use crate::prompt::{PromptError, Prompter};
use crate::render;
use anyhow::Context;
use parques_core::{ChoiceRequest, Color, GameEngine, GameError, GameRecord, Player};
use std::cell::{Cell, RefCell};
use std::io::{BufRead, Write};
use std::ops::RangeInclusive;
use std::rc::Rc;
use tracing::{info, warn};

const MAX_PLAYERS: usize = 4;

const NAME_LENGTH: RangeInclusive<usize> = 2..=29;

/// Prompter shared between the session and the human players' delegates
pub type SharedPrompter<R, W> = Rc<RefCell<Prompter<R, W>>>;

/// Whether `err` means the person at the keyboard left mid-game
fn is_interrupt(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<PromptError>(), Some(PromptError::Eof))
        || matches!(
            err.downcast_ref::<GameError>(),
            Some(GameError::ChoiceAborted)
        )
}

/// Choice delegate that asks at the terminal
fn human_delegate<R, W>(
    io: SharedPrompter<R, W>,
    player_chose: Rc<Cell<bool>>,
) -> impl FnMut(&ChoiceRequest<'_>) -> Option<usize> + 'static
where
    R: BufRead + 'static,
    W: Write + 'static,
{
    move |request: &ChoiceRequest<'_>| {
        let who = format!("{}({})", request.name, request.color);
        let options: Vec<String> = request
            .movable
            .iter()
            .enumerate()
            .map(|(i, piece)| format!("{} - {}", i + 1, piece))
            .collect();
        let message = format!(
            "{}\nYou have more than one piece that can move. Choose one:\n{}",
            render::dice_with_player(request.dice_value, &who),
            options.join("\n")
        );

        let answer = io.borrow_mut().choose(&message, 1..=request.movable.len());
        match answer {
            Ok(choice) => {
                player_chose.set(true);
                Some(choice - 1)
            }
            Err(err) => {
                warn!(%err, color = %request.color, "piece choice abandoned");
                None
            }
        }
    }
}

/// One run of the terminal client
pub struct Session<R, W> {
    io: SharedPrompter<R, W>,
    config: CliConfig,
    game: GameEngine,
    record: GameRecord,
    /// Set when a human picked a piece during the current turn
    player_chose: Rc<Cell<bool>>,
}

impl<R, W> Session<R, W>
where
    R: BufRead + 'static,
    W: Write + 'static,
{
    pub fn new(io: SharedPrompter<R, W>, config: CliConfig) -> Self {
        let game = match config.seed {
            Some(seed) => GameEngine::with_seed(seed),
            None => GameEngine::new(),
        };
        Self::with_game(io, config, game)
    }

    /// A session around an existing, empty game
    pub fn with_game(io: SharedPrompter<R, W>, config: CliConfig, game: GameEngine) -> Self {
        Self {
            io,
            config,
            game,
            record: GameRecord::new(),
            player_chose: Rc::new(Cell::new(false)),
        }
    }

    pub fn game(&self) -> &GameEngine {
        &self.game
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    // ==================== Prompt helpers ====================

    fn say(&self, text: &str) -> Result<(), PromptError> {
        self.io.borrow_mut().say(text)
    }

    fn choose(&self, message: &str, allowed: RangeInclusive<usize>) -> Result<usize, PromptError> {
        self.io.borrow_mut().choose(message, allowed)
    }

    fn text(&self, message: &str, length: RangeInclusive<usize>) -> Result<String, PromptError> {
        self.io.borrow_mut().text(message, length)
    }

    fn confirm(&self, question: &str) -> Result<bool, PromptError> {
        self.io.borrow_mut().confirm(question)
    }

    fn pause(&self) -> Result<(), PromptError> {
        if self.config.pause {
            self.io.borrow_mut().pause()?;
        }
        Ok(())
    }

    // ==================== Entry point ====================

    /// Show the main menu and run the chosen mode
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.say("")?;
        match self.start() {
            Err(err) if is_interrupt(&err) => {
                info!("player left the game");
                // The output may be gone as well; nothing more to do then.
                let _ = self.say("\nLeaving the game.");
                Ok(())
            }
            result => result,
        }
    }

    fn start(&mut self) -> anyhow::Result<()> {
        let menu = "Choose an option:\n\
                    0 - Start a new game\n\
                    1 - Continue a saved game\n\
                    2 - Watch a recorded game";
        let option = self.choose(menu, 0..=2)?;
        match option {
            0 => {
                self.add_players()?;
                self.say(&render::players(&self.game))?;
                self.record.add_players(&self.game);
                self.play()
            }
            1 => {
                self.continue_game()?;
                if self.game.is_finished() {
                    self.say("Cannot continue. The game has already finished.\nLeaving")?;
                    Ok(())
                } else {
                    self.pause()?;
                    self.play()
                }
            }
            _ => self.watch_game(),
        }
    }

    // ==================== New game ====================

    fn add_players(&mut self) -> anyhow::Result<()> {
        for i in 0..2 {
            self.say(&format!("Adding player {}...", i + 1))?;
            self.add_player()?;
            self.say("Player added.")?;
        }

        for i in 2..MAX_PLAYERS {
            let menu = format!(
                "Choose an option:\n0 - Add another player\n1 - Start the game with {} players",
                i
            );
            if self.choose(&menu, 0..=1)? == 1 {
                break;
            }
            self.say(&format!("Adding player {}...", i + 1))?;
            self.add_player()?;
            self.say("Player added.")?;
        }
        Ok(())
    }

    fn add_player(&mut self) -> anyhow::Result<()> {
        let mut colors = self.game.available_colors();
        let kind = self.choose("Choose the player type:\n0 - Computer\n1 - Human", 0..=1)?;

        let player = if kind == 1 {
            let name = self.text("Enter the player's name:", NAME_LENGTH)?;
            let color = if colors.len() > 1 {
                let options: Vec<String> = colors
                    .iter()
                    .enumerate()
                    .map(|(i, color)| format!("{} - {}", i, color))
                    .collect();
                let message = format!("Choose a color:\n{}", options.join("\n"));
                let index = self.choose(&message, 0..=colors.len() - 1)?;
                colors.remove(index)
            } else {
                colors.pop().context("no colors left")?
            };
            let delegate = human_delegate(Rc::clone(&self.io), Rc::clone(&self.player_chose));
            Player::delegated(color, name, delegate)
        } else {
            let color = colors.pop().context("no colors left")?;
            self.computer(color)
        };

        info!(player = %player, "player joined");
        self.game.add_player(player)?;
        Ok(())
    }

    fn computer(&self, color: Color) -> Player {
        Player::computer_for_session(color, self.config.seed)
    }

    // ==================== Playing ====================

    fn play(&mut self) -> anyhow::Result<()> {
        match self.play_turns() {
            Ok(()) => {
                self.say("Game over")?;
                self.say(&render::ranking(&self.game))?;
                self.offer_save()
            }
            Err(err) if is_interrupt(&err) => {
                warn!(turns = self.record.history.len(), "game interrupted");
                self.say("\nLeaving the game. Save and continue later?")?;
                self.offer_save()?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn play_turns(&mut self) -> anyhow::Result<()> {
        while !self.game.is_finished() {
            self.player_chose.set(false);
            self.game.play_turn(None, None)?;
            self.record.record_turn(&self.game);
            self.say(&render::turn_summary(&self.game, self.player_chose.get()))?;
            self.say(&render::board(&self.game))?;
            self.pause()?;
        }
        Ok(())
    }

    fn offer_save(&mut self) -> anyhow::Result<()> {
        if !self.confirm("Do you want to save the game?")? {
            return Ok(());
        }
        loop {
            let path = self.text("Enter the record file name:", 1..=usize::MAX)?;
            match self.record.save_to_path(&path) {
                Ok(()) => {
                    info!(%path, turns = self.record.history.len(), "game saved");
                    self.say("Game saved")?;
                    return Ok(());
                }
                Err(err) => {
                    warn!(%path, %err, "could not save game");
                    self.say(&format!("{}\nTry again.", err))?;
                }
            }
        }
    }

    // ==================== Saved games ====================

    fn load_record(&mut self) -> anyhow::Result<GameRecord> {
        loop {
            let path = self.text("Enter the record file name:", 1..=usize::MAX)?;
            match GameRecord::load_from_path(&path) {
                Ok(record) => {
                    info!(%path, turns = record.history.len(), "game record loaded");
                    return Ok(record);
                }
                Err(err) => {
                    warn!(%path, %err, "could not load game record");
                    self.say(&format!("{}\nTry again.", err))?;
                }
            }
        }
    }

    fn register_players(&mut self, loaded: &GameRecord) -> anyhow::Result<()> {
        let io = Rc::clone(&self.io);
        let player_chose = Rc::clone(&self.player_chose);
        loaded.register_players(&mut self.game, self.config.seed, |_| {
            human_delegate(Rc::clone(&io), Rc::clone(&player_chose))
        })?;
        Ok(())
    }

    /// Replay a saved game up to where it stopped, recording it again
    fn continue_game(&mut self) -> anyhow::Result<()> {
        let loaded = self.load_record()?;
        self.register_players(&loaded)?;
        self.record.roster = loaded.roster.clone();

        let record = &mut self.record;
        loaded.replay_with(&mut self.game, |game| record.record_turn(game))?;

        self.say(&render::players(&self.game))?;
        self.say(&render::turn_summary(&self.game, false))?;
        self.say(&render::board(&self.game))?;
        Ok(())
    }

    /// Step through a recorded game turn by turn
    fn watch_game(&mut self) -> anyhow::Result<()> {
        let loaded = self.load_record()?;
        self.register_players(&loaded)?;
        self.say(&render::players(&self.game))?;
        self.pause()?;

        for turn in &loaded.history {
            self.game.play_turn(turn.choice(), Some(turn.dice_value))?;
            self.say(&render::turn_summary(&self.game, false))?;
            self.say(&render::board(&self.game))?;
            self.pause()?;
        }
        if self.game.is_finished() {
            self.say(&render::ranking(&self.game))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parques_core::{LoadedDice, Piece, Position};
    use std::io::Cursor;
    use std::path::PathBuf;

    type TestSession = Session<Cursor<Vec<u8>>, Vec<u8>>;

    fn session(input: &str, config: CliConfig) -> TestSession {
        let io = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        Session::new(Rc::new(RefCell::new(io)), config)
    }

    fn output(session: &TestSession) -> String {
        String::from_utf8(session.io.borrow().output().clone()).unwrap()
    }

    fn unattended() -> CliConfig {
        CliConfig {
            seed: Some(7),
            pause: false,
        }
    }

    fn temp_record(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("parques-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_leaves_on_closed_input() {
        let mut s = session("", unattended());
        s.run().unwrap();
        assert!(output(&s).contains("Leaving the game."));
    }

    #[test]
    fn test_computer_game_runs_to_the_end() {
        // New game, two computers, start, then decline to save.
        let mut s = session("0\n0\n0\n1\n0\n", unattended());
        s.run().unwrap();

        let out = output(&s);
        assert!(out.contains("Game starting with 2 players:"), "{out}");
        assert!(out.contains("Game over"));
        assert!(out.contains("Ranking:\n1 - computer("));
        assert!(s.game().is_finished());
        assert_eq!(s.record().roster.len(), 2);
        assert_eq!(s.record().history.len() as u32, s.game().turns_played());
    }

    #[test]
    fn test_saved_game_can_be_watched_and_not_continued() {
        let path = temp_record("watch");
        let path_str = path.to_string_lossy().to_string();

        let mut s = session(&format!("0\n0\n0\n1\n1\n{}\n", path_str), unattended());
        s.run().unwrap();
        assert!(output(&s).contains("Game saved"));
        let ranking = s.game().ranking().to_vec();

        let mut watcher = session(&format!("2\n{}\n", path_str), unattended());
        watcher.run().unwrap();
        assert_eq!(watcher.game().ranking(), ranking.as_slice());
        assert!(output(&watcher).contains("Ranking:"));

        let mut resumer = session(&format!("1\n{}\n", path_str), unattended());
        resumer.run().unwrap();
        assert!(output(&resumer).contains("Cannot continue"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_record_asks_again() {
        let missing = temp_record("missing");
        let mut s = session(&format!("2\n{}\n", missing.display()), unattended());
        s.run().unwrap();
        let out = output(&s);
        assert!(out.contains("Try again."), "{out}");
        assert!(out.contains("Leaving the game."));
    }

    #[test]
    fn test_seeded_continue_is_reproducible() {
        let mut game = GameEngine::with_seed(21);
        game.add_player(Player::computer_with_seed(Color::Blue, 1))
            .unwrap();
        game.add_player(Player::computer_with_seed(Color::Red, 2))
            .unwrap();
        game.add_player(Player::computer_with_seed(Color::Green, 3))
            .unwrap();
        let mut record = GameRecord::new();
        record.add_players(&game);
        for _ in 0..30 {
            game.play_turn(None, None).unwrap();
            record.record_turn(&game);
        }
        let path = temp_record("continue");
        record.save_to_path(&path).unwrap();

        let input = format!("1\n{}\n", path.display());
        let mut first = session(&input, unattended());
        first.run().unwrap();
        let mut second = session(&input, unattended());
        second.run().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(first.game().is_finished());
        assert!(first.record().history.len() > 30);
        assert_eq!(first.record().history, second.record().history);
        assert_eq!(first.game().ranking(), second.game().ranking());
    }

    #[test]
    fn test_human_choice_and_interrupt() {
        // Menu, human "Ana" as yellow (last of blue/green/red/yellow),
        // computer (takes red), start.
        // Then: pause, pause, choose the second piece, pause, and input ends.
        let input = "0\n1\nAna\n3\n0\n1\n\n\n2\n\n";
        let io = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let config = CliConfig {
            seed: None,
            pause: true,
        };
        let game = GameEngine::with_dice(LoadedDice::new(vec![5, 6, 6]));
        let mut s = Session::with_game(Rc::new(RefCell::new(io)), config, game);
        s.run().unwrap();

        let out = output(&s);
        assert!(out.contains("You have more than one piece that can move"), "{out}");
        assert!(out.contains("Leaving the game. Save and continue later?"));
        assert_eq!(
            s.game().board().position(&Piece::new(Color::Yellow, 1)),
            Position::new(12, 0)
        );
        let indices: Vec<i32> = s.record().history.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![-1, 0, 1, 0]);
    }
}
