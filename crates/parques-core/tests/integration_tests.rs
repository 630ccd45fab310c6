//! Integration tests for the Parqués game engine.
//!
//! These tests play complete games through the public API and check the
//! board invariants, turn sequencing and replay determinism along the way.

use parques_core::*;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

const MAX_TURNS: usize = 20_000;

fn computer_game(colors: &[Color], seed: u64) -> GameEngine {
    let mut game = GameEngine::with_seed(seed);
    for (i, color) in colors.iter().enumerate() {
        game.add_player(Player::computer_with_seed(*color, seed + i as u64))
            .unwrap();
    }
    game
}

/// Check that every piece is in exactly one well-formed state
fn assert_positions_well_formed(game: &GameEngine) {
    let geometry = game.board().geometry();
    for player in game.players() {
        for piece in player.color().pieces() {
            let position = game.board().position(&piece);
            match position.kind() {
                PositionKind::Pool => assert_eq!(position, Position::POOL),
                PositionKind::Track(square) => {
                    assert!((1..=TRACK_LENGTH).contains(&square), "{piece} at {position:?}");
                    assert_eq!(position.private, 0);
                }
                PositionKind::Lane(_) | PositionKind::Finished => {
                    assert_eq!(position.common, geometry.end(piece.color), "{piece}");
                    assert!(position.private <= LANE_LENGTH);
                }
            }
            let finished = position.kind() == PositionKind::Finished;
            assert_eq!(player.pieces().contains(&piece), !finished, "{piece}");
        }
    }
}

/// Play until the game ends, checking invariants after every turn
fn play_out(game: &mut GameEngine, record: &mut GameRecord) -> Vec<Snapshot> {
    let mut snapshots = Vec::new();
    let mut previous: HashMap<Piece, Position> = HashMap::new();

    for _ in 0..MAX_TURNS {
        if game.is_finished() {
            break;
        }
        game.play_turn(None, None).unwrap();
        record.record_turn(game);
        snapshots.push(game.snapshot());
        assert_positions_well_formed(game);

        for player in game.players() {
            for piece in player.color().pieces() {
                let now = game.board().position(&piece);
                if let Some(before) = previous.insert(piece, now) {
                    let sent_home = now == Position::POOL && before.private == 0;
                    assert!(
                        now.private >= before.private || sent_home,
                        "{piece} went from {before:?} to {now:?}"
                    );
                }
            }
        }
    }
    assert!(game.is_finished(), "game did not finish in {MAX_TURNS} turns");
    snapshots
}

#[test]
fn test_two_player_game_completes() {
    let mut game = computer_game(&[Color::Yellow, Color::Red], 11);
    let mut record = GameRecord::new();
    record.add_players(&game);
    play_out(&mut game, &mut record);

    assert_eq!(game.ranking().len(), 2);
    assert!(game.turn_order().len() == 1);
    assert_eq!(game.play_turn(None, None), Err(GameError::GameOver));
}

#[test]
fn test_four_player_game_ranks_everyone() {
    let mut game = computer_game(&Color::ALL, 5);
    let mut record = GameRecord::new();
    record.add_players(&game);
    play_out(&mut game, &mut record);

    let mut ranked = game.ranking().to_vec();
    ranked.sort();
    assert_eq!(ranked, Color::ALL.to_vec());

    // Everyone but the last-placed player has brought all pieces home.
    for color in &game.ranking()[..3] {
        assert!(game.player(*color).unwrap().has_finished());
    }
    let last = game.ranking()[3];
    assert!(!game.player(last).unwrap().has_finished());
}

#[test]
fn test_replay_reproduces_every_snapshot() {
    let mut game = computer_game(&[Color::Blue, Color::Green, Color::Red], 23);
    let mut record = GameRecord::new();
    record.add_players(&game);
    let original = play_out(&mut game, &mut record);
    assert_eq!(record.history.len(), original.len());

    // Round-trip the record through JSON as a saved game would.
    let mut saved = Vec::new();
    record.save(&mut saved).unwrap();
    let loaded = GameRecord::load(saved.as_slice()).unwrap();

    let mut replay = GameEngine::with_seed(999);
    loaded
        .register_players(&mut replay, None, |_| |_: &ChoiceRequest<'_>| None)
        .unwrap();
    let mut replayed = Vec::new();
    loaded
        .replay_with(&mut replay, |g| replayed.push(g.snapshot()))
        .unwrap();

    assert_eq!(replayed, original);
    assert_eq!(replay.ranking(), game.ranking());
    assert!(replay.is_finished());
}

#[test]
fn test_continue_from_partial_record() {
    let mut game = computer_game(&[Color::Yellow, Color::Blue], 3);
    let mut record = GameRecord::new();
    record.add_players(&game);
    for _ in 0..40 {
        game.play_turn(None, None).unwrap();
        record.record_turn(&game);
    }

    let mut resumed = GameEngine::with_seed(3);
    record
        .register_players(&mut resumed, None, |_| |_: &ChoiceRequest<'_>| None)
        .unwrap();
    record.replay_into(&mut resumed).unwrap();

    assert_eq!(resumed.snapshot(), game.snapshot());
    assert_eq!(resumed.turn_order(), game.turn_order());
    assert_eq!(resumed.dice_value(), game.dice_value());
    assert_eq!(resumed.turns_played(), 40);
}

#[test]
fn test_record_saved_to_disk() {
    let mut game = computer_game(&[Color::Red, Color::Green], 8);
    let mut record = GameRecord::new();
    record.add_players(&game);
    for _ in 0..10 {
        game.play_turn(None, None).unwrap();
        record.record_turn(&game);
    }

    let path = std::env::temp_dir().join(format!("parques-record-{}.json", std::process::id()));
    record.save_to_path(&path).unwrap();
    let loaded = GameRecord::load_from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn test_six_then_three_keeps_player() {
    let mut game = computer_game(&[Color::Yellow, Color::Blue], 1);
    game.play_turn(None, Some(6)).unwrap();
    let first = game.current_player().unwrap().color();
    game.play_turn(None, Some(3)).unwrap();
    assert_eq!(game.current_player().unwrap().color(), first);
}

#[test]
fn test_five_then_three_rotates() {
    let mut game = computer_game(&[Color::Yellow, Color::Blue], 1);
    game.play_turn(None, Some(5)).unwrap();
    assert_eq!(game.current_player().unwrap().color(), Color::Blue);
    game.play_turn(None, Some(3)).unwrap();
    assert_eq!(game.current_player().unwrap().color(), Color::Yellow);
}

#[test]
fn test_pool_exit_then_walk_and_capture() {
    // Blue acts first (second registered), then yellow.
    let mut game = GameEngine::with_dice(LoadedDice::new(vec![1]));
    game.add_player(Player::computer(Color::Yellow)).unwrap();
    game.add_player(Player::computer(Color::Blue)).unwrap();

    // Blue: six brings B1 to 15, the repeat turn walks it to 16.
    game.play_turn(None, Some(6)).unwrap();
    assert_eq!(game.movable_pieces(), &[Piece::new(Color::Blue, 1)]);
    game.play_turn(None, Some(1)).unwrap();
    assert_eq!(
        game.board().position(&Piece::new(Color::Blue, 1)),
        Position::new(16, 0)
    );

    // Yellow: six brings Y1 to 1, then 6+6+3 walks it to 16 and captures.
    game.play_turn(None, Some(6)).unwrap();
    assert_eq!(game.current_player().unwrap().color(), Color::Yellow);
    game.play_turn(Some(1), Some(6)).unwrap();
    game.play_turn(Some(1), Some(6)).unwrap();
    assert_eq!(
        game.board().position(&Piece::new(Color::Yellow, 1)),
        Position::new(13, 0)
    );
    let events = game.play_turn(None, Some(3)).unwrap();

    assert!(game.board().is_in_pool(&Piece::new(Color::Blue, 1)));
    assert_eq!(game.captured_pieces(), &[Piece::new(Color::Blue, 1)]);
    assert!(events.contains(&GameEvent::PieceCaptured {
        piece: Piece::new(Color::Blue, 1),
        by: Piece::new(Color::Yellow, 1),
    }));
}

#[test]
fn test_snapshot_groups_pool() {
    let game = computer_game(&[Color::Green, Color::Red], 2);
    let snapshot = game.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[&Position::POOL].len(), 8);
}
