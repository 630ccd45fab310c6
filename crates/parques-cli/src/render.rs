//! Plain-text rendering of the board and turn narration.

use parques_core::{GameEngine, Piece, PositionKind, LANE_LENGTH};

fn ids(pieces: &[Piece]) -> String {
    pieces
        .iter()
        .map(Piece::display_id)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Die face and the player who rolled it
pub fn dice_with_player(value: u8, player: &str) -> String {
    format!("[{}] {}", value, player)
}

/// The board, one line per area
pub fn board(game: &GameEngine) -> String {
    let snapshot = game.snapshot();
    let mut pool = Vec::new();
    let mut track = Vec::new();
    let mut lanes = Vec::new();

    for (position, pieces) in &snapshot {
        match position.kind() {
            PositionKind::Pool => pool.extend(pieces.iter().copied()),
            PositionKind::Track(square) => track.push(format!("{}:{}", square, ids(pieces))),
            PositionKind::Lane(step) => {
                for piece in pieces {
                    lanes.push(format!("{} {}/{}", piece, step, LANE_LENGTH));
                }
            }
            PositionKind::Finished => {}
        }
    }

    let home: Vec<Piece> = game
        .players()
        .iter()
        .flat_map(|player| {
            player
                .color()
                .pieces()
                .into_iter()
                .filter(move |piece| !player.pieces().contains(piece))
        })
        .collect();

    [
        format!("Pool:  {}", ids(&pool)),
        format!("Track: {}", track.join("  ")),
        format!("Lanes: {}", lanes.join("  ")),
        format!("Home:  {}", ids(&home)),
    ]
    .join("\n")
}

/// What happened in the last turn.
///
/// When the player just picked the piece themselves, the list of options
/// they were shown is not repeated.
pub fn turn_summary(game: &GameEngine, player_chose: bool) -> String {
    let (Some(value), Some(player)) = (game.dice_value(), game.current_player()) else {
        return String::new();
    };
    let mut message = dice_with_player(value, &player.to_string());
    message.push('\n');

    let Some(chosen) = game.chosen_piece() else {
        message.push_str("No piece can be moved.");
        return message;
    };

    if !player_chose {
        message.push_str(&format!("{} can be moved. ", ids(game.movable_pieces())));
    }
    message.push_str(&format!("{} has been moved.", chosen));
    if !game.captured_pieces().is_empty() {
        message.push_str(&format!(
            " Sent back to the pool: {}",
            ids(game.captured_pieces())
        ));
    }
    message
}

/// Final standings, best first
pub fn ranking(game: &GameEngine) -> String {
    let lines: Vec<String> = game
        .ranked_players()
        .iter()
        .enumerate()
        .map(|(i, player)| format!("{} - {}", i + 1, player))
        .collect();
    format!("Ranking:\n{}", lines.join("\n"))
}

/// Roster line shown when a game starts or resumes
pub fn players(game: &GameEngine) -> String {
    let verb = if game.dice_value().is_none() {
        "starting"
    } else {
        "continuing"
    };
    let mut text = format!("Game {} with {} players:", verb, game.turn_order().len());
    for color in game.turn_order() {
        if let Some(player) = game.player(color) {
            text.push('\n');
            text.push_str(&player.to_string());
        }
    }
    text
}
