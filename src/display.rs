//! Shared display utilities for rendering Azul game state in the terminal
//!
//! Provides colorized, human-readable output for boards, factories, drafts and
//! round results.

use azul_engine::{
    Destination, Draft, DraftOutcome, DraftSource, GameEngine, PlayerIdx, RoundSummary, Tile,
    TileColor, WALL_PATTERN, WALL_SIZE,
};

// ANSI color codes for tile display
pub const BLUE: &str = "\x1b[94m";
pub const WHITE: &str = "\x1b[97m";
pub const RED: &str = "\x1b[91m";
pub const BLACK: &str = "\x1b[90m";
pub const YELLOW: &str = "\x1b[93m";
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub fn color_code(color: TileColor) -> &'static str {
    match color {
        TileColor::Blue => BLUE,
        TileColor::White => WHITE,
        TileColor::Red => RED,
        TileColor::Black => BLACK,
        TileColor::Yellow => YELLOW,
    }
}

pub fn display_tile(color: TileColor) -> String {
    format!("{}{}{}", color_code(color), color.symbol(), RESET)
}

pub fn display_token(token: Tile) -> String {
    match token {
        Tile::Colored(c) => display_tile(c),
        Tile::FirstPlayerMarker => format!("{BOLD}1{RESET}"),
    }
}

/// Format a draft for display
pub fn format_draft(draft: &Draft) -> String {
    let source = match draft.source {
        DraftSource::Factory(f) => format!("F{}", f),
        DraftSource::Center => "Center".to_string(),
    };
    let dest = match draft.dest {
        Destination::PatternLine(r) => format!("Line {}", r + 1),
        Destination::Floor => "Floor".to_string(),
    };
    format!("{} {} -> {}", source, display_tile(draft.color), dest)
}

/// One-line description of what a draft did
pub fn format_outcome(outcome: &DraftOutcome) -> String {
    let mut parts = vec![format!("took {}", outcome.taken)];
    if outcome.to_line > 0 {
        parts.push(format!("{} to line", outcome.to_line));
    }
    if outcome.to_floor > 0 {
        parts.push(format!("{} to floor", outcome.to_floor));
    }
    if outcome.discarded > 0 {
        parts.push(format!("{} discarded", outcome.discarded));
    }
    if outcome.took_marker {
        parts.push("first-player marker".to_string());
    }
    parts.join(", ")
}

/// Display the full game board with all player information
///
/// If `highlight_player` is Some, that player's board will be shown with emphasis.
pub fn display_board(engine: &GameEngine, highlight_player: Option<PlayerIdx>) {
    let current = engine.current_player();
    let current_name = engine.player(current).map_or("?", |p| p.name());

    println!("\n{BOLD}══════════════════════════════════════════════════════════════{RESET}");
    println!(
        "{BOLD}  Round {}{RESET}   |   Current Player: {} ({})   |   Bag: {}",
        engine.round(),
        current,
        current_name,
        engine.bag().len()
    );
    println!("{BOLD}══════════════════════════════════════════════════════════════{RESET}\n");

    // Factories
    println!("{BOLD}FACTORIES:{RESET}");
    for (f, factory) in engine.factories().iter().enumerate() {
        print!("  F{}: ", f);
        if factory.is_empty() {
            print!("{DIM}(empty){RESET}");
        } else {
            for &color in factory.tiles() {
                print!("{} ", display_tile(color));
            }
        }
        println!();
    }

    // Center
    print!("\n{BOLD}CENTER:{RESET} ");
    if engine.center().items().is_empty() {
        print!("{DIM}(empty){RESET}");
    } else {
        for &token in engine.center().items() {
            print!("{} ", display_token(token));
        }
    }
    println!("\n");

    // Player boards
    for (p, player) in engine.players().iter().enumerate() {
        let style = if highlight_player == Some(p) { BOLD } else { DIM };
        println!(
            "{style}PLAYER {} {} (Score: {}){RESET}",
            p,
            player.name(),
            player.score()
        );
        println!("  Pattern Lines          Wall");

        for (row, line) in player.pattern_lines().iter().enumerate() {
            print!("  ");
            // Leading spaces for alignment
            for _ in 0..(WALL_SIZE - line.capacity()) {
                print!("  ");
            }
            // Empty slots
            for _ in 0..line.remaining() {
                print!("{DIM}.{RESET} ");
            }
            // Filled slots
            if let Some(color) = line.color() {
                for _ in 0..line.len() {
                    print!("{} ", display_tile(color));
                }
            }

            print!(" -> ");

            for col in 0..WALL_SIZE {
                match player.wall().tile_at(row, col) {
                    Some(color) => print!("{} ", display_tile(color)),
                    // Show expected color dimmed
                    None => print!("{DIM}{}{RESET} ", WALL_PATTERN[row][col].symbol()),
                }
            }
            println!();
        }

        print!("  Floor: ");
        if player.floor().is_empty() {
            print!("{DIM}(empty){RESET}");
        } else {
            for &token in player.floor().tiles() {
                print!("{} ", display_token(token));
            }
            print!(" {DIM}({}){RESET}", player.floor().penalty());
        }
        println!("\n");
    }
}

/// Print the wall-tiling results of a finished round
pub fn display_round_summary(engine: &GameEngine, summary: &RoundSummary) {
    println!("\n{BOLD}── End of round {} ──{RESET}", summary.round);
    for (p, score) in summary.players.iter().enumerate() {
        let name = engine.player(p).map_or("?", |pl| pl.name());
        let placed: Vec<String> = score
            .placements
            .iter()
            .map(|w| format!("{} row {} +{}", display_tile(w.color), w.row + 1, w.points))
            .collect();
        println!(
            "  {}: [{}] floor {} => {}",
            name,
            placed.join(", "),
            score.floor_penalty,
            score.score
        );
    }

    if let Some(bonuses) = &summary.final_bonus {
        println!("\n{BOLD}End-game bonuses:{RESET}");
        for (p, bonus) in bonuses.iter().enumerate() {
            let name = engine.player(p).map_or("?", |pl| pl.name());
            println!(
                "  {}: {} rows, {} columns, {} colors => +{}",
                name,
                bonus.rows,
                bonus.columns,
                bonus.colors,
                bonus.total()
            );
        }
    }
}

/// Print final scores and the winner(s)
pub fn display_final_scores(engine: &GameEngine) {
    println!("\n{BOLD}═══════════════════════════════════════{RESET}");
    println!("{BOLD}                GAME OVER{RESET}");
    println!("{BOLD}═══════════════════════════════════════{RESET}");
    for player in engine.players() {
        println!(
            "  {:<16} {:>4}  ({} rows)",
            player.name(),
            player.score(),
            player.wall().completed_rows()
        );
    }

    let winners: Vec<&str> = engine
        .winners()
        .into_iter()
        .filter_map(|p| engine.player(p).map(|pl| pl.name()))
        .collect();
    match winners.as_slice() {
        [single] => println!("\n{BOLD}{} wins!{RESET}", single),
        many => println!("\n{BOLD}Shared win: {}{RESET}", many.join(", ")),
    }
}
