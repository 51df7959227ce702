//! Hot-seat Azul in the terminal
//!
//! Usage: cargo run --bin play -- [--players 3] [--names Ana,Bo,Cy] [--seed 7]

use std::io::{self, Write};

use clap::Parser;
use rand::SeedableRng;

use azul::display::{
    display_board, display_final_scores, display_round_summary, format_draft, format_outcome,
    BOLD, DIM, RESET,
};
use azul_engine::{Draft, FactoryPolicy, GameConfig, GameEngine, Phase};

/// Play Azul with 2 to 4 players sharing one terminal
#[derive(Parser, Debug)]
#[command(name = "play")]
#[command(about = "Hot-seat Azul for 2 to 4 players", long_about = None)]
struct Args {
    /// Number of players (ignored when --names is given)
    #[arg(long, default_value_t = 2)]
    players: usize,

    /// Comma-separated player names
    #[arg(long, value_delimiter = ',')]
    names: Vec<String>,

    /// Random seed for the bag
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Use five factories regardless of player count
    #[arg(long)]
    fixed_factories: bool,

    /// End the game after this many rounds
    #[arg(long)]
    round_limit: Option<u16>,
}

enum Command {
    Play(Draft),
    Undo,
    Quit,
}

fn read_command(engine: &GameEngine) -> io::Result<Command> {
    let drafts = engine.legal_drafts();

    println!("{BOLD}Legal moves:{RESET}");
    for (i, draft) in drafts.iter().enumerate() {
        println!("  {}: {}", i, format_draft(draft));
    }

    loop {
        print!("\n{BOLD}Enter move number{RESET} {DIM}(u = undo, q = quit){RESET}: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            return Ok(Command::Quit);
        }

        match input.trim() {
            "q" | "quit" => return Ok(Command::Quit),
            "u" | "undo" => return Ok(Command::Undo),
            other => match other.parse::<usize>() {
                Ok(idx) if idx < drafts.len() => return Ok(Command::Play(drafts[idx])),
                Ok(_) => println!("Invalid move number. Enter 0-{}", drafts.len() - 1),
                Err(_) => println!("Please enter a number (or 'u' / 'q')"),
            },
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = if args.names.is_empty() {
        GameConfig::for_players(args.players)
    } else {
        GameConfig {
            player_names: args.names,
            ..GameConfig::default()
        }
    };
    if args.fixed_factories {
        config.factory_policy = FactoryPolicy::fixed_five();
    }
    config.round_limit = args.round_limit;

    let mut rng = rand::rngs::StdRng::seed_from_u64(args.seed);
    let mut engine = GameEngine::new(config, &mut rng)?;

    println!("\n{BOLD}Welcome to Azul!{RESET}");
    println!(
        "{} players, {} factories. Type 'q' to quit at any time.",
        engine.players().len(),
        engine.factories().len()
    );

    while engine.phase() == Phase::FactorySelection {
        let current = engine.current_player();
        display_board(&engine, Some(current));

        match read_command(&engine)? {
            Command::Quit => {
                println!("Goodbye!");
                return Ok(());
            }
            Command::Undo => match engine.undo() {
                Ok(undone) => println!(
                    "{DIM}Took back {}'s move {}{RESET}",
                    engine.player(undone.player).map_or("?", |p| p.name()),
                    format_draft(&undone.draft)
                ),
                Err(e) => eprintln!("{e}"),
            },
            Command::Play(draft) => {
                let outcome = engine.apply(draft)?;
                println!("{DIM}{}{RESET}", format_outcome(&outcome));
                if let Some(summary) = &outcome.round_end {
                    display_round_summary(&engine, summary);
                }
            }
        }
    }

    display_board(&engine, None);
    display_final_scores(&engine);
    Ok(())
}
