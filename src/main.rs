use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use itertools::Itertools;
use log::debug;

use chess_rules::board::STARTING_POSITION_FEN;
use chess_rules::game::GameState;
use chess_rules::perft::{perft, perft_divide};
use chess_rules::types::*;

#[derive(Parser, Debug)]
#[command(name = "chess_rules")]
#[command(about = "Play and inspect chess games under the full rules")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Two players at one terminal, moves read from stdin (default)
    Play {
        /// Start from this position instead of the initial one
        #[arg(long)]
        fen: Option<String>,
    },
    /// Count the leaf nodes of the legal move tree
    Perft {
        #[arg(short, long, default_value_t = 3)]
        depth: u8,

        #[arg(long)]
        fen: Option<String>,

        /// Show the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Show where the piece on a square can go
    Moves {
        /// Square in algebraic notation, e.g. `e2`
        square: String,

        #[arg(long)]
        fen: Option<String>,
    },
}

fn load_state(fen: Option<&str>) -> Result<GameState> {
    let fen = fen.unwrap_or(STARTING_POSITION_FEN);
    Ok(GameState::from_fen(fen)?)
}

fn parse_square(s: &str) -> Result<Square> {
    Square::from_algebraic(s).ok_or_else(|| eyre!("`{s}` is not a square"))
}

fn status_line(state: &GameState) -> Option<String> {
    match state.status() {
        Status::Ongoing => None,
        Status::Check => Some(format!("{} is in check", state.side_to_move().to_human())),
        Status::AwaitingPromotion => Some("Promote to (q/r/b/n)?".to_string()),
        Status::Checkmate(winner) => Some(format!("Checkmate, {} wins", winner.to_human())),
        Status::Stalemate => Some("Stalemate".to_string()),
        Status::InsufficientMaterial => Some("Draw by insufficient material".to_string()),
    }
}

fn print_position(state: &GameState) {
    state.board().draw_to_terminal();
    if let Some(line) = status_line(state) {
        println!("{line}");
    }
}

fn promote(state: &mut GameState, c: char) {
    let choice = PieceType::from_char(c);
    match choice.map(|pt| state.try_resolve_promotion(pt)) {
        Some(Ok(_)) => print_position(state),
        Some(Err(e)) => println!("{e}"),
        None => println!("`{c}` is not a piece"),
    }
}

/// Handle one line of input. Returns false once the player wants to stop.
fn play_command(state: &mut GameState, line: &str) -> Result<bool> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words[..] {
        [] => {}
        ["quit"] | ["exit"] => return Ok(false),
        ["board"] => print_position(state),
        ["fen"] => println!("{}", state.to_fen()),
        ["moves", square] => {
            let sq = parse_square(square)?;
            let destinations = state.legal_destinations(sq);
            print!("{}", state.board().draw_destinations(&destinations));
            println!("{}", destinations.iter().sorted().join(" "));
        }
        [choice] if choice.len() == 1 => {
            if let Some(c) = choice.chars().next() {
                promote(state, c);
            }
        }
        [mv] if mv.is_ascii() && (mv.len() == 4 || mv.len() == 5) => {
            let from = parse_square(&mv[0..2])?;
            let to = parse_square(&mv[2..4])?;
            match state.try_move(from, to) {
                Ok(report) => {
                    println!("{}", report.to_human());
                    match mv[4..].chars().next() {
                        Some(c) if report.promotion_pending => promote(state, c),
                        _ => print_position(state),
                    }
                }
                Err(e) => println!("{e}"),
            }
        }
        _ => println!("unknown command `{line}`"),
    }
    Ok(true)
}

fn play(mut state: GameState) -> Result<()> {
    print_position(&state);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if !state.is_terminal() {
            print!("{} to move> ", state.side_to_move().to_human());
            io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        debug!("input: {line}");
        // a bad square is reported, not fatal
        match play_command(&mut state, line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("{e}"),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Play { fen: None }) {
        Command::Play { fen } => play(load_state(fen.as_deref())?),
        Command::Perft { depth, fen, divide } => {
            let state = load_state(fen.as_deref())?;
            if divide && depth > 0 {
                let results = perft_divide(&state, depth);
                for (name, nodes) in &results {
                    println!("{name}: {nodes}");
                }
                println!();
                println!("Nodes: {}", results.iter().map(|(_, n)| n).sum::<u64>());
            } else {
                println!("Nodes: {}", perft(&state, depth));
            }
            Ok(())
        }
        Command::Moves { square, fen } => {
            let state = load_state(fen.as_deref())?;
            let sq = parse_square(&square)?;
            let destinations = state.legal_destinations(sq);
            print!("{}", state.board().draw_destinations(&destinations));
            println!("{}", destinations.iter().sorted().join(" "));
            Ok(())
        }
    }
}
