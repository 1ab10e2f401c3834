use std::time::Instant;

use clap::Parser;
use tile_solver::render;
use tile_solver::solver::Solver;
use tile_solver::types::{Board, Outcome, Piece, Puzzle};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "tile_solver",
    about = "Exact rectangle tiling solver (defaults to the Calibron 12 puzzle)"
)]
struct Cli {
    /// Board dimensions (WxH, e.g. 56x56)
    #[arg(long, value_parser = parse_dimensions)]
    board: Option<Piece>,

    /// Pieces as WxH (e.g. 28x14 28x6 21x18)
    #[arg(long, num_args = 1.., value_parser = parse_dimensions)]
    pieces: Vec<Piece>,

    /// Show ASCII layout of the solution
    #[arg(long)]
    layout: bool,

    /// Log search progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_dimensions(s: &str) -> Result<Piece, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("invalid dimensions '{}', expected WxH", s))?;
    let w = w
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let h = h
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if w == 0 || h == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(Piece::new(w, h))
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let default = Puzzle::calibron12();
    let board: Board = cli.board.unwrap_or(default.board);
    let pieces = if cli.pieces.is_empty() {
        default.pieces
    } else {
        cli.pieces
    };
    let puzzle = Puzzle::new(board, pieces);

    let start = Instant::now();
    let outcome = Solver::new(puzzle).solve().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let elapsed = start.elapsed().as_millis();

    match outcome {
        Outcome::Solved(solution) => {
            println!("Solution found in {}ms:", elapsed);
            for p in &solution.placements {
                let rot = if p.rotated { " [rotated]" } else { "" };
                println!("  {}{}", p, rot);
            }
            if cli.layout {
                print!("{}", render::render_solution(board, &solution.placements));
            }
        }
        Outcome::Unsolvable => {
            println!(
                "No solution exists, all possibilities eliminated in {}ms",
                elapsed
            );
        }
    }
}
