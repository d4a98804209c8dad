//! CLI for maze solving

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use hexmaze::{Maze, Point, SolveMode};

/// Solve a hex-encoded maze and write the path to a file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Record every visited room instead of only the start-to-goal path
    #[arg(short, long)]
    full: bool,

    /// File holding the hex-encoded maze
    maze_file: PathBuf,

    /// Number of rows in the maze
    num_rows: usize,

    /// Number of columns in the maze
    num_cols: usize,

    /// File to write the solution to
    path_file: PathBuf,

    /// Row of the room to start from
    start_row: usize,

    /// Column of the room to start from
    start_col: usize,

    /// Row of the room to reach
    goal_row: usize,

    /// Column of the room to reach
    goal_col: usize,
}

/// Read the maze from file, write the solution to another
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let text = fs::read_to_string(&args.maze_file)
        .with_context(|| format!("cannot read maze file {}", args.maze_file.display()))?;
    let maze = Maze::parse_hex(&text, args.num_rows, args.num_cols)?;

    let start = Point {
        row: args.start_row,
        col: args.start_col,
    };
    let goal = Point {
        row: args.goal_row,
        col: args.goal_col,
    };
    let mode = if args.full {
        SolveMode::Full
    } else {
        SolveMode::Pruned
    };
    let solution = maze.solve(start, goal, mode)?;

    fs::write(&args.path_file, format!("{solution}\n"))
        .with_context(|| format!("cannot write path file {}", args.path_file.display()))?;
    Ok(())
}
