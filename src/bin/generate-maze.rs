//! CLI for maze generation

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use hexmaze::maze_generator::MazeGenerator;

/// Generate a hex-encoded maze file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File to write the maze to
    file: PathBuf,

    /// Number of rows in the maze
    num_rows: usize,

    /// Number of columns in the maze
    num_cols: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut generator = MazeGenerator::new(args.seed);
    let maze = generator.generate(args.num_rows, args.num_cols)?;
    fs::write(&args.file, format!("{maze}\n"))
        .with_context(|| format!("cannot write maze file {}", args.file.display()))?;
    Ok(())
}
