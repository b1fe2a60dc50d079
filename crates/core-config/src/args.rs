use std::path::PathBuf;

use clap::Parser;

/// Raw CLI surface, parsed before cross-field validation turns it into a
/// [`crate::Config`].
#[derive(Debug, Parser)]
#[command(name = "cells", about = "An interactive, terminal Game of Life simulator")]
pub struct Args {
    /// Load the initial grid from a save file instead of starting blank.
    #[arg(short = 'i', long = "input", conflicts_with = "dim")]
    pub input: Option<PathBuf>,

    /// Allocate a fresh grid of this many chunk rows and columns (each
    /// chunk holds a 32x32 block of cells).
    #[arg(long = "dim", num_args = 2, value_names = ["ROWS", "COLS"])]
    pub dim: Option<Vec<u64>>,

    /// Run exactly this many generations, then stop (required with `-i`).
    #[arg(short = 'n', long = "steps")]
    pub steps: Option<u32>,

    /// Write the final grid to this path on exit.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Wrap the grid at its edges instead of treating them as dead space.
    #[arg(long)]
    pub torus: bool,

    /// Run headless: advance `--steps` generations with no terminal UI.
    #[arg(long, conflicts_with = "graphic")]
    pub silent: bool,

    /// Run the interactive terminal UI (the default mode).
    #[arg(long, conflicts_with = "silent")]
    pub graphic: bool,

    /// Glyphs used for a live and a dead cell (equal display width, graphic mode only).
    #[arg(long = "shape", num_args = 2, value_names = ["ALIVE", "DEAD"])]
    pub shape: Option<Vec<String>>,

    /// 256-color palette indices for the dark and light accents (graphic mode only).
    #[arg(long = "color", num_args = 2, value_names = ["DARK", "LIGHT"])]
    pub color: Option<Vec<u8>>,

    /// Milliseconds between generations in graphic mode.
    #[arg(long)]
    pub delay: Option<u32>,
}
