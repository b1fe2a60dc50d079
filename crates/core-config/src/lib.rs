//! Turns CLI [`Args`] into a validated [`Config`], and the sparse save-file
//! format a [`core_grid::Grid`] can be round-tripped through.

mod args;
mod io;

use std::path::PathBuf;

pub use args::Args;
pub use io::{load, save};

use core_grid::EdgePolicy;
use unicode_width::UnicodeWidthStr;

const DEFAULT_SHAPE_ALIVE: &str = "\u{2588}\u{2588}";
const DEFAULT_SHAPE_DEAD: &str = "  ";
const DEFAULT_COLOR_DARK: u8 = 103;
const DEFAULT_COLOR_LIGHT: u8 = 146;
const DEFAULT_DELAY_MS: u32 = 50;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed save file at line {line}: {reason}")]
    Protocol { line: usize, reason: String },

    #[error(transparent)]
    Grid(#[from] core_grid::GridError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    Silent,
    Graphic,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub shape_alive: String,
    pub shape_dead: String,
    pub shape_len: usize,
    pub chunk_rows: usize,
    pub chunk_cols: usize,
    pub steps: u32,
    pub delay_ms: u32,
    pub mode: SimMode,
    pub color_light: u8,
    pub color_dark: u8,
    pub edge_policy: EdgePolicy,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, ConfigError> {
        let Args {
            input,
            dim,
            steps,
            output,
            torus,
            silent,
            graphic,
            shape,
            color,
            delay,
        } = args;

        if input.is_some() && dim.is_some() {
            return Err(ConfigError::InvalidConfig(
                "-i/--input and --dim are mutually exclusive".into(),
            ));
        }
        if input.is_none() && dim.is_none() {
            return Err(ConfigError::InvalidConfig(
                "one of -i/--input or --dim is required".into(),
            ));
        }

        let (chunk_rows, chunk_cols) = match &dim {
            Some(pair) => {
                let [rows, cols] = pair.as_slice() else {
                    unreachable!("clap enforces exactly two values")
                };
                if *rows == 0 || *cols == 0 {
                    return Err(ConfigError::InvalidConfig(
                        "--dim values must both be greater than zero".into(),
                    ));
                }
                usize::try_from(*rows)
                    .and_then(|r| usize::try_from(*cols).map(|c| (r, c)))
                    .map_err(|_| ConfigError::InvalidConfig("--dim values are too large".into()))?
            }
            None => (0, 0),
        };

        if input.is_some() && steps.is_none() {
            return Err(ConfigError::InvalidConfig(
                "-n/--steps is required when loading a grid with -i/--input".into(),
            ));
        }
        if steps == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "-n/--steps must be greater than zero".into(),
            ));
        }

        if silent && graphic {
            return Err(ConfigError::InvalidConfig(
                "--silent and --graphic are mutually exclusive".into(),
            ));
        }
        let mode = if silent {
            SimMode::Silent
        } else {
            SimMode::Graphic
        };

        if mode == SimMode::Silent && (shape.is_some() || color.is_some() || delay.is_some()) {
            return Err(ConfigError::InvalidConfig(
                "--shape, --color and --delay require graphic mode".into(),
            ));
        }

        let (shape_alive, shape_dead, shape_len) = match shape {
            Some(pair) => {
                let [alive, dead] = pair.as_slice() else {
                    unreachable!("clap enforces exactly two values")
                };
                let width = alive.width();
                if width == 0 || dead.width() != width {
                    return Err(ConfigError::InvalidConfig(
                        "--shape glyphs must share one non-zero display width".into(),
                    ));
                }
                (alive.clone(), dead.clone(), width)
            }
            None => (
                DEFAULT_SHAPE_ALIVE.to_string(),
                DEFAULT_SHAPE_DEAD.to_string(),
                DEFAULT_SHAPE_ALIVE.width(),
            ),
        };

        let (color_dark, color_light) = match color {
            Some(pair) => {
                let [dark, light] = pair.as_slice() else {
                    unreachable!("clap enforces exactly two values")
                };
                (*dark, *light)
            }
            None => (DEFAULT_COLOR_DARK, DEFAULT_COLOR_LIGHT),
        };

        Ok(Config {
            input_file: input,
            output_file: output,
            shape_alive,
            shape_dead,
            shape_len,
            chunk_rows,
            chunk_cols,
            steps: steps.unwrap_or(0),
            delay_ms: delay.unwrap_or(DEFAULT_DELAY_MS),
            mode,
            color_light,
            color_dark,
            edge_policy: if torus {
                EdgePolicy::Toroidal
            } else {
                EdgePolicy::Bounded
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> Result<Config, ConfigError> {
        let args = Args::parse_from(std::iter::once(&"cells").chain(argv).collect::<Vec<_>>());
        Config::try_from(args)
    }

    #[test]
    fn dim_and_input_conflict_is_rejected_by_clap() {
        let result = Args::try_parse_from(["cells", "--dim", "64", "64", "-i", "save.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn fresh_grid_defaults_to_graphic_mode() {
        let cfg = parse(&["--dim", "2", "3"]).unwrap();
        assert_eq!(cfg.mode, SimMode::Graphic);
        assert_eq!((cfg.chunk_rows, cfg.chunk_cols), (2, 3));
        assert_eq!(cfg.shape_alive, DEFAULT_SHAPE_ALIVE);
        assert_eq!(cfg.delay_ms, DEFAULT_DELAY_MS);
    }

    #[test]
    fn dim_is_taken_as_chunk_counts_directly() {
        let cfg = parse(&["--dim", "33", "1"]).unwrap();
        assert_eq!((cfg.chunk_rows, cfg.chunk_cols), (33, 1));
    }

    #[test]
    fn input_without_steps_is_rejected() {
        let err = parse(&["-i", "save.txt"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn zero_steps_is_rejected() {
        let err = parse(&["-i", "save.txt", "-n", "0"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn shape_requires_graphic_mode() {
        let err = parse(&[
            "--dim", "32", "32", "--silent", "-n", "10", "--shape", "XX", "..",
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn mismatched_shape_widths_are_rejected() {
        let err = parse(&["--dim", "32", "32", "--shape", "XX", "."]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn torus_flag_selects_toroidal_policy() {
        let cfg = parse(&["--dim", "32", "32", "--torus"]).unwrap();
        assert_eq!(cfg.edge_policy, EdgePolicy::Toroidal);
    }
}
