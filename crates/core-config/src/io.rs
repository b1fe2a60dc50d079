//! Sparse save-file format: a header line of chunk dimensions followed by
//! one `"row col"` line per live cell.
//!
//! The reference implementation this was ported from writes the header in
//! cell dimensions on save but reads it back as chunk dimensions on load,
//! so a save/load round trip silently inflates the grid by `CHUNK_SIZE`.
//! Both sides here agree on chunk dimensions.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use core_grid::{CellState, Grid};

use crate::ConfigError;

pub fn save(grid: &Grid, path: &Path) -> Result<(), ConfigError> {
    let (rows, cols) = grid.dim();
    let chunk_rows = rows / core_grid::CHUNK_SIZE;
    let chunk_cols = cols / core_grid::CHUNK_SIZE;

    let mut lines = vec![format!("{chunk_rows} {chunk_cols}")];
    for r in 0..rows {
        for c in 0..cols {
            if grid.cell_state(r, c)? == CellState::Alive {
                lines.push(format!("{r} {c}"));
            }
        }
    }

    let mut file = File::create(path)?;
    file.write_all(lines.join("\n").as_bytes())?;
    tracing::info!(path = %path.display(), chunk_rows, chunk_cols, "saved grid");
    Ok(())
}

/// Split `"<digits><one non-digit separator><digits>"` into its two
/// numbers. The separator may be any single non-digit byte, not just
/// whitespace.
fn parse_pair(line: &str) -> Option<(usize, usize)> {
    let bytes = line.as_bytes();
    let split = bytes.iter().position(|b| !b.is_ascii_digit())?;
    if split == 0 {
        return None;
    }
    let first = line[..split].parse().ok()?;
    let second = line.get(split + 1..)?.trim_end().parse().ok()?;
    Some((first, second))
}

pub fn load(path: &Path) -> Result<Grid, ConfigError> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .ok_or_else(|| ConfigError::Protocol {
            line: 1,
            reason: "missing header line".into(),
        })??;
    let (chunk_rows, chunk_cols) = parse_pair(&header).ok_or_else(|| ConfigError::Protocol {
        line: 1,
        reason: "expected \"<chunk_rows> <chunk_cols>\"".into(),
    })?;

    let mut grid = Grid::make(chunk_rows, chunk_cols)?;

    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        let line = line?;
        let coords = parse_pair(&line).ok_or_else(|| ConfigError::Protocol {
            line: line_no,
            reason: "expected \"<row> <col>\"".into(),
        })?;

        grid.set_alive(coords.0, coords.1)
            .map_err(|_| ConfigError::Protocol {
                line: line_no,
                reason: format!("coordinates {coords:?} out of bounds"),
            })?;
    }

    tracing::info!(path = %path.display(), chunk_rows, chunk_cols, "loaded grid");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.txt");

        let mut grid = Grid::make(2, 2).unwrap();
        grid.set_alive(0, 0).unwrap();
        grid.set_alive(40, 40).unwrap();
        grid.set_alive(63, 63).unwrap();
        save(&grid, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.dim(), grid.dim());
        assert_eq!(loaded.cell_state(0, 0).unwrap(), CellState::Alive);
        assert_eq!(loaded.cell_state(40, 40).unwrap(), CellState::Alive);
        assert_eq!(loaded.cell_state(63, 63).unwrap(), CellState::Alive);
        assert_eq!(loaded.cell_state(1, 1).unwrap(), CellState::Dead);
    }

    #[test]
    fn header_stores_chunk_dims_not_cell_dims() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.txt");
        let grid = Grid::make(3, 1).unwrap();
        save(&grid, &path).unwrap();

        let header = BufReader::new(File::open(&path).unwrap())
            .lines()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(header, "3 1");
    }

    #[test]
    fn malformed_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "not a header\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Protocol { line: 1, .. }));
    }

    #[test]
    fn out_of_bounds_coordinate_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "1 1\n999 999\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Protocol { line: 2, .. }));
    }

    #[test]
    fn save_emits_no_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.txt");
        let mut grid = Grid::make(1, 1).unwrap();
        grid.set_alive(0, 0).unwrap();
        save(&grid, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_ne!(bytes.last(), Some(&b'\n'));
    }

    #[test]
    fn any_single_non_digit_byte_separates_the_pair() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.txt");
        std::fs::write(&path, "1,1\n0,0").unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.cell_state(0, 0).unwrap(), CellState::Alive);
    }
}
