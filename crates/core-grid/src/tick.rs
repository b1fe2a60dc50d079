//! Bit-parallel tick: one Game-of-Life generation over the whole grid.
//!
//! Both edge policies share the same per-row bit-sliced adder and life
//! rule; they differ only in how the eight neighbor chunks are resolved at
//! the grid boundary (`neighbor_index`).

use crate::{CHUNK_LAST, CHUNK_SIZE, Chunk, Grid, GridError};

fn wrap(v: isize, max: usize) -> usize {
    let max = max as isize;
    (((v % max) + max) % max) as usize
}

/// Resolve a neighbor chunk's linear index, or `None` for an out-of-grid
/// neighbor under the bounded edge policy. Toroidal never returns `None`.
fn neighbor_index(
    chunk_rows: usize,
    chunk_cols: usize,
    crow: isize,
    ccol: isize,
    toroidal: bool,
) -> Option<usize> {
    if toroidal {
        let r = wrap(crow, chunk_rows);
        let c = wrap(ccol, chunk_cols);
        Some(r * chunk_cols + c)
    } else {
        if crow < 0 || crow >= chunk_rows as isize || ccol < 0 || ccol >= chunk_cols as isize {
            return None;
        }
        Some(crow as usize * chunk_cols + ccol as usize)
    }
}

/// Sum eight neighbor bit-planes in parallel using a 4-word bit-sliced
/// full adder, then decode the Life rule: survive at exactly 2, born at
/// exactly 3.
fn life_row(curr: u32, neighbors: [u32; 8]) -> u32 {
    let (mut p0, mut p1, mut p2, mut p3) = (0u32, 0u32, 0u32, 0u32);

    for n in neighbors {
        let c1 = p0 & n;
        p0 ^= n;
        let c2 = p1 & c1;
        p1 ^= c1;
        let c3 = p2 & c2;
        p2 ^= c2;
        p3 ^= c3;
    }

    let eq2 = !p0 & p1 & !p2 & !p3;
    let eq3 = p0 & p1 & !p2 & !p3;

    (curr & eq2) | eq3
}

fn update_chunk(
    chunks: &[Chunk],
    shadow: &mut [Chunk],
    chunk_rows: usize,
    chunk_cols: usize,
    crow: usize,
    ccol: usize,
    toroidal: bool,
) {
    let idx = crow * chunk_cols + ccol;
    let (crow, ccol) = (crow as isize, ccol as isize);

    let fetch = |dr: isize, dc: isize| -> Option<&Chunk> {
        neighbor_index(chunk_rows, chunk_cols, crow + dr, ccol + dc, toroidal).map(|i| &chunks[i])
    };

    let n = fetch(-1, 0);
    let s = fetch(1, 0);
    let w = fetch(0, -1);
    let e = fetch(0, 1);
    let nw = fetch(-1, -1);
    let ne = fetch(-1, 1);
    let sw = fetch(1, -1);
    let se = fetch(1, 1);

    let row_of = |c: Option<&Chunk>, row: usize| -> u32 { c.map_or(0, |c| c[row]) };

    let curr_chunk = &chunks[idx];

    for row in 0..CHUNK_SIZE {
        let curr = curr_chunk[row];

        let left = row_of(w, row);
        let right = row_of(e, row);

        let top = if row == 0 {
            row_of(n, CHUNK_LAST)
        } else {
            curr_chunk[row - 1]
        };
        let bot = if row == CHUNK_LAST {
            row_of(s, 0)
        } else {
            curr_chunk[row + 1]
        };
        let top_left = if row == 0 {
            row_of(nw, CHUNK_LAST)
        } else {
            row_of(w, row - 1)
        };
        let top_right = if row == 0 {
            row_of(ne, CHUNK_LAST)
        } else {
            row_of(e, row - 1)
        };
        let bot_left = if row == CHUNK_LAST {
            row_of(sw, 0)
        } else {
            row_of(w, row + 1)
        };
        let bot_right = if row == CHUNK_LAST {
            row_of(se, 0)
        } else {
            row_of(e, row + 1)
        };

        let ngb_n = top;
        let ngb_s = bot;
        let ngb_e = (curr >> 1) | ((right & 1) << 31);
        let ngb_w = (curr << 1) | ((left >> 31) & 1);
        let ngb_ne = (top >> 1) | ((top_right & 1) << 31);
        let ngb_nw = (top << 1) | ((top_left >> 31) & 1);
        let ngb_se = (bot >> 1) | ((bot_right & 1) << 31);
        let ngb_sw = (bot << 1) | ((bot_left >> 31) & 1);

        shadow[idx][row] = life_row(
            curr,
            [ngb_n, ngb_s, ngb_e, ngb_w, ngb_ne, ngb_nw, ngb_se, ngb_sw],
        );
    }
}

pub(crate) fn update(grid: &mut Grid, toroidal: bool) -> Result<(), GridError> {
    let span = tracing::debug_span!("grid.tick", toroidal, chunks = grid.chunks.len());
    let _enter = span.enter();

    let mut shadow = Vec::new();
    shadow
        .try_reserve_exact(grid.chunks.len())
        .map_err(|_| GridError::Allocation)?;
    shadow.resize(grid.chunks.len(), [0u32; CHUNK_SIZE]);

    for crow in 0..grid.chunk_rows {
        for ccol in 0..grid.chunk_cols {
            update_chunk(
                &grid.chunks,
                &mut shadow,
                grid.chunk_rows,
                grid.chunk_cols,
                crow,
                ccol,
                toroidal,
            );
        }
    }

    grid.chunks = shadow;
    Ok(())
}
