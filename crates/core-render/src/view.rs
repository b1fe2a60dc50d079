use std::fmt::Write as _;

use core_grid::Grid;

use crate::ansi;
use crate::output::OutputBuffer;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Grid(#[from] core_grid::GridError),
}

/// Longest mode label the status bar reserves room for ("COMPLETE").
const MODE_COLUMN_WIDTH: usize = 8;

/// Centered, framed view of a grid onto a fixed-size terminal. Holds no
/// file descriptor of its own: callers assemble a frame into an
/// [`OutputBuffer`] and flush it through whatever backend owns stdout.
pub struct View {
    rows: usize,
    cols: usize,
    cell_width: usize,
    cell_dead: String,
    cell_alive: String,
    color_light: u8,
    color_dark: u8,
}

impl View {
    pub fn new(
        rows: usize,
        cols: usize,
        cell_dead: impl Into<String>,
        cell_alive: impl Into<String>,
        cell_width: usize,
        color_light: u8,
        color_dark: u8,
    ) -> Self {
        Self {
            rows,
            cols,
            cell_width,
            cell_dead: cell_dead.into(),
            cell_alive: cell_alive.into(),
            color_light,
            color_dark,
        }
    }

    /// Update to a freshly observed terminal size. Returns whether it
    /// actually changed.
    pub fn update_dims(&mut self, rows: usize, cols: usize) -> bool {
        if self.rows == rows && self.cols == cols {
            return false;
        }
        self.rows = rows;
        self.cols = cols;
        true
    }

    /// Enter the alternate screen, hide the cursor, and enable SGR mouse
    /// tracking. Call once, before the first paint.
    pub fn init(&self, out: &mut OutputBuffer) {
        writeln!(
            out,
            "{}{}{}{}",
            ansi::CURSOR_HIDE,
            ansi::INIT_ALT_BUF,
            ansi::MOUSE_TRACKING_ON,
            ansi::SGR_ENCODING_ON
        )
        .expect("writing to an in-memory buffer cannot fail");
    }

    /// Undo [`View::init`]. Call once, on every exit path.
    pub fn finish(&self, out: &mut OutputBuffer) {
        writeln!(
            out,
            "{}{}{}{}",
            ansi::SGR_ENCODING_OFF,
            ansi::MOUSE_TRACKING_OFF,
            ansi::KILL_ALT_BUF,
            ansi::CURSOR_SHOW
        )
        .expect("writing to an in-memory buffer cannot fail");
    }

    pub fn clear(&self, out: &mut OutputBuffer) {
        out.push_str(ansi::CLEAR_SCREEN);
    }

    fn occupied(&self, rows: usize, cols: usize) -> (usize, usize) {
        (rows + 2 + 1, cols * self.cell_width + 4)
    }

    fn center_cols(&self, out: &mut OutputBuffer, occupied: usize) {
        write!(out, "\x1b[{}C", self.cols.saturating_sub(occupied) / 2)
            .expect("writing to an in-memory buffer cannot fail");
    }

    fn center_rows(&self, out: &mut OutputBuffer, occupied: usize) {
        write!(out, "\x1b[{}B", self.rows.saturating_sub(occupied) / 2)
            .expect("writing to an in-memory buffer cannot fail");
    }

    fn paint_line(&self, out: &mut OutputBuffer, len: usize) {
        for _ in 0..len.saturating_sub(2) {
            out.push_str("━");
        }
    }

    fn screen_low(&self, out: &mut OutputBuffer) {
        self.center_rows(out, 2);
        self.center_cols(out, "your window is".len());
        write!(
            out,
            "{}\x1b[0;38;5;{}myour window is{}\n\r",
            ansi::CLEAR_FROM_START,
            self.color_dark,
            ansi::CLEAR_RIGHT
        )
        .expect("writing to an in-memory buffer cannot fail");
        self.center_cols(out, "too low for cells".len());
        write!(
            out,
            "{}\x1b[1;38;5;{}mtoo low\x1b[0;38;5;{}m for \x1b[1;38;5;{}mcells{}\n\r",
            ansi::CLEAR_LEFT,
            self.color_light,
            self.color_dark,
            self.color_light,
            ansi::CLEAR_TO_END
        )
        .expect("writing to an in-memory buffer cannot fail");
    }

    fn screen_narrow(&self, out: &mut OutputBuffer) {
        self.center_rows(out, 2);
        self.center_cols(out, "your window is".len());
        write!(
            out,
            "{}\x1b[0;38;5;{}myour window is{}\n\r",
            ansi::CLEAR_FROM_START,
            self.color_dark,
            ansi::CLEAR_RIGHT
        )
        .expect("writing to an in-memory buffer cannot fail");
        self.center_cols(out, "too narrow for cells".len());
        write!(
            out,
            "{}\x1b[1;38;5;{}mtoo narrow\x1b[0;38;5;{}m for \x1b[1;38;5;{}mcells{}\n\r",
            ansi::CLEAR_LEFT,
            self.color_light,
            self.color_dark,
            self.color_light,
            ansi::CLEAR_TO_END
        )
        .expect("writing to an in-memory buffer cannot fail");
    }

    fn status_bar(
        &self,
        out: &mut OutputBuffer,
        occupied_cols: usize,
        step: usize,
        steps: usize,
        mode: &str,
        redraw: bool,
    ) {
        self.center_cols(out, occupied_cols);
        if redraw {
            out.push_str(ansi::CLEAR_LEFT);
        }
        if steps == 0 {
            write!(
                out,
                " \x1b[1;38;5;{}mcycle\x1b[0;38;5;{}m {}",
                self.color_light, self.color_dark, step
            )
            .expect("writing to an in-memory buffer cannot fail");
        } else {
            let width = steps.to_string().len();
            write!(
                out,
                " \x1b[1;38;5;{}mcycle\x1b[0;38;5;{}m {:0width$}/{}",
                self.color_light,
                self.color_dark,
                step,
                steps,
                width = width
            )
            .expect("writing to an in-memory buffer cannot fail");
        }
        if redraw {
            out.push_str(ansi::CLEAR_RIGHT);
        }
        out.push_str("\r");

        self.center_cols(out, occupied_cols);
        let padding = occupied_cols
            .saturating_sub("status ".len())
            .saturating_sub(MODE_COLUMN_WIDTH)
            .saturating_sub(2)
            .saturating_sub(1);
        write!(
            out,
            "\x1b[{}C\x1b[1;38;5;{}mstatus\x1b[0;38;5;{}m {}",
            padding, self.color_light, self.color_dark, mode
        )
        .expect("writing to an in-memory buffer cannot fail");
        if redraw {
            out.push_str(ansi::CLEAR_TO_END);
        }
    }

    /// The 8-line help box shown centered once, right after the very
    /// first grid paint.
    pub fn after_first_grid(&self, out: &mut OutputBuffer) {
        write!(
            out,
            "{}\x1b[{}B",
            ansi::CURSOR_RESET,
            self.rows.saturating_sub(6) / 2
        )
        .expect("writing to an in-memory buffer cannot fail");

        const TEXT_COLS: usize = 4 + "click        interact".len();

        let lines = [
            "┏━━━━━━━━━━━━━━━━━━━━┓\r\n".to_string(),
            "┃                    ┃\r\n".to_string(),
            format!(
                "┃  {}click{}     toggle  ┃\r\n",
                ansi::FONT_BOLD,
                ansi::FONT_RESET
            ),
            format!(
                "┃  {}space{}      pause  ┃\r\n",
                ansi::FONT_BOLD,
                ansi::FONT_RESET
            ),
            "┃                    ┃\r\n".to_string(),
            format!(
                "┃  {}ctrl(q){}     quit  ┃\r\n",
                ansi::FONT_BOLD,
                ansi::FONT_RESET
            ),
            "┃                    ┃\r\n".to_string(),
            "┗━━━━━━━━━━━━━━━━━━━━┛\r\n".to_string(),
        ];

        for line in lines {
            self.center_cols(out, TEXT_COLS);
            out.push_str(&line);
        }
    }

    fn paint_upper_frame(
        &self,
        out: &mut OutputBuffer,
        occupied_cols: usize,
        cols: usize,
        redraw: bool,
    ) {
        self.center_cols(out, occupied_cols);
        if redraw {
            out.push_str(ansi::CLEAR_FROM_START);
        }
        write!(out, "\x1b[0;38;5;{}m┏━", self.color_dark)
            .expect("writing to an in-memory buffer cannot fail");
        self.paint_line(out, cols * self.cell_width);
        out.push_str("━┓");
        if redraw {
            out.push_str(ansi::CLEAR_RIGHT);
        }
        out.push_str("\r");
        self.center_cols(out, " cells ".len() + 1);
        write!(out, " \x1b[1;38;5;{}mcells \n\r", self.color_light)
            .expect("writing to an in-memory buffer cannot fail");
    }

    fn paint_lower_frame(&self, out: &mut OutputBuffer, cols: usize, redraw: bool) {
        self.center_cols(out, cols * self.cell_width + 4);
        if redraw {
            out.push_str(ansi::CLEAR_LEFT);
        }
        out.push_str("┗━");
        self.paint_line(out, cols * self.cell_width);
        out.push_str("━┛");
        if redraw {
            out.push_str(ansi::CLEAR_RIGHT);
        }
        out.push_str("\n\r");
    }

    fn paint_grid_row(
        &self,
        out: &mut OutputBuffer,
        grid: &Grid,
        row: usize,
        cols: usize,
    ) -> Result<(), RenderError> {
        for col in 0..cols {
            let state = grid.cell_state(row, col)?;
            if state == core_grid::CellState::Alive {
                write!(
                    out,
                    "\x1b[1;38;5;{}m{}",
                    self.color_light, self.cell_alive
                )
                .expect("writing to an in-memory buffer cannot fail");
            } else {
                write!(out, "\x1b[0;38;5;{}m{}", self.color_dark, self.cell_dead)
                    .expect("writing to an in-memory buffer cannot fail");
            }
        }
        Ok(())
    }

    fn paint_body(
        &self,
        out: &mut OutputBuffer,
        grid: &Grid,
        rows: usize,
        cols: usize,
        redraw: bool,
    ) -> Result<(), RenderError> {
        for row in 0..rows {
            self.center_cols(out, cols * self.cell_width + 4);
            if redraw {
                out.push_str(ansi::CLEAR_LEFT);
            }
            write!(out, "\x1b[0;38;5;{}m┃", self.color_dark)
                .expect("writing to an in-memory buffer cannot fail");
            self.paint_grid_row(out, grid, row, cols)?;
            write!(out, "\x1b[0;38;5;{}m┃", self.color_dark)
                .expect("writing to an in-memory buffer cannot fail");
            if redraw {
                out.push_str(ansi::CLEAR_RIGHT);
            }
            out.push_str("\n\r");
        }
        Ok(())
    }

    /// Assemble one full frame: frame border, grid body, status bar,
    /// centered on the current terminal size. `redraw` additionally emits
    /// clear-to-end-of-line codes, needed after a resize shrinks a
    /// previous frame.
    pub fn paint_grid(
        &self,
        out: &mut OutputBuffer,
        grid: &Grid,
        step: usize,
        steps: usize,
        mode: &str,
        redraw: bool,
    ) -> Result<(), RenderError> {
        let (rows, cols) = grid.dim();
        let (occupied_rows, occupied_cols) = self.occupied(rows, cols);

        out.push_str(ansi::CURSOR_RESET);

        if self.rows < occupied_rows {
            self.screen_low(out);
            return Ok(());
        }
        if self.cols < occupied_cols {
            self.screen_narrow(out);
            return Ok(());
        }

        self.center_rows(out, occupied_rows);
        self.paint_upper_frame(out, occupied_cols, cols, redraw);
        self.paint_body(out, grid, rows, cols, redraw)?;
        self.paint_lower_frame(out, cols, redraw);
        self.status_bar(out, occupied_cols, step, steps, mode, redraw);

        Ok(())
    }

    /// Translate a terminal mouse report (1-indexed screen row/col) into
    /// grid cell coordinates, or `None` if the frame is currently too
    /// small to show the grid at all.
    pub fn translate_mouse(
        &self,
        grid_rows: usize,
        grid_cols: usize,
        row: usize,
        col: usize,
    ) -> Option<(usize, usize)> {
        let (occupied_rows, occupied_cols) = self.occupied(grid_rows, grid_cols);
        if self.rows < occupied_rows || self.cols < occupied_cols {
            return None;
        }

        let offset_row = (self.rows - occupied_rows) / 2;
        let offset_col = (self.cols - occupied_cols) / 2;

        let col = col.checked_sub(offset_col + 2)? / self.cell_width;
        let row = row.checked_sub(offset_row + 2)?;

        Some((row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_view() -> View {
        View::new(20, 60, "·", "█", 1, ansi::COLOR_DEFAULT_LIGHT, ansi::COLOR_DEFAULT_DARK)
    }

    #[test]
    fn update_dims_reports_change() {
        let mut view = small_view();
        assert!(!view.update_dims(20, 60));
        assert!(view.update_dims(24, 80));
        assert!(!view.update_dims(24, 80));
    }

    #[test]
    fn too_small_terminal_shows_placeholder() {
        let view = View::new(2, 2, "·", "█", 1, 146, 60);
        let grid = Grid::make(1, 1).unwrap();
        let mut out = OutputBuffer::new();
        view.paint_grid(&mut out, &grid, 0, 0, "RUNNING", false).unwrap();
        assert!(out.as_str().contains("too low"));
    }

    #[test]
    fn translate_mouse_round_trips_a_cell() {
        // A view large enough to fit a 32x32 grid.
        let view = View::new(60, 120, "·", "█", 1, 146, 60);
        let offset_row = (60 - (32 + 3)) / 2;
        let offset_col = (120 - (32 + 4)) / 2;
        let got = view
            .translate_mouse(32, 32, offset_row + 2 + 5, offset_col + 2 + 7)
            .unwrap();
        assert_eq!(got, (5, 7));
    }

    #[test]
    fn translate_mouse_none_when_too_small() {
        let view = View::new(2, 2, "·", "█", 1, 146, 60);
        assert_eq!(view.translate_mouse(32, 32, 1, 1), None);
    }
}
