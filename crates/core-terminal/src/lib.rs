//! Raw-mode lifecycle and the two low-level primitives the controller
//! loop needs to avoid busy-polling: a `SIGWINCH` self-pipe and a
//! `poll(2)` wrapper that waits on it alongside stdin.

mod clock;
mod poll;
mod winch;

use std::io::{self};
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

pub use clock::remaining_ms;
pub use poll::{PollReady, poll, set_nonblocking};
use winch::WinchPipe;

#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("failed to toggle raw mode: {0}")]
    RawMode(io::Error),

    #[error("failed to register SIGWINCH self-pipe: {0}")]
    WinchRegister(io::Error),

    #[error("failed to query terminal size: {0}")]
    WinSize(io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Current terminal size as `(rows, cols)`.
pub fn winsize() -> Result<(usize, usize), TerminalError> {
    let (cols, rows) = crossterm::terminal::size().map_err(TerminalError::WinSize)?;
    Ok((rows as usize, cols as usize))
}

/// RAII guard for everything the controller loop needs torn down on every
/// exit path: raw mode, the winch self-pipe, and stdin's blocking flag.
pub struct TerminalGuard {
    winch: WinchPipe,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self, TerminalError> {
        crossterm::terminal::enable_raw_mode().map_err(TerminalError::RawMode)?;

        let winch = match WinchPipe::register() {
            Ok(w) => w,
            Err(e) => {
                let _ = crossterm::terminal::disable_raw_mode();
                return Err(TerminalError::WinchRegister(e));
            }
        };

        if let Err(e) = set_nonblocking(io::stdin().as_raw_fd()) {
            let _ = crossterm::terminal::disable_raw_mode();
            return Err(TerminalError::Io(e));
        }

        tracing::info!("entered raw mode, registered SIGWINCH self-pipe");
        Ok(Self { winch })
    }

    pub fn winch_fd(&self) -> std::os::fd::RawFd {
        self.winch.as_raw_fd()
    }

    pub fn drain_winch(&mut self) {
        self.winch.drain();
    }

    /// Wait for stdin or a winch signal, for at most `last_tick + delay`
    /// from now.
    pub fn wait(&self, last_tick: Instant, delay: Duration) -> Result<PollReady, TerminalError> {
        let timeout_ms = remaining_ms(last_tick, delay);
        let stdin_fd = io::stdin().as_raw_fd();
        poll::poll(stdin_fd, self.winch_fd(), timeout_ms).map_err(TerminalError::Io)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = crossterm::terminal::disable_raw_mode() {
            tracing::warn!(error = %e, "failed to disable raw mode on teardown");
        } else {
            tracing::info!("left raw mode");
        }
    }
}
