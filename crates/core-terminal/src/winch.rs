//! Self-pipe for `SIGWINCH`: the signal handler itself only ever writes
//! one byte to the pipe, so the actual resize handling runs on the main
//! loop's thread instead of inside a signal handler.

use std::io::{self, Read};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;

use signal_hook::SigId;
use signal_hook::consts::SIGWINCH;
use signal_hook::low_level::pipe;

pub struct WinchPipe {
    read: UnixStream,
    sig_id: SigId,
}

impl WinchPipe {
    pub fn register() -> io::Result<Self> {
        let (sender, receiver) = UnixStream::pair()?;
        receiver.set_nonblocking(true)?;
        let sig_id = pipe::register(SIGWINCH, sender)?;
        Ok(Self {
            read: receiver,
            sig_id,
        })
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.read.as_raw_fd()
    }

    /// Drain every pending wake byte. The pipe only carries "something
    /// happened", never a count, so a single redraw covers any number of
    /// signals that landed since the last drain.
    pub fn drain(&mut self) {
        let mut buf = [0u8; 32];
        loop {
            match self.read.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(_) => break,
            }
        }
    }
}

impl Drop for WinchPipe {
    fn drop(&mut self) {
        signal_hook::low_level::unregister(self.sig_id);
    }
}
