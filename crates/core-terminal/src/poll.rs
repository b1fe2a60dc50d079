//! The single suspension point of the whole program: one `poll(2)` call
//! over stdin and the winch self-pipe, with a deadline derived from the
//! time remaining until the next tick.

use std::io;
use std::os::fd::RawFd;

/// Result of polling stdin and the winch pipe together.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollReady {
    pub stdin: bool,
    pub winch: bool,
}

/// Block for at most `timeout_ms` (negative means forever) waiting for
/// either fd to become readable.
pub fn poll(stdin_fd: RawFd, winch_fd: RawFd, timeout_ms: i32) -> io::Result<PollReady> {
    let mut fds = [
        libc::pollfd {
            fd: stdin_fd,
            events: libc::POLLIN,
            revents: 0,
        },
        libc::pollfd {
            fd: winch_fd,
            events: libc::POLLIN,
            revents: 0,
        },
    ];

    let ret = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout_ms) };

    if ret < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(PollReady::default());
        }
        return Err(err);
    }

    Ok(PollReady {
        stdin: fds[0].revents & libc::POLLIN != 0,
        winch: fds[1].revents & libc::POLLIN != 0,
    })
}

/// Put `fd` into non-blocking mode so a `read` racing an empty stdin
/// returns `EWOULDBLOCK` instead of parking the thread.
pub fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL, 0) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    let ret = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
