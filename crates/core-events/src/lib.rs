//! The pending-work bitmask the main loop tests and clears each iteration.
//!
//! There is no event queue and no async runtime here: the controller is a
//! single cooperative loop that wakes on one `poll`, sets whichever flags
//! the wake corresponds to, and processes them in a fixed order before
//! sleeping again.

use bitflags::bitflags;

bitflags! {
    /// Work outstanding for the next iteration of the controller loop.
    /// Tested and cleared in a fixed order: `WINCH`, `TICK`, `INPUT`;
    /// `REDRAW`/`RESIZE` are folded into the paint step that follows.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EventFlags: u8 {
        /// `SIGWINCH` landed on the self-pipe; re-probe terminal size.
        const WINCH  = 0b0000_0001;
        /// Terminal size actually changed since the last paint.
        const RESIZE = 0b0000_0010;
        /// State changed in a way that requires a full repaint.
        const REDRAW = 0b0000_0100;
        /// The tick deadline elapsed; advance one generation.
        const TICK   = 0b0000_1000;
        /// Bytes are available to read from stdin.
        const INPUT  = 0b0001_0000;
    }
}

impl EventFlags {
    /// Returns whether `flag` was set, clearing it either way.
    pub fn test_and_clear(&mut self, flag: EventFlags) -> bool {
        let was_set = self.contains(flag);
        self.remove(flag);
        was_set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_clear_consumes_the_flag() {
        let mut flags = EventFlags::TICK | EventFlags::INPUT;
        assert!(flags.test_and_clear(EventFlags::TICK));
        assert!(!flags.test_and_clear(EventFlags::TICK));
        assert!(flags.contains(EventFlags::INPUT));
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(EventFlags::default(), EventFlags::empty());
    }
}
