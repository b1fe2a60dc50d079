//! Byte-at-a-time input state machine: plain keys plus SGR mouse escape
//! sequences, decoded without any dependency on a particular terminal
//! backend or I/O source.
//!
//! The machine never panics on malformed input. Any escape sequence that
//! doesn't match `ESC [ < digits ; digits ; digits (M|m)` exactly resets
//! silently back to idle and the offending bytes are simply dropped.

use std::io::{self, Read};

const MAX_ESCSEQ_LEN: usize = 32;
const CTRL_Q: u8 = b'q' & 0x1f;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read from input source: {0}")]
    Io(#[from] io::Error),
}

/// A decoded key or mouse action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Pause,
    Exit,
    Randomize,
    Clear,
    Frame,
    MousePress { row: usize, col: usize },
    MouseDrag { row: usize, col: usize },
    MouseRelease { row: usize, col: usize },
}

/// Outcome of pulling one byte through [`InputParser::parse_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    NewKey(Key),
    Continue,
    /// No more bytes available right now (EOF or a non-blocking source
    /// with nothing pending); the caller should stop reading this round.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Idle,
    ExpectBracket,
    ExpectLt,
    DigitsA,
    DigitsB,
    DigitsC,
}

pub struct InputParser {
    state: ParserState,
    escbuf: [u8; MAX_ESCSEQ_LEN],
    esci: usize,
    found_one_digit: bool,
    dragging: bool,
    mouse_row: usize,
    mouse_col: usize,
}

impl Default for InputParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InputParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Idle,
            escbuf: [0u8; MAX_ESCSEQ_LEN],
            esci: 0,
            found_one_digit: false,
            dragging: false,
            mouse_row: 0,
            mouse_col: 0,
        }
    }

    /// Last mouse position reported by a press/drag/release sequence.
    pub fn mouse_pos(&self) -> (usize, usize) {
        (self.mouse_row, self.mouse_col)
    }

    /// Forget an in-progress drag, e.g. after the button state the
    /// terminal reports can no longer be trusted (focus loss, resize).
    pub fn cancel_press(&mut self) {
        self.dragging = false;
    }

    /// Read one byte from `source` and feed it through the machine.
    pub fn parse_next<R: Read>(&mut self, source: &mut R) -> Result<ReadOutcome, InputError> {
        let mut byte = [0u8; 1];
        match source.read(&mut byte) {
            Ok(0) => Ok(ReadOutcome::Finished),
            Ok(_) => Ok(match self.feed_byte(byte[0]) {
                Some(key) => ReadOutcome::NewKey(key),
                None => ReadOutcome::Continue,
            }),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(ReadOutcome::Finished),
            Err(e) => Err(InputError::Io(e)),
        }
    }

    /// Feed one raw byte through the machine, returning a key if this byte
    /// completed one.
    pub fn feed_byte(&mut self, c: u8) -> Option<Key> {
        if self.esci + 1 == MAX_ESCSEQ_LEN {
            tracing::debug!("input escape sequence exceeded buffer, resetting");
            self.reset();
            return None;
        }

        match self.state {
            ParserState::Idle => self.idle(c),
            ParserState::ExpectBracket => {
                self.expect(c, b'[', ParserState::ExpectLt);
                None
            }
            ParserState::ExpectLt => {
                self.expect(c, b'<', ParserState::DigitsA);
                None
            }
            ParserState::DigitsA => {
                self.digits(c, ParserState::DigitsB);
                None
            }
            ParserState::DigitsB => {
                self.digits(c, ParserState::DigitsC);
                None
            }
            ParserState::DigitsC => self.digits_final(c),
        }
    }

    fn reset(&mut self) {
        self.esci = 0;
        self.state = ParserState::Idle;
        self.found_one_digit = false;
    }

    fn push(&mut self, c: u8) {
        self.escbuf[self.esci] = c;
        self.esci += 1;
    }

    fn idle(&mut self, c: u8) -> Option<Key> {
        match c {
            0x1b => {
                self.push(c);
                self.state = ParserState::ExpectBracket;
                None
            }
            b' ' => Some(Key::Pause),
            CTRL_Q => Some(Key::Exit),
            b'r' => Some(Key::Randomize),
            b'c' => Some(Key::Clear),
            b'.' => Some(Key::Frame),
            _ => None,
        }
    }

    fn expect(&mut self, c: u8, want: u8, next: ParserState) {
        if c == want {
            self.push(c);
            self.state = next;
        } else {
            self.reset();
        }
    }

    fn digits(&mut self, c: u8, next: ParserState) {
        if c.is_ascii_digit() {
            self.push(c);
            self.found_one_digit = true;
        } else if self.found_one_digit && c == b';' {
            self.push(c);
            self.found_one_digit = false;
            self.state = next;
        } else {
            self.reset();
        }
    }

    fn digits_final(&mut self, c: u8) -> Option<Key> {
        if c.is_ascii_digit() {
            self.push(c);
            self.found_one_digit = true;
            None
        } else if self.found_one_digit && (c == b'm' || c == b'M') {
            self.push(c);
            self.found_one_digit = false;
            self.state = ParserState::Idle;
            self.parse_escseq()
        } else {
            self.reset();
            None
        }
    }

    /// Decode `ESC [ < type ; col ; row (M|m)` from the accumulated
    /// buffer. The button-state bit (`type`) is consumed by the FSM
    /// transitions already (press vs. drag vs. release is determined by
    /// the trailing letter and `self.dragging`), so the caller only ever
    /// needs the resulting position.
    fn parse_escseq(&mut self) -> Option<Key> {
        let esci = self.esci;
        let last = self.escbuf[esci - 1];
        let body = std::str::from_utf8(&self.escbuf[3..esci - 1]).ok()?;
        let mut parts = body.splitn(3, ';');
        let _button = parts.next()?.parse::<usize>().ok()?;
        let col = parts.next()?.parse::<usize>().ok()?;
        let row = parts.next()?.parse::<usize>().ok()?;

        self.esci = 0;
        self.mouse_row = row;
        self.mouse_col = col;

        match last {
            b'm' => {
                self.dragging = false;
                Some(Key::MouseRelease { row, col })
            }
            b'M' => {
                if !self.dragging {
                    self.dragging = true;
                    Some(Key::MousePress { row, col })
                } else {
                    Some(Key::MouseDrag { row, col })
                }
            }
            _ => None,
        }
    }
}
