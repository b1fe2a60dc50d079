//! Feeds SGR mouse escape sequences through the public `parse_next` API one
//! byte at a time, as a terminal reader delivers them across many reads of
//! a non-blocking source.

use core_input::{InputParser, Key, ReadOutcome};
use std::io::{self, Read};

/// A source that yields bytes one at a time and reports `WouldBlock`
/// between them, the same shape a non-blocking stdin read has mid-sequence.
struct Trickle<'a> {
    bytes: &'a [u8],
    pos: usize,
    blocked: bool,
}

impl<'a> Trickle<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            blocked: false,
        }
    }
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.bytes.len() {
            return Ok(0);
        }
        if !self.blocked {
            self.blocked = true;
            return Err(io::Error::from(io::ErrorKind::WouldBlock));
        }
        self.blocked = false;
        buf[0] = self.bytes[self.pos];
        self.pos += 1;
        Ok(1)
    }
}

fn drain(parser: &mut InputParser, source: &mut Trickle) -> Vec<Key> {
    let mut keys = Vec::new();
    loop {
        match parser.parse_next(source).unwrap() {
            ReadOutcome::NewKey(key) => keys.push(key),
            ReadOutcome::Continue => continue,
            ReadOutcome::Finished if source.pos < source.bytes.len() => continue,
            ReadOutcome::Finished => break,
        }
    }
    keys
}

#[test]
fn press_drag_release_survive_fragmented_delivery() {
    let mut parser = InputParser::new();
    let mut source = Trickle::new(b"\x1b[<0;12;34M\x1b[<0;13;34M\x1b[<0;13;35m");

    let keys = drain(&mut parser, &mut source);

    assert_eq!(
        keys,
        vec![
            Key::MousePress { row: 34, col: 12 },
            Key::MouseDrag { row: 34, col: 13 },
            Key::MouseRelease { row: 35, col: 13 },
        ]
    );
}

#[test]
fn malformed_sequence_interleaved_with_plain_keys_resets_cleanly() {
    let mut parser = InputParser::new();
    let mut source = Trickle::new(b"\x1b[<ab;1;1Mr");

    let keys = drain(&mut parser, &mut source);

    assert_eq!(keys, vec![Key::Randomize]);
}
