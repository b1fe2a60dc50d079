use std::fmt;
use std::io::{self, Write};

/// A growable byte buffer that accumulates one whole frame so the caller
/// can flush it with a single `write`, instead of one syscall per escape
/// sequence.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    buf: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Flush the accumulated frame to `w` in one write, then reset for the
    /// next frame.
    pub fn dump<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_all(self.buf.as_bytes())?;
        self.buf.clear();
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn as_str(&self) -> &str {
        &self.buf
    }
}

impl fmt::Write for OutputBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}
