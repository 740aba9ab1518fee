// SPDX-License-Identifier: MIT
//
// Frame output — where the output loop sends each rendered frame.
//
// Every frame is a full repaint: clear the screen, then write the painted
// cells. The clear and the cells are assembled into one buffer and sent in
// a single `write()`, wrapped in synchronized-output markers so terminals
// that support it never show the blank screen between the two.

use std::io::{self, Write};

use crate::ansi;

/// Something the output loop can present frames to.
pub trait FrameSink {
    /// Replace whatever is on screen with `frame`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame can't be written.
    fn present(&mut self, frame: &[u8]) -> io::Result<()>;
}

/// Writes one full-repaint frame into `w`: sync begin, clear, cells, sync end.
///
/// # Errors
///
/// Propagates write errors from `w`.
pub fn write_frame(w: &mut impl Write, frame: &[u8]) -> io::Result<()> {
    w.write_all(ansi::SYNC_BEGIN)?;
    w.write_all(ansi::CLEAR_SCREEN)?;
    w.write_all(frame)?;
    w.write_all(ansi::SYNC_END)
}

// ─── StdoutSink ─────────────────────────────────────────────────────────────

/// Frame sink backed by the process's stdout.
#[derive(Debug, Default)]
pub struct StdoutSink {
    buf: Vec<u8>,
}

impl StdoutSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for StdoutSink {
    fn present(&mut self, frame: &[u8]) -> io::Result<()> {
        self.buf.clear();
        write_frame(&mut self.buf, frame)?;

        let mut stdout = io::stdout().lock();
        stdout.write_all(&self.buf)?;
        stdout.flush()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn frame_is_cleared_then_painted() {
        let mut out = Vec::new();
        write_frame(&mut out, b"\x1b[1;1HX").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1b[?2026h\x1b[2J\x1b[1;1HX\x1b[?2026l"
        );
    }

    #[test]
    fn empty_frame_still_clears() {
        let mut out = Vec::new();
        write_frame(&mut out, b"").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1b[?2026h\x1b[2J\x1b[?2026l"
        );
    }
}
