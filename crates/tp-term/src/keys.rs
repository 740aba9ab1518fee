// SPDX-License-Identifier: MIT
//
// Key decoding.
//
// Turns raw stdin bytes into the small set of keys a paint program cares
// about: printable characters, the four arrow keys, Escape, and Ctrl-C.
// Everything else (function keys, mouse reports, other control bytes) is
// consumed and dropped so it can never be mistaken for a command.
//
// The decoder keeps a small pending buffer because an escape sequence can
// be split across two `read()` calls. A lone ESC is held until the reader
// reports an idle poll, then [`Decoder::flush`] turns it into [`Key::Esc`].

/// A decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character (ASCII or multi-byte UTF-8).
    Char(char),
    /// Arrow up (`CSI A` / `SS3 A`).
    Up,
    /// Arrow down (`CSI B` / `SS3 B`).
    Down,
    /// Arrow right (`CSI C` / `SS3 C`).
    Right,
    /// Arrow left (`CSI D` / `SS3 D`).
    Left,
    /// A standalone Escape press.
    Esc,
    /// Ctrl-C. Raw mode disables ISIG, so it arrives as byte `0x03`.
    CtrlC,
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Incremental byte → [`Key`] decoder.
///
/// # Example
///
/// ```
/// use tp_term::keys::{Decoder, Key};
///
/// let mut dec = Decoder::new();
/// assert_eq!(dec.advance(b"w\x1b[C"), vec![Key::Char('w'), Key::Right]);
/// ```
#[derive(Debug, Default)]
pub struct Decoder {
    pending: Vec<u8>,
}

impl Decoder {
    /// Create a decoder with no pending bytes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Whether an incomplete sequence is waiting for more bytes.
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Feed a chunk of bytes, returning every key completed by it.
    pub fn advance(&mut self, bytes: &[u8]) -> Vec<Key> {
        self.pending.extend_from_slice(bytes);

        let mut keys = Vec::new();
        let mut pos = 0;
        while pos < self.pending.len() {
            match try_parse(&self.pending[pos..]) {
                Parsed::Key(key, used) => {
                    keys.push(key);
                    pos += used;
                }
                Parsed::Skip(used) => pos += used,
                Parsed::Incomplete => break,
            }
        }
        self.pending.drain(..pos);
        keys
    }

    /// Resolve whatever is pending after the input went quiet.
    ///
    /// A held ESC becomes [`Key::Esc`]; any other partial sequence is
    /// discarded.
    pub fn flush(&mut self) -> Vec<Key> {
        let keys = if self.pending == [0x1B] {
            vec![Key::Esc]
        } else {
            Vec::new()
        };
        self.pending.clear();
        keys
    }
}

// ─── Stateless Parsing ──────────────────────────────────────────────────────

/// Result of trying to parse one key from the front of a buffer.
enum Parsed {
    /// A key, consuming `usize` bytes.
    Key(Key, usize),
    /// The buffer ends mid-sequence.
    Incomplete,
    /// Unrecognized bytes, skip `usize` of them.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        0x03 => Parsed::Key(Key::CtrlC, 1),
        b @ 0x20..=0x7E => Parsed::Key(Key::Char(char::from(b)), 1),
        0xC0..=0xFF => parse_utf8(buf),
        // Other control bytes and stray continuation bytes.
        _ => Parsed::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    if buf.len() < 2 {
        return Parsed::Incomplete;
    }
    match buf[1] {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        // ESC followed by anything else is a standalone Escape; the next
        // byte is parsed on its own.
        _ => Parsed::Key(Key::Esc, 1),
    }
}

/// `ESC [ params final`. Only the parameterless arrow forms are keys.
fn parse_csi(buf: &[u8]) -> Parsed {
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }
    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let consumed = end + 1;
    if end != 2 {
        // Modified arrows, function keys, mouse reports: not ours.
        return Parsed::Skip(consumed);
    }
    arrow(buf[end]).map_or(Parsed::Skip(consumed), |key| Parsed::Key(key, consumed))
}

/// `ESC O final` — application cursor mode arrows.
fn parse_ss3(buf: &[u8]) -> Parsed {
    if buf.len() < 3 {
        return Parsed::Incomplete;
    }
    arrow(buf[2]).map_or(Parsed::Skip(3), |key| Parsed::Key(key, 3))
}

const fn arrow(final_byte: u8) -> Option<Key> {
    match final_byte {
        b'A' => Some(Key::Up),
        b'B' => Some(Key::Down),
        b'C' => Some(Key::Right),
        b'D' => Some(Key::Left),
        _ => None,
    }
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Parsed::Skip(1),
    };
    if buf.len() < len {
        return Parsed::Incomplete;
    }
    match std::str::from_utf8(&buf[..len]).ok().and_then(|s| s.chars().next()) {
        Some(ch) => Parsed::Key(Key::Char(ch), len),
        None => Parsed::Skip(1),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(bytes: &[u8]) -> Vec<Key> {
        Decoder::new().advance(bytes)
    }

    // ── Plain keys ──────────────────────────────────────────────────

    #[test]
    fn printable_ascii() {
        assert_eq!(
            decode(b"wasd q"),
            vec![
                Key::Char('w'),
                Key::Char('a'),
                Key::Char('s'),
                Key::Char('d'),
                Key::Char(' '),
                Key::Char('q'),
            ]
        );
    }

    #[test]
    fn ctrl_c() {
        assert_eq!(decode(&[0x03]), vec![Key::CtrlC]);
    }

    #[test]
    fn other_control_bytes_are_dropped() {
        assert_eq!(decode(&[0x01, 0x0D, 0x7F, b'x']), vec![Key::Char('x')]);
    }

    #[test]
    fn utf8_character() {
        assert_eq!(decode("é".as_bytes()), vec![Key::Char('é')]);
    }

    #[test]
    fn invalid_utf8_is_dropped() {
        assert_eq!(decode(&[0xC3, 0x28]), vec![Key::Char('(')]);
    }

    // ── Arrows ──────────────────────────────────────────────────────

    #[test]
    fn csi_arrows() {
        assert_eq!(
            decode(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![Key::Up, Key::Down, Key::Right, Key::Left]
        );
    }

    #[test]
    fn ss3_arrows() {
        assert_eq!(decode(b"\x1bOA\x1bOD"), vec![Key::Up, Key::Left]);
    }

    #[test]
    fn modified_arrow_is_dropped() {
        assert_eq!(decode(b"\x1b[1;5Cx"), vec![Key::Char('x')]);
    }

    #[test]
    fn function_key_is_dropped() {
        assert_eq!(decode(b"\x1b[15~z"), vec![Key::Char('z')]);
    }

    // ── Split sequences ─────────────────────────────────────────────

    #[test]
    fn arrow_split_across_reads() {
        let mut dec = Decoder::new();
        assert!(dec.advance(b"\x1b").is_empty());
        assert!(dec.has_pending());
        assert!(dec.advance(b"[").is_empty());
        assert_eq!(dec.advance(b"B"), vec![Key::Down]);
        assert!(!dec.has_pending());
    }

    #[test]
    fn lone_escape_resolves_on_flush() {
        let mut dec = Decoder::new();
        assert!(dec.advance(b"\x1b").is_empty());
        assert_eq!(dec.flush(), vec![Key::Esc]);
        assert!(!dec.has_pending());
    }

    #[test]
    fn escape_followed_by_letter() {
        assert_eq!(decode(b"\x1bq"), vec![Key::Esc, Key::Char('q')]);
    }

    #[test]
    fn flush_discards_partial_utf8() {
        let mut dec = Decoder::new();
        assert!(dec.advance(&[0xE2, 0x82]).is_empty());
        assert!(dec.flush().is_empty());
        assert!(!dec.has_pending());
    }

    #[test]
    fn flush_discards_unfinished_csi() {
        let mut dec = Decoder::new();
        assert!(dec.advance(b"\x1b[1;").is_empty());
        assert!(dec.flush().is_empty());
    }

    #[test]
    fn flush_with_nothing_pending() {
        assert!(Decoder::new().flush().is_empty());
    }
}
