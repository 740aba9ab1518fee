// SPDX-License-Identifier: MIT
//
// ANSI escape sequences — the byte-level vocabulary of the paint program.
//
// Fixed sequences are byte-string constants; the few that carry numbers
// (cursor position, palette colors) are functions writing into any
// `impl Write`. Deciding when to send what belongs to the terminal handle,
// the frame sink, and the renderer.
//
// Positions are 0-indexed here and 1-indexed on the wire. Colors are always
// the 256-color extended form (`38;5;N` / `48;5;N`), even for N < 16.

use std::io::{self, Write};

// ─── Fixed sequences ────────────────────────────────────────────────────────

/// DECTCEM reset.
pub const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
/// DECTCEM set.
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
/// ED 2: erase the whole screen.
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
/// SGR 0: back to the terminal's default colors.
pub const RESET: &[u8] = b"\x1b[0m";

/// DEC mode 2026 set: hold rendering until [`SYNC_END`].
///
/// Terminals without the mode ignore it, so it's always safe to send.
pub const SYNC_BEGIN: &[u8] = b"\x1b[?2026h";
/// DEC mode 2026 reset: show everything since [`SYNC_BEGIN`].
pub const SYNC_END: &[u8] = b"\x1b[?2026l";

/// DEC mode 1049 set: alternate screen, saving the shell's content.
pub const ALT_SCREEN_ON: &[u8] = b"\x1b[?1049h";
/// DEC mode 1049 reset: back to the shell's content.
pub const ALT_SCREEN_OFF: &[u8] = b"\x1b[?1049l";

/// Everything needed to take over the screen, in order.
#[rustfmt::skip]
pub const TAKEOVER: &[u8] = b"\
    \x1b[?1049h\
    \x1b[?25l\
    \x1b[2J";

/// Everything needed to hand the screen back, in order.
///
/// Safe to send at any point, including mid-frame from a panic hook: it
/// closes a pending sync block before anything else, and leaves the
/// alternate screen last so no canvas colors bleed into the shell.
#[rustfmt::skip]
pub const HANDBACK: &[u8] = b"\
    \x1b[?2026l\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

// ─── Parameterized sequences ────────────────────────────────────────────────

/// CUP to column `x`, row `y` (both 0-indexed).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Foreground from the 256-color palette.
#[inline]
pub fn fg_indexed(w: &mut impl Write, idx: u8) -> io::Result<()> {
    write!(w, "\x1b[38;5;{idx}m")
}

/// Background from the 256-color palette.
#[inline]
pub fn bg_indexed(w: &mut impl Write, idx: u8) -> io::Result<()> {
    write!(w, "\x1b[48;5;{idx}m")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
