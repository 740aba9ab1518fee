// SPDX-License-Identifier: MIT
//
// Cell — one painted position of the canvas.
//
// A cell is a glyph plus two 256-color palette indices. Colors come in as
// plain integers from whoever is painting and are coerced on the way in:
// anything outside 0..=255 is stored as 0. Nothing is ever rejected, so a
// cell always holds something the renderer can emit.

/// Coerce an arbitrary integer into a palette index.
///
/// Values in `0..=255` pass through unchanged; everything else becomes 0.
///
/// ```
/// use tp_canvas::cell::coerce_color;
///
/// assert_eq!(coerce_color(42), 42);
/// assert_eq!(coerce_color(256), 0);
/// assert_eq!(coerce_color(-1), 0);
/// ```
#[inline]
#[must_use]
pub fn coerce_color(value: i32) -> u8 {
    u8::try_from(value).unwrap_or(0)
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A painted canvas position: character, foreground and background index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    ch: char,
    fg: u8,
    bg: u8,
}

impl Cell {
    /// A freshly allocated cell: a blank glyph on palette index 0.
    pub const BLANK: Self = Self {
        ch: ' ',
        fg: 0,
        bg: 0,
    };

    /// Create a cell, coercing both colors.
    #[must_use]
    pub fn new(ch: char, fg: i32, bg: i32) -> Self {
        Self {
            ch,
            fg: coerce_color(fg),
            bg: coerce_color(bg),
        }
    }

    #[inline]
    #[must_use]
    pub const fn ch(&self) -> char {
        self.ch
    }

    #[inline]
    #[must_use]
    pub const fn fg(&self) -> u8 {
        self.fg
    }

    #[inline]
    #[must_use]
    pub const fn bg(&self) -> u8 {
        self.bg
    }

    #[inline]
    pub fn set_char(&mut self, ch: char) {
        self.ch = ch;
    }

    /// Set the foreground index; out-of-range values store 0.
    #[inline]
    pub fn set_fg(&mut self, value: i32) {
        self.fg = coerce_color(value);
    }

    /// Set the background index; out-of-range values store 0.
    #[inline]
    pub fn set_bg(&mut self, value: i32) {
        self.bg = coerce_color(value);
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_blank() {
        let cell = Cell::default();
        assert_eq!(cell, Cell::BLANK);
        assert_eq!(cell.ch(), ' ');
        assert_eq!(cell.fg(), 0);
        assert_eq!(cell.bg(), 0);
    }

    #[test]
    fn new_coerces_both_colors() {
        let cell = Cell::new('#', 300, -5);
        assert_eq!(cell.ch(), '#');
        assert_eq!(cell.fg(), 0);
        assert_eq!(cell.bg(), 0);
    }

    #[test]
    fn boundaries_are_kept() {
        let mut cell = Cell::BLANK;
        cell.set_fg(255);
        cell.set_bg(0);
        assert_eq!(cell.fg(), 255);
        assert_eq!(cell.bg(), 0);
    }

    #[test]
    fn just_out_of_range_is_zero() {
        let mut cell = Cell::new(' ', 9, 9);
        cell.set_fg(256);
        cell.set_bg(-1);
        assert_eq!(cell.fg(), 0);
        assert_eq!(cell.bg(), 0);
    }

    #[test]
    fn set_char_replaces_glyph() {
        let mut cell = Cell::BLANK;
        cell.set_char('█');
        assert_eq!(cell.ch(), '█');
    }

    proptest! {
        #[test]
        fn stored_color_is_value_or_zero(v in any::<i32>()) {
            let mut cell = Cell::BLANK;
            cell.set_fg(v);
            cell.set_bg(v);
            let expected = if (0..=255).contains(&v) { v } else { 0 };
            prop_assert_eq!(i32::from(cell.fg()), expected);
            prop_assert_eq!(i32::from(cell.bg()), expected);
        }
    }
}
