// SPDX-License-Identifier: MIT
//
// Pen — where the next paint lands and what it looks like.
//
// The pen is a position, an engaged flag, and the current colors. It moves
// one cell at a time and clamps at the canvas edges: no wraparound, and a
// move into an edge is a no-op. The background color cycles through the
// whole 256-color palette in both directions and does wrap.

/// A single-cell movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The live pen state driven by the input loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    x: u16,
    y: u16,
    engaged: bool,
    fg: u8,
    bg: u8,
}

impl Pen {
    /// A disengaged pen at the top-left corner.
    #[must_use]
    pub const fn new(fg: u8, bg: u8) -> Self {
        Self {
            x: 0,
            y: 0,
            engaged: false,
            fg,
            bg,
        }
    }

    /// Column of the pen.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> u16 {
        self.x
    }

    /// Row of the pen.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> u16 {
        self.y
    }

    /// Whether moving the pen paints.
    #[inline]
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        self.engaged
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

    /// Move one cell in `dir`, staying inside `width × height`.
    pub const fn step(&mut self, dir: Direction, width: u16, height: u16) {
        match dir {
            Direction::Up => {
                if self.y > 0 {
                    self.y -= 1;
                }
            }
            Direction::Down => {
                if self.y + 1 < height {
                    self.y += 1;
                }
            }
            Direction::Left => {
                if self.x > 0 {
                    self.x -= 1;
                }
            }
            Direction::Right => {
                if self.x + 1 < width {
                    self.x += 1;
                }
            }
        }
    }

    /// Flip between painting and merely moving.
    pub const fn toggle(&mut self) {
        self.engaged = !self.engaged;
    }

    /// Next background index; 255 wraps to 0.
    pub const fn background_up(&mut self) {
        self.bg = self.bg.wrapping_add(1);
    }

    /// Previous background index; 0 wraps to 255.
    pub const fn background_down(&mut self) {
        self.bg = self.bg.wrapping_sub(1);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
