// SPDX-License-Identifier: MIT
//
// Canvas — the sparse grid the pen paints into.
//
// The canvas is sized to the terminal once, at startup, and most of it is
// usually never touched. So instead of a dense `width × height` vector it
// keeps only the painted cells, in a `BTreeMap` keyed by `(row, column)`.
// That key order *is* row-major order, which lets the renderer walk painted
// cells directly, top-to-bottom and left-to-right, without scanning blanks.
//
// Positions are signed on the way in. Anything outside `[0, width) ×
// [0, height)` is simply "no cell": reads return `None`, nothing is
// allocated, nothing changes.

use std::collections::BTreeMap;

use crate::cell::Cell;

/// A `width × height` grid of optional cells.
///
/// # Examples
///
/// ```
/// use tp_canvas::Canvas;
///
/// let mut canvas = Canvas::new(10, 5);
/// assert!(canvas.is_empty());
///
/// canvas.get_or_create_cell(1, 1).unwrap().set_bg(4);
/// assert_eq!(canvas.len(), 1);
/// assert_eq!(canvas.cell(1, 1).unwrap().bg(), 4);
///
/// assert!(canvas.get_or_create_cell(10, 0).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    /// Painted cells, keyed `(y, x)` so iteration is row-major.
    cells: BTreeMap<(u16, u16), Cell>,
}

impl Canvas {
    /// Create an empty canvas. Dimensions never change afterwards.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Map a signed position to a storage key, or `None` if out of bounds.
    fn key(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        (x < self.width && y < self.height).then_some((y, x))
    }

    /// Whether `(x, y)` lies on the canvas.
    #[inline]
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.key(x, y).is_some()
    }

    /// The cell at `(x, y)`, allocating a [`Cell::BLANK`] on first touch.
    ///
    /// Returns `None` (and allocates nothing) when the position is off the
    /// canvas.
    pub fn get_or_create_cell(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        let key = self.key(x, y)?;
        Some(self.cells.entry(key).or_default())
    }

    /// The cell at `(x, y)` if one has been allocated. Never allocates.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.key(x, y).and_then(|key| self.cells.get(&key))
    }

    /// Free every cell. Dimensions are unchanged.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of allocated cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is allocated.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Allocated cells as `(x, y, cell)` in row-major order.
    pub fn painted(&self) -> impl Iterator<Item = (u16, u16, &Cell)> + '_ {
        self.cells.iter().map(|(&(y, x), cell)| (x, y, cell))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    // ── Construction ────────────────────────────────────────────────

    #[test]
    fn new_is_empty_with_fixed_size() {
        let canvas = Canvas::new(80, 24);
        assert_eq!(canvas.width(), 80);
        assert_eq!(canvas.height(), 24);
        assert!(canvas.is_empty());
        assert_eq!(canvas.len(), 0);
    }

    #[test]
    fn zero_sized_canvas_has_no_positions() {
        let mut canvas = Canvas::new(0, 0);
        assert!(!canvas.contains(0, 0));
        assert!(canvas.get_or_create_cell(0, 0).is_none());
        assert!(canvas.is_empty());
    }

    // ── Bounds ──────────────────────────────────────────────────────

    #[test]
    fn corners_are_inside() {
        let canvas = Canvas::new(10, 5);
        assert!(canvas.contains(0, 0));
        assert!(canvas.contains(9, 0));
        assert!(canvas.contains(0, 4));
        assert!(canvas.contains(9, 4));
    }

    #[test]
    fn edges_are_exclusive() {
        let canvas = Canvas::new(10, 5);
        assert!(!canvas.contains(10, 0));
        assert!(!canvas.contains(0, 5));
        assert!(!canvas.contains(-1, 0));
        assert!(!canvas.contains(0, -1));
    }

    #[test]
    fn out_of_bounds_fetch_allocates_nothing() {
        let mut canvas = Canvas::new(10, 5);
        assert!(canvas.get_or_create_cell(10, 5).is_none());
        assert!(canvas.get_or_create_cell(-3, 2).is_none());
        assert!(canvas.get_or_create_cell(i32::MAX, i32::MIN).is_none());
        assert!(canvas.is_empty());
    }

    // ── Allocation ──────────────────────────────────────────────────

    #[test]
    fn first_touch_allocates_blank() {
        let mut canvas = Canvas::new(10, 5);
        let cell = *canvas.get_or_create_cell(3, 2).unwrap();
        assert_eq!(cell, Cell::BLANK);
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn repeated_fetch_returns_same_cell() {
        let mut canvas = Canvas::new(10, 5);
        canvas.get_or_create_cell(3, 2).unwrap().set_bg(9);
        let again = canvas.get_or_create_cell(3, 2).unwrap();
        assert_eq!(again.bg(), 9);
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn read_does_not_allocate() {
        let canvas = Canvas::new(10, 5);
        assert!(canvas.cell(1, 1).is_none());
        assert!(canvas.is_empty());
    }

    #[test]
    fn clear_frees_everything_keeps_size() {
        let mut canvas = Canvas::new(10, 5);
        for x in 0..10 {
            canvas.get_or_create_cell(x, x % 5);
        }
        assert_eq!(canvas.len(), 10);

        canvas.clear();
        assert!(canvas.is_empty());
        assert!(canvas.cell(0, 0).is_none());
        assert_eq!((canvas.width(), canvas.height()), (10, 5));
    }

    // ── Iteration ───────────────────────────────────────────────────

    #[test]
    fn painted_is_row_major() {
        let mut canvas = Canvas::new(10, 5);
        canvas.get_or_create_cell(7, 3);
        canvas.get_or_create_cell(2, 0);
        canvas.get_or_create_cell(1, 3);
        canvas.get_or_create_cell(9, 0);

        let order: Vec<(u16, u16)> = canvas.painted().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(order, vec![(2, 0), (9, 0), (1, 3), (7, 3)]);
    }

    // ── Properties ──────────────────────────────────────────────────

    proptest! {
        #[test]
        fn inside_positions_are_usable_and_idempotent(
            w in 1u16..64,
            h in 1u16..64,
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            bg in 0i32..=255,
        ) {
            #[allow(clippy::cast_possible_truncation)]
            let x = (fx * f64::from(w)) as i32;
            #[allow(clippy::cast_possible_truncation)]
            let y = (fy * f64::from(h)) as i32;
            let mut canvas = Canvas::new(w, h);

            canvas.get_or_create_cell(x, y).unwrap().set_bg(bg);
            let first = *canvas.get_or_create_cell(x, y).unwrap();
            let second = *canvas.get_or_create_cell(x, y).unwrap();

            prop_assert_eq!(first, second);
            prop_assert_eq!(i32::from(first.bg()), bg);
            prop_assert_eq!(canvas.len(), 1);
        }

        #[test]
        fn outside_positions_never_allocate(
            w in 0u16..64,
            h in 0u16..64,
            x in any::<i32>(),
            y in any::<i32>(),
        ) {
            prop_assume!(x < 0 || y < 0 || x >= i32::from(w) || y >= i32::from(h));
            let mut canvas = Canvas::new(w, h);
            let before = canvas.clone();

            prop_assert!(canvas.get_or_create_cell(x, y).is_none());
            prop_assert!(canvas.cell(x, y).is_none());
            prop_assert_eq!(canvas, before);
        }
    }
}
