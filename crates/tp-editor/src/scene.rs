// SPDX-License-Identifier: MIT
//
// Scene — the canvas and pen, and the rules for changing them.
//
// This is the state machine behind every keystroke. `apply` takes one
// command and performs exactly the transition for it:
//
//   Quit            → nothing changes; the caller stops.
//   Clear           → every cell freed; redraw; no painting this event.
//   anything else   → pen moves / toggles / recolors (or not), then, if the
//                     pen is engaged, the cell under it is painted; redraw.
//
// Every non-quit event asks for a redraw, even an ignored key. The scene
// only records that by setting `dirty`; waking the output loop is the
// shared signal's job.

use tp_canvas::Canvas;
use tracing::trace;

use crate::keymap::Command;
use crate::pen::Pen;

/// Glyph written into every painted cell. Color comes from the background.
pub const PAINT_GLYPH: char = ' ';

/// What the input loop should do after a command was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// State may have changed; the output loop should repaint.
    Redraw,
    /// The quit command was seen.
    Quit,
}

/// Canvas, pen, and the pending-redraw flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    canvas: Canvas,
    pen: Pen,
    dirty: bool,
}

impl Scene {
    /// A scene with nothing to redraw yet.
    #[must_use]
    pub const fn new(canvas: Canvas, pen: Pen) -> Self {
        Self {
            canvas,
            pen,
            dirty: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[inline]
    #[must_use]
    pub const fn pen(&self) -> &Pen {
        &self.pen
    }

    /// Whether a change hasn't been rendered yet.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume the pending-redraw flag, returning its previous value.
    pub const fn take_dirty(&mut self) -> bool {
        let was = self.dirty;
        self.dirty = false;
        was
    }

    /// Apply one command.
    pub fn apply(&mut self, command: Command) -> Step {
        let (width, height) = (self.canvas.width(), self.canvas.height());

        match command {
            Command::Quit => return Step::Quit,
            Command::Clear => {
                self.canvas.clear();
                self.dirty = true;
                return Step::Redraw;
            }
            Command::Move(dir) => self.pen.step(dir, width, height),
            Command::TogglePaint => self.pen.toggle(),
            Command::BackgroundUp => self.pen.background_up(),
            Command::BackgroundDown => self.pen.background_down(),
            Command::Ignore => {}
        }

        if self.pen.is_engaged() {
            self.paint_at_pen();
        }

        self.dirty = true;
        Step::Redraw
    }

    fn paint_at_pen(&mut self) {
        let pen = self.pen;
        let (x, y) = (i32::from(pen.x()), i32::from(pen.y()));
        if let Some(cell) = self.canvas.get_or_create_cell(x, y) {
            cell.set_char(PAINT_GLYPH);
            cell.set_bg(i32::from(pen.bg()));
            cell.set_fg(i32::from(pen.fg()));
            trace!(x, y, bg = pen.bg(), "painted");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pen::Direction;
    use pretty_assertions::assert_eq;
    use tp_canvas::{Cell, render};

    fn scene(w: u16, h: u16) -> Scene {
        Scene::new(Canvas::new(w, h), Pen::new(7, 0))
    }

    fn apply_all(scene: &mut Scene, commands: &[Command]) {
        for &c in commands {
            assert_eq!(scene.apply(c), Step::Redraw);
        }
    }

    #[test]
    fn new_scene_is_clean() {
        let s = scene(10, 5);
        assert!(!s.is_dirty());
        assert!(s.canvas().is_empty());
    }

    #[test]
    fn quit_changes_nothing() {
        let mut s = scene(10, 5);
        let before = s.clone();
        assert_eq!(s.apply(Command::Quit), Step::Quit);
        assert_eq!(s, before);
    }

    #[test]
    fn ignored_key_still_redraws() {
        let mut s = scene(10, 5);
        assert_eq!(s.apply(Command::Ignore), Step::Redraw);
        assert!(s.is_dirty());
        assert!(s.canvas().is_empty());
    }

    #[test]
    fn disengaged_pen_paints_nothing() {
        let mut s = scene(10, 5);
        apply_all(
            &mut s,
            &[
                Command::Move(Direction::Right),
                Command::Move(Direction::Down),
                Command::BackgroundUp,
            ],
        );
        assert!(s.canvas().is_empty());
    }

    #[test]
    fn toggle_paints_immediately() {
        let mut s = scene(10, 5);
        s.apply(Command::TogglePaint);
        assert_eq!(s.canvas().cell(0, 0), Some(&Cell::new(' ', 7, 0)));
    }

    #[test]
    fn toggle_off_does_not_paint() {
        let mut s = scene(10, 5);
        s.apply(Command::TogglePaint);
        s.apply(Command::Move(Direction::Right));
        s.apply(Command::TogglePaint);
        s.apply(Command::Move(Direction::Right));
        assert_eq!(s.canvas().len(), 2);
        assert!(s.canvas().cell(2, 0).is_none());
    }

    #[test]
    fn engaged_pen_leaves_a_trail() {
        let mut s = scene(10, 5);
        s.apply(Command::TogglePaint);
        for _ in 0..3 {
            s.apply(Command::Move(Direction::Right));
        }
        assert_eq!(s.canvas().len(), 4);
        for x in 0..4 {
            assert!(s.canvas().cell(x, 0).is_some());
        }
    }

    #[test]
    fn background_change_repaints_cell_under_pen() {
        let mut s = scene(10, 5);
        s.apply(Command::TogglePaint);
        s.apply(Command::BackgroundUp);
        s.apply(Command::BackgroundUp);
        assert_eq!(s.canvas().cell(0, 0).unwrap().bg(), 2);
        assert_eq!(s.canvas().len(), 1);
    }

    #[test]
    fn background_down_from_zero_paints_255() {
        let mut s = scene(10, 5);
        s.apply(Command::TogglePaint);
        s.apply(Command::BackgroundDown);
        assert_eq!(s.canvas().cell(0, 0).unwrap().bg(), 255);
    }

    #[test]
    fn clear_wipes_without_repainting() {
        let mut s = scene(10, 5);
        s.apply(Command::TogglePaint);
        s.apply(Command::Move(Direction::Right));
        assert_eq!(s.canvas().len(), 2);

        s.take_dirty();
        assert_eq!(s.apply(Command::Clear), Step::Redraw);
        assert!(s.is_dirty());
        assert!(s.canvas().is_empty(), "clear must not paint under the pen");
        assert!(s.pen().is_engaged());
        assert!(render(s.canvas()).is_empty());
    }

    #[test]
    fn move_at_edge_keeps_position() {
        let mut s = scene(10, 5);
        s.apply(Command::Move(Direction::Left));
        s.apply(Command::Move(Direction::Up));
        assert_eq!((s.pen().x(), s.pen().y()), (0, 0));
    }

    #[test]
    fn take_dirty_resets() {
        let mut s = scene(10, 5);
        s.apply(Command::Ignore);
        assert!(s.take_dirty());
        assert!(!s.take_dirty());
    }

    // Canvas 10×5, pen at the origin: right, down, toggle, then one more
    // (unbound) key while engaged.
    #[test]
    fn right_down_toggle_paint_scenario() {
        let mut s = scene(10, 5);
        apply_all(
            &mut s,
            &[
                Command::Move(Direction::Right),
                Command::Move(Direction::Down),
                Command::TogglePaint,
                Command::Ignore,
            ],
        );

        assert_eq!(s.canvas().len(), 1);
        assert_eq!(s.canvas().cell(1, 1), Some(&Cell::new(' ', 7, 0)));

        let frame = String::from_utf8(render(s.canvas())).unwrap();
        assert_eq!(frame, "\x1b[2;2H\x1b[38;5;7m\x1b[48;5;0m \x1b[0m");
        assert_eq!(frame.matches("\x1b[2;2H").count(), 1);
    }
}
