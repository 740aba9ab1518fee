// SPDX-License-Identifier: MIT
//
// Renderer — serializes the canvas into one terminal frame.
//
// Every render is a full repaint of the painted cells; there is no diff
// against the previous frame. The caller clears the screen first, so
// positions that were never painted (or were cleared) stay as terminal
// background simply by emitting nothing for them.
//
// Each painted cell is self-contained:
//
//   CUP(row, col)  SGR 38;5;fg  SGR 48;5;bg  <glyph>  SGR 0
//
// Because every cell positions the cursor itself, emission order doesn't
// affect what ends up on screen. It is still row-major (the canvas
// iterates that way) so output is deterministic and easy to assert on.

use std::io::{self, Write};

use tp_term::ansi;

use crate::canvas::Canvas;
use crate::cell::Cell;

/// Rough byte cost of one cell, used to size the output buffer.
const CELL_BYTES: usize = 40;

/// Render every painted cell of `canvas` into a fresh byte buffer.
///
/// An empty canvas renders to an empty frame.
#[must_use]
pub fn render(canvas: &Canvas) -> Vec<u8> {
    let mut out = Vec::with_capacity(canvas.len() * CELL_BYTES);
    // Writing into a Vec cannot fail.
    let _ = render_into(canvas, &mut out);
    out
}

/// Render every painted cell of `canvas` into `w`.
///
/// # Errors
///
/// Propagates write errors from `w`.
pub fn render_into(canvas: &Canvas, w: &mut impl Write) -> io::Result<()> {
    for (x, y, cell) in canvas.painted() {
        write_cell(w, x, y, cell)?;
    }
    Ok(())
}

fn write_cell(w: &mut impl Write, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
    ansi::cursor_to(w, x, y)?;
    ansi::fg_indexed(w, cell.fg())?;
    ansi::bg_indexed(w, cell.bg())?;
    let mut enc = [0u8; 4];
    w.write_all(cell.ch().encode_utf8(&mut enc).as_bytes())?;
    w.write_all(ansi::RESET)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
