// SPDX-License-Identifier: MIT
//
// tp-canvas — the paint model for tpaint.
//
// Plain data and pure functions: a `Cell` is a glyph and two palette
// indices, a `Canvas` is a fixed-size sparse grid of them, and `render`
// turns a canvas into the byte stream for one full-screen frame. No
// threads, no I/O, no dynamic dispatch; synchronization is the caller's
// business.

pub mod canvas;
pub mod cell;
pub mod render;

pub use canvas::Canvas;
pub use cell::{Cell, coerce_color};
pub use render::{render, render_into};
