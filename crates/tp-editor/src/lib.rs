// SPDX-License-Identifier: MIT
//
// tp-editor — the paint program's core for tpaint.
//
// Two loops share one scene:
//
//   stdin → KeySource → Keymap → Command → Scene::apply   (input loop)
//   Scene (dirty) → render → FrameSink → stdout            (output loop)
//
// `Shared` owns the scene behind a single mutex together with the redraw
// condvar and the termination flag. The loops in `pipeline` only talk to
// the terminal through the `KeySource` and `FrameSink` traits, so tests
// drive them with scripted keys and a recording sink.

pub mod keymap;
pub mod pen;
pub mod pipeline;
pub mod scene;
pub mod shared;

pub use keymap::{Command, DEFAULT_FOREGROUND, EditorConfig, Keymap};
pub use pen::{Direction, Pen};
pub use pipeline::{run_input, run_output};
pub use scene::{PAINT_GLYPH, Scene, Step};
pub use shared::Shared;
