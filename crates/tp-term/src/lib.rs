// SPDX-License-Identifier: MIT
//
// tp-term — terminal capability layer for tpaint.
//
// Everything the paint program needs from the terminal and nothing more:
// raw mode and the alternate screen with guaranteed restore, a one-shot
// size query, a key reader that never blocks longer than one poll tick,
// and a frame sink that repaints the whole screen per frame. Control is
// done with raw termios and hand-written ANSI sequences; there is no TUI
// framework underneath.

pub mod ansi;
pub mod error;
pub mod keys;
pub mod reader;
pub mod sink;
pub mod terminal;

pub use error::TermError;
pub use keys::Key;
pub use reader::{KeyPoll, KeySource, StdinKeys};
pub use sink::{FrameSink, StdoutSink};
pub use terminal::{Size, Terminal};
