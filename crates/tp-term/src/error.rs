// SPDX-License-Identifier: MIT
//
// Startup failures of the terminal capability.
//
// The paint program cannot do anything useful without a controllable
// terminal, so every variant here is fatal. Each message names the
// capability that failed so the user knows what to fix.

use std::io;

/// A terminal capability the program needs could not be acquired.
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    /// Stdin is not connected to a terminal (piped or redirected).
    #[error("stdin is not a terminal")]
    NotATty,

    /// `ioctl(TIOCGWINSZ)` failed or reported a zero-sized window.
    #[error("could not query the terminal size")]
    SizeQuery,

    /// Reading or writing the termios configuration failed.
    #[error("could not switch the terminal into raw mode")]
    RawMode(#[source] io::Error),

    /// Putting the saved termios configuration back failed.
    #[error("could not restore the terminal's input mode")]
    Restore(#[source] io::Error),

    /// Writing the mode-switch sequences to stdout failed.
    #[error("could not write terminal control sequences")]
    Output(#[source] io::Error),
}
