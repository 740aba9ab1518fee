// SPDX-License-Identifier: MIT
//
// Terminal handle — capability checks, full-screen takeover, guaranteed
// handback.
//
// Safety: termios, the window-size ioctl, isatty and the panic-path write
// are raw POSIX calls with no safe std equivalent. Every unsafe block here
// wraps exactly one of them.
#![allow(unsafe_code)]
//
// Two layers:
//
//   RawMode   owns the saved termios and knows how to put them back
//   Terminal  owns the input mode while active, plus the screen takeover;
//             leaving (or dropping) writes the handback, then restores
//
// A panic anywhere (including inside one of the loop threads) must not
// leave the user's shell in raw mode on the alternate screen. The saved
// termios is therefore mirrored into a process-wide slot the panic hook
// can reach, and the hook writes `ansi::HANDBACK` straight to fd 1: the
// output loop may be holding Rust's stdout lock at the moment of the panic.

use std::io::{self, Write};
use std::sync::{Mutex, Once, PoisonError};

use tracing::{debug, info, warn};

use crate::ansi;
use crate::error::TermError;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Window dimensions in character cells, both at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

/// Ask the kernel for the window size of the terminal on stdout.
///
/// `None` when stdout isn't a terminal or either dimension is zero (some
/// pseudo-terminals report 0×0 before the emulator has laid itself out).
#[cfg(unix)]
fn window_size() -> Option<Size> {
    let mut ws = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (rc == 0 && ws.ws_col != 0 && ws.ws_row != 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
const fn window_size() -> Option<Size> {
    None
}

#[cfg(unix)]
fn stdin_is_terminal() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
const fn stdin_is_terminal() -> bool {
    false
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Termios saved by the live [`RawMode`], for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// An input mode the terminal can be switched back out of.
trait InputMode {
    /// Put the terminal back the way it was before the mode was entered.
    fn restore(&mut self) -> io::Result<()>;
}

/// Stdin switched to byte-at-a-time input.
#[cfg(unix)]
struct RawMode {
    saved: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Save the current termios and switch stdin to raw input.
    ///
    /// No echo, no line buffering, no signal keys: Ctrl-C reaches the input
    /// loop as byte 0x03. `VMIN=1 VTIME=0` makes `read()` return as soon as
    /// one byte is available; the reader bounds its wait with `poll()`.
    fn enable() -> io::Result<Self> {
        let mut saved = std::mem::MaybeUninit::<libc::termios>::uninit();
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, saved.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        // tcgetattr succeeded, so every field was written.
        let saved = unsafe { saved.assume_init() };

        let mut raw = saved;
        raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag |= libc::CS8;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;

        set_termios(&raw)?;
        *SAVED_TERMIOS.lock().unwrap_or_else(PoisonError::into_inner) = Some(saved);
        debug!("raw mode on");
        Ok(Self { saved })
    }
}

#[cfg(unix)]
impl InputMode for RawMode {
    fn restore(&mut self) -> io::Result<()> {
        *SAVED_TERMIOS.lock().unwrap_or_else(PoisonError::into_inner) = None;
        set_termios(&self.saved)?;
        debug!("raw mode off");
        Ok(())
    }
}

#[cfg(unix)]
fn set_termios(t: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, t) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    fn enable() -> io::Result<Self> {
        Err(io::Error::other("raw mode needs a unix terminal"))
    }
}

#[cfg(not(unix))]
impl InputMode for RawMode {
    fn restore(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic path ─────────────────────────────────────────────────────────────

static HOOK: Once = Once::new();

/// Chain a hook that hands the screen back before the panic message prints.
fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            handback_unlocked();
            previous(info);
        }));
    });
}

/// Restore screen and termios without touching any Rust-level lock that a
/// panicking thread might hold.
fn handback_unlocked() {
    #[cfg(unix)]
    {
        let _ = unsafe {
            libc::write(
                libc::STDOUT_FILENO,
                ansi::HANDBACK.as_ptr().cast(),
                ansi::HANDBACK.len(),
            )
        };
        if let Ok(slot) = SAVED_TERMIOS.try_lock() {
            if let Some(saved) = slot.as_ref() {
                let _ = set_termios(saved);
            }
        }
    }

    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(ansi::HANDBACK);
        let _ = out.flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The controlling terminal, checked at construction and restored on drop.
///
/// ```no_run
/// use tp_term::Terminal;
///
/// let mut term = Terminal::new()?;
/// term.enter()?;
/// let size = term.size();
/// // ... paint on a size.cols × size.rows canvas ...
/// term.leave()?;
/// # Ok::<(), tp_term::TermError>(())
/// ```
pub struct Terminal {
    size: Size,
    mode: Option<Box<dyn InputMode>>,
}

impl Terminal {
    /// Check that stdin is a terminal and read the window size once.
    ///
    /// Nothing about the terminal is changed yet.
    ///
    /// # Errors
    ///
    /// [`TermError::NotATty`] for a piped or redirected stdin,
    /// [`TermError::SizeQuery`] when no usable window size is reported.
    pub fn new() -> Result<Self, TermError> {
        if !stdin_is_terminal() {
            return Err(TermError::NotATty);
        }
        let size = window_size().ok_or(TermError::SizeQuery)?;
        debug!(cols = size.cols, rows = size.rows, "window size");
        Ok(Self { size, mode: None })
    }

    /// Window size read by [`new`](Self::new). Never re-queried.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Whether the screen is currently taken over.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.mode.is_some()
    }

    /// Raw input, alternate screen, hidden cursor, blank screen.
    ///
    /// Does nothing when already active.
    ///
    /// # Errors
    ///
    /// [`TermError::RawMode`] if termios can't be switched,
    /// [`TermError::Output`] if the takeover sequence can't be written.
    /// After an `Output` error the handle is active and must be left.
    pub fn enter(&mut self) -> Result<(), TermError> {
        if self.is_active() {
            return Ok(());
        }
        install_panic_hook();

        let raw = RawMode::enable().map_err(TermError::RawMode)?;
        self.take_over(Box::new(raw), &mut io::stdout().lock())
    }

    /// Hand the screen back and restore the saved termios.
    ///
    /// Does nothing when not active. Termios is restored even if the
    /// handback sequence can't be written.
    ///
    /// # Errors
    ///
    /// [`TermError::Output`] if the handback sequence can't be written,
    /// [`TermError::Restore`] if termios can't be put back.
    pub fn leave(&mut self) -> Result<(), TermError> {
        self.hand_back(&mut io::stdout().lock())
    }

    /// Record `mode` as active and write the takeover sequence to `out`.
    fn take_over(&mut self, mode: Box<dyn InputMode>, out: &mut impl Write) -> Result<(), TermError> {
        if self.is_active() {
            return Ok(());
        }
        // From here on `leave` has something to undo, even if the write fails.
        self.mode = Some(mode);
        send(out, ansi::TAKEOVER).map_err(TermError::Output)?;

        info!("screen taken over");
        Ok(())
    }

    /// Write the handback sequence to `out`, then restore the input mode.
    fn hand_back(&mut self, out: &mut impl Write) -> Result<(), TermError> {
        let Some(mut mode) = self.mode.take() else {
            return Ok(());
        };
        let sent = send(out, ansi::HANDBACK);
        let restored = mode.restore();

        if let Err(e) = &restored {
            warn!(error = %e, "could not restore termios");
        }
        sent.map_err(TermError::Output)?;
        restored.map_err(TermError::Restore)?;

        info!("screen handed back");
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

fn send(out: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)?;
    out.flush()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
