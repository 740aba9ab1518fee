// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Stdin key reader — hands the input loop one key at a time.
//
// The input loop owns this reader on its own thread. Each call to
// `poll_key` blocks on stdin's file descriptor with `poll()` and a short
// timeout, so the loop wakes up regularly to check the shared termination
// flag even when nobody is typing. Cancellation stays cooperative: nothing
// ever interrupts a blocked read from outside.
//
// One `read()` can deliver several keys (a fast typist, a paste, an arrow
// escape sequence). They are decoded together and queued, then returned
// in arrival order, one per call.

use std::collections::VecDeque;
use std::io;

use tracing::{debug, trace};

use crate::keys::{Decoder, Key};

/// Byte chunk read from stdin per `read()` call.
const READ_BUF_SIZE: usize = 1024;

/// How long one `poll_key` call waits for input before reporting idle
/// (milliseconds). Bounds how long the input loop takes to notice that
/// something else asked the program to quit.
pub const POLL_TIMEOUT_MS: i32 = 50;

// ─── KeySource ──────────────────────────────────────────────────────────────

/// Outcome of one attempt to read a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPoll {
    /// A key arrived.
    Key(Key),
    /// Nothing arrived within the poll timeout.
    Idle,
    /// The input stream ended (EOF). No more keys will ever arrive.
    Closed,
}

/// Something the input loop can pull keys from.
///
/// Implemented by [`StdinKeys`] for the real terminal; tests script it.
pub trait KeySource {
    /// Wait a bounded time for the next key.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn poll_key(&mut self) -> io::Result<KeyPoll>;
}

// ─── StdinKeys ──────────────────────────────────────────────────────────────

/// Key source backed by the process's stdin.
///
/// Expects the terminal to already be in raw mode; otherwise keys only
/// show up after Enter.
#[derive(Debug, Default)]
pub struct StdinKeys {
    decoder: Decoder,
    queue: VecDeque<Key>,
    closed: bool,
}

impl StdinKeys {
    /// Create a reader over stdin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(unix)]
    fn fill(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        let fd = io::stdin().as_raw_fd();
        let mut buf = [0u8; READ_BUF_SIZE];

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
        };

        if ready < 0 {
            let err = io::Error::last_os_error();
            return if err.kind() == io::ErrorKind::Interrupted {
                Ok(())
            } else {
                Err(err)
            };
        }

        if ready == 0 {
            // Quiet: a held ESC is a real Escape press now.
            self.queue.extend(self.decoder.flush());
            return Ok(());
        }

        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };

        if n < 0 {
            let err = io::Error::last_os_error();
            return if err.kind() == io::ErrorKind::Interrupted {
                Ok(())
            } else {
                Err(err)
            };
        }

        if n == 0 {
            debug!("stdin reached end of stream");
            self.queue.extend(self.decoder.flush());
            self.closed = true;
            return Ok(());
        }

        #[allow(clippy::cast_sign_loss)] // n > 0 checked above.
        let chunk = &buf[..n as usize];
        trace!(bytes = chunk.len(), "stdin chunk");
        self.queue.extend(self.decoder.advance(chunk));
        Ok(())
    }

    /// Non-unix fallback: a plain blocking read, no idle reports.
    #[cfg(not(unix))]
    fn fill(&mut self) -> io::Result<()> {
        use std::io::Read;

        let mut buf = [0u8; READ_BUF_SIZE];
        match io::stdin().lock().read(&mut buf) {
            Ok(0) => {
                self.queue.extend(self.decoder.flush());
                self.closed = true;
                Ok(())
            }
            Ok(n) => {
                self.queue.extend(self.decoder.advance(&buf[..n]));
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl KeySource for StdinKeys {
    fn poll_key(&mut self) -> io::Result<KeyPoll> {
        if self.queue.is_empty() && !self.closed {
            self.fill()?;
        }
        Ok(match self.queue.pop_front() {
            Some(key) => KeyPoll::Key(key),
            None if self.closed => KeyPoll::Closed,
            None => KeyPoll::Idle,
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
