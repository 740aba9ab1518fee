// SPDX-License-Identifier: MIT
//
// The two loops — producer (keys → scene) and consumer (scene → screen).
//
//   Input loop                          Output loop
//   ----------                          -----------
//   poll one key (≤ one poll tick)      wait on `dirty || quitting`
//   keymap → command                    render under the scene lock
//   apply under the scene lock          clear screen + write frame
//   notify                 ──────────▶  (repeat)
//
// Each loop runs on its own thread and shares nothing but `Shared`.
// Cancellation is cooperative: the input loop re-checks the termination
// flag after every poll, the output loop wakes on it. Whichever loop hits
// an error raises the flag on its way out so the other one follows.

use std::io;

use tp_term::{FrameSink, KeyPoll, KeySource};
use tracing::{debug, error, info};

use crate::keymap::Keymap;
use crate::scene::Step;
use crate::shared::Shared;

/// Run the input loop until quit, end of input, or a read error.
///
/// # Errors
///
/// Returns the read error after raising the termination flag.
pub fn run_input(shared: &Shared, keys: &mut impl KeySource, keymap: &Keymap) -> io::Result<()> {
    info!("input loop started");

    while !shared.is_quitting() {
        let key = match keys.poll_key() {
            Ok(KeyPoll::Key(key)) => key,
            Ok(KeyPoll::Idle) => continue,
            Ok(KeyPoll::Closed) => {
                info!("input closed, quitting");
                shared.request_quit();
                break;
            }
            Err(e) => {
                error!(error = %e, "reading input failed");
                shared.request_quit();
                return Err(e);
            }
        };

        debug!(?key, "key");
        if shared.dispatch(keymap.command(key)) == Step::Quit {
            break;
        }
    }

    info!("input loop finished");
    Ok(())
}

/// Run the output loop until termination is requested or a write fails.
///
/// # Errors
///
/// Returns the write error after raising the termination flag.
pub fn run_output(shared: &Shared, sink: &mut impl FrameSink) -> io::Result<()> {
    info!("output loop started");

    let mut frames: u64 = 0;
    while let Some(frame) = shared.next_frame() {
        if let Err(e) = sink.present(&frame) {
            error!(error = %e, "writing frame failed");
            shared.request_quit();
            return Err(e);
        }
        frames += 1;
    }

    info!(frames, "output loop finished");
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
