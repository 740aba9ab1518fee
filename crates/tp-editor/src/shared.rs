// SPDX-License-Identifier: MIT
//
// Shared — the state and signal that couple the input and output loops.
//
// One mutex guards the whole scene (canvas + pen + dirty flag). The input
// loop holds it for the duration of one command; the output loop holds it
// for the duration of one render pass. No canvas read or write happens
// outside it, so a render never observes a half-updated cell.
//
// The condition variable is a wake-up hint, not an event queue. The output
// loop waits on the predicate `dirty || quitting`, which makes spurious
// wakeups harmless and coalesces bursts: ten keystrokes that land before
// the output loop gets the lock produce one render of the latest state.
//
// Termination is an atomic flag. Whoever sets it first (quit key, end of
// input, a failing loop) also wakes the output loop. The notify happens
// after briefly taking the mutex, so the wake can't slip in between the
// waiter's predicate check and its wait.
//
// Lifecycle: built once by the binary before either loop starts, handed to
// both as `Arc<Shared>`, dropped after both threads are joined.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tp_canvas::render;
use tracing::{debug, info};

use crate::keymap::Command;
use crate::scene::{Scene, Step};

/// Scene behind a mutex, plus the redraw signal and the termination flag.
#[derive(Debug)]
pub struct Shared {
    scene: Mutex<Scene>,
    redraw: Condvar,
    quit: AtomicBool,
}

impl Shared {
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        Self {
            scene: Mutex::new(scene),
            redraw: Condvar::new(),
            quit: AtomicBool::new(false),
        }
    }

    /// Lock the scene.
    ///
    /// A panic in one loop must not wedge the other, so a poisoned lock is
    /// recovered rather than propagated; the scene is plain data and stays
    /// consistent between commands.
    fn lock(&self) -> MutexGuard<'_, Scene> {
        self.scene.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the scene.
    pub fn with_scene<R>(&self, f: impl FnOnce(&mut Scene) -> R) -> R {
        f(&mut self.lock())
    }

    /// Apply one command under the lock and wake the output loop.
    ///
    /// Returns [`Step::Quit`] for the quit command, which also raises the
    /// termination flag.
    pub fn dispatch(&self, command: Command) -> Step {
        let step = self.lock().apply(command);
        debug!(?command, ?step, "dispatched");

        match step {
            Step::Quit => {
                self.request_quit();
            }
            Step::Redraw => self.redraw.notify_all(),
        }
        step
    }

    /// Raise the termination flag and wake every waiter.
    ///
    /// Returns `true` only for the call that actually raised it.
    pub fn request_quit(&self) -> bool {
        let first = !self.quit.swap(true, Ordering::SeqCst);
        if first {
            info!("quit requested");
        }
        drop(self.lock());
        self.redraw.notify_all();
        first
    }

    /// Whether termination has been requested.
    #[inline]
    #[must_use]
    pub fn is_quitting(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }

    /// Block until there is something to draw, then render it.
    ///
    /// Returns `None` once termination is requested. The render pass runs
    /// under the scene lock; the returned bytes are written by the caller
    /// after the lock is released.
    pub fn next_frame(&self) -> Option<Vec<u8>> {
        let guard = self.lock();
        let mut scene = self
            .redraw
            .wait_while(guard, |s| !s.is_dirty() && !self.is_quitting())
            .unwrap_or_else(PoisonError::into_inner);

        if self.is_quitting() {
            return None;
        }

        scene.take_dirty();
        Some(render(scene.canvas()))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
