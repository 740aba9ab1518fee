// SPDX-License-Identifier: MIT
//
// tpaint — a full-screen terminal pixel-canvas editor.
//
// This is the main binary that wires together all the crates:
//
//   tp-term   → raw mode, alternate screen, size query, key reader, frame sink
//   tp-canvas → cells, the sparse canvas, the full-frame renderer
//   tp-editor → pen, keymap, scene, and the two loops
//
// Startup queries the terminal once, sizes the canvas to it, enters
// full-screen mode, and spawns two threads:
//
//   input-loop   stdin → key → command → scene          (producer)
//   output-loop  scene → frame → stdout                  (consumer)
//
// The main thread only joins them. Whichever loop finishes first raises
// the shared termination flag, so the other one follows. The terminal is
// restored before anything is printed to stderr.
//
// Diagnostics are opt-in: set `TPAINT_LOG` to a filter directive (e.g.
// `debug` or `tp_editor=trace`) and logs go to `tpaint.log` in the current
// directory. Nothing is ever logged to the screen being painted on.

use std::env;
use std::io;
use std::process;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, anyhow};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use tp_canvas::Canvas;
use tp_editor::{EditorConfig, Pen, Scene, Shared, run_input, run_output};
use tp_term::{StdinKeys, StdoutSink, Terminal};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "TPAINT_LOG";

/// Log file name, created in the current directory.
const LOG_FILE: &str = "tpaint.log";

// ─── Logging ────────────────────────────────────────────────────────────────

/// Install the file logger if `TPAINT_LOG` is set.
///
/// The returned guard flushes the background writer on drop, so it must
/// outlive every log call.
fn init_logging() -> Option<WorkerGuard> {
    let directive = env::var(LOG_ENV).ok()?;

    let appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .ok()?;

    Some(guard)
}

// ─── Thread plumbing ────────────────────────────────────────────────────────

/// Raises the termination flag when dropped.
///
/// Each loop thread owns one, so the flag goes up however the thread ends:
/// normal return, error, or panic. Without it a panicking output loop
/// would leave the input loop polling forever.
struct QuitOnExit(Arc<Shared>);

impl Drop for QuitOnExit {
    fn drop(&mut self) {
        self.0.request_quit();
    }
}

/// Spawn a named loop thread that raises the termination flag on exit.
fn spawn_loop<F>(name: &str, shared: &Arc<Shared>, body: F) -> Result<JoinHandle<io::Result<()>>>
where
    F: FnOnce(&Shared) -> io::Result<()> + Send + 'static,
{
    let guard = QuitOnExit(Arc::clone(shared));
    thread::Builder::new()
        .name(name.to_owned())
        .spawn(move || body(&guard.0))
        .with_context(|| format!("spawning {name}"))
}

/// Join a loop thread, turning a panic into an error.
fn join_loop(name: &str, handle: JoinHandle<io::Result<()>>) -> Result<()> {
    match handle.join() {
        Ok(result) => result.with_context(|| format!("{name} failed")),
        Err(_) => Err(anyhow!("{name} panicked")),
    }
}

/// Join both loops, then restore the terminal, whatever the loops did.
///
/// The first failure wins: input loop, then output loop, then restore.
fn finish(
    input: JoinHandle<io::Result<()>>,
    output: JoinHandle<io::Result<()>>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<()> {
    let input_result = join_loop("input loop", input);
    let output_result = join_loop("output loop", output);
    let restored = restore();

    input_result?;
    output_result?;
    restored
}

// ─── Session ────────────────────────────────────────────────────────────────

/// Run one painting session until quit.
fn run(config: EditorConfig) -> Result<()> {
    let mut terminal = Terminal::new().context("terminal capability unavailable")?;
    let size = terminal.size();
    info!(cols = size.cols, rows = size.rows, "starting");

    terminal.enter().context("entering full-screen mode")?;

    let scene = Scene::new(
        Canvas::new(size.cols, size.rows),
        Pen::new(config.foreground, config.background),
    );
    let shared = Arc::new(Shared::new(scene));

    let output = spawn_loop("output-loop", &shared, |shared| {
        run_output(shared, &mut StdoutSink::new())
    })?;

    let keymap = config.keymap;
    let input = match spawn_loop("input-loop", &shared, move |shared| {
        run_input(shared, &mut StdinKeys::new(), &keymap)
    }) {
        Ok(handle) => handle,
        Err(e) => {
            shared.request_quit();
            let _ = output.join();
            return Err(e);
        }
    };

    finish(input, output, || {
        terminal.leave().context("restoring terminal")
    })?;

    info!("finished");
    Ok(())
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let log_guard = init_logging();

    let result = run(EditorConfig::default());
    if let Err(e) = &result {
        error!("exiting with error: {e:#}");
    }
    drop(log_guard);

    if let Err(e) = result {
        eprintln!("tpaint: {e:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
