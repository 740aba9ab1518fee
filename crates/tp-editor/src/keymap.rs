// SPDX-License-Identifier: MIT
//
// Commands, key bindings, and editor configuration.
//
// The input loop never looks at raw keys: the keymap translates each key
// into a `Command` first. Defaults follow the classic layout — WASD (and
// the arrow keys) to move, space to toggle the pen, `x`/`z` to cycle the
// background, `c` to wipe the canvas, `q` (or Ctrl-C) to leave.

use std::collections::HashMap;

use tp_term::Key;

use crate::pen::Direction;

// ─── Command ─────────────────────────────────────────────────────────────────

/// What one keypress asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Stop both loops and exit.
    Quit,
    /// Move the pen one cell.
    Move(Direction),
    /// Free every painted cell.
    Clear,
    /// Engage or disengage the pen.
    TogglePaint,
    /// Next background color (255 wraps to 0).
    BackgroundUp,
    /// Previous background color (0 wraps to 255).
    BackgroundDown,
    /// Unbound key: no state change.
    Ignore,
}

// ─── Keymap ──────────────────────────────────────────────────────────────────

/// Key → command table.
///
/// ```
/// use tp_editor::keymap::{Command, Keymap};
/// use tp_editor::pen::Direction;
/// use tp_term::Key;
///
/// let keymap = Keymap::default();
/// assert_eq!(keymap.command(Key::Char('w')), Command::Move(Direction::Up));
/// assert_eq!(keymap.command(Key::Char('?')), Command::Ignore);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<Key, Command>,
}

impl Keymap {
    /// A keymap with no bindings at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `key` to `command`, replacing any previous binding.
    pub fn bind(&mut self, key: Key, command: Command) -> &mut Self {
        self.bindings.insert(key, command);
        self
    }

    /// The command for `key`; [`Command::Ignore`] when unbound.
    #[must_use]
    pub fn command(&self, key: Key) -> Command {
        self.bindings.get(&key).copied().unwrap_or(Command::Ignore)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(Key::Char('q'), Command::Quit)
            .bind(Key::CtrlC, Command::Quit)
            .bind(Key::Char('w'), Command::Move(Direction::Up))
            .bind(Key::Char('a'), Command::Move(Direction::Left))
            .bind(Key::Char('s'), Command::Move(Direction::Down))
            .bind(Key::Char('d'), Command::Move(Direction::Right))
            .bind(Key::Up, Command::Move(Direction::Up))
            .bind(Key::Left, Command::Move(Direction::Left))
            .bind(Key::Down, Command::Move(Direction::Down))
            .bind(Key::Right, Command::Move(Direction::Right))
            .bind(Key::Char('c'), Command::Clear)
            .bind(Key::Char(' '), Command::TogglePaint)
            .bind(Key::Char('x'), Command::BackgroundUp)
            .bind(Key::Char('z'), Command::BackgroundDown);
        map
    }
}

// ─── EditorConfig ────────────────────────────────────────────────────────────

/// Foreground color the pen paints with unless configured otherwise.
pub const DEFAULT_FOREGROUND: u8 = 7;

/// Everything about the editor that is fixed for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Key bindings.
    pub keymap: Keymap,
    /// Foreground palette index for every painted cell.
    pub foreground: u8,
    /// Starting background palette index.
    pub background: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            keymap: Keymap::default(),
            foreground: DEFAULT_FOREGROUND,
            background: 0,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
