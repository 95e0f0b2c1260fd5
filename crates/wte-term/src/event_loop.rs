// SPDX-License-Identifier: MIT
//
// Event loop — the heartbeat of the editor.
//
// One iteration is: render the screen, block for one key, dispatch it.
// The render always precedes its read and the dispatch always follows the
// read that produced its key, so by the time the quit key is seen the last
// frame is on screen and nothing else is in flight. The caller then drops
// (or exits) its `RawMode` guard and the terminal is back to normal.
//
// # States
//
//   Running ──(quit key)──▶ Terminated
//
// `Terminated` is final. Errors are not a state: they propagate out of
// `run` with `?` and the caller's guard restores the terminal on the way.
//
// # Dispatch
//
// There is no buffer to edit yet, so every key other than the quit key is
// a no-op apart from a debug log line with its code, in the same format the
// early key-dump builds of the editor printed to the screen:
//
//   3            Ctrl-C (control codes: number only)
//   113 ('q')    printable: number and the character

use std::io::Write;

use log::debug;

use crate::error::Result;
use crate::reader::KeyReader;
use crate::screen::Screen;
use crate::terminal::Size;
use crate::tty::Tty;

// ─── Keys ────────────────────────────────────────────────────────────────────

/// The byte a terminal sends for Ctrl + `key`.
///
/// Ctrl clears bits 5 and 6, so `ctrl_key(b'q')` is 17 (DC1).
#[inline]
#[must_use]
pub const fn ctrl_key(key: u8) -> u8 {
    key & 0x1f
}

/// Describe a key for the debug log: the code alone for control bytes
/// (0–31 and 127), the code followed by the character otherwise.
#[must_use]
pub fn describe_key(key: u8) -> String {
    if key.is_ascii_control() {
        format!("{key}")
    } else {
        format!("{key} ('{}')", char::from(key))
    }
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// What the loop does after a key is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Decide what a key means.
#[must_use]
pub fn dispatch(key: u8, config: &LoopConfig) -> Action {
    if key == config.quit_key {
        return Action::Quit;
    }
    debug!("key {}", describe_key(key));
    Action::Continue
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Configuration for the event loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// The byte that ends the session. Default: `q`.
    pub quit_key: u8,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { quit_key: b'q' }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Whether the loop is still going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// The render → read → dispatch loop.
///
/// Owns the key reader and the renderer, and carries the screen size it
/// was built with. Does not own raw mode: the caller holds the
/// [`RawMode`](crate::terminal::RawMode) guard for as long as the loop runs.
///
/// # Example
///
/// ```no_run
/// use wte_term::event_loop::EventLoop;
/// use wte_term::terminal::{RawMode, query_size};
/// use wte_term::tty::StdioTty;
///
/// let tty = StdioTty::new();
/// let raw = RawMode::enter(&tty)?;
/// let size = query_size(&tty)?;
/// EventLoop::new(&tty, size).run(&mut std::io::stdout())?;
/// raw.exit()?;
/// # Ok::<(), wte_term::error::Error>(())
/// ```
pub struct EventLoop<T: Tty> {
    reader: KeyReader<T>,
    screen: Screen,
    size: Size,
    config: LoopConfig,
    state: LoopState,
}

impl<T: Tty> EventLoop<T> {
    /// Create an event loop with the default configuration.
    #[must_use]
    pub fn new(tty: T, size: Size) -> Self {
        Self::with_config(tty, size, LoopConfig::default())
    }

    /// Create an event loop with a custom configuration.
    #[must_use]
    pub fn with_config(tty: T, size: Size, config: LoopConfig) -> Self {
        Self {
            reader: KeyReader::new(tty),
            screen: Screen::new(),
            size,
            config,
            state: LoopState::Running,
        }
    }

    /// The screen size the loop renders for.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Run one iteration: render, read one key, dispatch it.
    ///
    /// Does nothing once the loop has terminated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`](crate::error::Error::Output) if the frame
    /// cannot be written and [`Error::Read`](crate::error::Error::Read) if
    /// the key cannot be read.
    pub fn step(&mut self, out: &mut impl Write) -> Result<LoopState> {
        if self.state == LoopState::Terminated {
            return Ok(self.state);
        }

        self.screen.render(self.size.rows, out)?;
        let key = self.reader.read_key()?;

        if dispatch(key, &self.config) == Action::Quit {
            debug!("quit key received");
            self.state = LoopState::Terminated;
        }

        Ok(self.state)
    }

    /// Run until the quit key is read.
    ///
    /// # Errors
    ///
    /// Returns the first render or read failure. The loop stops there and
    /// stays `Running`; the caller is expected to give up.
    pub fn run(&mut self, out: &mut impl Write) -> Result<()> {
        while self.step(out)? == LoopState::Running {}
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
