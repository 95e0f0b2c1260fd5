// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — that's the `Screen`'s job. This module
// just knows the byte-level encoding of the few VT100 commands the editor
// sends, and those bytes are the contract with the terminal.
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).

use std::io::{self, Write};

/// ED 2: erase the entire screen. Does not move the cursor.
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";

/// CUP with no parameters: cursor to row 1, column 1.
pub const CURSOR_HOME: &[u8] = b"\x1b[H";

/// Clear the screen, then home the cursor.
///
/// Used on the way out (clean quit, fatal error, panic) so the shell prompt
/// comes back on a clean page.
pub const RESET_SCREEN: &[u8] = b"\x1b[2J\x1b[H";

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CLEAR_SCREEN)
}

/// Move the cursor to the top-left corner (CUP).
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CURSOR_HOME)
}

/// Clear the screen and home the cursor, then flush.
///
/// # Errors
///
/// Returns an error if writing to or flushing `w` fails.
pub fn reset_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(RESET_SCREEN)?;
    w.flush()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
