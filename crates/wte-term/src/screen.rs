// SPDX-License-Identifier: MIT
//
// Screen refresh.
//
// Every frame is a full redraw: clear, home, one placeholder row per
// screen line, home again. There is no text buffer yet, so every row is
// the same `~`. When one exists, `draw_rows` is where its lines go.
//
// The last row also ends in CRLF. On a terminal exactly `rows` tall that
// scrolls the first `~` off the top; the trailing cursor-home still lands
// on the top row, so the frame looks the same to the user.

use std::io::Write;

use crate::ansi;
use crate::error::{Error, Result};
use crate::output::OutputBuffer;

/// Glyph drawn at the start of every row past the end of the (empty) buffer.
pub const PLACEHOLDER: u8 = b'~';

/// Row terminator. Output post-processing is off in raw mode, so the
/// carriage return has to be sent explicitly.
pub const ROW_END: &[u8] = b"\r\n";

/// Full-screen renderer.
///
/// Owns a reusable [`OutputBuffer`] so repeated frames don't reallocate.
pub struct Screen {
    out: OutputBuffer,
}

impl Screen {
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: OutputBuffer::new(),
        }
    }

    /// Redraw the whole screen with `rows` placeholder rows and write the
    /// frame to `w` in a single write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if writing or flushing `w` fails.
    pub fn render(&mut self, rows: u16, w: &mut impl Write) -> Result<()> {
        self.out.clear();
        self.compose(rows).map_err(Error::Output)?;
        self.out.flush_to(w).map_err(Error::Output)
    }

    fn compose(&mut self, rows: u16) -> std::io::Result<()> {
        ansi::clear_screen(&mut self.out)?;
        ansi::cursor_home(&mut self.out)?;
        self.draw_rows(rows)?;
        ansi::cursor_home(&mut self.out)
    }

    fn draw_rows(&mut self, rows: u16) -> std::io::Result<()> {
        for _ in 0..rows {
            self.out.write_all(&[PLACEHOLDER])?;
            self.out.write_all(ROW_END)?;
        }
        Ok(())
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
