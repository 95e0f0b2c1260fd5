// SPDX-License-Identifier: MIT
//
// Key reader — one byte at a time, polled.
//
// Raw mode sets `VMIN = 0` and `VTIME = 1`, so every `read()` returns
// within a tenth of a second: with one byte if a key was pressed, with
// nothing otherwise. A zero-byte read is not an error, it is the poll
// tick. `poll_key` performs one attempt and says which of the two it got;
// `read_key` loops on it until a key arrives.
//
// Some platforms report the empty read as `EAGAIN` instead of returning 0,
// and a signal (SIGWINCH on resize) can interrupt the read with `EINTR`.
// Both are treated as a tick. Anything else is fatal.
//
// The loop is deliberately the whole event source: no threads, no poll(2).
// Work that should happen while idle (cursor blink, redraw on resize) can
// hang off the `Timeout` arm without restructuring the caller.

use std::io;

use log::trace;

use crate::error::{Error, Result};
use crate::tty::Tty;

/// Outcome of a single read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A key arrived.
    Key(u8),
    /// The read timed out with no input.
    Timeout,
}

/// Reads keys from a terminal in raw mode.
pub struct KeyReader<T: Tty> {
    tty: T,
    /// Timeouts seen since the last key.
    idle_polls: u64,
}

impl<T: Tty> KeyReader<T> {
    #[must_use]
    pub const fn new(tty: T) -> Self {
        Self { tty, idle_polls: 0 }
    }

    /// Number of consecutive timeouts since the last key was read.
    #[inline]
    #[must_use]
    pub const fn idle_polls(&self) -> u64 {
        self.idle_polls
    }

    /// Make one read attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the read fails with anything other than
    /// `EAGAIN` or `EINTR`.
    pub fn poll_key(&mut self) -> Result<Poll> {
        let mut buf = [0u8; 1];

        match self.tty.read(&mut buf) {
            Ok(0) => {}
            Ok(_) => {
                self.idle_polls = 0;
                return Ok(Poll::Key(buf[0]));
            }
            Err(err) if is_tick(&err) => {}
            Err(err) => return Err(Error::Read(err)),
        }

        self.idle_polls += 1;
        trace!("read timed out ({} idle polls)", self.idle_polls);
        Ok(Poll::Timeout)
    }

    /// Block until a key arrives, polling through timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] on the first read failure that is not a timeout.
    pub fn read_key(&mut self) -> Result<u8> {
        loop {
            if let Poll::Key(key) = self.poll_key()? {
                return Ok(key);
            }
        }
    }
}

/// Whether a read error just means "no byte this time".
fn is_tick(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────
