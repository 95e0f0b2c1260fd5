// SPDX-License-Identifier: MIT
//
// Error types for terminal control.
//
// Every variant is fatal: the editor cannot run without raw mode, known
// geometry, or a working input and output stream. Each one wraps the OS
// error captured right after the failing call, and its message names that
// call the way `perror` would, so the diagnostic printed on the way out
// reads `tcgetattr: Inappropriate ioctl for device`.

use std::io;

use thiserror::Error;

/// Terminal control error.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the current terminal attributes failed.
    #[error("tcgetattr: {0}")]
    AttributeQuery(#[source] io::Error),

    /// Applying the raw or the original attributes failed.
    #[error("tcsetattr: {0}")]
    AttributeSet(#[source] io::Error),

    /// The window size query failed or reported zero columns.
    #[error("ioctl(TIOCGWINSZ): {0}")]
    WindowSize(#[source] io::Error),

    /// Reading from the input device failed for a reason other than a timeout.
    #[error("read: {0}")]
    Read(#[source] io::Error),

    /// Writing a frame to the output device failed.
    #[error("write: {0}")]
    Output(#[source] io::Error),
}

/// Result type for terminal control operations.
pub type Result<T> = std::result::Result<T, Error>;

// ─── Tests ───────────────────────────────────────────────────────────────────
