// SPDX-License-Identifier: MIT
//
// The terminal device seam.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd reads. These are the
// standard POSIX interfaces for terminal control. Each unsafe block wraps
// exactly one call.
#![allow(unsafe_code)]
//
// Everything above this module (raw mode, geometry, key reading) talks to
// the terminal through the `Tty` trait and nothing else: four primitives,
// plus a detached restore action for the panic hook. `StdioTty` is the real
// device: attributes and reads go to stdin, the window size query goes to
// stdout. Tests swap in an in-memory device with scripted reads and
// injectable failures.

use std::io;
use std::os::unix::io::RawFd;

/// The terminal primitives the editor core is built on.
///
/// Each primitive maps to one system call and reports the raw OS error on
/// failure. Callers decide which failures are fatal.
pub trait Tty {
    /// Read the current attribute record (`tcgetattr`).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the query fails (e.g. `ENOTTY`).
    fn get_attrs(&self) -> io::Result<libc::termios>;

    /// Apply an attribute record after draining pending output and
    /// discarding unread input (`tcsetattr` with `TCSAFLUSH`).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the attributes cannot be applied.
    fn set_attrs(&self, attrs: &libc::termios) -> io::Result<()>;

    /// Query the window dimensions (`ioctl(TIOCGWINSZ)`).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the query fails.
    fn window_size(&self) -> io::Result<libc::winsize>;

    /// Read up to `buf.len()` bytes from the input device.
    ///
    /// In raw mode with `VMIN = 0` this returns `Ok(0)` when the read
    /// timeout elapses with no input.
    ///
    /// # Errors
    ///
    /// Returns the OS error, including `EAGAIN` and `EINTR`; the key
    /// reader decides which of those are benign.
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// A self-contained action that applies `attrs` to this device.
    ///
    /// The raw-mode guard hands this to the panic hook, which runs before
    /// unwinding reaches the guard. Errors are ignored: by then there is
    /// nobody left to report them to.
    fn restorer(&self, attrs: libc::termios) -> Box<dyn Fn()>;
}

impl<T: Tty + ?Sized> Tty for &T {
    fn get_attrs(&self) -> io::Result<libc::termios> {
        (**self).get_attrs()
    }

    fn set_attrs(&self, attrs: &libc::termios) -> io::Result<()> {
        (**self).set_attrs(attrs)
    }

    fn window_size(&self) -> io::Result<libc::winsize> {
        (**self).window_size()
    }

    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn restorer(&self, attrs: libc::termios) -> Box<dyn Fn()> {
        (**self).restorer(attrs)
    }
}

// ─── StdioTty ────────────────────────────────────────────────────────────────

/// The process's controlling terminal, reached through stdin and stdout.
#[derive(Debug, Clone, Copy)]
pub struct StdioTty {
    input: RawFd,
    output: RawFd,
}

impl StdioTty {
    /// The terminal attached to stdin (attributes, input) and stdout (size).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: libc::STDIN_FILENO,
            output: libc::STDOUT_FILENO,
        }
    }

    /// Whether the input side is connected to a terminal.
    #[must_use]
    pub fn is_tty(&self) -> bool {
        unsafe { libc::isatty(self.input) != 0 }
    }
}

impl Default for StdioTty {
    fn default() -> Self {
        Self::new()
    }
}

impl Tty for StdioTty {
    fn get_attrs(&self) -> io::Result<libc::termios> {
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(self.input, &raw mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(termios)
    }

    fn set_attrs(&self, attrs: &libc::termios) -> io::Result<()> {
        if unsafe { libc::tcsetattr(self.input, libc::TCSAFLUSH, attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn window_size(&self) -> io::Result<libc::winsize> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        if unsafe { libc::ioctl(self.output, libc::TIOCGWINSZ, &raw mut ws) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(ws)
    }

    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let n = unsafe { libc::read(self.input, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        Ok(n as usize)
    }

    fn restorer(&self, attrs: libc::termios) -> Box<dyn Fn()> {
        let fd = self.input;
        Box::new(move || unsafe {
            let _ = libc::tcsetattr(fd, libc::TCSANOW, &raw const attrs);
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
