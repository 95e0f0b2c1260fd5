// SPDX-License-Identifier: MIT
//
// wte-term — Terminal control for wte.
//
// The part of the editor that owns the terminal: it switches the tty into
// raw mode and guarantees the switch back, asks the tty how big it is,
// polls it for single keys with a decisecond timeout, and repaints the
// whole screen with plain VT100 sequences.
//
// Everything reaches the operating system through the `Tty` trait, a thin
// layer over termios, ioctl and read(2). The real device is `StdioTty`;
// the unit tests run the same code against an in-memory fake.

#[cfg(not(unix))]
compile_error!("wte-term drives the terminal through termios and only supports Unix");

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod output;
pub mod reader;
pub mod screen;
pub mod terminal;
pub mod tty;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
