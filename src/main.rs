// SPDX-License-Identifier: MIT
//
// wte — a minimal terminal text editor.
//
// This is the binary that drives wte-term:
//
//   RawMode::enter → query_size → EventLoop::run → RawMode::exit
//
// The raw-mode guard lives in `run`, so every way out of it (quit key, `?`
// on a fatal error) puts the terminal's original attributes back before
// `main` prints anything or exits. A panic is covered by the hook installed
// at startup, which restores the attributes before the message prints.
//
// Exit status is 0 after the quit key and 1 after any fatal error. The
// diagnostic names the failing call the way perror does. Set `RUST_LOG` to
// `debug` and redirect stderr to a file to get a log of every key code.

use std::io::{self, Write};
use std::process;

use log::{debug, warn};

use wte_term::ansi;
use wte_term::error::{Error, Result};
use wte_term::event_loop::EventLoop;
use wte_term::terminal::{self, RawMode, query_size};
use wte_term::tty::{StdioTty, Tty};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    debug!("starting wte");
    terminal::install_panic_hook();

    let tty = StdioTty::new();
    if !tty.is_tty() {
        warn!("stdin is not a terminal");
    }

    let result = run(&tty, &mut io::stdout().lock());
    let code = finish(result, &mut io::stdout(), &mut io::stderr());

    debug!("wte exited with status {code}");
    process::exit(code);
}

/// One editing session, from raw mode on to raw mode off.
fn run<T: Tty>(tty: T, out: &mut impl Write) -> Result<()> {
    let raw = RawMode::enter(&tty)?;
    let size = query_size(&tty)?;

    EventLoop::new(&tty, size).run(out)?;

    raw.exit()?;
    ansi::reset_screen(out).map_err(Error::Output)
}

/// Turn the session's outcome into a process exit status.
fn finish(result: Result<()>, out: &mut impl Write, errout: &mut impl Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => report(&err, out, errout),
    }
}

/// Clear the screen, then print the diagnostic. Returns the exit status.
///
/// The terminal is already back in cooked mode when this runs.
fn report(err: &Error, out: &mut impl Write, errout: &mut impl Write) -> i32 {
    let _ = ansi::reset_screen(out);
    debug!("fatal: {err:?}");
    let _ = writeln!(errout, "{err}");
    1
}

// ─── Tests ───────────────────────────────────────────────────────────────────
