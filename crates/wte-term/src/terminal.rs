// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, window geometry, and RAII restore.
//
// Safety: The panic hook writes straight to fd 1 with `libc::write`. That
// is the only unsafe call here; everything else goes through `Tty`.
#![allow(unsafe_code)]
//
// Raw mode is a scoped resource. `RawMode::enter` snapshots the terminal's
// attribute record, derives the raw record from it, applies it, and hands
// back a guard that owns the snapshot. The guard puts the snapshot back on
// `exit()` and on drop.
//
// A panic is the one exit the guard cannot cover in time: the panic hook
// prints its message before unwinding reaches the guard's `Drop`. So while
// a guard is live, its thread also holds a restore action built by the
// device from the same snapshot (`Tty::restorer`). The hook runs that
// action first, then repaints the screen, then hands over to the previous
// hook, which prints to a terminal that is already cooked. Releasing the
// guard drops the action.

use std::cell::RefCell;
use std::io;
use std::panic::PanicHookInfo;
use std::sync::Once;

use log::{debug, warn};

use crate::ansi;
use crate::error::{Error, Result};
use crate::tty::Tty;

/// `VMIN` in raw mode: `read()` may return with zero bytes.
pub const MIN_READ_BYTES: libc::cc_t = 0;

/// `VTIME` in raw mode: `read()` gives up after this many tenths of a second.
pub const READ_TIMEOUT_DECISECONDS: libc::cc_t = 1;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

/// Query the terminal's current size via `ioctl(TIOCGWINSZ)`.
///
/// A reply of zero columns means the terminal cannot tell us its size,
/// which is as good as a failed query: nothing can be drawn without it.
///
/// # Errors
///
/// Returns [`Error::WindowSize`] if the query fails or reports zero columns.
pub fn query_size(tty: &impl Tty) -> Result<Size> {
    let ws = tty.window_size().map_err(Error::WindowSize)?;

    if ws.ws_col == 0 {
        return Err(Error::WindowSize(io::Error::new(
            io::ErrorKind::Unsupported,
            "terminal reported zero columns",
        )));
    }

    let size = Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    };
    debug!("terminal size {}x{}", size.cols, size.rows);
    Ok(size)
}

// ─── Raw Attributes ─────────────────────────────────────────────────────────

/// Derive the raw attribute record from a cooked one.
///
/// Clears, and leaves every other bit as it was:
/// - input: `BRKINT` (break → SIGINT), `ICRNL` (CR → NL), `INPCK` (parity
///   check), `ISTRIP` (strip 8th bit), `IXON` (Ctrl-S / Ctrl-Q flow control)
/// - output: `OPOST` (all output post-processing, including NL → CRNL)
/// - local: `ECHO`, `ICANON` (line buffering), `IEXTEN` (Ctrl-V), `ISIG`
///   (Ctrl-C / Ctrl-Z signals)
///
/// Forces 8-bit characters (`CS8`) and sets `VMIN = 0`, `VTIME = 1`, so a
/// read returns as soon as one byte arrives or after a tenth of a second.
#[must_use]
pub fn make_raw(original: &libc::termios) -> libc::termios {
    let mut raw = *original;

    raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cflag |= libc::CS8;
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

    raw.c_cc[libc::VMIN] = MIN_READ_BYTES;
    raw.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;

    raw
}

// ─── Panic Recovery ─────────────────────────────────────────────────────────

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static>;

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

thread_local! {
    /// Puts the live guard's snapshot back. Set by `RawMode::enter`, cleared
    /// once the guard has restored the terminal itself.
    static PANIC_RESTORE: RefCell<Option<Box<dyn Fn()>>> = const { RefCell::new(None) };
}

/// Install a panic hook that restores the terminal before the panic message.
///
/// The hook first puts back the attributes of any raw-mode guard alive on
/// the panicking thread, then writes [`ansi::RESET_SCREEN`] directly to
/// fd 1, bypassing Rust's stdout lock in case the panic happened mid-frame
/// while it was held, and finally delegates to the previous handler.
///
/// Call this once from the binary before entering raw mode. Later calls do
/// nothing.
pub fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(chain_hook(Box::new(move |info| {
            emergency_reset();
            original(info);
        })));
    });
}

/// Wrap `previous` so the terminal is cooked again before it runs.
fn chain_hook(previous: PanicHook) -> PanicHook {
    Box::new(move |info| {
        restore_after_panic();
        previous(info);
    })
}

/// Run and discard this thread's pending restore action, if any.
fn restore_after_panic() {
    let action = PANIC_RESTORE
        .try_with(|slot| slot.try_borrow_mut().ok().and_then(|mut slot| slot.take()))
        .ok()
        .flatten();
    if let Some(restore) = action {
        restore();
    }
}

fn set_panic_restore(action: Option<Box<dyn Fn()>>) {
    let _ = PANIC_RESTORE.try_with(|slot| *slot.borrow_mut() = action);
}

fn emergency_reset() {
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            ansi::RESET_SCREEN.as_ptr().cast::<libc::c_void>(),
            ansi::RESET_SCREEN.len(),
        );
    }
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw mode guard with RAII restore.
///
/// Holds the attribute record captured before raw mode was applied and
/// puts exactly that record back, once, when released.
///
/// # Example
///
/// ```no_run
/// use wte_term::terminal::RawMode;
/// use wte_term::tty::StdioTty;
///
/// let tty = StdioTty::new();
/// let raw = RawMode::enter(&tty)?;
/// // ... read keys, draw frames ...
/// raw.exit()?;
/// # Ok::<(), wte_term::error::Error>(())
/// ```
pub struct RawMode<T: Tty> {
    tty: T,
    /// Attribute record in effect before `enter`. Never modified.
    original: libc::termios,
    /// Whether `original` still needs to be put back.
    active: bool,
}

impl<T: Tty> RawMode<T> {
    /// Snapshot the terminal's attributes and switch it to raw mode.
    ///
    /// If applying the raw record fails, the terminal was not changed and
    /// no guard is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttributeQuery`] if the snapshot cannot be taken and
    /// [`Error::AttributeSet`] if the raw record cannot be applied.
    pub fn enter(tty: T) -> Result<Self> {
        let original = tty.get_attrs().map_err(Error::AttributeQuery)?;
        let raw = make_raw(&original);
        tty.set_attrs(&raw).map_err(Error::AttributeSet)?;
        set_panic_restore(Some(tty.restorer(original)));

        debug!("raw mode on");
        Ok(Self {
            tty,
            original,
            active: true,
        })
    }

    /// The attribute record captured before raw mode was applied.
    #[inline]
    #[must_use]
    pub const fn original(&self) -> &libc::termios {
        &self.original
    }

    /// The device this guard controls.
    #[inline]
    #[must_use]
    pub const fn tty(&self) -> &T {
        &self.tty
    }

    /// Put the original attributes back and release the guard.
    ///
    /// If the restore fails, the guard's `Drop` makes one more attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttributeSet`] if the original record cannot be applied.
    pub fn exit(mut self) -> Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        self.tty
            .set_attrs(&self.original)
            .map_err(Error::AttributeSet)?;

        self.active = false;
        set_panic_restore(None);
        debug!("raw mode off");
        Ok(())
    }
}

impl<T: Tty> Drop for RawMode<T> {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!("failed to restore terminal attributes: {err}");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
