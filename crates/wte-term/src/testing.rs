// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// In-memory terminal for unit tests.
//
// `FakeTty` holds a current attribute record, a window size, and a script
// of read results. Every attribute write is recorded so tests can check
// exactly what was applied and in which order. Each primitive can be told
// to fail with a chosen errno.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use crate::tty::Tty;

/// One scripted outcome of [`Tty::read`].
#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    /// The read delivers this byte.
    Byte(u8),
    /// The read times out and returns zero bytes.
    Timeout,
    /// The read fails with this errno.
    Errno(i32),
}

/// A terminal that lives entirely in memory.
pub struct FakeTty {
    attrs: Rc<RefCell<libc::termios>>,
    size: Cell<libc::winsize>,
    reads: RefCell<VecDeque<Scripted>>,
    applied: RefCell<Vec<libc::termios>>,
    read_calls: Cell<usize>,
    set_calls: Cell<usize>,
    fail_get: Cell<Option<i32>>,
    fail_set_call: Cell<Option<(usize, i32)>>,
    fail_size: Cell<Option<i32>>,
}

/// A plausible cooked-mode attribute record, as a login shell leaves it.
pub fn cooked_attrs() -> libc::termios {
    let mut t: libc::termios = unsafe { std::mem::zeroed() };
    t.c_iflag = libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON;
    t.c_oflag = libc::OPOST | libc::ONLCR;
    t.c_cflag = libc::CS7 | libc::PARENB | libc::CREAD;
    t.c_lflag = libc::ECHO | libc::ECHOE | libc::ICANON | libc::ISIG | libc::IEXTEN;
    t.c_cc[libc::VINTR] = 0x03;
    t.c_cc[libc::VMIN] = 1;
    t.c_cc[libc::VTIME] = 0;
    t
}

impl FakeTty {
    /// An 80×24 terminal in cooked mode with nothing to read.
    pub fn new() -> Self {
        Self {
            attrs: Rc::new(RefCell::new(cooked_attrs())),
            size: Cell::new(libc::winsize {
                ws_row: 24,
                ws_col: 80,
                ws_xpixel: 0,
                ws_ypixel: 0,
            }),
            reads: RefCell::new(VecDeque::new()),
            applied: RefCell::new(Vec::new()),
            read_calls: Cell::new(0),
            set_calls: Cell::new(0),
            fail_get: Cell::new(None),
            fail_set_call: Cell::new(None),
            fail_size: Cell::new(None),
        }
    }

    pub fn with_size(self, cols: u16, rows: u16) -> Self {
        self.size.set(libc::winsize {
            ws_row: rows,
            ws_col: cols,
            ws_xpixel: 0,
            ws_ypixel: 0,
        });
        self
    }

    pub fn with_reads(self, reads: impl IntoIterator<Item = Scripted>) -> Self {
        self.reads.borrow_mut().extend(reads);
        self
    }

    /// Queue `n` timeouts followed by each byte of `keys`.
    pub fn with_keys_after_timeouts(self, n: usize, keys: &[u8]) -> Self {
        let script = std::iter::repeat_n(Scripted::Timeout, n)
            .chain(keys.iter().copied().map(Scripted::Byte));
        self.with_reads(script)
    }

    pub fn fail_get(self, errno: i32) -> Self {
        self.fail_get.set(Some(errno));
        self
    }

    /// Make the `call`-th (0-based) `set_attrs` fail with `errno`.
    pub fn fail_set_on_call(self, call: usize, errno: i32) -> Self {
        self.fail_set_call.set(Some((call, errno)));
        self
    }

    pub fn fail_size(self, errno: i32) -> Self {
        self.fail_size.set(Some(errno));
        self
    }

    /// The attribute record currently in effect.
    pub fn current(&self) -> libc::termios {
        *self.attrs.borrow()
    }

    /// A handle on the current attribute record that outlives borrows of
    /// the fake, for code that needs a `'static` view of it.
    pub fn shared_attrs(&self) -> Rc<RefCell<libc::termios>> {
        Rc::clone(&self.attrs)
    }

    /// Every attribute record successfully applied, oldest first.
    pub fn applied(&self) -> Vec<libc::termios> {
        self.applied.borrow().clone()
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.get()
    }

    pub fn pending_reads(&self) -> usize {
        self.reads.borrow().len()
    }
}

impl Tty for FakeTty {
    fn get_attrs(&self) -> io::Result<libc::termios> {
        match self.fail_get.get() {
            Some(errno) => Err(io::Error::from_raw_os_error(errno)),
            None => Ok(self.current()),
        }
    }

    fn set_attrs(&self, attrs: &libc::termios) -> io::Result<()> {
        let call = self.set_calls.get();
        self.set_calls.set(call + 1);
        if let Some((failing, errno)) = self.fail_set_call.get() {
            if failing == call {
                return Err(io::Error::from_raw_os_error(errno));
            }
        }
        *self.attrs.borrow_mut() = *attrs;
        self.applied.borrow_mut().push(*attrs);
        Ok(())
    }

    fn window_size(&self) -> io::Result<libc::winsize> {
        match self.fail_size.get() {
            Some(errno) => Err(io::Error::from_raw_os_error(errno)),
            None => Ok(self.size.get()),
        }
    }

    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_calls.set(self.read_calls.get() + 1);
        // An exhausted script fails loudly instead of timing out forever.
        match self.reads.borrow_mut().pop_front() {
            Some(Scripted::Byte(b)) => {
                buf[0] = b;
                Ok(1)
            }
            Some(Scripted::Timeout) => Ok(0),
            Some(Scripted::Errno(errno)) => Err(io::Error::from_raw_os_error(errno)),
            None => Err(io::Error::from_raw_os_error(libc::EIO)),
        }
    }

    fn restorer(&self, attrs: libc::termios) -> Box<dyn Fn()> {
        let current = self.shared_attrs();
        Box::new(move || *current.borrow_mut() = attrs)
    }
}
