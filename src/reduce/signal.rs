//! Signal handling and worker-teardown bookkeeping.
//!
//! One handler covers the terminating signals (TERM, INT, HUP, PIPE).
//! It is restricted to async-signal-safe work: a root-pid check, an
//! atomic shutdown flag, and SIGTERM to every registered worker process
//! group. Everything heavier (scratch removal, exit status) runs on
//! the orchestrator's normal unwind path once it observes the flag.
//! The handler is installed without `SA_RESTART`, so a `waitpid` the
//! orchestrator is blocked in returns `EINTR` and the flag is seen
//! promptly.
//!
//! Worker pgids live in a fixed-size array of atomics: registration
//! from the orchestrator and the kill sweep from the handler need no
//! locks and no allocation.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

const PGID_SLOTS: usize = 1024;

static ROOT_PID: AtomicI32 = AtomicI32::new(0);
static SHUTDOWN: AtomicBool = AtomicBool::new(false);
static WORKER_PGIDS: [AtomicI32; PGID_SLOTS] = [const { AtomicI32::new(0) }; PGID_SLOTS];

/// Records the root pid and installs the handler for TERM/INT/HUP/PIPE.
pub fn install() -> io::Result<()> {
    ROOT_PID.store(unsafe { libc::getpid() }, Ordering::SeqCst);
    let handler: extern "C" fn(libc::c_int) = on_signal;
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = handler as usize;
        // No SA_RESTART: blocking waits must come back with EINTR.
        sa.sa_flags = 0;
        libc::sigemptyset(&mut sa.sa_mask);
        for sig in [libc::SIGTERM, libc::SIGINT, libc::SIGHUP, libc::SIGPIPE] {
            if libc::sigaction(sig, &sa, std::ptr::null_mut()) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
    }
    Ok(())
}

/// True once a terminating signal has been caught.
pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

/// Makes a worker's process group visible to the signal-time kill sweep.
///
/// If all slots are taken the worker is simply not tracked here; the
/// delta loop still reaps it. The slot count is far above any plausible
/// `workers` setting.
pub fn register_worker(pid: i32) {
    for slot in &WORKER_PGIDS {
        if slot
            .compare_exchange(0, pid, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return;
        }
    }
}

/// Removes a reaped worker from the kill sweep.
pub fn unregister_worker(pid: i32) {
    for slot in &WORKER_PGIDS {
        if slot
            .compare_exchange(pid, 0, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return;
        }
    }
}

/// Async-signal-safe: atomics, `getpid`, `killpg`, `_exit` only.
extern "C" fn on_signal(_sig: libc::c_int) {
    let root = ROOT_PID.load(Ordering::SeqCst);
    if root != 0 && unsafe { libc::getpid() } != root {
        // A worker-side process must not run root teardown.
        unsafe { libc::_exit(1) };
    }
    SHUTDOWN.store(true, Ordering::SeqCst);
    for slot in &WORKER_PGIDS {
        let pid = slot.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::killpg(pid, libc::SIGTERM);
            }
        }
    }
}
