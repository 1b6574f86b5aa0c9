//! Keeping the shell alive across Ctrl-C and Ctrl-Z.

use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

extern "C" fn print_newline(_signum: nix::libc::c_int) {
    // Only async-signal-safe calls are allowed here.
    // SAFETY: writing a static one-byte buffer to stdout.
    unsafe {
        nix::libc::write(nix::libc::STDOUT_FILENO, b"\n".as_ptr().cast(), 1);
    }
}

/// Makes SIGINT and SIGTSTP print a newline instead of interrupting or
/// stopping the shell.
///
/// Handlers are reset to the default by `exec`, so programs started from the
/// shell still react to these signals normally.
pub fn install_handlers() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(print_newline),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for sig in [Signal::SIGINT, Signal::SIGTSTP] {
        // SAFETY: the handler only calls write(2).
        unsafe { signal::sigaction(sig, &action) }?;
        log::trace!("installed handler for {}", sig);
    }
    Ok(())
}
