// launcher.rs
//
// External commands run as fork + execvp + waitpid. A close-on-exec pipe
// tells the parent whether the exec itself failed: it reads EOF when the
// new image starts, or the errno written by the child when it did not.

use std::ffi::CString;
use std::io::Write;
use std::os::unix::io::RawFd;

use itertools::Itertools;
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{close, execvp, fork, pipe2, read, write, ForkResult, Pid};

use crate::builtins::ExitSignal;
use crate::error::{Result, ShellError};
use crate::util::writeln_ignore_broken_pipe;

/// Status the child exits with when the program could not be executed.
pub const EXEC_FAILURE_STATUS: i32 = 127;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchOutcome {
    Exited(i32),
    Signaled(Signal),
    /// The program was never started; the child already reported why.
    ExecFailed(Errno),
}

struct PreparedCommand {
    program: CString,
    argv: Vec<CString>,
    diagnostic: Vec<u8>,
}

struct Child {
    pid: Pid,
    status_r: RawFd,
}

fn prepare(argv: &[String]) -> Result<PreparedCommand> {
    let name = argv.first().ok_or(ShellError::EmptyCommand)?;
    let argv = argv
        .iter()
        .map(|arg| CString::new(arg.as_str()).map_err(|_| ShellError::NulByte(arg.clone())))
        .collect::<Result<Vec<_>>>()?;
    Ok(PreparedCommand {
        program: argv[0].clone(),
        argv,
        diagnostic: format!("mysh: {}: ", name).into_bytes(),
    })
}

// Both ends are close-on-exec from creation.
fn open_status_pipe() -> Result<(RawFd, RawFd)> {
    pipe2(OFlag::O_CLOEXEC).map_err(ShellError::StatusPipe)
}

fn spawn(cmd: &PreparedCommand) -> Result<Child> {
    let (status_r, status_w) = open_status_pipe()?;
    std::io::stdout().flush().ok();
    std::io::stderr().flush().ok();
    match unsafe { fork() } {
        Ok(ForkResult::Child) => {
            let _ = close(status_r);
            exec_image(cmd, status_w)
        }
        Ok(ForkResult::Parent { child }) => {
            let _ = close(status_w);
            log::debug!("spawned {:?} as pid {}", cmd.program, child);
            Ok(Child { pid: child, status_r })
        }
        Err(e) => {
            let _ = close(status_r);
            let _ = close(status_w);
            Err(ShellError::Fork(e))
        }
    }
}

// Runs in the child. Only raw writes to fds happen after a failed exec.
fn exec_image(cmd: &PreparedCommand, status_w: RawFd) -> ! {
    let err = match execvp(&cmd.program, &cmd.argv) {
        Ok(never) => match never {},
        Err(e) => e,
    };
    let _ = write(libc::STDERR_FILENO, &cmd.diagnostic);
    let _ = write(libc::STDERR_FILENO, err.desc().as_bytes());
    let _ = write(libc::STDERR_FILENO, b"\n");
    let _ = write(status_w, &(err as i32).to_ne_bytes());
    unsafe { libc::_exit(EXEC_FAILURE_STATUS) }
}

impl Child {
    /// Blocks until the child either exec'd (EOF) or reported an errno.
    fn exec_error(&self) -> Result<Option<Errno>> {
        let mut buf = [0u8; 4];
        loop {
            match read(self.status_r, &mut buf) {
                Ok(0) => return Ok(None),
                Ok(n) if n == buf.len() => return Ok(Some(Errno::from_i32(i32::from_ne_bytes(buf)))),
                Ok(n) => {
                    log::warn!("short read of {} bytes from exec status pipe", n);
                    return Ok(None);
                }
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(ShellError::StatusPipe(e)),
            }
        }
    }

    fn wait(self) -> Result<WaitStatus> {
        let _ = close(self.status_r);
        loop {
            match waitpid(self.pid, None) {
                Ok(status @ (WaitStatus::Exited(..) | WaitStatus::Signaled(..))) => return Ok(status),
                Ok(other) => log::trace!("pid {}: {:?}", self.pid, other),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(ShellError::Wait(e)),
            }
        }
    }
}

/// Runs `argv[0]` (looked up on `PATH`) with `argv` and waits for it.
pub fn run(argv: &[String]) -> Result<LaunchOutcome> {
    let cmd = prepare(argv)?;
    log::debug!("launching: {}", argv.iter().join(" "));
    let child = spawn(&cmd)?;
    let exec_error = match child.exec_error() {
        Ok(e) => e,
        Err(e) => {
            let _ = child.wait();
            return Err(e);
        }
    };
    let status = child.wait()?;
    log::debug!("child finished: {:?}", status);
    Ok(match (exec_error, status) {
        (Some(errno), _) => LaunchOutcome::ExecFailed(errno),
        (None, WaitStatus::Signaled(_, sig, _)) => LaunchOutcome::Signaled(sig),
        (None, WaitStatus::Exited(_, code)) => LaunchOutcome::Exited(code),
        (None, _) => unreachable!("wait only returns terminal statuses"),
    })
}

/// Session-facing wrapper around [`run`]: failures are reported on `stderr`
/// and the session always continues.
pub fn launch(argv: &[String], stderr: &mut dyn Write) -> ExitSignal {
    if let Err(e) = run(argv) {
        let _ = writeln_ignore_broken_pipe(stderr, format!("mysh: {}", e));
    }
    ExitSignal::Continue
}
