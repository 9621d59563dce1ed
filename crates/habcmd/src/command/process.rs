//! Process-based execution on top of `std::process`.
//!
//! [`ProcessExecutor`] implements the [`Executor`] trait by spawning the
//! program with the invocation's arguments and environment overrides,
//! polling for exit, and killing the child once the deadline passes. For
//! combined output both stdout and stderr are attached to one pipe so the
//! captured text keeps the interleaving the program produced.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{Executor, Invocation};
use crate::error::CommandError;

/// Tracing target for process execution.
const PROCESS_TARGET: &str = "habcmd::command::process";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Longest wait for trailing output once the child has gone.
const DRAIN_GRACE: Duration = Duration::from_millis(100);

const READ_CHUNK: usize = 8 * 1024;

/// Executes invocations by spawning child processes.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use habcmd::command::{Executor, Invocation, ProcessExecutor};
///
/// let invocation = Invocation::new("hab")
///     .with_args(["svc", "status"])
///     .with_timeout(Duration::from_secs(30));
/// let output = ProcessExecutor.combined_output(&invocation);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn combined_output(&self, invocation: &Invocation) -> Result<String, CommandError> {
        let program = invocation.program();
        let (reader, writer) = io::pipe().map_err(|err| io_error(program, err))?;
        let stderr_writer = writer.try_clone().map_err(|err| io_error(program, err))?;

        let mut command = build_command(invocation);
        command.stdout(writer).stderr(stderr_writer);
        let mut child = spawn(invocation, &mut command)?;
        // The command holds our copies of the write ends; the reader only sees
        // EOF once they are closed.
        drop(command);

        let capture = OutputCapture::start(reader);

        match wait_for_exit(program, &mut child, deadline_for(invocation))? {
            Exit::Exited(status) => check_status(program, status, capture.finish()),
            Exit::TimedOut => Err(timeout_error(invocation, capture.finish())),
        }
    }

    fn run(&self, invocation: &Invocation) -> Result<(), CommandError> {
        let program = invocation.program();
        let mut command = build_command(invocation);
        command.stdout(Stdio::null()).stderr(Stdio::null());
        let mut child = spawn(invocation, &mut command)?;

        match wait_for_exit(program, &mut child, deadline_for(invocation))? {
            Exit::Exited(status) => check_status(program, status, String::new()).map(drop),
            Exit::TimedOut => Err(timeout_error(invocation, String::new())),
        }
    }
}

/// Builds the command with arguments, environment overrides, and no stdin.
fn build_command(invocation: &Invocation) -> Command {
    let mut command = Command::new(invocation.program());
    command.args(invocation.args());
    command.envs(
        invocation
            .env()
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );
    command.stdin(Stdio::null());
    command
}

fn spawn(invocation: &Invocation, command: &mut Command) -> Result<Child, CommandError> {
    debug!(
        target: PROCESS_TARGET,
        program = invocation.program(),
        args = ?invocation.args(),
        timeout_ms = invocation.timeout().map(duration_millis),
        "spawning process"
    );

    command.spawn().map_err(|err| CommandError::Spawn {
        program: invocation.program().to_owned(),
        source: Arc::new(err),
    })
}

fn deadline_for(invocation: &Invocation) -> Option<Instant> {
    invocation
        .timeout()
        .and_then(|timeout| Instant::now().checked_add(timeout))
}

enum Exit {
    Exited(ExitStatus),
    TimedOut,
}

/// Waits for the child process to exit, killing it once the deadline passes.
fn wait_for_exit(
    program: &str,
    child: &mut Child,
    deadline: Option<Instant>,
) -> Result<Exit, CommandError> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(
                    target: PROCESS_TARGET,
                    program,
                    ?status,
                    "process exited"
                );
                return Ok(Exit::Exited(status));
            }
            Ok(None) => {
                if deadline.is_some_and(|limit| Instant::now() >= limit) {
                    warn!(
                        target: PROCESS_TARGET,
                        program,
                        "process timed out, killing it"
                    );
                    reap(child);
                    return Ok(Exit::TimedOut);
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(err) => {
                reap(child);
                return Err(io_error(program, err));
            }
        }
    }
}

fn reap(child: &mut Child) {
    drop(child.kill());
    drop(child.wait());
}

fn check_status(program: &str, status: ExitStatus, output: String) -> Result<String, CommandError> {
    if status.success() {
        return Ok(output);
    }
    Err(CommandError::NonZeroExit {
        program: program.to_owned(),
        status: status.code().unwrap_or(-1),
        output,
    })
}

fn timeout_error(invocation: &Invocation, output: String) -> CommandError {
    CommandError::Timeout {
        program: invocation.program().to_owned(),
        timeout_ms: invocation.timeout().map_or(0, duration_millis),
        output,
    }
}

fn io_error(program: &str, err: io::Error) -> CommandError {
    CommandError::Io {
        program: program.to_owned(),
        source: Arc::new(err),
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Collects a child's output on a helper thread.
///
/// The buffer is shared so a partial capture is still available when the
/// reader cannot finish, for instance when a grandchild inherited the pipe.
struct OutputCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

impl OutputCapture {
    fn start(mut reader: impl Read + Send + 'static) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done) = mpsc::channel();
        let shared = Arc::clone(&buffer);

        thread::spawn(move || {
            let mut chunk = [0_u8; READ_CHUNK];
            loop {
                match reader.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(read) => lock(&shared).extend_from_slice(chunk.get(..read).unwrap_or(&[])),
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                    Err(_) => break,
                }
            }
            done_tx.send(()).ok();
        });

        Self { buffer, done }
    }

    /// Waits briefly for EOF once the child has gone and returns the text.
    ///
    /// A background process that inherited the pipe can hold it open
    /// indefinitely, so the wait is capped at [`DRAIN_GRACE`].
    fn finish(self) -> String {
        self.done.recv_timeout(DRAIN_GRACE).ok();
        self.snapshot()
    }

    fn snapshot(&self) -> String {
        String::from_utf8_lossy(&lock(&self.buffer)).into_owned()
    }
}

fn lock(buffer: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buffer
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
