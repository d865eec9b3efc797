//! Low-level command execution with timeout and bounded output capture

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

use super::{CommandRunner, Invocation, ProcessError, ProcessOutput};

/// How long to wait for the pipe readers once the child has exited
const COLLECT_GRACE: Duration = Duration::from_secs(10);

/// Captured bytes per stream
const MAX_CAPTURE: usize = 10 * 1024 * 1024;

const TRUNCATION_MARKER: &str = "\n[output truncated at 10 MiB]";

/// Runs invocations as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        let command_line = invocation.command_line();
        tracing::debug!(
            command = %command_line,
            cwd = ?invocation.working_dir,
            timeout_secs = invocation.timeout.as_secs(),
            "running command"
        );

        let start = Instant::now();
        let mut child = spawn(invocation).map_err(|source| ProcessError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        // Drain the pipes while waiting. Waiting first lets the child block on
        // write() once the pipe buffer (~64KB on Linux) fills up.
        let stdout_rx = drain(child.stdout.take());
        let stderr_rx = drain(child.stderr.take());

        let wait_result = child
            .wait_timeout(invocation.timeout)
            .map_err(|source| ProcessError::Wait {
                command: command_line.clone(),
                source,
            })?;

        if wait_result.is_none() {
            // Kill before collecting so the pipes close and the readers finish.
            kill_group(&mut child);
        }

        let duration = start.elapsed();
        let stdout = collect(&stdout_rx);
        let stderr = collect(&stderr_rx);

        let output = match wait_result {
            Some(status) => ProcessOutput::new(
                command_line,
                status.success(),
                stdout,
                stderr,
                status.code(),
                duration,
                false,
            ),
            None => ProcessOutput::new(
                command_line,
                false,
                stdout,
                format!(
                    "{}\n[Process killed after {}s timeout]",
                    stderr,
                    invocation.timeout.as_secs()
                ),
                None,
                duration,
                true,
            ),
        };

        tracing::debug!(summary = %output.summary(), "command finished");
        Ok(output)
    }
}

fn spawn(invocation: &Invocation) -> std::io::Result<Child> {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = &invocation.working_dir {
        cmd.current_dir(dir);
    }

    // Own process group, so a timeout can take down build servers and test
    // hosts the toolchain forks alongside the main process.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    cmd.spawn()
}

/// Read a stream to completion on a background thread
fn drain<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(stream) => {
            thread::spawn(move || {
                let _ = tx.send(read_capped(stream, MAX_CAPTURE));
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

fn collect(rx: &mpsc::Receiver<String>) -> String {
    rx.recv_timeout(COLLECT_GRACE)
        .unwrap_or_else(|_| "[output not collected: reader still blocked]".to_string())
}

/// Read `stream` to the end, keeping at most `limit` bytes.
///
/// Bytes past the limit are still read and thrown away so the child never
/// sees a broken pipe.
fn read_capped<R: Read>(mut stream: R, limit: usize) -> String {
    let mut buf = Vec::new();
    let read = (&mut stream).take(limit as u64).read_to_end(&mut buf);
    if read.is_err() && buf.is_empty() {
        return "[error reading output]".to_string();
    }

    if io::copy(&mut stream, &mut io::sink()).unwrap_or(0) > 0 {
        buf.extend_from_slice(TRUNCATION_MARKER.as_bytes());
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// SIGKILL the child's process group, then reap the child
fn kill_group(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Ok(pgid) = i32::try_from(child.id()) {
            // The group may already be gone
            let _ = killpg(Pid::from_raw(pgid), Signal::SIGKILL);
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}
