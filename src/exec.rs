//! Command execution utilities shared by the probes and the orchestrator.
//!
//! Two capture styles exist: `run_checked` treats any non-zero exit as an
//! error (service probes), while `run_tolerant` hands back output and exit
//! code unchanged because several collaborators signal results through their
//! exit status (clamscan exits 1 on findings, dnf check-update exits 100
//! when updates are pending).

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Captured outcome of a tolerant command run.
#[derive(Clone, Debug, Default)]
pub struct Capture {
    /// Full stdout, lossily decoded.
    pub stdout: String,
    /// Full stderr, lossily decoded.
    pub stderr: String,
    /// Exit code when the process exited normally.
    pub exit_code: Option<i32>,
    /// True when the deadline elapsed and the process was killed.
    pub timed_out: bool,
}

impl Capture {
    /// Whether the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }
}

/// What: Execute a command and capture stdout as UTF-8, failing on non-zero exit.
///
/// Inputs:
/// - `program`: Binary to execute.
/// - `args`: Command-line arguments.
/// - `display_label`: Human-friendly command description for logging.
///
/// Output:
/// - Stdout as a `String` on success; error description otherwise.
///
/// Details:
/// - Annotates errors with the supplied `display` string for easier debugging.
pub fn run_checked(program: &str, args: &[&str], display_label: &str) -> Result<String, String> {
    debug!(
        command = program,
        args = ?args,
        display = display_label,
        "executing command"
    );

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|err| {
            warn!(
                command = program,
                args = ?args,
                display = display_label,
                error = %err,
                "failed to spawn command"
            );
            format!("failed to spawn `{display_label}`: {err}")
        })?;

    if !output.status.success() {
        warn!(
            command = program,
            args = ?args,
            display = display_label,
            status = ?output.status,
            stderr_len = output.stderr.len(),
            "command exited with non-zero status"
        );
        return Err(format!(
            "`{display_label}` exited with status {}",
            output.status
        ));
    }

    String::from_utf8(output.stdout).map_err(|err| {
        warn!(
            command = program,
            args = ?args,
            display = display_label,
            error = %err,
            "command produced invalid UTF-8"
        );
        format!("`{display_label}` produced invalid UTF-8: {err}")
    })
}

/// What: Execute a command, tolerating any exit status.
///
/// Inputs:
/// - `program`: Binary to execute.
/// - `args`: Command-line arguments.
/// - `envs`: Extra environment variables for the child.
/// - `display_label`: Human-friendly command description for logging.
///
/// Output:
/// - `Capture` with stdout/stderr and exit code; `Err` only when the process
///   could not be spawned at all.
pub fn run_tolerant(
    program: &str,
    args: &[&str],
    envs: &[(&str, &str)],
    display_label: &str,
) -> Result<Capture, String> {
    debug!(
        command = program,
        args = ?args,
        display = display_label,
        "executing command (tolerant)"
    );

    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null());
    for (k, v) in envs {
        cmd.env(k, v);
    }
    let output = cmd.output().map_err(|err| {
        warn!(
            command = program,
            args = ?args,
            display = display_label,
            error = %err,
            "failed to spawn command"
        );
        format!("failed to spawn `{display_label}`: {err}")
    })?;

    debug!(
        command = program,
        display = display_label,
        status = ?output.status,
        stdout_len = output.stdout.len(),
        "command completed"
    );

    Ok(Capture {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code(),
        timed_out: false,
    })
}

/// What: Execute a command with a hard deadline, tolerating any exit status.
///
/// Inputs:
/// - `program`, `args`, `envs`: As for [`run_tolerant`].
/// - `display_label`: Human-friendly command description for logging.
/// - `timeout_secs`: Seconds before the child is killed.
///
/// Output:
/// - `Capture` with whatever output accumulated before exit or kill; `Err`
///   only on spawn failure.
///
/// Details:
/// - Child stdout/stderr are redirected to scratch files so the parent can
///   poll without draining pipes; the files are read back and removed after
///   the child is reaped.
/// - On expiry the child is killed, reaped, and `timed_out` is set.
pub fn run_tolerant_with_timeout(
    program: &str,
    args: &[&str],
    envs: &[(&str, &str)],
    display_label: &str,
    timeout_secs: u64,
) -> Result<Capture, String> {
    debug!(
        command = program,
        args = ?args,
        display = display_label,
        timeout_secs,
        "executing command (tolerant, bounded)"
    );

    let stamp = format!(
        "{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos())
    );
    let out_path = std::env::temp_dir().join(format!("clamward_out_{stamp}"));
    let err_path = std::env::temp_dir().join(format!("clamward_err_{stamp}"));

    let out_file = std::fs::File::create(&out_path)
        .map_err(|e| format!("failed to create capture file for `{display_label}`: {e}"))?;
    let err_file = std::fs::File::create(&err_path)
        .map_err(|e| format!("failed to create capture file for `{display_label}`: {e}"))?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(out_file))
        .stderr(Stdio::from(err_file));
    for (k, v) in envs {
        cmd.env(k, v);
    }

    let mut child = cmd.spawn().map_err(|err| {
        let _ = std::fs::remove_file(&out_path);
        let _ = std::fs::remove_file(&err_path);
        warn!(
            command = program,
            args = ?args,
            display = display_label,
            error = %err,
            "failed to spawn command"
        );
        format!("failed to spawn `{display_label}`: {err}")
    })?;

    let started = Instant::now();
    let deadline = Duration::from_secs(timeout_secs);
    let mut timed_out = false;
    let exit_code = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status.code(),
            Ok(None) => {
                if started.elapsed() >= deadline {
                    warn!(
                        command = program,
                        display = display_label,
                        timeout_secs,
                        "deadline elapsed; killing command"
                    );
                    let _ = child.kill();
                    let status = child.wait().ok();
                    timed_out = true;
                    break status.and_then(|s| s.code());
                }
                std::thread::sleep(Duration::from_millis(200));
            }
            Err(e) => {
                warn!(
                    command = program,
                    display = display_label,
                    error = %e,
                    "failed to poll command status"
                );
                let _ = child.kill();
                let _ = child.wait();
                break None;
            }
        }
    };

    let stdout = std::fs::read_to_string(&out_path).unwrap_or_default();
    let stderr = std::fs::read_to_string(&err_path).unwrap_or_default();
    let _ = std::fs::remove_file(&out_path);
    let _ = std::fs::remove_file(&err_path);

    debug!(
        command = program,
        display = display_label,
        exit_code = ?exit_code,
        timed_out,
        stdout_len = stdout.len(),
        elapsed_secs = started.elapsed().as_secs(),
        "bounded command finished"
    );

    Ok(Capture {
        stdout,
        stderr,
        exit_code,
        timed_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: A successful command returns its stdout.
    ///
    /// Inputs:
    /// - `sh -c 'echo hello'` (POSIX shell is available on every target host).
    ///
    /// Output:
    /// - Captured stdout contains `hello`.
    fn run_checked_captures_stdout() {
        let out = run_checked("sh", &["-c", "echo hello"], "echo test").expect("command runs");
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn run_checked_rejects_nonzero_exit() {
        let err = run_checked("sh", &["-c", "exit 3"], "exit test");
        assert!(err.is_err());
    }

    #[test]
    fn run_checked_reports_missing_binary() {
        let err = run_checked("clamward-no-such-binary", &[], "missing binary");
        assert!(err.is_err());
    }

    #[test]
    /// What: Tolerant runs surface the exit code instead of failing.
    ///
    /// Inputs:
    /// - A shell exiting 100 after printing a line, mirroring the
    ///   `dnf check-update` convention.
    ///
    /// Output:
    /// - `Capture` with the printed line and `exit_code == Some(100)`.
    fn run_tolerant_preserves_exit_code() {
        let cap = run_tolerant("sh", &["-c", "echo pending; exit 100"], &[], "exit 100 test")
            .expect("spawn succeeds");
        assert_eq!(cap.exit_code, Some(100));
        assert!(!cap.success());
        assert_eq!(cap.stdout.trim(), "pending");
    }

    #[test]
    fn run_tolerant_passes_environment() {
        let cap = run_tolerant(
            "sh",
            &["-c", "printf %s \"$CLAMWARD_TEST_ENV\""],
            &[("CLAMWARD_TEST_ENV", "present")],
            "env test",
        )
        .expect("spawn succeeds");
        assert_eq!(cap.stdout, "present");
    }

    #[test]
    /// What: The bounded variant kills a runaway child at the deadline.
    ///
    /// Inputs:
    /// - `sleep 30` with a 1 second deadline.
    ///
    /// Output:
    /// - `timed_out` is set and the call returns promptly.
    fn run_with_timeout_kills_runaway() {
        let started = std::time::Instant::now();
        let cap = run_tolerant_with_timeout("sleep", &["30"], &[], "sleep test", 1)
            .expect("spawn succeeds");
        assert!(cap.timed_out);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn run_with_timeout_captures_completed_output() {
        let cap = run_tolerant_with_timeout(
            "sh",
            &["-c", "echo done; exit 1"],
            &[],
            "bounded echo test",
            30,
        )
        .expect("spawn succeeds");
        assert!(!cap.timed_out);
        assert_eq!(cap.exit_code, Some(1));
        assert_eq!(cap.stdout.trim(), "done");
    }
}
