//! Child process plumbing shared by the docker client and the hook cycle.
use std::{collections::VecDeque, process::ExitStatus, process::Stdio};

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};
use tracing::{debug, info, trace, warn};

use crate::ExecError;

/// How child output is mirrored into the log.
#[derive(Debug, Clone, Copy)]
pub struct OutputLogConfig {
    /// Max line length before truncation.
    pub max_line_length: usize,
    /// Log stdout at INFO level (false = DEBUG).
    pub stdout_info: bool,
    /// Log stderr at WARN level (false = DEBUG).
    pub stderr_warn: bool,
}

impl Default for OutputLogConfig {
    fn default() -> Self {
        Self {
            max_line_length: 4096,
            stdout_info: true,
            stderr_warn: true,
        }
    }
}

/// Fully buffered result of a short-lived command.
#[derive(Debug)]
pub(crate) struct Captured {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// Stdout on success, [`ExecError::NonZeroExit`] otherwise.
    pub fn into_stdout(self, command: &str) -> Result<String, ExecError> {
        if self.status.success() {
            return Ok(self.stdout);
        }
        Err(ExecError::NonZeroExit {
            command: command.to_string(),
            code: self.status.code(),
            stderr: self.stderr.trim().to_string(),
        })
    }
}

/// Run `cmd` to completion and buffer both output streams.
pub(crate) async fn capture(mut cmd: Command, program: &str) -> Result<Captured, ExecError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let out = cmd.output().await.map_err(|source| ExecError::Spawn {
        program: program.to_string(),
        source,
    })?;

    Ok(Captured {
        status: out.status,
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
    })
}

const STDERR_TAIL: usize = 8;

/// Run `cmd` while forwarding its output line by line into the log.
///
/// Returns the exit status and the last few stderr lines.
pub(crate) async fn stream(
    mut cmd: Command,
    program: &str,
    log: OutputLogConfig,
) -> Result<(ExitStatus, String), ExecError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
        program: program.to_string(),
        source,
    })?;
    trace!(program, pid = ?child.id(), "child spawned");

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, _, tail) = tokio::join!(
        child.wait(),
        forward(stdout, log.max_line_length, log.stdout_info, false, 0),
        forward(stderr, log.max_line_length, log.stderr_warn, true, STDERR_TAIL),
    );

    let tail = tail.into_iter().collect::<Vec<_>>().join("\n");
    Ok((status?, tail))
}

async fn forward<R>(
    reader: Option<R>,
    max_len: usize,
    loud: bool,
    is_stderr: bool,
    keep: usize,
) -> VecDeque<String>
where
    R: AsyncRead + Unpin,
{
    let mut kept = VecDeque::with_capacity(keep);
    let Some(reader) = reader else {
        return kept;
    };

    let mut lines = BufReader::new(reader).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => truncate(line, max_len),
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "stopped reading child output");
                break;
            }
        };

        match (is_stderr, loud) {
            (false, true) => info!(target: "warden::hook", "{line}"),
            (true, true) => warn!(target: "warden::hook", "{line}"),
            _ => debug!(target: "warden::hook", stderr = is_stderr, "{line}"),
        }

        if keep > 0 {
            if kept.len() == keep {
                kept.pop_front();
            }
            kept.push_back(line);
        }
    }
    kept
}

fn truncate(mut line: String, max_len: usize) -> String {
    if line.len() > max_len {
        let mut cut = max_len;
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        line.truncate(cut);
        line.push('…');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short".into(), 10), "short");
        assert_eq!(truncate("abcdef".into(), 3), "abc…");
        // 'é' is two bytes; cutting at 2 would split it.
        assert_eq!(truncate("aé".into(), 2), "a…");
    }

    #[tokio::test]
    async fn capture_collects_stdout_and_status() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo out; echo err >&2; exit 4"]);

        let out = capture(cmd, "sh").await.unwrap();
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
        assert_eq!(out.status.code(), Some(4));

        let err = out.into_stdout("sh -c").unwrap_err();
        assert!(matches!(err, ExecError::NonZeroExit { code: Some(4), .. }));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let cmd = Command::new("/nonexistent/warden-test-binary");
        let err = capture(cmd, "warden-test-binary").await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[tokio::test]
    async fn stream_keeps_stderr_tail() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "for i in 1 2 3 4 5 6 7 8 9 10; do echo line$i >&2; done"]);

        let (status, tail) = stream(cmd, "sh", OutputLogConfig::default()).await.unwrap();
        assert!(status.success());

        let lines: Vec<_> = tail.lines().collect();
        assert_eq!(lines.len(), STDERR_TAIL);
        assert_eq!(lines.first(), Some(&"line3"));
        assert_eq!(lines.last(), Some(&"line10"));
    }
}
