//! Shell command execution
//!
//! Commands are handed to the configured shell as a single `-c` argument, so
//! pipes, redirects and variable expansion behave as on an interactive prompt.
//! stdout and stderr are wired to the same pipe, which keeps the combined
//! output in the order the process wrote it.

use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::net::unix::pipe;
use tokio::process::Command;

use crate::types::ExecError;

/// Runs command lines through a host shell
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: String,
}

impl ShellExecutor {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Run `command` and return its combined output.
    ///
    /// Fails if the shell cannot be started or exits with anything other than
    /// status 0. There is no timeout and no output limit.
    pub async fn run(&self, command: &str) -> Result<String, ExecError> {
        let (sender, mut receiver) = pipe::pipe()?;
        let stdout_fd = sender.into_blocking_fd()?;
        let stderr_fd = stdout_fd.try_clone()?;

        let mut child = {
            let mut cmd = Command::new(&self.shell);
            cmd.arg("-c")
                .arg(command)
                .stdin(Stdio::null())
                .stdout(stdout_fd)
                .stderr(stderr_fd);
            cmd.spawn().map_err(ExecError::Spawn)?
            // `cmd` drops here, closing our copies of the write end
        };

        let mut bytes = Vec::new();
        let (status, _) = tokio::try_join!(child.wait(), receiver.read_to_end(&mut bytes))?;
        let output = String::from_utf8_lossy(&bytes).into_owned();

        if status.success() {
            Ok(output)
        } else {
            Err(ExecError::Exit { status, output })
        }
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SHELL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_output_is_exact() {
        let output = ShellExecutor::default().run("echo hello").await.unwrap();
        assert_eq!(output, "hello\n");
    }

    #[tokio::test]
    async fn test_stderr_is_captured_in_order() {
        let output = ShellExecutor::default()
            .run("echo out; echo err 1>&2; echo done")
            .await
            .unwrap();
        assert_eq!(output, "out\nerr\ndone\n");
    }

    #[tokio::test]
    async fn test_shell_features_are_interpreted() {
        let output = ShellExecutor::default()
            .run("GREETING=hi; echo \"$GREETING world\" | tr a-z A-Z")
            .await
            .unwrap();
        assert_eq!(output, "HI WORLD\n");
    }

    #[tokio::test]
    async fn test_empty_command_succeeds_with_no_output() {
        let output = ShellExecutor::default().run("").await.unwrap();
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_an_error() {
        let err = ShellExecutor::default()
            .run("echo partial; exit 3")
            .await
            .unwrap_err();

        match err {
            ExecError::Exit { status, output } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(output, "partial\n");
            }
            other => panic!("expected exit error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_shell_is_spawn_error() {
        let err = ShellExecutor::new("/nonexistent/shell_xyz")
            .run("echo hi")
            .await
            .unwrap_err();

        assert!(matches!(err, ExecError::Spawn(_)));
        assert!(err.to_string().starts_with("erro ao executar comando: "));
    }

    #[tokio::test]
    async fn test_unknown_command_reports_failure() {
        let err = ShellExecutor::default()
            .run("command_that_does_not_exist_12345")
            .await
            .unwrap_err();

        match err {
            ExecError::Exit { status, .. } => assert_eq!(status.code(), Some(127)),
            other => panic!("expected exit error, got {:?}", other),
        }
    }

    #[test]
    fn test_long_commands_do_not_hold_up_short_ones() {
        // A tiny blocking pool must not limit how many commands run at once
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .max_blocking_threads(1)
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let executor = ShellExecutor::default();
            let slow_a = tokio::spawn({
                let executor = executor.clone();
                async move { executor.run("sleep 2").await }
            });
            let slow_b = tokio::spawn({
                let executor = executor.clone();
                async move { executor.run("sleep 2").await }
            });
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;

            let started = std::time::Instant::now();
            let output = executor.run("echo hi").await.unwrap();
            assert_eq!(output, "hi\n");
            assert!(started.elapsed() < std::time::Duration::from_secs(1));

            slow_a.await.unwrap().unwrap();
            slow_b.await.unwrap().unwrap();
        });
    }

    #[tokio::test]
    async fn test_output_larger_than_pipe_buffer() {
        let output = ShellExecutor::default()
            .run("head -c 200000 /dev/zero | tr '\\0' a")
            .await
            .unwrap();
        assert_eq!(output.len(), 200_000);
        assert!(output.bytes().all(|b| b == b'a'));
    }
}
