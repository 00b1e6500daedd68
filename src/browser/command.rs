use super::{OpenError, UrlOpener};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// How long to wait for stderr after a failed command has exited
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// Opens URLs by running an OS command with the URL as its last argument
#[derive(Debug, Clone)]
pub struct CommandOpener {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandOpener {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// `open` on macOS, `xdg-open` on other Unix desktops
    pub fn platform_default(timeout: Duration) -> Self {
        if cfg!(target_os = "macos") {
            Self::new("open", timeout)
        } else {
            Self::new("xdg-open", timeout)
        }
    }

    /// Arguments placed before the URL
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl UrlOpener for CommandOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(OpenError::Io)?;

        // Drained on its own task: a forked browser can keep the pipe open
        // long after the command itself has exited
        let mut stderr_pipe = child.stderr.take();
        let stderr_reader = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(pipe) = stderr_pipe.as_mut() {
                let _ = pipe.read_to_end(&mut buf).await;
            }
            buf
        });

        // Returning early drops the child, which kills it
        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(result) => result.map_err(OpenError::Io)?,
            Err(_) => {
                stderr_reader.abort();
                return Err(OpenError::Timeout);
            }
        };

        if status.success() {
            stderr_reader.abort();
            return Ok(());
        }

        let stderr = match tokio::time::timeout(STDERR_GRACE, stderr_reader).await {
            Ok(Ok(buf)) => String::from_utf8_lossy(&buf).trim().to_string(),
            _ => String::new(),
        };
        Err(OpenError::Failed(stderr))
    }
}
