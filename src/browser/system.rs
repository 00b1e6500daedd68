use super::{OpenError, UrlOpener};
use std::io;
use std::time::Duration;

/// Hands the URL to the OS default-browser facility directly (ShellExecute on
/// Windows) rather than through a subprocess
#[derive(Debug, Clone)]
pub struct SystemOpener {
    timeout: Duration,
}

impl SystemOpener {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl UrlOpener for SystemOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        let url = url.to_string();
        open_blocking(self.timeout, move || webbrowser::open(&url)).await
    }
}

/// Run a blocking OS call on the blocking pool, giving up after `timeout`
///
/// A blocked OS call cannot be cancelled; we only stop waiting for it.
async fn open_blocking<F>(timeout: Duration, call: F) -> Result<(), OpenError>
where
    F: FnOnce() -> io::Result<()> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(call);

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(()))) => Ok(()),
        Ok(Ok(Err(e))) => Err(OpenError::Io(e)),
        Ok(Err(e)) => Err(OpenError::Launch(format!("Browser launch task failed: {}", e))),
        Err(_) => Err(OpenError::Timeout),
    }
}
