mod command;
mod system;

pub use command::CommandOpener;
pub use system::SystemOpener;

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Opener used by the `launcher` binary on this platform
#[cfg(unix)]
pub type PlatformOpener = CommandOpener;
#[cfg(not(unix))]
pub type PlatformOpener = SystemOpener;

/// Build the opener for the current platform
///
/// On Unix this shells out to `open` (macOS) or `xdg-open`; elsewhere the URL
/// is handed straight to the OS.
pub fn platform_opener(timeout: Duration) -> PlatformOpener {
    #[cfg(unix)]
    {
        CommandOpener::platform_default(timeout)
    }
    #[cfg(not(unix))]
    {
        SystemOpener::new(timeout)
    }
}

/// Something that can hand a URL to the OS to show in the default browser
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> impl Future<Output = Result<(), OpenError>> + Send;
}

#[derive(Debug)]
pub enum OpenError {
    /// The open command ran but exited non-zero; holds its stderr
    Failed(String),
    Timeout,
    Io(std::io::Error),
    Launch(String),
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::Failed(stderr) => write!(f, "Failed to open URL: {}", stderr),
            OpenError::Timeout => write!(f, "Timeout opening URL"),
            OpenError::Io(e) => write!(f, "{}", e),
            OpenError::Launch(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for OpenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpenError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Prefix `http://` unless the URL already starts with `http://` or `https://`
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// Normalize a URL and open it with the given opener
///
/// # Arguments
/// * `opener` - The platform opener to hand the URL to
/// * `url` - The URL as received, possibly without a scheme
///
/// # Errors
/// Returns the opener's error if the URL could not be opened. Every outcome is
/// logged.
pub async fn open_url<O: UrlOpener>(opener: &O, url: &str) -> Result<String, OpenError> {
    let url = normalize_url(url);
    tracing::info!("Opening URL: {}", url);

    match opener.open(&url).await {
        Ok(()) => {
            tracing::info!("Success: Opened {}", url);
            Ok(url)
        }
        Err(e) => {
            tracing::error!("Error: {}", e);
            Err(e)
        }
    }
}
