mod schema;

pub use schema::Config;

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Port used when none is given on the command line
pub const DEFAULT_PORT: u16 = 8765;

/// How long an open operation may take before the request fails
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(5);

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            open_timeout: DEFAULT_OPEN_TIMEOUT,
        }
    }
}

impl Config {
    /// Default configuration listening on `port` on all interfaces
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }
}
