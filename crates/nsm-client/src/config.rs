//! Client configuration.

use std::{path::Path, time::Duration};

use nsm_core::Capabilities;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Environment variable carrying the coordinator URL.
pub const NSM_URL: &str = "NSM_URL";

/// Default time to wait for the announce reply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default local bind address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:0";

/// Protocol API version announced by default.
pub const API_VERSION_MAJOR: i32 = 1;
pub const API_VERSION_MINOR: i32 = 2;

/// Configuration of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Client name. Falls back to the executable's file name.
    pub name: Option<String>,
    /// Executable identifier. Falls back to `argv[0]`.
    pub executable: Option<String>,
    /// Announced client capabilities.
    pub capabilities: Capabilities,
    pub major: i32,
    pub minor: i32,
    /// Falls back to the current process id.
    pub pid: Option<u32>,
    /// Hard bound on the announce handshake.
    pub timeout: Duration,
    /// Coordinator URL, e.g. `osc.udp://host:port/`.
    pub nsm_url: Option<String>,
    /// Local UDP bind address.
    pub listen_addr: String,
    /// Block construction until the coordinator replies to the announce.
    pub wait_for_announce_reply: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: None,
            executable: None,
            capabilities: Capabilities::new(),
            major: API_VERSION_MAJOR,
            minor: API_VERSION_MINOR,
            pid: None,
            timeout: DEFAULT_TIMEOUT,
            nsm_url: None,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            wait_for_announce_reply: true,
        }
    }
}

impl ClientConfig {
    /// Default config with `nsm_url` taken from the `NSM_URL` environment
    /// variable, if set.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            nsm_url: std::env::var(NSM_URL).ok(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[must_use]
    pub fn with_nsm_url(mut self, url: impl Into<String>) -> Self {
        self.nsm_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send the announce without waiting for a reply.
    #[must_use]
    pub const fn without_announce_reply(mut self) -> Self {
        self.wait_for_announce_reply = false;
        self
    }

    /// Coordinator URL.
    ///
    /// # Errors
    /// Returns error if no URL was configured.
    pub fn nsm_url(&self) -> Result<&str, ConfigError> {
        self.nsm_url.as_deref().ok_or(ConfigError::MissingUrl)
    }

    /// Name sent in the announce request.
    #[must_use]
    pub fn client_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            let exe = self.executable();
            Path::new(&exe)
                .file_name()
                .map_or_else(|| exe.clone(), |n| n.to_string_lossy().into_owned())
        })
    }

    /// Executable identifier sent in the announce request.
    #[must_use]
    pub fn executable(&self) -> String {
        self.executable
            .clone()
            .or_else(|| std::env::args().next())
            .unwrap_or_default()
    }

    /// Process id sent in the announce request.
    #[must_use]
    pub fn pid(&self) -> u32 {
        self.pid.unwrap_or_else(std::process::id)
    }
}
