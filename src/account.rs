use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Security {
    Plain,
    SSL,
}

impl Default for Security {
    fn default() -> Security {
        Security::SSL
    }
}

impl FromStr for Security {
    type Err = Error;

    fn from_str(s: &str) -> Result<Security> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(Security::Plain),
            "ssl" | "tls" => Ok(Security::SSL),
            _ => Err(ErrorKind::UnknownSecurity(s.to_string()).into()),
        }
    }
}

/// Everything needed to open and log into one mailbox.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccountConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub security: Security,
    /// Socket read and write timeout in seconds. None blocks forever.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timeout_secs: Option<u64>,
    /// Reject commands the current session phase does not allow before
    /// sending them.
    #[cfg_attr(feature = "serde", serde(default))]
    pub enforce_phases: bool,
}

impl AccountConfig {
    pub fn new(host: &str, port: u16, username: &str, password: &str) -> AccountConfig {
        AccountConfig {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: password.to_string(),
            security: Security::default(),
            timeout_secs: None,
            enforce_phases: false,
        }
    }

    pub fn security(mut self, security: Security) -> AccountConfig {
        self.security = security;
        self
    }

    pub fn timeout(mut self, secs: u64) -> AccountConfig {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn enforce_phases(mut self, enforce: bool) -> AccountConfig {
        self.enforce_phases = enforce;
        self
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .field("security", &self.security)
            .field("timeout_secs", &self.timeout_secs)
            .field("enforce_phases", &self.enforce_phases)
            .finish()
    }
}
