use std::{fmt, time::Duration};

use crate::error::RconError;

/// Where to connect and how to authenticate. Nothing is read from the
/// environment; callers supply every value.
#[derive(Clone)]
pub struct ClientConfig {
    host: String,
    port: u16,
    password: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16, password: impl Into<String>) -> Self {
        ClientConfig {
            host: host.into(),
            port,
            password: password.into(),
            timeout: None,
        }
    }

    /// Bound the TCP connect, the auth handshake and every command exchange
    /// by `timeout`. Without it the client waits for the server indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// `host:port`, suitable for `TcpStream::connect`.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), RconError> {
        if self.host.trim().is_empty() {
            return Err(RconError::InvalidConfig("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(RconError::InvalidConfig(
                "port must be between 1 and 65535".into(),
            ));
        }
        Ok(())
    }
}

// Keep the password out of logs and panics.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
