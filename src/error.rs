use thiserror::Error;
use tokio::time::error::Elapsed;

/// Possible errors for the package.
#[derive(Error, Debug)]
pub enum RconError {
    /// Returned if the host is down, refuses the connection, or the socket
    /// fails before the auth handshake completes.
    #[error("cannot connect to host")]
    Connection(#[source] std::io::Error),
    /// Returned if you can't remember the password.
    #[error("bad password")]
    Authentication,
    /// Returned if a command is sent before `connect()` succeeded or after
    /// the session was dropped.
    #[error("not connected to an rcon server")]
    NotConnected,
    /// Returned if a frame is too short or its length field does not match
    /// the bytes that follow it.
    #[error("packet malformed: {0}")]
    MalformedPacket(String),
    /// Returned if the header is mangled in some way (bad offsets, incomplete
    /// response)
    #[error("packet header malformed (can't parse size, id or type)")]
    MalformedPacketHeader(#[from] std::array::TryFromSliceError),
    /// Internal error used if the stream was successfully established, but
    /// there was a problem writing to the socket.
    #[error("cannot send message to host")]
    Send(#[source] std::io::Error),
    /// Internal error used if the stream was successfully established, but
    /// there was a problem reading from the socket.
    #[error("cannot receive response from host")]
    Receive(#[source] std::io::Error),
    /// Returned if the server did not respond in time.
    #[error("timeout")]
    Timeout(#[from] Elapsed),
    /// Returned by `Client::new` for an empty host or port 0.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
    /// Returned when parsing a verb that is not a known [crate::Command].
    #[error("unknown rcon command: {0}")]
    UnknownCommand(String),
}

impl RconError {
    /// Socket failures during the handshake are reported as connection
    /// failures rather than send/receive errors.
    pub(crate) fn into_connection_error(self) -> Self {
        match self {
            RconError::Send(e) | RconError::Receive(e) => RconError::Connection(e),
            other => other,
        }
    }
}
