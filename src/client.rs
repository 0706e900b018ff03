use std::{future::Future, time::Duration};

use log::{debug, trace, warn};
use rand::Rng;
use tokio::{io::AsyncWriteExt, net::TcpStream, time};

use crate::{
    command::Command,
    config::ClientConfig,
    error::RconError,
    packet::{Packet, PacketType},
};

/// Upper bound (exclusive) for randomly chosen session ids.
pub const SESSION_ID_RANGE: i32 = 100_000;

/// Where a [Client] is in its lifecycle. There is no "connected but not
/// authenticated" resting state: a rejected password drops the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Authenticated,
}

/// Picks the id stamped on every packet of a connection. Called once per
/// `connect()`.
pub trait SessionIds {
    fn session_id(&mut self) -> i32;
}

/// Random ids in `0..SESSION_ID_RANGE`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSessionIds;

impl SessionIds for RandomSessionIds {
    fn session_id(&mut self) -> i32 {
        rand::thread_rng().gen_range(0..SESSION_ID_RANGE)
    }
}

/// Always the same id. Useful against test servers.
#[derive(Debug, Clone, Copy)]
pub struct FixedSessionId(pub i32);

impl SessionIds for FixedSessionId {
    fn session_id(&mut self) -> i32 {
        self.0
    }
}

/// Asynchronous rcon session. Call `connect()` to open the socket and
/// authenticate, then `send()` commands.
///
/// Every operation takes `&mut self`, so a session can only ever have one
/// request in flight. Share it between tasks behind a mutex if you must.
///
/// Login is decided by the first frame the server sends back: its id must
/// equal the session id. A server that first sends an empty response frame
/// echoing the id (as srcds does) is treated as logged in even if the auth
/// response that follows carries -1, and that auth response is then read as
/// the reply to the next `send()`.
///
/// ## Example
/// ```no_run
/// use pzrcon::{Client, ClientConfig, Command};
/// use std::error::Error;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn Error>> {
///     let config = ClientConfig::new("127.0.0.1", 16261, "<put rcon password here>");
///     let mut client = Client::new(config)?;
///     client.connect().await?;
///     let response = client.send(Command::KickUser, "bob").await?;
///
///     println!("{}", response);
///     client.disconnect().await;
///     Ok(())
/// }
/// ```
pub struct Client<I = RandomSessionIds> {
    config: ClientConfig,
    ids: I,
    session_id: i32,
    state: SessionState,
    stream: Option<TcpStream>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, RconError> {
        Client::with_session_ids(config, RandomSessionIds)
    }
}

impl<I: SessionIds> Client<I> {
    pub fn with_session_ids(config: ClientConfig, ids: I) -> Result<Self, RconError> {
        config.validate()?;

        Ok(Client {
            config,
            ids,
            session_id: 0,
            state: SessionState::Disconnected,
            stream: None,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Id used for every packet of the current (or last) connection.
    pub fn session_id(&self) -> i32 {
        self.session_id
    }

    /// Open a fresh socket and authenticate with the configured password.
    /// Any socket held from an earlier connection is dropped first.
    pub async fn connect(&mut self) -> Result<(), RconError> {
        self.stream = None;
        self.state = SessionState::Disconnected;
        self.session_id = self.ids.session_id();

        let endpoint = self.config.endpoint();
        let timeout = self.config.timeout();

        let mut stream = within(timeout, async {
            TcpStream::connect(&endpoint)
                .await
                .map_err(RconError::Connection)
        })
        .await?;

        debug!("opened tcp stream to {}, attempting auth", endpoint);
        self.state = SessionState::Connecting;

        let auth_packet = Packet::new(self.session_id, PacketType::Auth, self.config.password());
        let response = match within(timeout, exchange(&mut stream, &auth_packet)).await {
            Ok(response) => response,
            Err(e) => {
                self.state = SessionState::Disconnected;
                return Err(e.into_connection_error());
            }
        };

        // the server echoes our id on success and sends anything else
        // (normally -1) on failure
        if response.id() != self.session_id {
            warn!(
                "auth rejected by {}: expected id {}, got {}",
                endpoint,
                self.session_id,
                response.id()
            );
            self.state = SessionState::Disconnected;
            return Err(RconError::Authentication);
        }

        self.stream = Some(stream);
        self.state = SessionState::Authenticated;
        debug!("auth complete, session id {}", self.session_id);
        Ok(())
    }

    /// Close the socket. Safe to call at any time, including when already
    /// disconnected.
    pub async fn disconnect(&mut self) {
        self.state = SessionState::Disconnected;

        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                trace!("ignoring error while closing stream: {}", e);
            }
            debug!("disconnected from {}", self.config.endpoint());
        }
    }

    /// Run `command` with `args` appended after a single space and return the
    /// server's reply.
    pub async fn send(&mut self, command: Command, args: &str) -> Result<String, RconError> {
        if !self.is_authenticated() {
            return Err(RconError::NotConnected);
        }

        self.send_frame(&command.with_args(args), PacketType::Command)
            .await
    }

    /// Send one frame and return the body of the next frame the server sends
    /// back. Responses are not matched against the session id.
    ///
    /// Only [PacketType::Auth] frames may be sent before the session is
    /// authenticated.
    pub async fn send_frame(
        &mut self,
        payload: &str,
        packet_type: PacketType,
    ) -> Result<String, RconError> {
        if !self.is_authenticated() && packet_type != PacketType::Auth {
            return Err(RconError::NotConnected);
        }

        let timeout = self.config.timeout();
        let packet = Packet::new(self.session_id, packet_type, payload);
        let stream = self.stream.as_mut().ok_or(RconError::NotConnected)?;

        let result = within(timeout, exchange(stream, &packet)).await;
        match result {
            Ok(response) => Ok(response.into_body()),
            Err(e) => {
                // the stream is no longer known to sit on a frame boundary
                warn!("dropping session after failed exchange: {}", e);
                self.stream = None;
                self.state = SessionState::Disconnected;
                Err(e)
            }
        }
    }
}

async fn exchange(stream: &mut TcpStream, packet: &Packet) -> Result<Packet, RconError> {
    packet.write_to(stream).await?;
    Packet::read_from(stream).await
}

async fn within<T, F>(timeout: Option<Duration>, future: F) -> Result<T, RconError>
where
    F: Future<Output = Result<T, RconError>>,
{
    match timeout {
        Some(limit) => time::timeout(limit, future).await?,
        None => future.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new(ClientConfig::new("127.0.0.1", 16261, "secret")).unwrap()
    }

    #[test]
    fn test_new_client_is_disconnected() {
        let client = client();
        assert_eq!(client.state(), SessionState::Disconnected);
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = Client::new(ClientConfig::new("127.0.0.1", 0, "secret"))
            .err()
            .unwrap();
        assert!(matches!(err, RconError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_send_before_connect() {
        let mut client = client();
        let err = client.send(Command::KickUser, "bob").await.unwrap_err();
        assert!(matches!(err, RconError::NotConnected));
        assert_eq!(client.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_send_frame_before_connect() {
        let mut client = client();
        let err = client
            .send_frame("status", PacketType::Command)
            .await
            .unwrap_err();
        assert!(matches!(err, RconError::NotConnected));

        // auth frames skip the state check but still need a socket
        let err = client
            .send_frame("secret", PacketType::Auth)
            .await
            .unwrap_err();
        assert!(matches!(err, RconError::NotConnected));
    }

    #[tokio::test]
    async fn test_disconnect_without_connection() {
        let mut client = client();
        client.disconnect().await;
        client.disconnect().await;
        assert_eq!(client.state(), SessionState::Disconnected);
    }

    #[test]
    fn test_random_ids_in_range() {
        let mut ids = RandomSessionIds;
        for _ in 0..1000 {
            let id = ids.session_id();
            assert!((0..SESSION_ID_RANGE).contains(&id));
        }
    }

    #[test]
    fn test_fixed_id() {
        let mut ids = FixedSessionId(1234);
        assert_eq!(ids.session_id(), 1234);
        assert_eq!(ids.session_id(), 1234);
    }
}
