use log::trace;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::RconError;

/// Largest length field we accept from a peer. Anything bigger is treated as
/// a corrupted stream rather than allocated.
pub const MAX_PACKET_SIZE: i32 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    // SERVERDATA_AUTH
    Auth,
    // SERVERDATA_EXECCOMMAND, shares its value with SERVERDATA_AUTH_RESPONSE
    Command,
    // SERVERDATA_RESPONSE_VALUE
    Response,
    /// Any other value a server put in the type field, kept as sent.
    Other(i32),
}

impl PacketType {
    pub const AUTH_RESPONSE: Self = Self::Command;

    pub fn to_le_bytes(&self) -> [u8; 4] {
        i32::from(*self).to_le_bytes()
    }
}

impl From<i32> for PacketType {
    fn from(value: i32) -> Self {
        match value {
            3 => PacketType::Auth,
            2 => PacketType::Command,
            0 => PacketType::Response,
            other => PacketType::Other(other),
        }
    }
}

impl From<PacketType> for i32 {
    fn from(packet_type: PacketType) -> Self {
        match packet_type {
            PacketType::Auth => 3,
            PacketType::Command => 2,
            PacketType::Response => 0,
            PacketType::Other(value) => value,
        }
    }
}

/// A single rcon frame: `size | id | type | body | 0x00 0x00`, integers
/// little-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    id: i32,
    packet_type: PacketType,
    body: String,
}

impl Packet {
    /// id + type + the two terminating nulls.
    pub const BASE_PACKET_SIZE: i32 = 10;
    /// size + id + type, the offset at which the body starts on the wire.
    pub const HEADER_SIZE: usize = 12;

    pub fn new(id: i32, packet_type: PacketType, body: impl Into<String>) -> Self {
        Packet {
            id,
            packet_type,
            body: body.into(),
        }
    }

    // Since the only one of these values that can change in length is the body,
    // an easy way to calculate the size of a packet is to find the byte-length
    // of the packet body, then add 10 to it.
    pub fn size(&self) -> i32 {
        self.body.len() as i32 + Self::BASE_PACKET_SIZE
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn body(&self) -> &str {
        self.body.as_ref()
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn pack(&self) -> Vec<u8> {
        // Size, ID, Type, Body, Terminator
        let mut payload = Vec::<u8>::with_capacity(self.size() as usize + 4);
        payload.extend_from_slice(&self.size().to_le_bytes());
        payload.extend_from_slice(&self.id().to_le_bytes());
        payload.extend_from_slice(&self.packet_type().to_le_bytes());
        payload.extend_from_slice(self.body().as_bytes());
        // null terminate the body, then null terminate the entire packet
        payload.extend_from_slice(&[0u8, 0u8]);
        payload
    }

    /// Parse exactly one complete frame. The slice must hold the frame and
    /// nothing else.
    pub fn unpack(incoming: &[u8]) -> Result<Self, RconError> {
        if incoming.len() < Self::HEADER_SIZE {
            return Err(RconError::MalformedPacket(format!(
                "{} bytes is shorter than the {} byte header",
                incoming.len(),
                Self::HEADER_SIZE
            )));
        }

        let size = i32::from_le_bytes(incoming[0..4].try_into()?);
        Self::check_size(size)?;

        let rest = &incoming[4..];
        if rest.len() != size as usize {
            return Err(RconError::MalformedPacket(format!(
                "size field says {} bytes but {} followed",
                size,
                rest.len()
            )));
        }

        Self::decode_fields(rest)
    }

    /// Read one frame off the stream: the size field first, then exactly
    /// that many bytes. Anything the peer sent after the frame is left
    /// unread.
    pub async fn read_from<R>(reader: &mut R) -> Result<Self, RconError>
    where
        R: AsyncRead + Unpin,
    {
        let mut size = [0u8; 4];
        reader
            .read_exact(&mut size)
            .await
            .map_err(RconError::Receive)?;
        let size = i32::from_le_bytes(size);
        Self::check_size(size)?;

        let mut rest = vec![0u8; size as usize];
        reader
            .read_exact(&mut rest)
            .await
            .map_err(RconError::Receive)?;

        let packet = Self::decode_fields(&rest)?;
        trace!(
            "read packet id {} type {:?} size {}",
            packet.id(),
            packet.packet_type(),
            size
        );
        Ok(packet)
    }

    pub async fn write_to<W>(&self, writer: &mut W) -> Result<(), RconError>
    where
        W: AsyncWrite + Unpin,
    {
        writer
            .write_all(&self.pack())
            .await
            .map_err(RconError::Send)?;
        writer.flush().await.map_err(RconError::Send)?;
        trace!(
            "wrote packet id {} type {:?} size {}",
            self.id(),
            self.packet_type(),
            self.size()
        );
        Ok(())
    }

    fn check_size(size: i32) -> Result<(), RconError> {
        if size < Self::BASE_PACKET_SIZE {
            return Err(RconError::MalformedPacket(format!(
                "size {} is below the minimum of {}",
                size,
                Self::BASE_PACKET_SIZE
            )));
        }
        if size > MAX_PACKET_SIZE {
            return Err(RconError::MalformedPacket(format!(
                "size {} exceeds the maximum of {}",
                size, MAX_PACKET_SIZE
            )));
        }
        Ok(())
    }

    // `rest` is everything after the size field: id, type, body, terminator.
    // Only the framing is validated; the type is passed through and bytes
    // that are not valid text become U+FFFD.
    fn decode_fields(rest: &[u8]) -> Result<Self, RconError> {
        let id = i32::from_le_bytes(rest[0..4].try_into()?);
        let packet_type = PacketType::from(i32::from_le_bytes(rest[4..8].try_into()?));
        let body = String::from_utf8_lossy(&rest[8..rest.len() - 2]);

        Ok(Packet::new(id, packet_type, body))
    }
}
