//! Packet kinds, type-byte encoding, and file-transfer records.
//!
//! The type byte packs three things: the protocol version in bits 4-6
//! (fixed at `0x20`), the packet kind in the low nibble, and a timestamp
//! flag in bit 7 that is only valid on object updates.

use crate::core::constants::{
    FILEDATA_FLAG_EOF, FILEDATA_FLAG_LAST, FILE_CHUNK_HEADER_LENGTH, FILE_REQUEST_LENGTH,
    KIND_MASK, TIMESTAMP_FLAG, TYPE_VER, VER_MASK,
};

/// Packet kind carried in the low nibble of the type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketKind {
    /// Broadcast object update, no acknowledgment expected.
    Obj = 0x00,
    /// Request for the peer's current value of an object.
    ObjReq = 0x01,
    /// Object update that must be acknowledged.
    ObjAck = 0x02,
    /// Positive acknowledgment of an `ObjAck` update.
    Ack = 0x03,
    /// Negative acknowledgment: the peer does not know or accept the object.
    Nack = 0x04,
    /// Request for a chunk of an out-of-band file stream.
    FileReq = 0x08,
    /// One chunk of an out-of-band file stream.
    FileData = 0x09,
}

impl PacketKind {
    /// Parse a kind from the low nibble of a type byte.
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x00 => Some(Self::Obj),
            0x01 => Some(Self::ObjReq),
            0x02 => Some(Self::ObjAck),
            0x03 => Some(Self::Ack),
            0x04 => Some(Self::Nack),
            0x08 => Some(Self::FileReq),
            0x09 => Some(Self::FileData),
            _ => None,
        }
    }

    /// Whether this kind carries an object payload.
    pub fn carries_object(self) -> bool {
        matches!(self, Self::Obj | Self::ObjAck)
    }
}

/// Decoded type byte: packet kind plus timestamp flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketType {
    /// Packet kind.
    pub kind: PacketKind,
    /// Set when an object update carries a leading 2-byte timestamp.
    pub timestamped: bool,
}

impl PacketType {
    /// Plain (untimestamped) type of the given kind.
    pub const fn plain(kind: PacketKind) -> Self {
        Self {
            kind,
            timestamped: false,
        }
    }

    /// Timestamped object update.
    pub const fn timestamped_obj() -> Self {
        Self {
            kind: PacketKind::Obj,
            timestamped: true,
        }
    }

    /// Decode a type byte.
    ///
    /// Rejects foreign protocol versions, unknown kinds, and a timestamp
    /// flag on anything but a plain object update.
    pub fn from_byte(byte: u8) -> Option<Self> {
        if byte & VER_MASK != TYPE_VER {
            return None;
        }
        let kind = PacketKind::from_nibble(byte & KIND_MASK)?;
        let timestamped = byte & TIMESTAMP_FLAG != 0;
        if timestamped && kind != PacketKind::Obj {
            return None;
        }
        Some(Self { kind, timestamped })
    }

    /// Encode to the wire type byte.
    pub fn as_byte(self) -> u8 {
        let mut byte = TYPE_VER | self.kind as u8;
        if self.timestamped {
            byte |= TIMESTAMP_FLAG;
        }
        byte
    }
}

/// Payload of a file-request frame: a byte offset into the file identified
/// by the frame's object id, plus request flags (currently unused).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRequest {
    /// Byte offset the peer wants data from.
    pub offset: u32,
    /// Request flags, reserved.
    pub flags: u16,
}

impl FileRequest {
    /// Serialize to the fixed 6-byte payload.
    pub fn to_bytes(self) -> [u8; FILE_REQUEST_LENGTH] {
        let mut buf = [0u8; FILE_REQUEST_LENGTH];
        buf[0..4].copy_from_slice(&self.offset.to_le_bytes());
        buf[4..6].copy_from_slice(&self.flags.to_le_bytes());
        buf
    }

    /// Parse from a frame payload.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != FILE_REQUEST_LENGTH {
            return None;
        }
        Some(Self {
            offset: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            flags: u16::from_le_bytes([bytes[4], bytes[5]]),
        })
    }
}

/// Record header leading every file-data payload; the chunk bytes follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileChunkHeader {
    /// Byte offset of this chunk within the file.
    pub offset: u32,
    /// Chunk flags, see [`FileChunkHeader::eof`] and
    /// [`FileChunkHeader::last_in_batch`].
    pub flags: u8,
}

impl FileChunkHeader {
    /// Serialize to the 5-byte record header.
    pub fn to_bytes(self) -> [u8; FILE_CHUNK_HEADER_LENGTH] {
        let mut buf = [0u8; FILE_CHUNK_HEADER_LENGTH];
        buf[0..4].copy_from_slice(&self.offset.to_le_bytes());
        buf[4] = self.flags;
        buf
    }

    /// Parse from the start of a file-data payload.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < FILE_CHUNK_HEADER_LENGTH {
            return None;
        }
        Some(Self {
            offset: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            flags: bytes[4],
        })
    }

    /// No more data exists past this chunk.
    pub fn eof(self) -> bool {
        self.flags & FILEDATA_FLAG_EOF != 0
    }

    /// Last chunk of the current batch; the peer must re-request to get more.
    pub fn last_in_batch(self) -> bool {
        self.flags & FILEDATA_FLAG_LAST != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_byte_roundtrip() {
        for kind in [
            PacketKind::Obj,
            PacketKind::ObjReq,
            PacketKind::ObjAck,
            PacketKind::Ack,
            PacketKind::Nack,
            PacketKind::FileReq,
            PacketKind::FileData,
        ] {
            let ty = PacketType::plain(kind);
            assert_eq!(PacketType::from_byte(ty.as_byte()), Some(ty));
        }

        let ts = PacketType::timestamped_obj();
        assert_eq!(ts.as_byte(), 0xA0);
        assert_eq!(PacketType::from_byte(0xA0), Some(ts));
    }

    #[test]
    fn test_type_byte_values() {
        assert_eq!(PacketType::plain(PacketKind::Obj).as_byte(), 0x20);
        assert_eq!(PacketType::plain(PacketKind::ObjReq).as_byte(), 0x21);
        assert_eq!(PacketType::plain(PacketKind::ObjAck).as_byte(), 0x22);
        assert_eq!(PacketType::plain(PacketKind::Ack).as_byte(), 0x23);
        assert_eq!(PacketType::plain(PacketKind::Nack).as_byte(), 0x24);
        assert_eq!(PacketType::plain(PacketKind::FileReq).as_byte(), 0x28);
        assert_eq!(PacketType::plain(PacketKind::FileData).as_byte(), 0x29);
    }

    #[test]
    fn test_type_byte_rejects() {
        // Wrong protocol version.
        assert_eq!(PacketType::from_byte(0x10), None);
        assert_eq!(PacketType::from_byte(0x30), None);
        // Unknown kind nibble.
        assert_eq!(PacketType::from_byte(0x25), None);
        assert_eq!(PacketType::from_byte(0x2F), None);
        // Timestamp flag on anything but a plain object update.
        assert_eq!(PacketType::from_byte(0xA2), None);
        assert_eq!(PacketType::from_byte(0xA3), None);
    }

    #[test]
    fn test_file_request_roundtrip() {
        let req = FileRequest {
            offset: 0xDEAD_BEEF,
            flags: 0x0102,
        };
        assert_eq!(FileRequest::from_bytes(&req.to_bytes()), Some(req));
        assert_eq!(FileRequest::from_bytes(&[0u8; 5]), None);
        assert_eq!(FileRequest::from_bytes(&[0u8; 7]), None);
    }

    #[test]
    fn test_file_chunk_header() {
        let hdr = FileChunkHeader {
            offset: 200,
            flags: FILEDATA_FLAG_LAST | FILEDATA_FLAG_EOF,
        };
        let parsed = FileChunkHeader::from_bytes(&hdr.to_bytes()).unwrap();
        assert_eq!(parsed, hdr);
        assert!(parsed.eof());
        assert!(parsed.last_in_batch());

        let plain = FileChunkHeader {
            offset: 0,
            flags: 0,
        };
        assert!(!plain.eof());
        assert!(!plain.last_in_batch());
    }
}
