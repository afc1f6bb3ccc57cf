//! Protocol constants fixed by the UAVTalk wire format.
//!
//! These values are fixed by the protocol and MUST NOT be changed.

// =============================================================================
// FRAMING
// =============================================================================

/// Sync marker identifying the start of a frame.
pub const SYNC_VAL: u8 = 0x3C;

/// Protocol version carried in bits 4-6 of the type byte.
pub const TYPE_VER: u8 = 0x20;

/// Mask extracting the version bits of the type byte.
pub const VER_MASK: u8 = 0x70;

/// Mask extracting the packet kind nibble of the type byte.
pub const KIND_MASK: u8 = 0x0F;

/// Type-byte flag marking an object update that carries a timestamp.
pub const TIMESTAMP_FLAG: u8 = 0x80;

// =============================================================================
// LENGTHS
// =============================================================================

/// Header without instance id: sync(1) + type(1) + size(2) + object id(4).
pub const MIN_HEADER_LENGTH: usize = 8;

/// Header with the optional 2-byte instance id.
pub const MAX_HEADER_LENGTH: usize = MIN_HEADER_LENGTH + 2;

/// Trailing CRC-8 byte.
pub const CHECKSUM_LENGTH: usize = 1;

/// Hard upper bound on a complete frame, checksum included.
pub const MAX_PACKET_LENGTH: usize = 256;

/// Largest payload a frame can carry.
pub const MAX_PAYLOAD_LENGTH: usize =
    MAX_PACKET_LENGTH - CHECKSUM_LENGTH - MAX_HEADER_LENGTH;

/// Size of the optional timestamp field of a timestamped object update.
pub const TIMESTAMP_LENGTH: usize = 2;

// =============================================================================
// INSTANCES
// =============================================================================

/// Reserved instance id addressing every instance of a multi-instance object.
pub const ALL_INSTANCES: u16 = 0xFFFF;

// =============================================================================
// FILE TRANSFER
// =============================================================================

/// Fixed payload of a file request: offset LE32 + flags LE16.
pub const FILE_REQUEST_LENGTH: usize = 6;

/// File-data record header: offset LE32 + flags u8.
pub const FILE_CHUNK_HEADER_LENGTH: usize = 5;

/// Largest chunk carried by one file-data frame.
pub const FILE_CHUNK_SIZE: usize = 100;

/// File-data frames emitted per request before the peer must re-request.
pub const FILE_CHUNKS_PER_BATCH: usize = 6;

/// File-data flag: no more data exists past this chunk.
pub const FILEDATA_FLAG_EOF: u8 = 0x01;

/// File-data flag: last chunk of the current batch.
pub const FILEDATA_FLAG_LAST: u8 = 0x02;
