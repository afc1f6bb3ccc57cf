//! # UAVTalk Protocol
//!
//! UAVTalk serializes strongly-typed, versioned telemetry records
//! ("UAV Objects") onto an unreliable byte stream — serial radio link, USB,
//! or TCP — and decodes them back, one byte at a time. It provides:
//!
//! - **Streaming decode**: an incremental receive state machine with O(1)
//!   memory beyond a single bounded frame buffer, safe to drive from an
//!   interrupt handler or a cooperative task
//! - **Integrity**: CRC-8 checksummed framing with byte-granular
//!   resynchronization after corruption
//! - **Packet semantics**: broadcast updates, acknowledged updates,
//!   acks, nacks, object requests, and out-of-band file-chunk transfer
//! - **Relay**: byte-transparent forwarding of validated frames between two
//!   links without decoding the payload
//!
//! The crate is sans-io: it never blocks, never allocates per byte, and
//! talks to the outside world through two trait seams — an
//! [`ObjectStore`] for the object dictionary and a [`ConnectionHandler`]
//! for the output sink and notification callbacks.
//!
//! ## Modules
//!
//! - [`core`]: Constants, error types, and the collaborator traits
//! - [`codec`]: CRC-8, frame/type-byte encoding, and the receive parser
//! - [`connection`]: Per-link context, transmit path, and statistics
//! - [`relay`]: Frame forwarding between two connections
//!
//! ## Example Usage
//!
//! ```rust
//! use uavtalk_protocol::prelude::*;
//!
//! struct NullStore;
//!
//! impl ObjectStore for NullStore {
//!     fn lookup(&self, _obj_id: ObjectId) -> Option<ObjectInfo> {
//!         None
//!     }
//!     fn pack(
//!         &self,
//!         obj_id: ObjectId,
//!         _inst_id: u16,
//!         _buf: &mut [u8],
//!     ) -> Result<usize, ObjectError> {
//!         Err(ObjectError::UnknownObject(obj_id))
//!     }
//!     fn unpack(
//!         &mut self,
//!         obj_id: ObjectId,
//!         _inst_id: u16,
//!         _data: &[u8],
//!     ) -> Result<(), ObjectError> {
//!         Err(ObjectError::UnknownObject(obj_id))
//!     }
//! }
//!
//! struct Sink(Vec<u8>);
//!
//! impl ConnectionHandler for Sink {
//!     fn output(&mut self, data: &[u8]) -> Result<usize, OutputError> {
//!         self.0.extend_from_slice(data);
//!         Ok(data.len())
//!     }
//! }
//!
//! let mut link = Connection::new(NullStore, Sink(Vec::new()));
//! // Tell the peer we do not know object 0x12345678.
//! link.send_nack(ObjectId::new(0x1234_5678), 0).unwrap();
//! assert_eq!(link.stats().tx_bytes, 9);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod codec;
pub mod connection;
pub mod core;
pub mod relay;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::codec::crc::{crc8, crc8_byte};
    pub use crate::codec::frame::{
        FileChunkHeader, FileRequest, PacketKind, PacketType,
    };
    pub use crate::codec::parser::{FrameParser, RxState};
    pub use crate::connection::{Connection, LinkStats};
    pub use crate::core::constants;
    pub use crate::core::error::{
        ObjectError, OutputError, ReceiveError, RelayError, SendError,
    };
    pub use crate::core::traits::{ConnectionHandler, ObjectId, ObjectInfo, ObjectStore};
    pub use crate::relay::{relay_packet, Relay};
}

// Re-export commonly used items at crate root
pub use crate::codec::parser::{FrameParser, RxState};
pub use crate::connection::{Connection, LinkStats};
pub use crate::core::error::{ObjectError, OutputError, ReceiveError, RelayError, SendError};
pub use crate::core::traits::{ConnectionHandler, ObjectId, ObjectInfo, ObjectStore};
pub use crate::relay::{relay_packet, Relay};
