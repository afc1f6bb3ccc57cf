//! UAVTalk Protocol - Frame codec.
//!
//! - [`crc`]: the CRC-8 used to seal every frame
//! - [`frame`]: packet kinds, type-byte encoding, file-transfer records
//! - [`parser`]: the incremental receive state machine

pub mod crc;
pub mod frame;
pub mod parser;

pub use frame::{FileChunkHeader, FileRequest, PacketKind, PacketType};
pub use parser::{FrameParser, RxState};
