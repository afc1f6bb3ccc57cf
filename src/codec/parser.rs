//! Incremental receive state machine.
//!
//! [`FrameParser`] consumes an arbitrary, possibly corrupted byte stream one
//! byte at a time and assembles validated frames with O(1) memory: one
//! bounded payload buffer plus, in relay mode, one bounded raw-frame buffer.
//! It performs no I/O and invokes no callbacks, which keeps the transition
//! function directly unit-testable; dispatching a completed frame is the
//! connection context's job.
//!
//! The parser never trusts the declared length: every length is checked
//! against the fixed frame limits before it is used to index a buffer, so a
//! corrupted size field discards one frame instead of overrunning memory.

use crate::codec::crc::crc8_byte;
use crate::codec::frame::{PacketKind, PacketType};
use crate::core::constants::{
    FILE_REQUEST_LENGTH, MAX_HEADER_LENGTH, MAX_PACKET_LENGTH, MAX_PAYLOAD_LENGTH,
    MIN_HEADER_LENGTH, SYNC_VAL, TIMESTAMP_LENGTH,
};
use crate::core::traits::{ObjectId, ObjectStore};

/// Receive state, advanced one byte at a time.
///
/// `Sync` is both the initial state and the recovery state: after `Complete`
/// or `Error` the next byte is processed as a sync-marker candidate, so
/// resynchronization after corruption is byte-granular.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
    /// The previous frame was discarded; re-arms to `Sync` on the next byte.
    Error,
    /// Scanning for the sync marker.
    Sync,
    /// Expecting the type byte.
    Type,
    /// Expecting the 2-byte declared length.
    Size,
    /// Expecting the 4-byte object id.
    ObjId,
    /// Expecting the 2-byte instance id.
    InstId,
    /// Expecting payload bytes.
    Data,
    /// Expecting the checksum byte.
    Checksum,
    /// A validated frame is pending; re-arms to `Sync` on the next byte.
    Complete,
}

/// The incremental frame parser owned by a connection.
pub struct FrameParser {
    state: RxState,
    /// Running CRC over every consumed frame byte.
    crc: u8,
    /// Bytes consumed of the frame so far, sync marker included.
    frame_length: usize,
    /// Bytes consumed of the current multi-byte field.
    field_count: usize,
    /// Length field from the wire (frame bytes excluding the checksum).
    declared_length: usize,
    packet_type: Option<PacketType>,
    obj_id: u32,
    inst_id: u16,
    /// Wire size of the instance id field, 0 or 2.
    inst_length: usize,
    /// Expected payload bytes, timestamp included when flagged.
    payload_length: usize,
    payload: [u8; MAX_PAYLOAD_LENGTH],
    /// Accumulate the verified raw frame for pass-through relaying.
    collect_raw: bool,
    /// Latched from `collect_raw` at the sync byte, so a mode change
    /// mid-frame can never expose a partial capture.
    raw_active: bool,
    raw: [u8; MAX_PACKET_LENGTH],
    raw_length: usize,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a parser in the `Sync` state.
    pub fn new() -> Self {
        Self {
            state: RxState::Sync,
            crc: 0,
            frame_length: 0,
            field_count: 0,
            declared_length: 0,
            packet_type: None,
            obj_id: 0,
            inst_id: 0,
            inst_length: 0,
            payload_length: 0,
            payload: [0; MAX_PAYLOAD_LENGTH],
            collect_raw: false,
            raw_active: false,
            raw: [0; MAX_PACKET_LENGTH],
            raw_length: 0,
        }
    }

    /// Current receive state.
    pub fn state(&self) -> RxState {
        self.state
    }

    /// Enable or disable raw-frame accumulation for relaying.
    ///
    /// Takes effect at the next frame boundary; a frame already in
    /// progress keeps the mode it started with.
    pub fn set_collect_raw(&mut self, collect: bool) {
        self.collect_raw = collect;
    }

    /// Whether raw-frame accumulation is enabled.
    pub fn collect_raw(&self) -> bool {
        self.collect_raw
    }

    /// Force the parser back to `Sync`, abandoning any partial frame.
    ///
    /// For use by a link supervisor after a stall; the parser itself never
    /// times out.
    pub fn reset(&mut self) {
        self.state = RxState::Sync;
        self.raw_active = false;
        self.raw_length = 0;
    }

    /// Type byte of the most recently completed frame.
    ///
    /// Valid only while [`state`](Self::state) is [`RxState::Complete`].
    pub fn packet_type(&self) -> Option<PacketType> {
        match self.state {
            RxState::Complete => self.packet_type,
            _ => None,
        }
    }

    /// Object id of the most recently completed frame.
    pub fn obj_id(&self) -> Option<ObjectId> {
        match self.state {
            RxState::Complete => Some(ObjectId::new(self.obj_id)),
            _ => None,
        }
    }

    /// Instance id of the most recently completed frame. Zero when the
    /// frame omitted the field.
    pub fn inst_id(&self) -> Option<u16> {
        match self.state {
            RxState::Complete => Some(self.inst_id),
            _ => None,
        }
    }

    /// Payload of the most recently completed frame; empty unless the state
    /// is [`RxState::Complete`].
    pub fn payload(&self) -> &[u8] {
        match self.state {
            RxState::Complete => &self.payload[..self.payload_length],
            _ => &[],
        }
    }

    /// Raw bytes of the most recently completed frame, checksum included.
    ///
    /// `None` unless the state is [`RxState::Complete`] and raw
    /// accumulation was enabled for the whole frame.
    pub fn raw_frame(&self) -> Option<&[u8]> {
        match self.state {
            RxState::Complete if self.raw_active && self.raw_length > 0 => {
                Some(&self.raw[..self.raw_length])
            }
            _ => None,
        }
    }

    /// Advance the state machine by one byte.
    ///
    /// The object dictionary is consulted only to size the instance-id and
    /// payload fields; no payload is ever handed to it here. Returns the
    /// state after the transition: [`RxState::Complete`] means a validated
    /// frame is pending, [`RxState::Error`] means one malformed frame was
    /// discarded. Neither is fatal; the next byte re-arms the scanner.
    pub fn push_byte<S: ObjectStore + ?Sized>(&mut self, byte: u8, store: &S) -> RxState {
        // Complete and Error are single-step pseudo-states.
        if matches!(self.state, RxState::Complete | RxState::Error) {
            self.state = RxState::Sync;
            self.raw_length = 0;
        }

        match self.state {
            RxState::Sync => {
                if byte != SYNC_VAL {
                    return self.state;
                }
                self.crc = crc8_byte(0, byte);
                self.frame_length = 1;
                self.raw_active = self.collect_raw;
                self.raw_length = 0;
                self.capture(byte);
                self.state = RxState::Type;
            }

            RxState::Type => {
                self.consume(byte);
                match PacketType::from_byte(byte) {
                    Some(ty) => {
                        self.packet_type = Some(ty);
                        self.declared_length = 0;
                        self.field_count = 0;
                        self.state = RxState::Size;
                    }
                    None => self.state = RxState::Error,
                }
            }

            RxState::Size => {
                self.consume(byte);
                if self.field_count == 0 {
                    self.declared_length = byte as usize;
                    self.field_count = 1;
                } else {
                    self.declared_length |= (byte as usize) << 8;
                    if self.declared_length < MIN_HEADER_LENGTH
                        || self.declared_length > MAX_HEADER_LENGTH + MAX_PAYLOAD_LENGTH
                    {
                        self.state = RxState::Error;
                    } else {
                        self.field_count = 0;
                        self.obj_id = 0;
                        self.state = RxState::ObjId;
                    }
                }
            }

            RxState::ObjId => {
                self.consume(byte);
                self.obj_id |= (byte as u32) << (8 * self.field_count);
                self.field_count += 1;
                if self.field_count == 4 {
                    self.finish_header(store);
                }
            }

            RxState::InstId => {
                self.consume(byte);
                self.inst_id |= (byte as u16) << (8 * self.field_count);
                self.field_count += 1;
                if self.field_count == 2 {
                    self.field_count = 0;
                    self.state = if self.payload_length > 0 {
                        RxState::Data
                    } else {
                        RxState::Checksum
                    };
                }
            }

            RxState::Data => {
                self.consume(byte);
                self.payload[self.field_count] = byte;
                self.field_count += 1;
                if self.field_count == self.payload_length {
                    self.field_count = 0;
                    self.state = RxState::Checksum;
                }
            }

            RxState::Checksum => {
                self.frame_length += 1;
                self.capture(byte);
                if byte != self.crc {
                    self.state = RxState::Error;
                } else if self.frame_length != self.declared_length + 1 {
                    // Cross-check: every field length reconciled earlier,
                    // so a mismatch here means internal corruption.
                    self.state = RxState::Error;
                } else {
                    self.state = RxState::Complete;
                }
            }

            // Handled by the re-arm above.
            RxState::Complete | RxState::Error => {}
        }

        self.state
    }

    /// Fold a header or payload byte into the frame accumulator.
    fn consume(&mut self, byte: u8) {
        self.crc = crc8_byte(self.crc, byte);
        self.frame_length += 1;
        self.capture(byte);
    }

    fn capture(&mut self, byte: u8) {
        if self.raw_active && self.raw_length < MAX_PACKET_LENGTH {
            self.raw[self.raw_length] = byte;
            self.raw_length += 1;
        }
    }

    /// Size the instance-id and payload fields once the object id is known,
    /// and pick the next state.
    fn finish_header<S: ObjectStore + ?Sized>(&mut self, store: &S) {
        // 8 header bytes consumed: sync, type, size, object id.
        debug_assert_eq!(self.frame_length, MIN_HEADER_LENGTH);
        let remaining = self.declared_length - MIN_HEADER_LENGTH;
        let ty = match self.packet_type {
            Some(ty) => ty,
            None => {
                self.state = RxState::Error;
                return;
            }
        };

        match ty.kind {
            PacketKind::FileReq => {
                // Fixed payload: 4 bytes of offset, 2 bytes of flags.
                self.inst_length = 0;
                self.payload_length = FILE_REQUEST_LENGTH;
                if remaining != FILE_REQUEST_LENGTH {
                    self.state = RxState::Error;
                    return;
                }
            }
            PacketKind::FileData => {
                // Opaque chunk; sized by the length field alone.
                self.inst_length = 0;
                self.payload_length = remaining;
            }
            PacketKind::ObjReq | PacketKind::Ack | PacketKind::Nack => {
                // No payload. The remaining bytes can only be an instance
                // id; infer its presence from the length field so unknown
                // objects can still be nacked.
                self.payload_length = 0;
                self.inst_length = match remaining {
                    0 => 0,
                    2 => 2,
                    _ => {
                        self.state = RxState::Error;
                        return;
                    }
                };
            }
            PacketKind::Obj | PacketKind::ObjAck => {
                let ts_length = if ty.timestamped { TIMESTAMP_LENGTH } else { 0 };
                match store.lookup(ObjectId::new(self.obj_id)) {
                    Some(info) => {
                        self.payload_length = info.size + ts_length;
                        self.inst_length = if info.single_instance { 0 } else { 2 };
                    }
                    None => {
                        // Unknown object: assume single-instance and size
                        // the payload from the length field, so the frame
                        // can still be checksum-validated and nacked.
                        self.inst_length = 0;
                        self.payload_length = remaining;
                    }
                }

                if self.expected_total() != self.declared_length && self.inst_length == 0 {
                    // The LibrePilot fork always transmits the instance id;
                    // retry under that assumption before giving up.
                    self.inst_length = 2;
                }
            }
        }

        if self.payload_length >= MAX_PAYLOAD_LENGTH {
            self.state = RxState::Error;
            return;
        }
        if self.expected_total() != self.declared_length {
            self.state = RxState::Error;
            return;
        }

        self.inst_id = 0;
        self.field_count = 0;
        self.state = if self.inst_length > 0 {
            RxState::InstId
        } else if self.payload_length > 0 {
            RxState::Data
        } else {
            RxState::Checksum
        };
    }

    fn expected_total(&self) -> usize {
        MIN_HEADER_LENGTH + self.inst_length + self.payload_length
    }
}
