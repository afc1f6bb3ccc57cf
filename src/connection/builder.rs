//! Frame construction and transmission.
//!
//! Every frame leaves through [`emit`](Connection::emit): header and payload
//! are assembled in the connection's transmit buffer, the CRC is computed
//! over the assembled bytes, and the whole frame is handed to the output
//! sink in one call. The length field counts every frame byte except the
//! trailing checksum.

use super::Connection;
use crate::codec::crc::crc8;
use crate::codec::frame::{FileRequest, PacketKind, PacketType};
use crate::core::constants::{
    ALL_INSTANCES, CHECKSUM_LENGTH, FILE_REQUEST_LENGTH, MAX_PAYLOAD_LENGTH, MIN_HEADER_LENGTH,
    SYNC_VAL, TIMESTAMP_LENGTH,
};
use crate::core::error::{ObjectError, SendError};
use crate::core::traits::{ConnectionHandler, ObjectId, ObjectStore};

impl<S: ObjectStore, H: ConnectionHandler> Connection<S, H> {
    /// Send the current value of an object.
    ///
    /// `acked` selects an acknowledged update, which the peer must answer
    /// with an ack or nack. [`ALL_INSTANCES`] expands to one frame per
    /// registered instance and is refused for acknowledged updates, since
    /// there is no way to match acks to instances. Returns the total number
    /// of bytes placed on the wire.
    pub fn send_object(
        &mut self,
        obj_id: ObjectId,
        inst_id: u16,
        acked: bool,
    ) -> Result<usize, SendError> {
        let kind = if acked {
            PacketKind::ObjAck
        } else {
            PacketKind::Obj
        };
        if inst_id == ALL_INSTANCES {
            if acked {
                return Err(SendError::AllInstancesNotAllowed);
            }
            return self.send_all_instances(PacketType::plain(kind), None, obj_id);
        }
        self.send_single(PacketType::plain(kind), None, obj_id, inst_id)
    }

    /// Send the current value of an object with a 2-byte timestamp ahead of
    /// the object data.
    pub fn send_object_timestamped(
        &mut self,
        obj_id: ObjectId,
        inst_id: u16,
        timestamp: u16,
    ) -> Result<usize, SendError> {
        let ty = PacketType::timestamped_obj();
        if inst_id == ALL_INSTANCES {
            return self.send_all_instances(ty, Some(timestamp), obj_id);
        }
        self.send_single(ty, Some(timestamp), obj_id, inst_id)
    }

    /// Ask the peer for its current value of an object.
    ///
    /// [`ALL_INSTANCES`] is carried on the wire as-is; the peer answers
    /// with one update per instance.
    pub fn send_object_request(
        &mut self,
        obj_id: ObjectId,
        inst_id: u16,
    ) -> Result<usize, SendError> {
        self.send_single(PacketType::plain(PacketKind::ObjReq), None, obj_id, inst_id)
    }

    /// Acknowledge an object update received from the peer.
    pub fn send_ack(&mut self, obj_id: ObjectId, inst_id: u16) -> Result<usize, SendError> {
        self.send_response(PacketKind::Ack, obj_id, inst_id)
    }

    /// Refuse an object update or request.
    ///
    /// Works for objects absent from the local dictionary, so the object id
    /// is echoed without a lookup.
    pub fn send_nack(&mut self, obj_id: ObjectId, inst_id: u16) -> Result<usize, SendError> {
        self.send_response(PacketKind::Nack, obj_id, inst_id)
    }

    /// Ask the peer for a batch of chunks of the file identified by
    /// `file_id`, starting at byte `offset`.
    ///
    /// The peer answers with up to
    /// [`FILE_CHUNKS_PER_BATCH`](crate::core::constants::FILE_CHUNKS_PER_BATCH)
    /// file-data frames, delivered through
    /// [`ConnectionHandler::file_received`]; the caller re-requests from
    /// its last good offset to continue.
    pub fn send_file_request(
        &mut self,
        file_id: ObjectId,
        offset: u32,
    ) -> Result<usize, SendError> {
        let request = FileRequest { offset, flags: 0 };
        self.tx_buffer[0] = SYNC_VAL;
        self.tx_buffer[1] = PacketType::plain(PacketKind::FileReq).as_byte();
        self.tx_buffer[4..8].copy_from_slice(&file_id.raw().to_le_bytes());
        self.tx_buffer[MIN_HEADER_LENGTH..MIN_HEADER_LENGTH + FILE_REQUEST_LENGTH]
            .copy_from_slice(&request.to_bytes());
        let total = MIN_HEADER_LENGTH + FILE_REQUEST_LENGTH;
        self.tx_buffer[2..4].copy_from_slice(&(total as u16).to_le_bytes());
        self.emit(total, None)
    }

    /// One frame per registered instance, in instance order.
    fn send_all_instances(
        &mut self,
        ty: PacketType,
        timestamp: Option<u16>,
        obj_id: ObjectId,
    ) -> Result<usize, SendError> {
        let info = self
            .store
            .lookup(obj_id)
            .ok_or(ObjectError::UnknownObject(obj_id))?;
        if info.single_instance {
            return self.send_single(ty, timestamp, obj_id, 0);
        }
        let mut sent = 0;
        for inst_id in 0..info.num_instances {
            sent += self.send_single(ty, timestamp, obj_id, inst_id)?;
        }
        Ok(sent)
    }

    /// Build and emit one object-addressed frame.
    ///
    /// The instance id field is present exactly when the dictionary declares
    /// the object multi-instance; object data is packed only for kinds that
    /// carry it.
    fn send_single(
        &mut self,
        ty: PacketType,
        timestamp: Option<u16>,
        obj_id: ObjectId,
        inst_id: u16,
    ) -> Result<usize, SendError> {
        let info = self
            .store
            .lookup(obj_id)
            .ok_or(ObjectError::UnknownObject(obj_id))?;

        let object_length = if ty.kind.carries_object() {
            info.size
        } else {
            0
        };
        let timestamp_length = if timestamp.is_some() {
            TIMESTAMP_LENGTH
        } else {
            0
        };
        // Same bound as the receive path, which discards payloads at the
        // limit.
        let payload_length = object_length + timestamp_length;
        if payload_length >= MAX_PAYLOAD_LENGTH {
            return Err(SendError::PayloadTooLarge {
                size: payload_length,
                limit: MAX_PAYLOAD_LENGTH - 1,
            });
        }

        self.tx_buffer[0] = SYNC_VAL;
        self.tx_buffer[1] = ty.as_byte();
        self.tx_buffer[4..8].copy_from_slice(&obj_id.raw().to_le_bytes());
        let mut cursor = MIN_HEADER_LENGTH;
        if !info.single_instance {
            self.tx_buffer[cursor..cursor + 2].copy_from_slice(&inst_id.to_le_bytes());
            cursor += 2;
        }
        if let Some(ts) = timestamp {
            self.tx_buffer[cursor..cursor + TIMESTAMP_LENGTH].copy_from_slice(&ts.to_le_bytes());
            cursor += TIMESTAMP_LENGTH;
        }
        if ty.kind.carries_object() {
            let packed = self
                .store
                .pack(obj_id, inst_id, &mut self.tx_buffer[cursor..cursor + info.size])?;
            cursor += packed;
        }
        self.tx_buffer[2..4].copy_from_slice(&(cursor as u16).to_le_bytes());

        self.emit(cursor, Some(object_length))
    }

    /// Build and emit an ack or nack.
    ///
    /// The instance id mirrors the update framing when the object is in
    /// the dictionary: present iff multi-instance. For unknown objects it
    /// is appended only when nonzero; the peer infers its absence from the
    /// length field.
    fn send_response(
        &mut self,
        kind: PacketKind,
        obj_id: ObjectId,
        inst_id: u16,
    ) -> Result<usize, SendError> {
        let include_inst = match self.store.lookup(obj_id) {
            Some(info) => !info.single_instance,
            None => inst_id != 0,
        };
        self.tx_buffer[0] = SYNC_VAL;
        self.tx_buffer[1] = PacketType::plain(kind).as_byte();
        self.tx_buffer[4..8].copy_from_slice(&obj_id.raw().to_le_bytes());
        let mut cursor = MIN_HEADER_LENGTH;
        if include_inst {
            self.tx_buffer[cursor..cursor + 2].copy_from_slice(&inst_id.to_le_bytes());
            cursor += 2;
        }
        self.tx_buffer[2..4].copy_from_slice(&(cursor as u16).to_le_bytes());

        let object_payload = if kind == PacketKind::Ack { Some(0) } else { None };
        self.emit(cursor, object_payload)
    }

    /// Emit one file-data frame. The record header and chunk bytes are
    /// already in place past the frame header.
    pub(crate) fn send_file_chunk(
        &mut self,
        file_id: ObjectId,
        total: usize,
    ) -> Result<usize, SendError> {
        self.tx_buffer[0] = SYNC_VAL;
        self.tx_buffer[1] = PacketType::plain(PacketKind::FileData).as_byte();
        self.tx_buffer[2..4].copy_from_slice(&(total as u16).to_le_bytes());
        self.tx_buffer[4..8].copy_from_slice(&file_id.raw().to_le_bytes());
        self.emit(total, None)
    }

    /// Checksum the assembled frame and hand it to the output sink.
    ///
    /// `total` is the frame length without the checksum, i.e. the value of
    /// the length field. `object_payload` carries the object data length
    /// for frames that count toward the object statistics.
    fn emit(&mut self, total: usize, object_payload: Option<usize>) -> Result<usize, SendError> {
        self.tx_buffer[total] = crc8(0, &self.tx_buffer[..total]);
        let expected = total + CHECKSUM_LENGTH;

        match self.handler.output(&self.tx_buffer[..expected]) {
            Ok(accepted) if accepted == expected => {
                self.stats.tx_bytes = self.stats.tx_bytes.saturating_add(expected as u32);
                if let Some(object_bytes) = object_payload {
                    self.stats.tx_objects = self.stats.tx_objects.saturating_add(1);
                    self.stats.tx_object_bytes = self
                        .stats
                        .tx_object_bytes
                        .saturating_add(object_bytes as u32);
                }
                Ok(expected)
            }
            Ok(accepted) => {
                self.stats.tx_errors = self.stats.tx_errors.saturating_add(1);
                Err(SendError::ShortWrite { accepted, expected })
            }
            Err(err) => {
                self.stats.tx_errors = self.stats.tx_errors.saturating_add(1);
                Err(err.into())
            }
        }
    }
}
