//! Per-link connection context.
//!
//! A [`Connection`] owns everything one logical link needs: the receive
//! parser and its buffers, the transmit buffer, the registered object
//! dictionary and event handler, and the statistics block. Two connections
//! share no mutable state and may be driven from different execution
//! contexts.
//!
//! Entry points mirror the protocol's three receive modes: full
//! ([`process_byte`](Connection::process_byte), parse and dispatch), quiet
//! ([`process_byte_quiet`](Connection::process_byte_quiet), parse only),
//! and relay ([`relay_byte`](Connection::relay_byte), parse and accumulate
//! raw bytes for forwarding). All three run the same transition function;
//! only the side effects differ.

mod builder;
mod stats;

pub use stats::LinkStats;

use crate::codec::frame::{FileChunkHeader, FileRequest, PacketKind};
use crate::codec::parser::{FrameParser, RxState};
use crate::core::constants::{
    ALL_INSTANCES, FILEDATA_FLAG_EOF, FILEDATA_FLAG_LAST, FILE_CHUNKS_PER_BATCH,
    FILE_CHUNK_HEADER_LENGTH, FILE_CHUNK_SIZE, FILE_REQUEST_LENGTH, MAX_PACKET_LENGTH,
    MIN_HEADER_LENGTH, TIMESTAMP_LENGTH,
};
use crate::core::error::{ObjectError, ReceiveError, RelayError};
use crate::core::traits::{ConnectionHandler, ObjectId, ObjectStore};

/// The per-link state needed to send and receive frames on one transport.
pub struct Connection<S, H> {
    store: S,
    handler: H,
    parser: FrameParser,
    stats: LinkStats,
    /// Timestamp of the last completed timestamped update.
    last_timestamp: Option<u16>,
    pub(crate) tx_buffer: [u8; MAX_PACKET_LENGTH],
}

impl<S: ObjectStore, H: ConnectionHandler> Connection<S, H> {
    /// Create a connection, registering the object dictionary and the
    /// output/ack/request/file callbacks for the life of the link.
    pub fn new(store: S, handler: H) -> Self {
        Self {
            store,
            handler,
            parser: FrameParser::new(),
            stats: LinkStats::new(),
            last_timestamp: None,
            tx_buffer: [0; MAX_PACKET_LENGTH],
        }
    }

    /// The registered object dictionary.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the registered object dictionary.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The registered event handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the registered event handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// The receive parser, for state inspection and relaying.
    pub fn parser(&self) -> &FrameParser {
        &self.parser
    }

    /// Tear the connection back down to its registered parts.
    pub fn into_parts(self) -> (S, H) {
        (self.store, self.handler)
    }

    /// Snapshot of the statistics counters, copied in one go.
    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Snapshot the statistics counters and reset them.
    pub fn take_stats(&mut self) -> LinkStats {
        let snapshot = self.stats;
        self.stats.reset();
        snapshot
    }

    /// Reset the statistics counters.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Abandon any partial receive frame and rescan for sync.
    ///
    /// For a link supervisor that decided the stream is stuck; the codec
    /// itself never times out.
    pub fn reset_rx(&mut self) {
        self.parser.reset();
    }

    /// Object id of the most recently completed frame.
    ///
    /// Valid only while that frame is pending, i.e. until the next byte is
    /// processed.
    pub fn packet_obj_id(&self) -> Option<ObjectId> {
        self.parser.obj_id()
    }

    /// Instance id of the most recently completed frame.
    pub fn packet_inst_id(&self) -> Option<u16> {
        self.parser.inst_id()
    }

    /// Timestamp carried by the last timestamped update that was
    /// dispatched on this connection.
    pub fn packet_timestamp(&self) -> Option<u16> {
        self.last_timestamp
    }

    /// Feed one byte through the receive state machine without side
    /// effects beyond state and statistics updates.
    ///
    /// Used directly by relays and supervisors that classify a stream
    /// without acting on it; [`receive_object`](Self::receive_object)
    /// dispatches a frame completed this way.
    pub fn process_byte_quiet(&mut self, byte: u8) -> RxState {
        self.stats.rx_bytes = self.stats.rx_bytes.saturating_add(1);
        let state = self.parser.push_byte(byte, &self.store);
        match state {
            RxState::Error => {
                // One increment per discarded frame: the parser re-arms to
                // Sync before it can report Error again.
                self.stats.rx_errors = self.stats.rx_errors.saturating_add(1);
            }
            RxState::Complete => {
                self.stats.rx_objects = self.stats.rx_objects.saturating_add(1);
                self.stats.rx_object_bytes = self
                    .stats
                    .rx_object_bytes
                    .saturating_add(self.parser.payload().len() as u32);
            }
            _ => {}
        }
        state
    }

    /// Feed one byte through the receive state machine, dispatching the
    /// frame if this byte completes it.
    ///
    /// Dispatch failures (unknown object, dictionary rejection) discard
    /// the frame without poisoning the connection; use
    /// [`receive_object`](Self::receive_object) when the caller needs the
    /// error.
    pub fn process_byte(&mut self, byte: u8) -> RxState {
        let state = self.process_byte_quiet(byte);
        if state == RxState::Complete {
            let _ = self.dispatch();
        }
        state
    }

    /// Feed a slice of received bytes, dispatching every completed frame.
    pub fn process_input(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.process_byte(byte);
        }
    }

    /// Feed one byte in relay mode: like
    /// [`process_byte_quiet`](Self::process_byte_quiet), but verified raw
    /// frame bytes are also accumulated for pass-through forwarding with
    /// [`relay_packet`](crate::relay::relay_packet).
    pub fn relay_byte(&mut self, byte: u8) -> RxState {
        if !self.parser.collect_raw() {
            self.parser.set_collect_raw(true);
        }
        self.process_byte_quiet(byte)
    }

    /// Dispatch the pending completed frame.
    ///
    /// The counterpart of the quiet entry points: a caller that pumped the
    /// parser to [`RxState::Complete`] invokes this to unpack, ack, nack,
    /// or hand off file data exactly as
    /// [`process_byte`](Self::process_byte) would have.
    pub fn receive_object(&mut self) -> Result<(), ReceiveError> {
        if self.parser.state() != RxState::Complete {
            return Err(ReceiveError::NotComplete);
        }
        self.dispatch()
    }

    /// Side effects of a completed frame, by packet kind.
    fn dispatch(&mut self) -> Result<(), ReceiveError> {
        let ty = self.parser.packet_type().ok_or(ReceiveError::NotComplete)?;
        let obj_id = self.parser.obj_id().ok_or(ReceiveError::NotComplete)?;
        let inst_id = self.parser.inst_id().ok_or(ReceiveError::NotComplete)?;

        match ty.kind {
            // Acks and nacks are treated identically: the peer is done
            // with the transaction either way, and the scheduler must not
            // keep waiting for an ack that will never come.
            PacketKind::Ack | PacketKind::Nack => {
                self.handler.ack_received(obj_id, inst_id);
                Ok(())
            }
            PacketKind::ObjReq => {
                self.handler.request_received(obj_id, inst_id);
                Ok(())
            }
            PacketKind::FileReq => self.serve_file_request(obj_id),
            PacketKind::FileData => {
                let payload = self.parser.payload();
                let header = FileChunkHeader::from_bytes(payload)
                    .ok_or(ReceiveError::MalformedFileData)?;
                self.handler.file_received(
                    obj_id.raw(),
                    header.offset,
                    &payload[FILE_CHUNK_HEADER_LENGTH..],
                    header.eof(),
                    header.last_in_batch(),
                );
                Ok(())
            }
            PacketKind::Obj | PacketKind::ObjAck => {
                if inst_id == ALL_INSTANCES {
                    return Err(ReceiveError::AllInstancesNotAllowed);
                }

                let (timestamp, unpacked) = {
                    let payload = self.parser.payload();
                    // An unknown timestamped object can arrive with fewer
                    // payload bytes than the timestamp itself; leave the
                    // short payload for the store to reject.
                    let (timestamp, data) = if ty.timestamped && payload.len() >= TIMESTAMP_LENGTH
                    {
                        let ts = u16::from_le_bytes([payload[0], payload[1]]);
                        (Some(ts), &payload[TIMESTAMP_LENGTH..])
                    } else {
                        (None, payload)
                    };
                    (timestamp, self.store.unpack(obj_id, inst_id, data))
                };

                match unpacked {
                    Ok(()) => {
                        if let Some(ts) = timestamp {
                            self.last_timestamp = Some(ts);
                        }
                        if ty.kind == PacketKind::ObjAck {
                            // Failure to transmit the ack is already
                            // counted in the transmit statistics.
                            let _ = self.send_ack(obj_id, inst_id);
                        }
                        Ok(())
                    }
                    Err(err @ ObjectError::UnknownObject(_)) => {
                        if ty.kind == PacketKind::ObjAck {
                            let _ = self.send_nack(obj_id, 0);
                        }
                        Err(err.into())
                    }
                    Err(err) => Err(err.into()),
                }
            }
        }
    }

    /// Answer a file request with a batch of file-data frames, pulling
    /// chunk bytes from the handler's file-read callback.
    fn serve_file_request(&mut self, file_id: ObjectId) -> Result<(), ReceiveError> {
        debug_assert_eq!(self.parser.payload().len(), FILE_REQUEST_LENGTH);
        let request = FileRequest::from_bytes(self.parser.payload())
            .ok_or(ReceiveError::MalformedFileData)?;

        let data_offset = MIN_HEADER_LENGTH + FILE_CHUNK_HEADER_LENGTH;
        let mut offset = request.offset;

        for chunk_index in 0..FILE_CHUNKS_PER_BATCH {
            let chunk = &mut self.tx_buffer[data_offset..data_offset + FILE_CHUNK_SIZE];
            let produced = self
                .handler
                .file_read(chunk, file_id.raw(), offset)
                .min(FILE_CHUNK_SIZE);

            let flags = if produced == 0 {
                // End of file: empty chunk closing the sequence.
                FILEDATA_FLAG_LAST | FILEDATA_FLAG_EOF
            } else if chunk_index == FILE_CHUNKS_PER_BATCH - 1 {
                FILEDATA_FLAG_LAST
            } else {
                0
            };

            let header = FileChunkHeader { offset, flags };
            self.tx_buffer[MIN_HEADER_LENGTH..data_offset].copy_from_slice(&header.to_bytes());

            // Transmit failures are counted and otherwise ignored; the
            // peer re-requests from its last good offset.
            let _ = self.send_file_chunk(file_id, data_offset + produced);

            offset = offset.saturating_add(produced as u32);
            if flags & FILEDATA_FLAG_LAST != 0 {
                break;
            }
        }

        Ok(())
    }

    /// Forward an already-validated raw frame to this connection's output
    /// sink. Used by the relay path; the frame is not re-encoded.
    pub(crate) fn forward_raw(&mut self, frame: &[u8]) -> Result<usize, RelayError> {
        match self.handler.output(frame) {
            Ok(accepted) if accepted == frame.len() => {
                self.stats.tx_bytes = self.stats.tx_bytes.saturating_add(accepted as u32);
                Ok(accepted)
            }
            Ok(accepted) => {
                self.stats.tx_errors = self.stats.tx_errors.saturating_add(1);
                Err(RelayError::ShortWrite {
                    accepted,
                    expected: frame.len(),
                })
            }
            Err(err) => {
                self.stats.tx_errors = self.stats.tx_errors.saturating_add(1);
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::crc::crc8;
    use crate::core::constants::SYNC_VAL;
    use crate::core::error::{ObjectError, OutputError};
    use crate::core::traits::ObjectInfo;
    use std::collections::HashMap;

    /// In-memory dictionary of fixed-size objects.
    struct MemStore {
        objects: HashMap<u32, (ObjectInfo, Vec<u8>)>,
        unpacked: Vec<(u32, u16, Vec<u8>)>,
    }

    impl MemStore {
        fn with_object(id: u32, size: usize, single: bool, value: &[u8]) -> Self {
            let mut objects = HashMap::new();
            objects.insert(
                id,
                (
                    ObjectInfo {
                        size,
                        single_instance: single,
                        num_instances: 1,
                    },
                    value.to_vec(),
                ),
            );
            Self {
                objects,
                unpacked: Vec::new(),
            }
        }
    }

    impl ObjectStore for MemStore {
        fn lookup(&self, obj_id: ObjectId) -> Option<ObjectInfo> {
            self.objects.get(&obj_id.raw()).map(|(info, _)| *info)
        }

        fn pack(
            &self,
            obj_id: ObjectId,
            _inst_id: u16,
            buf: &mut [u8],
        ) -> Result<usize, ObjectError> {
            let (info, value) = self
                .objects
                .get(&obj_id.raw())
                .ok_or(ObjectError::UnknownObject(obj_id))?;
            buf[..info.size].copy_from_slice(value);
            Ok(info.size)
        }

        fn unpack(
            &mut self,
            obj_id: ObjectId,
            inst_id: u16,
            data: &[u8],
        ) -> Result<(), ObjectError> {
            let (info, value) = self
                .objects
                .get_mut(&obj_id.raw())
                .ok_or(ObjectError::UnknownObject(obj_id))?;
            if data.len() != info.size {
                return Err(ObjectError::SizeMismatch {
                    expected: info.size,
                    actual: data.len(),
                });
            }
            value.copy_from_slice(data);
            self.unpacked.push((obj_id.raw(), inst_id, data.to_vec()));
            Ok(())
        }
    }

    /// Handler recording every callback and sinking output bytes.
    #[derive(Default)]
    struct Recorder {
        out: Vec<u8>,
        acks: Vec<(u32, u16)>,
        requests: Vec<(u32, u16)>,
        chunks: Vec<(u32, u32, Vec<u8>, bool, bool)>,
        file: Vec<u8>,
        reject_output: bool,
    }

    impl ConnectionHandler for Recorder {
        fn output(&mut self, data: &[u8]) -> Result<usize, OutputError> {
            if self.reject_output {
                return Err(OutputError);
            }
            self.out.extend_from_slice(data);
            Ok(data.len())
        }

        fn ack_received(&mut self, obj_id: ObjectId, inst_id: u16) {
            self.acks.push((obj_id.raw(), inst_id));
        }

        fn request_received(&mut self, obj_id: ObjectId, inst_id: u16) {
            self.requests.push((obj_id.raw(), inst_id));
        }

        fn file_read(&mut self, buf: &mut [u8], _file_id: u32, offset: u32) -> usize {
            let offset = offset as usize;
            if offset >= self.file.len() {
                return 0;
            }
            let n = (self.file.len() - offset).min(buf.len());
            buf[..n].copy_from_slice(&self.file[offset..offset + n]);
            n
        }

        fn file_received(&mut self, file_id: u32, offset: u32, data: &[u8], eof: bool, last: bool) {
            self.chunks.push((file_id, offset, data.to_vec(), eof, last));
        }
    }

    fn frame(type_byte: u8, obj_id: u32, inst_id: Option<u16>, payload: &[u8]) -> Vec<u8> {
        let length = 8 + if inst_id.is_some() { 2 } else { 0 } + payload.len();
        let mut buf = vec![SYNC_VAL, type_byte];
        buf.extend_from_slice(&(length as u16).to_le_bytes());
        buf.extend_from_slice(&obj_id.to_le_bytes());
        if let Some(inst) = inst_id {
            buf.extend_from_slice(&inst.to_le_bytes());
        }
        buf.extend_from_slice(payload);
        buf.push(crc8(0, &buf));
        buf
    }

    #[test]
    fn test_object_update_dispatches_to_store() {
        let store = MemStore::with_object(0x10, 2, true, &[0, 0]);
        let mut conn = Connection::new(store, Recorder::default());

        conn.process_input(&frame(0x20, 0x10, None, &[0xAA, 0xBB]));

        assert_eq!(conn.store().unpacked, vec![(0x10, 0, vec![0xAA, 0xBB])]);
        let stats = conn.stats();
        assert_eq!(stats.rx_objects, 1);
        assert_eq!(stats.rx_object_bytes, 2);
        assert_eq!(stats.rx_errors, 0);
    }

    #[test]
    fn test_acked_update_transmits_ack() {
        let store = MemStore::with_object(0x10, 1, true, &[0]);
        let mut conn = Connection::new(store, Recorder::default());

        conn.process_input(&frame(0x22, 0x10, None, &[0x7F]));

        assert_eq!(conn.store().unpacked.len(), 1);
        // The response on the wire is a well-formed ACK for the object.
        let expected_ack = frame(0x23, 0x10, None, &[]);
        assert_eq!(conn.handler().out, expected_ack);
        assert_eq!(conn.stats().tx_bytes, expected_ack.len() as u32);
    }

    #[test]
    fn test_acked_update_for_unknown_object_transmits_nack() {
        let mut conn = Connection::new(
            MemStore::with_object(0x10, 1, true, &[0]),
            Recorder::default(),
        );

        conn.process_input(&frame(0x22, 0x99, None, &[1, 2, 3]));

        assert!(conn.store().unpacked.is_empty());
        let expected_nack = frame(0x24, 0x99, None, &[]);
        assert_eq!(conn.handler().out, expected_nack);
        // The frame itself was valid; only dispatch refused it.
        assert_eq!(conn.stats().rx_objects, 1);
        assert_eq!(conn.stats().rx_errors, 0);
    }

    #[test]
    fn test_ack_and_nack_invoke_ack_callback() {
        let mut conn = Connection::new((), Recorder::default());

        conn.process_input(&frame(0x23, 0x55, None, &[]));
        conn.process_input(&frame(0x24, 0x66, Some(2), &[]));

        assert_eq!(conn.handler().acks, vec![(0x55, 0), (0x66, 2)]);
    }

    #[test]
    fn test_request_invokes_request_callback() {
        let mut conn = Connection::new((), Recorder::default());

        conn.process_input(&frame(0x21, 0x77, None, &[]));
        conn.process_input(&frame(0x21, 0x77, Some(ALL_INSTANCES), &[]));

        assert_eq!(conn.handler().requests, vec![(0x77, 0), (0x77, ALL_INSTANCES)]);
    }

    #[test]
    fn test_quiet_mode_does_not_dispatch() {
        let store = MemStore::with_object(0x10, 1, true, &[0]);
        let mut conn = Connection::new(store, Recorder::default());

        let bytes = frame(0x20, 0x10, None, &[9]);
        let mut state = RxState::Sync;
        for &b in &bytes {
            state = conn.process_byte_quiet(b);
        }
        assert_eq!(state, RxState::Complete);
        assert!(conn.store().unpacked.is_empty());
        assert_eq!(conn.packet_obj_id(), Some(ObjectId::new(0x10)));
        assert_eq!(conn.packet_inst_id(), Some(0));

        // Explicit dispatch of the pending frame.
        conn.receive_object().unwrap();
        assert_eq!(conn.store().unpacked.len(), 1);
    }

    #[test]
    fn test_receive_object_without_pending_frame() {
        let mut conn = Connection::new((), Recorder::default());
        assert_eq!(conn.receive_object(), Err(ReceiveError::NotComplete));
    }

    #[test]
    fn test_corrupt_frame_counts_one_error_then_recovers() {
        let store = MemStore::with_object(0x10, 1, true, &[0]);
        let mut conn = Connection::new(store, Recorder::default());

        let mut bad = frame(0x20, 0x10, None, &[1]);
        let last = bad.len() - 1;
        bad[last] ^= 0x01;
        conn.process_input(&bad);
        conn.process_input(&frame(0x20, 0x10, None, &[2]));

        let stats = conn.stats();
        assert_eq!(stats.rx_errors, 1);
        assert_eq!(stats.rx_objects, 1);
        assert_eq!(conn.store().unpacked, vec![(0x10, 0, vec![2])]);
    }

    #[test]
    fn test_timestamped_update_strips_timestamp() {
        let store = MemStore::with_object(0x10, 2, true, &[0, 0]);
        let mut conn = Connection::new(store, Recorder::default());

        conn.process_input(&frame(0xA0, 0x10, None, &[0x34, 0x12, 0xAA, 0xBB]));

        assert_eq!(conn.store().unpacked, vec![(0x10, 0, vec![0xAA, 0xBB])]);
        assert_eq!(conn.packet_timestamp(), Some(0x1234));
    }

    #[test]
    fn test_timestamp_recorded_only_for_dispatched_updates() {
        let store = MemStore::with_object(0x10, 2, true, &[0, 0]);
        let mut conn = Connection::new(store, Recorder::default());

        conn.process_input(&frame(0xA0, 0x10, None, &[0x34, 0x12, 0xAA, 0xBB]));
        assert_eq!(conn.packet_timestamp(), Some(0x1234));

        // A timestamped update that fails to unpack leaves the recorded
        // timestamp alone.
        conn.process_input(&frame(0xA0, 0x99, None, &[0x99, 0x99]));
        assert_eq!(conn.store().unpacked.len(), 1);
        assert_eq!(conn.packet_timestamp(), Some(0x1234));
    }

    #[test]
    fn test_file_transfer_initiated_end_to_end() {
        let mut client = Connection::new((), Recorder::default());
        client.send_file_request(ObjectId::new(0xF1), 0).unwrap();
        // 8 header bytes, 6 request bytes, 1 checksum.
        assert_eq!(client.stats().tx_bytes, 15);

        let mut handler = Recorder::default();
        handler.file = vec![0x33; 120];
        let mut server = Connection::new((), handler);
        server.process_input(&client.handler().out.clone());

        let out = server.handler().out.clone();
        client.process_input(&out);

        let chunks = &client.handler().chunks;
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], (0xF1, 0, vec![0x33; 100], false, false));
        assert_eq!(chunks[1], (0xF1, 100, vec![0x33; 20], false, false));
        let eof = &chunks[2];
        assert_eq!(eof.1, 120);
        assert!(eof.2.is_empty());
        assert!(eof.3, "eof flag");
        assert!(eof.4, "last flag");
    }

    #[test]
    fn test_file_request_served_in_chunks() {
        let mut handler = Recorder::default();
        handler.file = vec![0x5A; 250];
        let mut server = Connection::new((), handler);

        let mut request = 0u32.to_le_bytes().to_vec();
        request.extend_from_slice(&0u16.to_le_bytes());
        server.process_input(&frame(0x28, 0xF1, None, &request));

        // 250 bytes fit in three 100-byte chunks; the empty fourth chunk
        // carries last|eof. Feed the emitted frames to a client and check
        // the reassembled stream.
        let out = server.handler().out.clone();
        let mut client = Connection::new((), Recorder::default());
        client.process_input(&out);

        let chunks = &client.handler().chunks;
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0], (0xF1, 0, vec![0x5A; 100], false, false));
        assert_eq!(chunks[1].1, 100);
        assert_eq!(chunks[2].2.len(), 50);
        let eof = &chunks[3];
        assert_eq!(eof.1, 250);
        assert!(eof.2.is_empty());
        assert!(eof.3, "eof flag");
        assert!(eof.4, "last flag");
        assert_eq!(client.stats().rx_errors, 0);
    }

    #[test]
    fn test_file_request_batch_limit() {
        // A file larger than one batch stops after six chunks, the sixth
        // flagged last-in-batch without eof.
        let mut handler = Recorder::default();
        handler.file = vec![1; 1000];
        let mut server = Connection::new((), handler);

        let mut request = 0u32.to_le_bytes().to_vec();
        request.extend_from_slice(&0u16.to_le_bytes());
        server.process_input(&frame(0x28, 0xF1, None, &request));

        let out = server.handler().out.clone();
        let mut client = Connection::new((), Recorder::default());
        client.process_input(&out);

        let chunks = &client.handler().chunks;
        assert_eq!(chunks.len(), 6);
        let last = &chunks[5];
        assert_eq!(last.1, 500);
        assert!(!last.3, "not eof");
        assert!(last.4, "last in batch");
    }

    #[test]
    fn test_take_stats_resets() {
        let mut conn = Connection::new((), Recorder::default());
        conn.process_input(&frame(0x23, 0x01, None, &[]));

        let taken = conn.take_stats();
        assert_eq!(taken.rx_objects, 1);
        assert_eq!(conn.stats(), LinkStats::new());
    }

    #[test]
    fn test_rejected_output_counts_tx_error() {
        let store = MemStore::with_object(0x10, 1, true, &[9]);
        let mut handler = Recorder::default();
        handler.reject_output = true;
        let mut conn = Connection::new(store, handler);

        assert!(conn.send_object(ObjectId::new(0x10), 0, false).is_err());
        assert_eq!(conn.stats().tx_errors, 1);
        assert_eq!(conn.stats().tx_bytes, 0);
    }
}
