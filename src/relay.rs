//! Byte-transparent frame forwarding between two links.
//!
//! A relay sits between two transports (say, a serial radio and a TCP
//! ground link) and forwards validated frames in both directions without
//! decoding payloads: each side's parser runs in relay mode, accumulating
//! the raw bytes of the frame it is checking, and a completed frame is
//! handed to the opposite side's output sink byte for byte. Corrupted
//! input is filtered out; nothing else is altered, so the relay works for
//! objects neither side has in its dictionary.

use crate::codec::parser::RxState;
use crate::connection::Connection;
use crate::core::error::RelayError;
use crate::core::traits::{ConnectionHandler, ObjectStore};

/// Forward the completed frame pending on `source` to `destination`'s
/// output sink, unaltered.
///
/// `source` must have been driven in relay mode (see
/// [`Connection::relay_byte`]) so the raw frame bytes were captured.
/// Returns the number of bytes forwarded.
pub fn relay_packet<SA, HA, SB, HB>(
    source: &Connection<SA, HA>,
    destination: &mut Connection<SB, HB>,
) -> Result<usize, RelayError>
where
    SA: ObjectStore,
    HA: ConnectionHandler,
    SB: ObjectStore,
    HB: ConnectionHandler,
{
    if source.parser().state() != RxState::Complete {
        return Err(RelayError::SourceNotComplete);
    }
    let raw = source.parser().raw_frame().ok_or(RelayError::NoRawFrame)?;
    destination.forward_raw(raw)
}

/// A bidirectional relay over two connections.
///
/// [`pump_a`](Relay::pump_a) feeds bytes received on side A and forwards
/// every validated frame out side B; [`pump_b`](Relay::pump_b) is the
/// mirror image. Each side keeps its own statistics, so a link monitor
/// can read error and byte counts per direction.
pub struct Relay<SA, HA, SB, HB> {
    a: Connection<SA, HA>,
    b: Connection<SB, HB>,
}

impl<SA, HA, SB, HB> Relay<SA, HA, SB, HB>
where
    SA: ObjectStore,
    HA: ConnectionHandler,
    SB: ObjectStore,
    HB: ConnectionHandler,
{
    /// Build a relay from the two sides' connections.
    pub fn new(a: Connection<SA, HA>, b: Connection<SB, HB>) -> Self {
        Self { a, b }
    }

    /// Feed bytes received on side A, forwarding each validated frame to
    /// side B. Returns the number of frame bytes forwarded.
    ///
    /// Stops at the first forwarding failure; the remaining input can be
    /// re-fed once the destination link recovers, at the cost of the
    /// frames parsed before the failure.
    pub fn pump_a(&mut self, bytes: &[u8]) -> Result<usize, RelayError> {
        let mut forwarded = 0;
        for &byte in bytes {
            if self.a.relay_byte(byte) == RxState::Complete {
                forwarded += relay_packet(&self.a, &mut self.b)?;
            }
        }
        Ok(forwarded)
    }

    /// Feed bytes received on side B, forwarding each validated frame to
    /// side A.
    pub fn pump_b(&mut self, bytes: &[u8]) -> Result<usize, RelayError> {
        let mut forwarded = 0;
        for &byte in bytes {
            if self.b.relay_byte(byte) == RxState::Complete {
                forwarded += relay_packet(&self.b, &mut self.a)?;
            }
        }
        Ok(forwarded)
    }

    /// Side A's connection.
    pub fn a(&self) -> &Connection<SA, HA> {
        &self.a
    }

    /// Side B's connection.
    pub fn b(&self) -> &Connection<SB, HB> {
        &self.b
    }

    /// Mutable access to side A, for stats collection or resets.
    pub fn a_mut(&mut self) -> &mut Connection<SA, HA> {
        &mut self.a
    }

    /// Mutable access to side B.
    pub fn b_mut(&mut self) -> &mut Connection<SB, HB> {
        &mut self.b
    }

    /// Tear the relay back down into its two connections.
    pub fn into_parts(self) -> (Connection<SA, HA>, Connection<SB, HB>) {
        (self.a, self.b)
    }
}
