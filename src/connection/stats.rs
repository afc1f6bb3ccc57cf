//! Per-connection link statistics.

/// Monotonic counters for one connection.
///
/// Mutated only by the codec and builder that own the connection; read via
/// [`Connection::stats`](super::Connection::stats), which copies the whole
/// block in one go so another context never observes a torn snapshot.
/// Counters saturate instead of wrapping and are only ever cleared by an
/// explicit reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Frame bytes handed to the output sink and accepted.
    pub tx_bytes: u32,
    /// Bytes fed to the receive state machine.
    pub rx_bytes: u32,
    /// Object payload bytes sent.
    pub tx_object_bytes: u32,
    /// Object payload bytes received in validated frames.
    pub rx_object_bytes: u32,
    /// Object frames sent.
    pub tx_objects: u32,
    /// Validated frames received.
    pub rx_objects: u32,
    /// Transmit failures (sink rejected or truncated a frame).
    pub tx_errors: u32,
    /// Discarded receive frames (framing or checksum failures).
    pub rx_errors: u32,
}

impl LinkStats {
    /// All counters zero.
    pub const fn new() -> Self {
        Self {
            tx_bytes: 0,
            rx_bytes: 0,
            tx_object_bytes: 0,
            rx_object_bytes: 0,
            tx_objects: 0,
            rx_objects: 0,
            tx_errors: 0,
            rx_errors: 0,
        }
    }

    /// Clear every counter.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset() {
        let mut stats = LinkStats::new();
        stats.rx_bytes = 10;
        stats.tx_errors = 2;
        stats.reset();
        assert_eq!(stats, LinkStats::new());
    }
}
