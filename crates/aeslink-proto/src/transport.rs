//! The byte-transport seam.

use std::collections::VecDeque;

/// One byte-oriented link end, polled by the session's tick loop.
///
/// The transport delivers discrete bytes and accepts bytes for
/// transmission one at a time. Framing errors never surface here; an
/// implementation either produces a byte or it doesn't.
pub trait ByteTransport {
    /// Returns the next received byte, if one is available.
    fn try_recv(&mut self) -> Option<u8>;

    /// True while the transmitter cannot accept another byte.
    fn send_busy(&self) -> bool;

    /// Enqueues one byte for transmission. Callers check [`send_busy`]
    /// first; the session never sends into a busy transmitter.
    ///
    /// [`send_busy`]: ByteTransport::send_busy
    fn send(&mut self, byte: u8);
}

/// In-memory link: a receive queue fed by the host and a transmit log the
/// host drains. Never send-busy. Used by tests, the loopback example and
/// the CLI demo.
#[derive(Clone, Debug, Default)]
pub struct MemoryLink {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl MemoryLink {
    /// Creates an empty link.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues bytes for the session to receive.
    pub fn push_rx(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Drains everything the session has transmitted so far.
    pub fn take_tx(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }

    /// Bytes still queued for reception.
    pub fn rx_pending(&self) -> usize {
        self.rx.len()
    }
}

impl ByteTransport for MemoryLink {
    fn try_recv(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn send_busy(&self) -> bool {
        false
    }

    fn send(&mut self, byte: u8) {
        self.tx.push(byte);
    }
}
