//! The command/response state machine.

use aes_core::{expand_key, Aes128Key, Block, DecryptCore, EncryptCore, RoundKeys};

use crate::transport::ByteTransport;

/// Command byte selecting encryption (uppercase form).
const CMD_ENCRYPT: u8 = b'E';
/// Command byte selecting decryption (uppercase form).
const CMD_DECRYPT: u8 = b'D';

/// The operation selected by the last command byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Forward transform: 16 plaintext bytes in, 16 ciphertext bytes out.
    Encrypt,
    /// Inverse transform: 16 ciphertext bytes in, 16 plaintext bytes out.
    Decrypt,
}

/// Protocol phase. The machine cycles Idle → Receiving → Processing →
/// Sending → Idle forever; there is no terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a command byte. Anything but `E`/`e`/`D`/`d` is dropped.
    Idle,
    /// Accumulating the 16-byte input block.
    Receiving,
    /// Waiting for the selected cipher core to assert done.
    Processing,
    /// Emitting the 16-byte result, byte 0 first.
    Sending,
}

/// One protocol session: phase, selected operation, input accumulator and
/// output cursor, plus the two cipher cores sharing one expanded key.
///
/// Commands are only recognized in [`Phase::Idle`], which is reached again
/// only after a full exchange, so at most one operation is ever in flight.
#[derive(Clone, Debug)]
pub struct Session {
    round_keys: RoundKeys,
    phase: Phase,
    op: Op,
    input: Block,
    fill: usize,
    output: Block,
    cursor: usize,
    enc: EncryptCore,
    dec: DecryptCore,
}

impl Session {
    /// Builds a session around a key. The key is expanded once here and
    /// shared read-only by both cores for the session's lifetime.
    pub fn new(key: Aes128Key) -> Self {
        Self {
            round_keys: expand_key(&key),
            phase: Phase::Idle,
            op: Op::Encrypt,
            input: [0u8; 16],
            fill: 0,
            output: [0u8; 16],
            cursor: 0,
            enc: EncryptCore::new(),
            dec: DecryptCore::new(),
        }
    }

    /// Current phase, for hosts that want to observe progress.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True when no exchange is in progress.
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Abandons any in-flight exchange and returns to idle, as an external
    /// reset line would.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.fill = 0;
        self.cursor = 0;
        self.enc = EncryptCore::new();
        self.dec = DecryptCore::new();
    }

    /// Advances the session by one tick, performing at most one transition.
    ///
    /// Receiving and sending suspend (stay in phase) while the transport
    /// has no byte or is send-busy. There are no timeouts: a link that
    /// never delivers the 16th byte leaves the session in
    /// [`Phase::Receiving`] indefinitely.
    pub fn tick<T: ByteTransport>(&mut self, link: &mut T) {
        match self.phase {
            Phase::Idle => {
                if let Some(byte) = link.try_recv() {
                    match byte {
                        b if b.eq_ignore_ascii_case(&CMD_ENCRYPT) => {
                            self.begin(Op::Encrypt);
                        }
                        b if b.eq_ignore_ascii_case(&CMD_DECRYPT) => {
                            self.begin(Op::Decrypt);
                        }
                        _ => {}
                    }
                }
            }
            Phase::Receiving => {
                if let Some(byte) = link.try_recv() {
                    self.input[self.fill] = byte;
                    self.fill += 1;
                    if self.fill == self.input.len() {
                        match self.op {
                            Op::Encrypt => self.enc.start(&self.input),
                            Op::Decrypt => self.dec.start(&self.input),
                        }
                        self.phase = Phase::Processing;
                    }
                }
            }
            Phase::Processing => {
                let (done, result) = match self.op {
                    Op::Encrypt => {
                        self.enc.step(&self.round_keys);
                        (self.enc.done(), self.enc.result())
                    }
                    Op::Decrypt => {
                        self.dec.step(&self.round_keys);
                        (self.dec.done(), self.dec.result())
                    }
                };
                if done {
                    self.output = result;
                    self.cursor = 0;
                    self.phase = Phase::Sending;
                }
            }
            Phase::Sending => {
                if !link.send_busy() {
                    link.send(self.output[self.cursor]);
                    self.cursor += 1;
                    if self.cursor == self.output.len() {
                        self.phase = Phase::Idle;
                    }
                }
            }
        }
    }

    fn begin(&mut self, op: Op) {
        self.op = op;
        self.fill = 0;
        self.phase = Phase::Receiving;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryLink;
    use aes_core::{decrypt_block, encrypt_block};

    const KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];

    fn session() -> Session {
        Session::new(Aes128Key::from(KEY))
    }

    fn run_until_idle(session: &mut Session, link: &mut MemoryLink) {
        // Generous upper bound; an exchange needs well under 100 ticks.
        for _ in 0..100 {
            session.tick(link);
            if session.is_idle() && link.rx_pending() == 0 {
                return;
            }
        }
        panic!("session did not return to idle");
    }

    fn expected_ciphertext(block: &[u8; 16]) -> [u8; 16] {
        let rks = expand_key(&Aes128Key::from(KEY));
        encrypt_block(block, &rks)
    }

    #[test]
    fn encrypt_command_yields_exact_ciphertext() {
        let mut session = session();
        let mut link = MemoryLink::new();
        let block: [u8; 16] = core::array::from_fn(|i| i as u8);

        link.push_rx(b"E");
        link.push_rx(&block);
        run_until_idle(&mut session, &mut link);

        assert_eq!(link.take_tx(), expected_ciphertext(&block).to_vec());
    }

    #[test]
    fn lowercase_commands_are_accepted() {
        let mut session = session();
        let mut link = MemoryLink::new();
        let block = [0x42u8; 16];

        link.push_rx(b"e");
        link.push_rx(&block);
        run_until_idle(&mut session, &mut link);
        assert_eq!(link.take_tx(), expected_ciphertext(&block).to_vec());
    }

    #[test]
    fn decrypt_recovers_the_plaintext() {
        let mut session = session();
        let mut link = MemoryLink::new();
        let plain = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
        let cipher = hex::decode("3ad77bb40d7a3660a89ecaf32466ef97").unwrap();

        link.push_rx(b"D");
        link.push_rx(&cipher);
        run_until_idle(&mut session, &mut link);
        assert_eq!(link.take_tx(), plain);
    }

    #[test]
    fn junk_while_idle_produces_no_output() {
        let mut session = session();
        let mut link = MemoryLink::new();
        link.push_rx(b"XyZ#\x00\xff");
        for _ in 0..20 {
            session.tick(&mut link);
        }
        assert!(session.is_idle());
        assert!(link.take_tx().is_empty());
    }

    #[test]
    fn idle_discard_is_transparent() {
        let block: [u8; 16] = core::array::from_fn(|i| i as u8);

        let mut direct = MemoryLink::new();
        direct.push_rx(b"E");
        direct.push_rx(&block);
        let mut s1 = session();
        run_until_idle(&mut s1, &mut direct);

        let mut prefixed = MemoryLink::new();
        prefixed.push_rx(b"XE");
        prefixed.push_rx(&block);
        let mut s2 = session();
        run_until_idle(&mut s2, &mut prefixed);

        assert_eq!(direct.take_tx(), prefixed.take_tx());
    }

    #[test]
    fn back_to_back_exchanges_round_trip() {
        let mut session = session();
        let mut link = MemoryLink::new();
        let block = [0xa5u8; 16];
        let cipher = expected_ciphertext(&block);

        link.push_rx(b"E");
        link.push_rx(&block);
        link.push_rx(b"D");
        link.push_rx(&cipher);
        run_until_idle(&mut session, &mut link);

        let tx = link.take_tx();
        assert_eq!(tx.len(), 32);
        assert_eq!(&tx[..16], &cipher);
        assert_eq!(&tx[16..], &block);
    }

    #[test]
    fn processing_takes_eleven_ticks() {
        let mut session = session();
        let mut link = MemoryLink::new();
        link.push_rx(b"E");
        link.push_rx(&[0u8; 16]);

        // Command byte + 16 block bytes.
        for _ in 0..17 {
            session.tick(&mut link);
        }
        assert_eq!(session.phase(), Phase::Processing);
        for _ in 0..10 {
            session.tick(&mut link);
            assert_eq!(session.phase(), Phase::Processing);
        }
        session.tick(&mut link);
        assert_eq!(session.phase(), Phase::Sending);
    }

    #[test]
    fn reset_abandons_a_partial_block() {
        let mut session = session();
        let mut link = MemoryLink::new();
        link.push_rx(b"E");
        link.push_rx(&[0u8; 7]);
        for _ in 0..8 {
            session.tick(&mut link);
        }
        assert_eq!(session.phase(), Phase::Receiving);

        session.reset();
        assert!(session.is_idle());

        // A fresh exchange works after the reset.
        let block = [0x11u8; 16];
        link.push_rx(b"E");
        link.push_rx(&block);
        run_until_idle(&mut session, &mut link);
        assert_eq!(link.take_tx(), expected_ciphertext(&block).to_vec());
    }

    /// Link whose transmitter is busy on alternating ticks.
    struct StutterLink {
        inner: MemoryLink,
        tx_tick: usize,
    }

    impl ByteTransport for StutterLink {
        fn try_recv(&mut self) -> Option<u8> {
            self.inner.try_recv()
        }

        fn send_busy(&self) -> bool {
            self.tx_tick % 2 == 1
        }

        fn send(&mut self, byte: u8) {
            self.inner.send(byte);
        }
    }

    #[test]
    fn send_backpressure_preserves_order_and_count() {
        let mut session = session();
        let block = [0x3cu8; 16];
        let mut link = StutterLink {
            inner: MemoryLink::new(),
            tx_tick: 0,
        };
        link.inner.push_rx(b"E");
        link.inner.push_rx(&block);

        for _ in 0..200 {
            session.tick(&mut link);
            link.tx_tick += 1;
            if session.is_idle() && link.inner.rx_pending() == 0 {
                break;
            }
        }
        assert!(session.is_idle());
        assert_eq!(link.inner.take_tx(), expected_ciphertext(&block).to_vec());
    }

    #[test]
    fn decrypt_then_encrypt_uses_fresh_state() {
        // The two cores share round keys but never state; interleaving
        // operations across them must not bleed.
        let mut session = session();
        let mut link = MemoryLink::new();
        let rks = expand_key(&Aes128Key::from(KEY));
        let block = [0x77u8; 16];

        link.push_rx(b"d");
        link.push_rx(&block);
        link.push_rx(b"e");
        link.push_rx(&block);
        run_until_idle(&mut session, &mut link);

        let tx = link.take_tx();
        assert_eq!(&tx[..16], &decrypt_block(&block, &rks));
        assert_eq!(&tx[16..], &encrypt_block(&block, &rks));
    }
}
