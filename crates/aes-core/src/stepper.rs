//! Tick-stepped cipher cores.
//!
//! Each core advances one round per external `step` call, mirroring a
//! register-transfer machine that performs one round per clock edge. A full
//! block takes exactly 11 steps from `start` to `done`: the initial
//! AddRoundKey, nine middle rounds, and the final round. `done` reads true
//! for exactly one step and self-clears on the next idle step, so a caller
//! polling the core sees a single-tick pulse.
//!
//! `start` while busy is a caller error and is ignored, not queued.
//! Starting on the same step that `done` is visible is accepted: the core
//! latches the new block with no idle gap.

use crate::block::Block;
use crate::key::RoundKeys;
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};

/// Rounds in an AES-128 block operation, counting the initial AddRoundKey.
pub const STEPS_PER_BLOCK: usize = 11;

/// Forward (encrypt) cipher core.
#[derive(Clone, Debug)]
pub struct EncryptCore {
    state: Block,
    round: usize,
    busy: bool,
    done: bool,
}

impl EncryptCore {
    /// Creates an idle core.
    pub fn new() -> Self {
        Self {
            state: [0u8; 16],
            round: 0,
            busy: false,
            done: false,
        }
    }

    /// Latches a plaintext block and begins an operation. Ignored while a
    /// prior operation is still in flight.
    pub fn start(&mut self, block: &Block) {
        if self.busy {
            return;
        }
        self.state = *block;
        self.round = 0;
        self.busy = true;
        self.done = false;
    }

    /// True while a block is being processed.
    #[inline]
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// True for the single step on which the result becomes valid.
    #[inline]
    pub fn done(&self) -> bool {
        self.done
    }

    /// The ciphertext block. Valid while `done` reads true.
    #[inline]
    pub fn result(&self) -> Block {
        self.state
    }

    /// Advances the core by one round.
    pub fn step(&mut self, round_keys: &RoundKeys) {
        if !self.busy {
            self.done = false;
            return;
        }
        match self.round {
            0 => add_round_key(&mut self.state, round_keys.get(0)),
            round @ 1..=9 => {
                sub_bytes(&mut self.state);
                shift_rows(&mut self.state);
                mix_columns(&mut self.state);
                add_round_key(&mut self.state, round_keys.get(round));
            }
            _ => {
                // Final round omits MixColumns.
                sub_bytes(&mut self.state);
                shift_rows(&mut self.state);
                add_round_key(&mut self.state, round_keys.get(10));
            }
        }
        if self.round == STEPS_PER_BLOCK - 1 {
            self.busy = false;
            self.done = true;
        } else {
            self.round += 1;
        }
    }
}

impl Default for EncryptCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Inverse (decrypt) cipher core.
///
/// Round keys are consumed in reverse order. Within each middle round the
/// sequence is InvSubBytes, InvShiftRows, AddRoundKey, InvMixColumns: the
/// round key is XORed in *before* InvMixColumns, and round 0 has no
/// trailing InvMixColumns. This ordering is mathematically equivalent to
/// the FIPS-197 InvCipher and is kept as-is for step-level fidelity with
/// the forward core.
#[derive(Clone, Debug)]
pub struct DecryptCore {
    state: Block,
    step_index: usize,
    busy: bool,
    done: bool,
}

impl DecryptCore {
    /// Creates an idle core.
    pub fn new() -> Self {
        Self {
            state: [0u8; 16],
            step_index: 0,
            busy: false,
            done: false,
        }
    }

    /// Latches a ciphertext block and begins an operation. Ignored while a
    /// prior operation is still in flight.
    pub fn start(&mut self, block: &Block) {
        if self.busy {
            return;
        }
        self.state = *block;
        self.step_index = 0;
        self.busy = true;
        self.done = false;
    }

    /// True while a block is being processed.
    #[inline]
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// True for the single step on which the result becomes valid.
    #[inline]
    pub fn done(&self) -> bool {
        self.done
    }

    /// The recovered plaintext block. Valid while `done` reads true.
    #[inline]
    pub fn result(&self) -> Block {
        self.state
    }

    /// Advances the core by one round.
    pub fn step(&mut self, round_keys: &RoundKeys) {
        if !self.busy {
            self.done = false;
            return;
        }
        // step 0 works with round key 10, step 10 with round key 0.
        let round = STEPS_PER_BLOCK - 1 - self.step_index;
        match round {
            10 => add_round_key(&mut self.state, round_keys.get(10)),
            1..=9 => {
                inv_sub_bytes(&mut self.state);
                inv_shift_rows(&mut self.state);
                add_round_key(&mut self.state, round_keys.get(round));
                inv_mix_columns(&mut self.state);
            }
            _ => {
                inv_sub_bytes(&mut self.state);
                inv_shift_rows(&mut self.state);
                add_round_key(&mut self.state, round_keys.get(0));
            }
        }
        if self.step_index == STEPS_PER_BLOCK - 1 {
            self.busy = false;
            self.done = true;
        } else {
            self.step_index += 1;
        }
    }
}

impl Default for DecryptCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Encrypts a single block by driving an [`EncryptCore`] to completion.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let mut core = EncryptCore::new();
    core.start(block);
    while !core.done() {
        core.step(round_keys);
    }
    core.result()
}

/// Decrypts a single block by driving a [`DecryptCore`] to completion.
pub fn decrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let mut core = DecryptCore::new();
    core.start(block);
    while !core.done() {
        core.step(round_keys);
    }
    core.result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Aes128Key;
    use crate::schedule::expand_key;
    use rand::RngCore;

    const NIST_KEY: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];
    const NIST_PLAIN: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];
    const NIST_CIPHER: [u8; 16] = [
        0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5,
        0x5a,
    ];

    // NIST SP 800-38A, ECB-AES128 block #1.
    const ECB_KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];
    const ECB_PLAIN: [u8; 16] = [
        0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93, 0x17,
        0x2a,
    ];
    const ECB_CIPHER: [u8; 16] = [
        0x3a, 0xd7, 0x7b, 0xb4, 0x0d, 0x7a, 0x36, 0x60, 0xa8, 0x9e, 0xca, 0xf3, 0x24, 0x66, 0xef,
        0x97,
    ];

    #[test]
    fn encrypt_matches_fips_197_vector() {
        let rks = expand_key(&Aes128Key::from(NIST_KEY));
        assert_eq!(encrypt_block(&NIST_PLAIN, &rks), NIST_CIPHER);
    }

    #[test]
    fn decrypt_matches_fips_197_vector() {
        let rks = expand_key(&Aes128Key::from(NIST_KEY));
        assert_eq!(decrypt_block(&NIST_CIPHER, &rks), NIST_PLAIN);
    }

    #[test]
    fn encrypt_matches_sp800_38a_vector() {
        let rks = expand_key(&Aes128Key::from(ECB_KEY));
        assert_eq!(encrypt_block(&ECB_PLAIN, &rks), ECB_CIPHER);
        assert_eq!(decrypt_block(&ECB_CIPHER, &rks), ECB_PLAIN);
    }

    #[test]
    fn encrypt_decrypt_round_trip_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let mut key_bytes = [0u8; 16];
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut key_bytes);
            rng.fill_bytes(&mut block);
            let rks = expand_key(&Aes128Key::from(key_bytes));
            assert_eq!(decrypt_block(&encrypt_block(&block, &rks), &rks), block);
            assert_eq!(encrypt_block(&decrypt_block(&block, &rks), &rks), block);
        }
    }

    #[test]
    fn encrypt_takes_exactly_eleven_steps() {
        let rks = expand_key(&Aes128Key::from(ECB_KEY));
        let mut core = EncryptCore::new();
        core.start(&ECB_PLAIN);
        let mut steps = 0;
        while !core.done() {
            assert!(core.busy());
            core.step(&rks);
            steps += 1;
            assert!(steps <= STEPS_PER_BLOCK, "core never asserted done");
        }
        assert_eq!(steps, STEPS_PER_BLOCK);
        assert_eq!(core.result(), ECB_CIPHER);
    }

    #[test]
    fn decrypt_takes_exactly_eleven_steps() {
        let rks = expand_key(&Aes128Key::from(ECB_KEY));
        let mut core = DecryptCore::new();
        core.start(&ECB_CIPHER);
        let mut steps = 0;
        while !core.done() {
            core.step(&rks);
            steps += 1;
            assert!(steps <= STEPS_PER_BLOCK, "core never asserted done");
        }
        assert_eq!(steps, STEPS_PER_BLOCK);
        assert_eq!(core.result(), ECB_PLAIN);
    }

    #[test]
    fn done_is_a_one_step_pulse() {
        let rks = expand_key(&Aes128Key::from(ECB_KEY));
        let mut core = EncryptCore::new();
        core.start(&ECB_PLAIN);
        for _ in 0..STEPS_PER_BLOCK {
            core.step(&rks);
        }
        assert!(core.done());
        assert!(!core.busy());
        core.step(&rks);
        assert!(!core.done());
    }

    #[test]
    fn start_while_busy_is_ignored() {
        let rks = expand_key(&Aes128Key::from(ECB_KEY));
        let mut core = EncryptCore::new();
        core.start(&ECB_PLAIN);
        core.step(&rks);
        // A second start mid-flight must not disturb the running block.
        core.start(&[0xffu8; 16]);
        let mut steps = 1;
        while !core.done() {
            core.step(&rks);
            steps += 1;
        }
        assert_eq!(steps, STEPS_PER_BLOCK);
        assert_eq!(core.result(), ECB_CIPHER);
    }

    #[test]
    fn restart_on_done_tick_is_accepted() {
        let rks = expand_key(&Aes128Key::from(ECB_KEY));
        let mut core = DecryptCore::new();
        core.start(&ECB_CIPHER);
        for _ in 0..STEPS_PER_BLOCK {
            core.step(&rks);
        }
        assert!(core.done());
        assert_eq!(core.result(), ECB_PLAIN);
        // Back-to-back: latch the next block on the done tick, no idle gap.
        core.start(&ECB_CIPHER);
        assert!(core.busy());
        assert!(!core.done());
        for _ in 0..STEPS_PER_BLOCK {
            core.step(&rks);
        }
        assert!(core.done());
        assert_eq!(core.result(), ECB_PLAIN);
    }
}
