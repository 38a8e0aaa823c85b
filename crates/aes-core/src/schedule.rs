//! AES-128 key schedule.

use crate::key::{Aes128Key, RoundKeys};
use crate::sbox::sbox;

/// Round constants: powers of x in GF(2^8), left-padded into the top byte
/// of the expansion word.
const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

fn rot_word(word: u32) -> u32 {
    word.rotate_left(8)
}

fn sub_word(word: u32) -> u32 {
    let mut out = 0u32;
    for shift in [24u32, 16, 8, 0] {
        out |= u32::from(sbox((word >> shift) as u8)) << shift;
    }
    out
}

/// Expands a 128-bit key into the 11 round keys.
///
/// Pure and one-shot: invoked once whenever the key changes, never during
/// block processing.
pub fn expand_key(key: &Aes128Key) -> RoundKeys {
    let mut w = [0u32; 44];
    for (i, chunk) in key.0.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for i in 4..44 {
        let mut temp = w[i - 1];
        if i % 4 == 0 {
            temp = sub_word(rot_word(temp)) ^ (u32::from(RCON[i / 4 - 1]) << 24);
        }
        w[i] = w[i - 4] ^ temp;
    }

    let mut round_keys = [[0u8; 16]; 11];
    for (round, rk) in round_keys.iter_mut().enumerate() {
        for word_idx in 0..4 {
            let bytes = w[round * 4 + word_idx].to_be_bytes();
            rk[word_idx * 4..word_idx * 4 + 4].copy_from_slice(&bytes);
        }
    }

    RoundKeys(round_keys)
}
