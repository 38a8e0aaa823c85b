//! The four AES round transformations and their inverses.
//!
//! All transforms mutate the 16-byte state in place. The state is
//! column-major: byte `col * 4 + row` holds row `row` of column `col`.

use crate::block::{xor_in_place, Block};
use crate::gf::{mul11, mul13, mul14, mul3, mul9, xtime};
use crate::sbox::{inv_sbox, sbox};

/// Applies the forward S-box to every byte of the state.
#[inline]
pub fn sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = sbox(*byte);
    }
}

/// Applies the inverse S-box to every byte of the state.
#[inline]
pub fn inv_sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = inv_sbox(*byte);
    }
}

/// Cyclically left-shifts matrix row `r` by `r` column positions.
#[inline]
pub fn shift_rows(state: &mut Block) {
    let prev = *state;
    for row in 1..4 {
        for col in 0..4 {
            state[col * 4 + row] = prev[((col + row) % 4) * 4 + row];
        }
    }
}

/// Cyclically right-shifts matrix row `r` by `r` column positions.
#[inline]
pub fn inv_shift_rows(state: &mut Block) {
    let prev = *state;
    for row in 1..4 {
        for col in 0..4 {
            state[col * 4 + row] = prev[((col + 4 - row) % 4) * 4 + row];
        }
    }
}

/// MixColumns over all four columns: each column is multiplied by the
/// circulant matrix (2 3 1 1).
#[inline]
pub fn mix_columns(state: &mut Block) {
    for col in state.chunks_exact_mut(4) {
        let [a, b, c, d] = [col[0], col[1], col[2], col[3]];
        col[0] = xtime(a) ^ mul3(b) ^ c ^ d;
        col[1] = a ^ xtime(b) ^ mul3(c) ^ d;
        col[2] = a ^ b ^ xtime(c) ^ mul3(d);
        col[3] = mul3(a) ^ b ^ c ^ xtime(d);
    }
}

/// Inverse MixColumns: the circulant matrix (14 11 13 9).
#[inline]
pub fn inv_mix_columns(state: &mut Block) {
    for col in state.chunks_exact_mut(4) {
        let [a, b, c, d] = [col[0], col[1], col[2], col[3]];
        col[0] = mul14(a) ^ mul11(b) ^ mul13(c) ^ mul9(d);
        col[1] = mul9(a) ^ mul14(b) ^ mul11(c) ^ mul13(d);
        col[2] = mul13(a) ^ mul9(b) ^ mul14(c) ^ mul11(d);
        col[3] = mul11(a) ^ mul13(b) ^ mul9(c) ^ mul14(d);
    }
}

/// Adds (XORs) a round key into the state.
#[inline]
pub fn add_round_key(state: &mut Block, round_key: &Block) {
    xor_in_place(state, round_key);
}
