//! Block representation helpers.
//!
//! A block is 16 bytes; byte `i` sits at row `i % 4`, column `i / 4` of the
//! cipher's 4×4 state matrix (column-major, as in FIPS-197). Byte 0 is the
//! first byte on the wire.

/// AES block of 16 bytes.
pub type Block = [u8; 16];

/// XORs `rhs` into `dst` in place.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}
