//! GF(2^8) arithmetic for the MixColumns transforms.
//!
//! Every fixed-constant multiplication is an XOR combination of iterated
//! `xtime` applications, matching how the column-mixing hardware computes
//! them. Reduction polynomial is `x^8 + x^4 + x^3 + x + 1` (0x11B).

/// Multiplication by 2: shift left and reduce if the high bit fell out.
#[inline]
pub fn xtime(b: u8) -> u8 {
    let shifted = b << 1;
    if b & 0x80 != 0 {
        shifted ^ 0x1b
    } else {
        shifted
    }
}

/// Multiplication by 3 = 2 ^ 1.
#[inline]
pub fn mul3(b: u8) -> u8 {
    xtime(b) ^ b
}

/// Multiplication by 9 = 8 ^ 1.
#[inline]
pub fn mul9(b: u8) -> u8 {
    xtime(xtime(xtime(b))) ^ b
}

/// Multiplication by 11 = 8 ^ 2 ^ 1.
#[inline]
pub fn mul11(b: u8) -> u8 {
    xtime(xtime(xtime(b))) ^ xtime(b) ^ b
}

/// Multiplication by 13 = 8 ^ 4 ^ 1.
#[inline]
pub fn mul13(b: u8) -> u8 {
    xtime(xtime(xtime(b))) ^ xtime(xtime(b)) ^ b
}

/// Multiplication by 14 = 8 ^ 4 ^ 2.
#[inline]
pub fn mul14(b: u8) -> u8 {
    xtime(xtime(xtime(b))) ^ xtime(xtime(b)) ^ xtime(b)
}
