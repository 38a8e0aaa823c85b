//! AES-128 core with tick-stepped encrypt and decrypt state machines.
//!
//! This crate mirrors the FIPS-197 specification and provides:
//! - Key schedule for AES-128.
//! - [`EncryptCore`] / [`DecryptCore`]: cipher cores that advance one round
//!   per caller-driven `step`, completing a block in exactly 11 steps.
//! - One-shot single-block encryption and decryption built on the cores.
//!
//! The implementation aims for clarity, testability and step-level
//! observability rather than constant-time guarantees; it should not be
//! treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod gf;
mod key;
mod round;
mod sbox;
mod schedule;
mod stepper;

pub use crate::block::Block;
pub use crate::key::{Aes128Key, RoundKeys};
pub use crate::schedule::expand_key;
pub use crate::stepper::{
    decrypt_block, encrypt_block, DecryptCore, EncryptCore, STEPS_PER_BLOCK,
};
