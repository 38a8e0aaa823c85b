//! Command protocol for driving the AES-128 cores over a byte link.
//!
//! A [`Session`] runs a four-phase finite state machine — idle, receiving,
//! processing, sending — over any [`ByteTransport`]. One command byte
//! (`E`/`e` encrypt, `D`/`d` decrypt) is followed by a 16-byte block; the
//! transformed block is written back, byte 0 first. Unrecognized bytes are
//! dropped while idle. The protocol carries no framing, checksums or
//! timeouts; a byte lost on the transport desynchronizes the link until it
//! is otherwise reset.
//!
//! Everything is single-threaded and tick-driven: the host calls
//! [`Session::tick`] repeatedly, and each call performs at most one state
//! transition. A multi-threaded host must confine the session to one worker
//! or serialize access with a mutex.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod session;
mod transport;

pub use crate::session::{Op, Phase, Session};
pub use crate::transport::{ByteTransport, MemoryLink};
