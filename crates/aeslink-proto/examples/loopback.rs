//! Demonstrates one full encrypt exchange over an in-memory link.

use aes_core::{encrypt_block, expand_key, Aes128Key};
use aeslink_proto::{MemoryLink, Session};

fn main() {
    let key = Aes128Key::from(*b"sixteen byte key");
    let mut session = Session::new(key);
    let mut link = MemoryLink::new();

    let block = *b"hello, aes block";
    link.push_rx(b"E");
    link.push_rx(&block);

    while !(session.is_idle() && link.rx_pending() == 0) {
        session.tick(&mut link);
    }

    let ciphertext = link.take_tx();
    let expected = encrypt_block(&block, &expand_key(&key));
    assert_eq!(ciphertext, expected.to_vec());

    println!("example succeeded; link output matches AES reference");
}
