//! Command-line interface for `aeslink`.

#![forbid(unsafe_code)]

use std::io::{self, Read, Write};

use aes_core::{decrypt_block, encrypt_block, expand_key, Aes128Key};
use aeslink_proto::{ByteTransport, MemoryLink, Phase, Session};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Key used when none is given on the command line (the NIST SP 800-38A
/// ECB-AES128 test key).
const DEFAULT_KEY_HEX: &str = "2b7e151628aed2a6abf7158809cf4f3c";

/// AES-128 byte-link CLI.
#[derive(Parser)]
#[command(
    name = "aeslink",
    version,
    author,
    about = "AES-128 block cipher over a byte-oriented command link"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt one 16-byte block given as 32 hex characters.
    Enc {
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX", default_value = DEFAULT_KEY_HEX)]
        key_hex: String,
        /// Plaintext block as 32 hex characters.
        #[arg(value_name = "HEX")]
        block_hex: String,
    },
    /// Decrypt one 16-byte block given as 32 hex characters.
    Dec {
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX", default_value = DEFAULT_KEY_HEX)]
        key_hex: String,
        /// Ciphertext block as 32 hex characters.
        #[arg(value_name = "HEX")]
        block_hex: String,
    },
    /// Run the command protocol over stdin/stdout as the byte pipe.
    Serve {
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX", default_value = DEFAULT_KEY_HEX)]
        key_hex: String,
    },
    /// Push seeded random blocks through a loopback link and verify the
    /// round trip.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Enc { key_hex, block_hex } => cmd_enc(&key_hex, &block_hex),
        Commands::Dec { key_hex, block_hex } => cmd_dec(&key_hex, &block_hex),
        Commands::Serve { key_hex } => cmd_serve(&key_hex),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

fn cmd_enc(key_hex: &str, block_hex: &str) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let block = parse_block_hex(block_hex)?;
    let round_keys = expand_key(&key);
    println!("{}", hex::encode(encrypt_block(&block, &round_keys)));
    Ok(())
}

fn cmd_dec(key_hex: &str, block_hex: &str) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let block = parse_block_hex(block_hex)?;
    let round_keys = expand_key(&key);
    println!("{}", hex::encode(decrypt_block(&block, &round_keys)));
    Ok(())
}

/// Stdin/stdout as the byte transport. Reads block on `try_recv`, which is
/// fine here: the session only polls for input in phases that have nothing
/// else to do.
struct StdioLink {
    stdin: io::Stdin,
    stdout: io::Stdout,
    eof: bool,
    write_error: Option<io::Error>,
}

impl StdioLink {
    fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
            eof: false,
            write_error: None,
        }
    }
}

impl ByteTransport for StdioLink {
    fn try_recv(&mut self) -> Option<u8> {
        if self.eof {
            return None;
        }
        let mut buf = [0u8; 1];
        match self.stdin.read(&mut buf) {
            Ok(0) => {
                self.eof = true;
                None
            }
            Ok(_) => Some(buf[0]),
            Err(_) => {
                self.eof = true;
                None
            }
        }
    }

    fn send_busy(&self) -> bool {
        false
    }

    fn send(&mut self, byte: u8) {
        let result = self
            .stdout
            .write_all(&[byte])
            .and_then(|()| self.stdout.flush());
        if let Err(err) = result {
            self.write_error = Some(err);
        }
    }
}

fn cmd_serve(key_hex: &str) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let mut session = Session::new(key);
    let mut link = StdioLink::new();

    loop {
        session.tick(&mut link);
        if let Some(err) = link.write_error.take() {
            return Err(err).context("write response byte");
        }
        // Exit once the pipe is closed and no response is still draining.
        // A block left incomplete at EOF can never finish; drop it.
        if link.eof && !matches!(session.phase(), Phase::Processing | Phase::Sending) {
            break;
        }
    }
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key_bytes = [0u8; 16];
    rng.fill_bytes(&mut key_bytes);
    let key = Aes128Key::from(key_bytes);

    let mut block = [0u8; 16];
    rng.fill_bytes(&mut block);

    let mut session = Session::new(key);
    let mut link = MemoryLink::new();

    link.push_rx(b"E");
    link.push_rx(&block);
    pump(&mut session, &mut link)?;
    let ciphertext = link.take_tx();

    link.push_rx(b"D");
    link.push_rx(&ciphertext);
    pump(&mut session, &mut link)?;
    let decrypted = link.take_tx();

    println!("demo key: {}", hex::encode(key_bytes));
    println!("plaintext: {}", hex::encode(block));
    println!("ciphertext: {}", hex::encode(&ciphertext));
    println!("decrypted: {}", hex::encode(&decrypted));
    if decrypted != block {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

fn pump(session: &mut Session, link: &mut MemoryLink) -> Result<()> {
    for _ in 0..100 {
        session.tick(link);
        if session.is_idle() && link.rx_pending() == 0 {
            return Ok(());
        }
    }
    bail!("session did not complete the exchange");
}

fn parse_key_hex(hex_str: &str) -> Result<Aes128Key> {
    let bytes = hex::decode(hex_str.trim()).context("decode key hex")?;
    if bytes.len() != 16 {
        bail!("AES-128 key must be 16 bytes (32 hex characters)");
    }
    let mut key = [0u8; 16];
    key.copy_from_slice(&bytes);
    Ok(Aes128Key::from(key))
}

fn parse_block_hex(hex_str: &str) -> Result<[u8; 16]> {
    let bytes = hex::decode(hex_str.trim()).context("decode block hex")?;
    if bytes.len() != 16 {
        bail!("block must be 16 bytes (32 hex characters)");
    }
    let mut block = [0u8; 16];
    block.copy_from_slice(&bytes);
    Ok(block)
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
