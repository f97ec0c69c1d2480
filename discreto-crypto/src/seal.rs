use aes::cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;

use crate::error::Result;

type Aes128Ctr = Ctr128BE<aes::Aes128>;

/// A 16-byte AES-128 key, shared out of band between the dataset owner and
/// the client.
pub type Key = [u8; 16];

/// A 16-byte nonce/IV, shared and held fixed across every record in a
/// snapshot (spec's deliberate demo simplification — see
/// [`seal`]/[`unseal`]).
pub type Nonce = [u8; 16];

/// Seals `plaintext` (a UTF-8 field such as a patient name or treatment)
/// under AES-128-CTR, starting a fresh keystream at counter 0 for every
/// call. Safe to call once per field per record only because each field
/// gets its own stream; reusing a stream across two different plaintexts
/// would leak their XOR.
pub fn seal(key: &Key, nonce: &Nonce, plaintext: &[u8]) -> Vec<u8> {
	let mut buf = plaintext.to_vec();
	let mut cipher = Aes128Ctr::new(key.into(), nonce.into());
	cipher.apply_keystream(&mut buf);
	buf
}

/// Inverse of [`seal`]. AES-CTR is its own inverse: unsealing re-derives
/// the same keystream and XORs it back in.
pub fn unseal(key: &Key, nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>> {
	Ok(seal(key, nonce, ciphertext))
}

/// Hex-encodes a sealed payload for the wire/disk format.
pub fn to_hex(bytes: &[u8]) -> String {
	hex::encode(bytes)
}

/// Decodes a hex-encoded sealed payload.
pub fn from_hex(s: &str) -> Result<Vec<u8>> {
	Ok(hex::decode(s)?)
}
