use discreto_seal::{BFVEncoder, Ciphertext, Decryptor, Encryptor, Plaintext};

use crate::error::{Error, Result};

const RADIUS: u32 = 5;

/// The two genders this system's identity-token derivation distinguishes.
/// Anything else is rejected upstream (spec's CLI/codec boundary), never
/// reaching this crate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Gender {
	/// `m = age + R`.
	Male,
	/// `m = age + 128 + R`.
	Female,
}

/// Derives the integer identity token `m ∈ [6, 104] ∪ [134, 232]` for a
/// patient's `(age, gender)`.
///
/// `age` must be in `1..=99`.
pub fn derive(age: u32, gender: Gender) -> Result<u32> {
	if !(1..=99).contains(&age) {
		return Err(Error::AgeOutOfRange(age));
	}

	Ok(match gender {
		Gender::Male => age + RADIUS,
		Gender::Female => age + 128 + RADIUS,
	})
}

/// Encodes `m` as a single-slot constant-coefficient plaintext (its
/// hex-string form is exactly `hex(m)` with no leading `0x`) and encrypts
/// it under `encryptor`'s public key.
pub fn encrypt_token(encryptor: &Encryptor, m: u32) -> Result<Ciphertext> {
	let plaintext = Plaintext::from_hex_string(&format!("{m:X}"))?;
	Ok(encryptor.encrypt(&plaintext)?)
}

/// Decrypts `ct` and returns slot 0 of the decoded plaintext, the
/// recovered identity token. Only ever called by the client role: the
/// server never holds the secret key this requires.
pub fn decrypt_token(decryptor: &Decryptor, encoder: &BFVEncoder, ct: &Ciphertext) -> Result<u64> {
	let plaintext = decryptor.decrypt(ct)?;
	let slots = encoder.decode_u64(&plaintext)?;
	Ok(slots.first().copied().unwrap_or(0))
}

/// Batch-encodes `values` into a single plaintext, one value per slot.
pub fn encode_vector(encoder: &BFVEncoder, values: &[u64]) -> Result<Plaintext> {
	Ok(encoder.encode_u64(values)?)
}
