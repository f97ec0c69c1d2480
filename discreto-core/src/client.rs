use discreto_crypto::{decrypt_token, encrypt_token, unseal, Gender, Key, Nonce};
use discreto_seal::{BFVEncoder, Ciphertext, Context, Decryptor, Encryptor, FromBytes, ToBytes};

use crate::error::{Error, Result};
use crate::wire::{FetchResponse, Query, QueryResult};

/// Client Protocol Driver (spec §4.7): builds the identity ciphertext,
/// collects matching candidate positions from a query response, and
/// reveals the symmetric-sealed payloads of a fetch response.
///
/// Transport (the HTTP round trip itself) is not this type's concern —
/// `discreto`'s client binary drives the two legs with `reqwest` and
/// passes the bodies through here. Keeping the HTTP client out of this
/// crate is what lets this driver's logic be exercised without a network.
pub struct ClientDriver<'a> {
	encryptor: &'a Encryptor,
	decryptor: &'a Decryptor,
	encoder: &'a BFVEncoder,
	ctx: &'a Context,
}

impl<'a> ClientDriver<'a> {
	/// Wraps the FHE handles a client session needs. The secret key backing
	/// `decryptor` never leaves this process.
	pub fn new(encryptor: &'a Encryptor, decryptor: &'a Decryptor, encoder: &'a BFVEncoder, ctx: &'a Context) -> Self {
		Self { encryptor, decryptor, encoder, ctx }
	}

	/// Derives the identity token for `(age, gender)`, encrypts it, and
	/// assembles the `POST /query` body.
	pub fn build_query(&self, age: u32, gender: Gender, medicines: Vec<u64>, side_effects: Vec<u64>) -> Result<Query> {
		let m = discreto_crypto::derive(age, gender)?;
		let ct = encrypt_token(self.encryptor, m)?;
		let encrypted_m = hex::encode(ct.as_bytes().map_err(discreto_crypto::Error::from)?);

		Ok(Query { medicines, side_effects, encrypted_m })
	}

	/// Decrypts every ciphertext in `result` and returns the positional
	/// indices whose slot 0 decoded to 0 — the candidates this client
	/// should fetch. Preserves `result`'s order (spec §4.7 step 4, §8 P7).
	pub fn collect_matches(&self, result: &QueryResult) -> Result<Vec<usize>> {
		let mut matches = Vec::new();

		for (i, hex_ct) in result.ciphertexts.iter().enumerate() {
			let bytes = hex::decode(hex_ct).map_err(|e| Error::MalformedQuery(format!("result[{i}]: {e}")))?;
			let ct = Ciphertext::from_bytes(self.ctx, &bytes).map_err(discreto_crypto::Error::from)?;
			let slot0 = decrypt_token(self.decryptor, self.encoder, &ct)?;

			if slot0 == 0 {
				matches.push(i);
			}
		}

		Ok(matches)
	}

	/// Decrypts the `treatment` field of every row in a fetch response
	/// under the shared symmetric key/nonce, returning plaintext UTF-8
	/// treatments alongside each row's cleartext filter sets.
	pub fn reveal(&self, key: &Key, nonce: &Nonce, response: &FetchResponse) -> Result<Vec<RevealedRecord>> {
		response
			.records
			.iter()
			.map(|record| {
				let ciphertext = hex::decode(&record.treatment)
					.map_err(|e| Error::MalformedQuery(format!("treatment: {e}")))?;
				let plaintext = unseal(key, nonce, &ciphertext)?;
				let treatment = String::from_utf8(plaintext)
					.map_err(|_| Error::MalformedQuery("treatment is not valid UTF-8".into()))?;

				Ok(RevealedRecord {
					medicines: record.medicines.clone(),
					side_effects: record.side_effects.clone(),
					treatment,
				})
			})
			.collect()
	}
}

/// A fetch row with its treatment revealed in cleartext, ready to hand to
/// the client's user-facing transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedRecord {
	/// Medicine IDs taken by this patient.
	pub medicines: Vec<u64>,
	/// Side-effect IDs reported by this patient.
	pub side_effects: Vec<u64>,
	/// The decrypted treatment text.
	pub treatment: String,
}
