use serde::{Deserialize, Serialize};

/// Response body of `POST /query` (spec §4.6): exactly an ordered JSON
/// array of hex-encoded serialized BFV ciphertexts, one per candidate, in
/// candidate-set order. `#[serde(transparent)]` keeps the wire shape a
/// bare array rather than an object wrapping one, matching spec's literal
/// `["<hex-ct>", ...]`.
///
/// The per-conversation token the follow-up fetch must present travels
/// out-of-band as the `X-Discreto-Conversation` response header (see
/// [`crate::server`]), not inside this body — the body format is fixed by
/// spec and not renegotiable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct QueryResult {
	/// Hex-encoded serialized BFV ciphertexts, one per candidate row.
	pub ciphertexts: Vec<String>,
}

impl QueryResult {
	/// Wraps an already-hex-encoded ciphertext list.
	pub fn new(ciphertexts: Vec<String>) -> Self {
		Self { ciphertexts }
	}
}
