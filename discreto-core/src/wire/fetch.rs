use serde::{Deserialize, Serialize};

/// Body of the fetch's `indexes` query parameter value (spec §4.6): an
/// ordered list of non-negative indices into the immediately preceding
/// candidate set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FetchRequest {
	/// Positional indices into the current candidate set.
	pub indexes: Vec<usize>,
}

/// One row of a fetch response: the candidate's filter sets plus its
/// sealed treatment, `name_sealed`/`identity_sealed` stripped (spec §3,
/// P8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedRecord {
	/// Medicine IDs taken by this patient.
	pub medicines: Vec<u64>,
	/// Side-effect IDs reported by this patient.
	pub side_effects: Vec<u64>,
	/// Hex-encoded AES-128-CTR ciphertext of the treatment text.
	pub treatment: String,
}

/// Response body of the fetch: the projected rows in the order the
/// indices were given.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FetchResponse {
	/// Projected rows, positionally matching the request's `indexes`.
	pub records: Vec<FetchedRecord>,
}
