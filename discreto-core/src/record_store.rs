use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use discreto_seal::{Ciphertext, Context, FromBytes};

use crate::error::{Error, Result};

/// One row as held at rest on the server: an encrypted identity token, two
/// cleartext filter sets, and two symmetric-sealed payload fields.
///
/// Mirrors the wire snapshot format exactly — `medicines`/`side_effects`
/// are plain integer arrays, the sealed fields and the identity ciphertext
/// are hex strings — so a [`RecordStore`] loads straight from JSON with no
/// intermediate shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
	/// Hex-encoded AES-128-CTR ciphertext of the patient's name.
	pub name_sealed: String,
	/// Hex-encoded serialized BFV ciphertext of the identity token.
	pub identity_sealed: String,
	/// Medicine IDs taken by this patient.
	pub medicines: Vec<u64>,
	/// Side-effect IDs reported by this patient.
	pub side_effects: Vec<u64>,
	/// Hex-encoded AES-128-CTR ciphertext of the treatment text.
	pub treatment_sealed: String,
}

/// The projection of a [`Record`] a fetch response is allowed to reveal:
/// everything except `name_sealed` and `identity_sealed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicRecord {
	/// Medicine IDs taken by this patient.
	pub medicines: Vec<u64>,
	/// Side-effect IDs reported by this patient.
	pub side_effects: Vec<u64>,
	/// Hex-encoded AES-128-CTR ciphertext of the treatment text.
	pub treatment_sealed: String,
}

impl Record {
	fn view(&self) -> PublicRecord {
		PublicRecord {
			medicines: self.medicines.clone(),
			side_effects: self.side_effects.clone(),
			treatment_sealed: self.treatment_sealed.clone(),
		}
	}

	pub(crate) fn medicines_set(&self) -> HashSet<u64> {
		self.medicines.iter().copied().collect()
	}

	pub(crate) fn side_effects_set(&self) -> HashSet<u64> {
		self.side_effects.iter().copied().collect()
	}
}

/// An immutable, ordered collection of [`Record`]s, held for the lifetime
/// of the server process once loaded.
#[derive(Debug)]
pub struct RecordStore {
	records: Vec<Record>,
}

impl RecordStore {
	/// Wraps an already-materialized record list (used by dataset
	/// provisioning once it has generated or parsed rows).
	pub fn new(records: Vec<Record>) -> Self {
		Self { records }
	}

	/// Loads a snapshot written in the `dataset.json` format (spec §6).
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let data = std::fs::read_to_string(path)?;
		let records: Vec<Record> = serde_json::from_str(&data)?;
		Ok(Self::new(records))
	}

	/// Number of rows.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// True iff this store holds no rows.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// The raw row at `i`, for components that need the sealed fields
	/// (the prefilter and match evaluator; never returned to a client).
	pub fn get(&self, i: usize) -> Option<&Record> {
		self.records.get(i)
	}

	/// The client-visible projection of row `i`.
	pub fn view(&self, i: usize) -> Result<PublicRecord> {
		self
			.records
			.get(i)
			.map(Record::view)
			.ok_or(Error::IndexOutOfRange { index: i, len: self.records.len() })
	}

	/// Deserializes and returns row `i`'s identity ciphertext.
	pub fn identity_ct(&self, ctx: &Context, i: usize) -> Result<Ciphertext> {
		let record = self
			.records
			.get(i)
			.ok_or(Error::IndexOutOfRange { index: i, len: self.records.len() })?;

		let bytes = hex::decode(&record.identity_sealed)
			.map_err(|e| Error::MalformedQuery(format!("identity_sealed: {e}")))?;

		Ok(Ciphertext::from_bytes(ctx, &bytes).map_err(discreto_crypto::Error::from)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Record {
		Record {
			name_sealed: "00".into(),
			identity_sealed: "00".into(),
			medicines: vec![1, 4, 5],
			side_effects: vec![2],
			treatment_sealed: "ff".into(),
		}
	}

	#[test]
	fn view_strips_name_and_identity() {
		let store = RecordStore::new(vec![sample()]);
		let view = store.view(0).unwrap();

		assert_eq!(view.medicines, vec![1, 4, 5]);
		assert_eq!(view.treatment_sealed, "ff");
	}

	#[test]
	fn out_of_range_view_errors() {
		let store = RecordStore::new(vec![sample()]);
		assert!(matches!(store.view(5), Err(Error::IndexOutOfRange { index: 5, len: 1 })));
	}

	#[test]
	fn loads_from_json_snapshot() {
		let dir = std::env::temp_dir();
		let path = dir.join("discreto_core_test_snapshot.json");
		std::fs::write(&path, serde_json::to_string(&vec![sample()]).unwrap()).unwrap();

		let store = RecordStore::load(&path).unwrap();
		assert_eq!(store.len(), 1);

		std::fs::remove_file(&path).ok();
	}
}
