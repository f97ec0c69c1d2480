use serde::{Deserialize, Serialize};

/// Body of `POST /query` (spec §4.6).
///
/// `medicines`/`side_effects` are ordered lists; duplicates are permitted
/// and order carries no meaning (the prefilter only ever builds a set from
/// them). `encrypted_m` is the hex-encoded serialized BFV ciphertext of the
/// client's identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
	/// Medicine IDs the client is filtering on.
	pub medicines: Vec<u64>,
	/// Side-effect IDs the client is filtering on.
	pub side_effects: Vec<u64>,
	/// Hex-encoded serialized BFV ciphertext of the identity token.
	pub encrypted_m: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_through_json() {
		let query = Query {
			medicines: vec![1, 2],
			side_effects: vec![3],
			encrypted_m: "deadbeef".into(),
		};

		let json = serde_json::to_string(&query).unwrap();
		let back: Query = serde_json::from_str(&json).unwrap();

		assert_eq!(back.medicines, query.medicines);
		assert_eq!(back.encrypted_m, query.encrypted_m);
	}

	#[test]
	fn rejects_non_integer_medicine_ids() {
		let malformed = r#"{"medicines":[1.5],"side_effects":[2],"encrypted_m":"ab"}"#;
		assert!(serde_json::from_str::<Query>(malformed).is_err());
	}
}
