use discreto_core::{Record, RecordStore};
use discreto_crypto::{encrypt_token, Gender, Key, Nonce};
use discreto_seal::{Encryptor, ToBytes};

/// The symmetric key/nonce pair shared between the dataset owner and the
/// client in the demo profile (spec §3, §9: a production deployment
/// SHOULD distribute these out of band instead of hardcoding them).
pub const DEMO_KEY: Key = *b"0123456789abcdef";

/// See [`DEMO_KEY`].
pub const DEMO_NONCE: Nonce = *b"fedcba9876543210";

/// A minimal deterministic patient used only to seed a fresh dataset when
/// no snapshot exists yet. Not a demographically realistic generator —
/// that collaborator is explicitly out of scope (spec §1); this is a
/// fallback so the server has something to serve on a clean checkout.
struct SeedPatient {
	name: &'static str,
	age: u32,
	gender: Gender,
	medicines: &'static [u64],
	side_effects: &'static [u64],
	treatment: &'static str,
}

const SEED_PATIENTS: &[SeedPatient] = &[
	SeedPatient {
		name: "Alice",
		age: 40,
		gender: Gender::Male,
		medicines: &[1, 4, 5],
		side_effects: &[2],
		treatment: "Stop 4",
	},
	SeedPatient {
		name: "Bea",
		age: 30,
		gender: Gender::Female,
		medicines: &[1],
		side_effects: &[2],
		treatment: "Stop 1",
	},
	SeedPatient {
		name: "Cora",
		age: 30,
		gender: Gender::Female,
		medicines: &[7],
		side_effects: &[2],
		treatment: "Stop 7",
	},
];

/// Loads `dataset.json` at `path` if it exists, otherwise seeds a small
/// built-in dataset (encrypted under `encryptor`, payloads sealed under
/// `key`/`nonce`) and writes it there so subsequent starts load the same
/// snapshot.
pub fn load_or_seed(
	path: &str,
	encryptor: &Encryptor,
	key: &Key,
	nonce: &Nonce,
) -> anyhow::Result<RecordStore> {
	if std::path::Path::new(path).exists() {
		tracing::info!(path, "loading dataset snapshot");
		return Ok(RecordStore::load(path)?);
	}

	tracing::warn!(path, "no dataset snapshot found, seeding a built-in demo dataset");

	let records = SEED_PATIENTS
		.iter()
		.map(|p| {
			let m = discreto_crypto::derive(p.age, p.gender)?;
			let identity_ct = encrypt_token(encryptor, m)?;

			Ok(Record {
				name_sealed: hex::encode(discreto_crypto::seal(key, nonce, p.name.as_bytes())),
				identity_sealed: hex::encode(identity_ct.as_bytes()?),
				medicines: p.medicines.to_vec(),
				side_effects: p.side_effects.to_vec(),
				treatment_sealed: hex::encode(discreto_crypto::seal(key, nonce, p.treatment.as_bytes())),
			})
		})
		.collect::<anyhow::Result<Vec<Record>>>()?;

	std::fs::write(path, serde_json::to_string_pretty(&records)?)?;

	Ok(RecordStore::new(records))
}
