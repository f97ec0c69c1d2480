use uuid::Uuid;

use discreto_seal::{BFVEncoder, BFVEvaluator, Ciphertext, Context, FromBytes, RelinearizationKeys, ToBytes};

use crate::conversation::Table;
use crate::error::{Error, Result};
use crate::record_store::RecordStore;
use crate::wire::{FetchRequest, FetchResponse, FetchedRecord, Query, QueryResult};

/// Which match expression [`ServerDriver::handle_query`] runs against
/// every candidate. `Standard` is the depth-1 exact-equality test spec's
/// Match Evaluator defines; `Radius` is the degree-8192 extended profile
/// from the design notes, accepting any row whose token falls within a
/// fixed integer radius of the query's.
pub enum MatchProfile {
	/// `sub` then `multiply_plain`, depth-1, no relinearization keys
	/// needed.
	Standard,
	/// `2*radius+1` shifted query ciphertexts, each subtracted from the
	/// row and multiplied together — depth > 1, requires
	/// `relin_keys`.
	Radius {
		/// How many shifts on either side of the query's token to accept.
		radius: u32,
		/// Relinearization keys, generated by whichever role ran
		/// [`discreto_seal::KeyGenerator`].
		relin_keys: RelinearizationKeys,
	},
}

/// Server Protocol Driver (spec §4.8): runs the prefilter and match
/// evaluator per query, and serves the paired fetch against a
/// per-conversation candidate set.
///
/// HTTP specifics (routing, status codes, request/response extraction)
/// belong to `discreto`'s server binary; this type only implements the
/// state machine spec §4.8 describes, so it can be exercised directly in
/// tests without standing up axum.
pub struct ServerDriver {
	store: RecordStore,
	ctx: Context,
	evaluator: BFVEvaluator,
	encoder: BFVEncoder,
	profile: MatchProfile,
	conversations: Table,
}

impl ServerDriver {
	/// Wraps an immutable record store and the read-only FHE handles every
	/// query shares (spec §5: evaluator and encoder are shareable once
	/// constructed). The server never holds a secret key. Runs the
	/// [`MatchProfile::Standard`] depth-1 match test.
	pub fn new(store: RecordStore, ctx: Context, evaluator: BFVEvaluator, encoder: BFVEncoder) -> Self {
		Self::with_profile(store, ctx, evaluator, encoder, MatchProfile::Standard)
	}

	/// Like [`Self::new`] but with an explicit [`MatchProfile`] — used to
	/// run the "radius" profile.
	pub fn with_profile(
		store: RecordStore,
		ctx: Context,
		evaluator: BFVEvaluator,
		encoder: BFVEncoder,
		profile: MatchProfile,
	) -> Self {
		Self { store, ctx, evaluator, encoder, profile, conversations: Table::new() }
	}

	/// `Idle → POST /query → Awaiting-Fetch`. Runs the prefilter, then the
	/// match evaluator over every surviving candidate (no early
	/// termination — spec §4.4's "no early termination" property), and
	/// starts a new conversation holding the candidate set.
	///
	/// Returns the conversation token the caller must return to the
	/// client out-of-band (the `X-Discreto-Conversation` response header;
	/// see [`crate::wire::result`]) and the response body.
	pub async fn handle_query(&self, query: &Query) -> Result<(Uuid, QueryResult)> {
		let query_bytes = hex::decode(&query.encrypted_m)
			.map_err(|e| Error::MalformedQuery(format!("encrypted_m: {e}")))?;
		let ct_q = Ciphertext::from_bytes(&self.ctx, &query_bytes).map_err(discreto_crypto::Error::from)?;

		let candidate_set = crate::prefilter::run(&self.store, query);

		let shifted = match &self.profile {
			MatchProfile::Standard => None,
			MatchProfile::Radius { radius, .. } => {
				Some(discreto_crypto::prepare_shifted(&self.evaluator, &ct_q, *radius)?)
			}
		};

		let mut ciphertexts = Vec::with_capacity(candidate_set.len());
		for &i in &candidate_set {
			let ct_r = self.store.identity_ct(&self.ctx, i)?;
			let y = match (&self.profile, &shifted) {
				(MatchProfile::Standard, _) => discreto_crypto::evaluate(&self.evaluator, &self.encoder, &ct_q, &ct_r)?,
				(MatchProfile::Radius { relin_keys, .. }, Some(shifted)) => {
					discreto_crypto::evaluate_radius(&self.evaluator, relin_keys, shifted, &ct_r)?
				}
				(MatchProfile::Radius { .. }, None) => unreachable!("radius profile always prepares shifted ciphertexts"),
			};
			ciphertexts.push(hex::encode(y.as_bytes().map_err(discreto_crypto::Error::from)?));
		}

		tracing::debug!(candidates = candidate_set.len(), "evaluated query");

		let token = self.conversations.start(candidate_set).await;
		Ok((token, QueryResult::new(ciphertexts)))
	}

	/// `Awaiting-Fetch → GET /query?indexes=… → Idle`. Validates every
	/// requested index against the conversation's candidate set, projects
	/// the corresponding rows, and clears the conversation regardless of
	/// outcome (spec §8 P6).
	pub fn handle_fetch_sync(&self, candidate_set: &[usize], request: &FetchRequest) -> Result<FetchResponse> {
		let mut records = Vec::with_capacity(request.indexes.len());

		for &position in &request.indexes {
			let &row = candidate_set
				.get(position)
				.ok_or(Error::IndexOutOfRange { index: position, len: candidate_set.len() })?;

			let view = self.store.view(row)?;
			records.push(FetchedRecord {
				medicines: view.medicines,
				side_effects: view.side_effects,
				treatment: view.treatment_sealed,
			});
		}

		Ok(FetchResponse { records })
	}

	/// Takes the conversation's candidate set (clearing it) and serves the
	/// fetch against it. A `token` with no matching conversation — a fetch
	/// with no preceding query, a repeat fetch, or one issued after a
	/// server restart — is rejected (spec §5, §8 P6, scenario S6).
	pub async fn handle_fetch(&self, token: Uuid, request: &FetchRequest) -> Result<FetchResponse> {
		let candidate_set = self.conversations.take(token).await.ok_or(Error::NoActiveConversation)?;
		self.handle_fetch_sync(&candidate_set, request)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::record_store::Record;
	use discreto_crypto::{encrypt_token, Gender};
	use discreto_seal::{
		BfvEncryptionParametersBuilder, CoefficientModulus, DegreeType, Encryptor, KeyGenerator, PlainModulus,
		SecurityLevel,
	};

	fn mk_ctx() -> Context {
		let params = BfvEncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D4096)
			.set_coefficient_modulus(CoefficientModulus::bfv_default(DegreeType::D4096, SecurityLevel::TC128).unwrap())
			.set_plain_modulus(PlainModulus::batching(DegreeType::D4096, 20).unwrap())
			.build()
			.unwrap();

		Context::new(&params, true, SecurityLevel::TC128).unwrap()
	}

	fn setup() -> (ServerDriver, Encryptor) {
		let ctx = mk_ctx();
		let keygen = KeyGenerator::new(&ctx).unwrap();
		let public_key = keygen.create_public_key().unwrap();
		let encryptor = Encryptor::new(&ctx, &public_key).unwrap();
		let encoder = BFVEncoder::new(&ctx).unwrap();
		let evaluator = BFVEvaluator::new(&ctx).unwrap();

		let m = discreto_crypto::derive(40, Gender::Male).unwrap();
		let identity_ct = encrypt_token(&encryptor, m).unwrap();
		let identity_sealed = hex::encode(identity_ct.as_bytes().unwrap());

		let store = RecordStore::new(vec![Record {
			name_sealed: String::new(),
			identity_sealed,
			medicines: vec![1, 4, 5],
			side_effects: vec![2],
			treatment_sealed: String::new(),
		}]);

		let server_ctx = mk_ctx();
		(ServerDriver::new(store, server_ctx, BFVEvaluator::new(&server_ctx).unwrap(), BFVEncoder::new(&server_ctx).unwrap()), encryptor)
	}

	#[tokio::test]
	async fn fetch_without_query_is_rejected() {
		let (server, _encryptor) = setup();
		let token = Uuid::new_v4();

		let err = server.handle_fetch(token, &FetchRequest { indexes: vec![0] }).await.unwrap_err();
		assert!(matches!(err, Error::NoActiveConversation));
	}

	#[tokio::test]
	async fn second_fetch_on_same_token_is_rejected() {
		let (server, encryptor) = setup();
		let m = discreto_crypto::derive(40, Gender::Male).unwrap();
		let ct = encrypt_token(&encryptor, m).unwrap();
		let query = Query {
			medicines: vec![1],
			side_effects: vec![2],
			encrypted_m: hex::encode(ct.as_bytes().unwrap()),
		};

		let (token, _result) = server.handle_query(&query).await.unwrap();
		server.handle_fetch(token, &FetchRequest { indexes: vec![] }).await.unwrap();

		let err = server.handle_fetch(token, &FetchRequest { indexes: vec![] }).await.unwrap_err();
		assert!(matches!(err, Error::NoActiveConversation));
	}

	#[tokio::test]
	async fn out_of_range_fetch_index_is_rejected() {
		let (server, encryptor) = setup();
		let m = discreto_crypto::derive(40, Gender::Male).unwrap();
		let ct = encrypt_token(&encryptor, m).unwrap();
		let query = Query {
			medicines: vec![1],
			side_effects: vec![2],
			encrypted_m: hex::encode(ct.as_bytes().unwrap()),
		};

		let (token, result) = server.handle_query(&query).await.unwrap();
		assert_eq!(result.ciphertexts.len(), 1);

		let err = server.handle_fetch(token, &FetchRequest { indexes: vec![3] }).await.unwrap_err();
		assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 1 }));
	}
}
