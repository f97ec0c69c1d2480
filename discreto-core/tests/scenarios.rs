//! End-to-end scenarios from spec §8 spanning the prefilter, the match
//! evaluator, and both protocol drivers together.

use discreto_core::{ClientDriver, FetchRequest, MatchProfile, Query, Record, RecordStore, ServerDriver};
use discreto_crypto::{encrypt_token, Gender};
use discreto_seal::{
	BFVEncoder, BFVEvaluator, BfvEncryptionParametersBuilder, CoefficientModulus, Context, Decryptor, DegreeType,
	Encryptor, KeyGenerator, PlainModulus, SecurityLevel, ToBytes,
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

fn mk_radius_ctx() -> Context {
	let params = BfvEncryptionParametersBuilder::new()
		.set_poly_modulus_degree(DegreeType::D8192)
		.set_coefficient_modulus(CoefficientModulus::bfv_default(DegreeType::D8192, SecurityLevel::TC128).unwrap())
		.set_plain_modulus(PlainModulus::batching(DegreeType::D8192, 20).unwrap())
		.build()
		.unwrap();

	Context::new(&params, true, SecurityLevel::TC128).unwrap()
}

fn identity_sealed(encryptor: &Encryptor, age: u32, gender: Gender) -> String {
	let m = discreto_crypto::derive(age, gender).unwrap();
	let ct = encrypt_token(encryptor, m).unwrap();
	hex::encode(ct.as_bytes().unwrap())
}

/// S1: one row, a matching query returns that row's treatment.
#[tokio::test]
async fn s1_matching_query_returns_treatment() {
	let client_ctx = mk_ctx();
	let keygen = KeyGenerator::new(&client_ctx).unwrap();
	let public_key = keygen.create_public_key().unwrap();
	let encryptor = Encryptor::new(&client_ctx, &public_key).unwrap();
	let decryptor = Decryptor::new(&client_ctx, keygen.secret_key()).unwrap();
	let client_encoder = BFVEncoder::new(&client_ctx).unwrap();

	let key: discreto_crypto::Key = *b"0123456789abcdef";
	let nonce: discreto_crypto::Nonce = *b"fedcba9876543210";
	let treatment_sealed = hex::encode(discreto_crypto::seal(&key, &nonce, b"Stop 4"));

	let store = RecordStore::new(vec![Record {
		name_sealed: String::new(),
		identity_sealed: identity_sealed(&encryptor, 40, Gender::Male),
		medicines: vec![1, 4, 5],
		side_effects: vec![2],
		treatment_sealed,
	}]);

	let server_ctx = mk_ctx();
	let server = ServerDriver::new(
		store,
		mk_ctx(),
		BFVEvaluator::new(&server_ctx).unwrap(),
		BFVEncoder::new(&server_ctx).unwrap(),
	);

	let client = ClientDriver::new(&encryptor, &decryptor, &client_encoder, &client_ctx);
	let query = client.build_query(40, Gender::Male, vec![1, 2], vec![2]).unwrap();

	let (token, result) = server.handle_query(&query).await.unwrap();
	let matches = client.collect_matches(&result).unwrap();
	assert_eq!(matches, vec![0]);

	let fetch_response = server.handle_fetch(token, &FetchRequest { indexes: matches }).await.unwrap();
	let revealed = client.reveal(&key, &nonce, &fetch_response).unwrap();

	assert_eq!(revealed[0].treatment, "Stop 4");
}

/// S2: a one-year-older query against the same row matches nothing.
#[tokio::test]
async fn s2_mismatched_age_is_not_found() {
	let client_ctx = mk_ctx();
	let keygen = KeyGenerator::new(&client_ctx).unwrap();
	let public_key = keygen.create_public_key().unwrap();
	let encryptor = Encryptor::new(&client_ctx, &public_key).unwrap();
	let decryptor = Decryptor::new(&client_ctx, keygen.secret_key()).unwrap();
	let client_encoder = BFVEncoder::new(&client_ctx).unwrap();

	let store = RecordStore::new(vec![Record {
		name_sealed: String::new(),
		identity_sealed: identity_sealed(&encryptor, 40, Gender::Male),
		medicines: vec![1, 4, 5],
		side_effects: vec![2],
		treatment_sealed: String::new(),
	}]);

	let server_ctx = mk_ctx();
	let server = ServerDriver::new(
		store,
		mk_ctx(),
		BFVEvaluator::new(&server_ctx).unwrap(),
		BFVEncoder::new(&server_ctx).unwrap(),
	);

	let client = ClientDriver::new(&encryptor, &decryptor, &client_encoder, &client_ctx);
	let query = client.build_query(41, Gender::Male, vec![1], vec![2]).unwrap();

	let (_token, result) = server.handle_query(&query).await.unwrap();
	let matches = client.collect_matches(&result).unwrap();

	assert!(matches.is_empty());
}

/// S4: a medicine id that matches nothing's prefilter never reaches the
/// evaluator and returns an empty ciphertext array.
#[tokio::test]
async fn s4_unmatched_medicine_short_circuits_at_prefilter() {
	let client_ctx = mk_ctx();
	let keygen = KeyGenerator::new(&client_ctx).unwrap();
	let public_key = keygen.create_public_key().unwrap();
	let encryptor = Encryptor::new(&client_ctx, &public_key).unwrap();
	let decryptor = Decryptor::new(&client_ctx, keygen.secret_key()).unwrap();
	let client_encoder = BFVEncoder::new(&client_ctx).unwrap();

	let store = RecordStore::new(vec![Record {
		name_sealed: String::new(),
		identity_sealed: identity_sealed(&encryptor, 40, Gender::Male),
		medicines: vec![1],
		side_effects: vec![2],
		treatment_sealed: String::new(),
	}]);

	let server_ctx = mk_ctx();
	let server = ServerDriver::new(
		store,
		mk_ctx(),
		BFVEvaluator::new(&server_ctx).unwrap(),
		BFVEncoder::new(&server_ctx).unwrap(),
	);

	let client = ClientDriver::new(&encryptor, &decryptor, &client_encoder, &client_ctx);
	let query = client.build_query(40, Gender::Male, vec![999], vec![2]).unwrap();

	let (_token, result) = server.handle_query(&query).await.unwrap();
	assert!(result.ciphertexts.is_empty());
}

/// S6: a fetch presenting a token the server never issued (e.g. after a
/// restart) is rejected rather than silently served.
#[tokio::test]
async fn s6_fetch_without_prior_query_is_rejected() {
	let server_ctx = mk_ctx();
	let server = ServerDriver::new(
		RecordStore::new(vec![]),
		mk_ctx(),
		BFVEvaluator::new(&server_ctx).unwrap(),
		BFVEncoder::new(&server_ctx).unwrap(),
	);

	let stale_token = uuid::Uuid::new_v4();
	let err = server.handle_fetch(stale_token, &FetchRequest { indexes: vec![0] }).await.unwrap_err();

	assert!(matches!(err, discreto_core::Error::NoActiveConversation));
}

/// S3: two rows sharing (age, gender) but different medicines, queried so
/// both prefilter in, must come back in candidate-set order.
#[tokio::test]
async fn s3_two_matching_rows_preserve_order() {
	let client_ctx = mk_ctx();
	let keygen = KeyGenerator::new(&client_ctx).unwrap();
	let public_key = keygen.create_public_key().unwrap();
	let encryptor = Encryptor::new(&client_ctx, &public_key).unwrap();
	let decryptor = Decryptor::new(&client_ctx, keygen.secret_key()).unwrap();
	let client_encoder = BFVEncoder::new(&client_ctx).unwrap();

	let key: discreto_crypto::Key = *b"0123456789abcdef";
	let nonce: discreto_crypto::Nonce = *b"fedcba9876543210";

	let store = RecordStore::new(vec![
		Record {
			name_sealed: String::new(),
			identity_sealed: identity_sealed(&encryptor, 30, Gender::Female),
			medicines: vec![1],
			side_effects: vec![2],
			treatment_sealed: hex::encode(discreto_crypto::seal(&key, &nonce, b"Stop 1")),
		},
		Record {
			name_sealed: String::new(),
			identity_sealed: identity_sealed(&encryptor, 30, Gender::Female),
			medicines: vec![7],
			side_effects: vec![2],
			treatment_sealed: hex::encode(discreto_crypto::seal(&key, &nonce, b"Stop 7")),
		},
	]);

	let server_ctx = mk_ctx();
	let server = ServerDriver::new(
		store,
		mk_ctx(),
		BFVEvaluator::new(&server_ctx).unwrap(),
		BFVEncoder::new(&server_ctx).unwrap(),
	);

	let client = ClientDriver::new(&encryptor, &decryptor, &client_encoder, &client_ctx);
	let query = client.build_query(30, Gender::Female, vec![1, 7], vec![2]).unwrap();

	let (token, result) = server.handle_query(&query).await.unwrap();
	let matches = client.collect_matches(&result).unwrap();
	assert_eq!(matches, vec![0, 1]);

	let fetch_response = server.handle_fetch(token, &FetchRequest { indexes: matches }).await.unwrap();
	let revealed = client.reveal(&key, &nonce, &fetch_response).unwrap();

	assert_eq!(revealed[0].treatment, "Stop 1");
	assert_eq!(revealed[1].treatment, "Stop 7");
}

/// "Radius" profile (design notes §9): a row two years off the query's age
/// still matches when the query runs with `radius = 2`, and the standard
/// profile's exact-equality semantics are otherwise untouched.
#[tokio::test]
async fn radius_profile_matches_a_row_within_the_radius() {
	let client_ctx = mk_radius_ctx();
	let keygen = KeyGenerator::new(&client_ctx).unwrap();
	let public_key = keygen.create_public_key().unwrap();
	let relin_keys = keygen.create_relinearization_keys().unwrap();
	let encryptor = Encryptor::new(&client_ctx, &public_key).unwrap();
	let decryptor = Decryptor::new(&client_ctx, keygen.secret_key()).unwrap();
	let client_encoder = BFVEncoder::new(&client_ctx).unwrap();

	let store = RecordStore::new(vec![Record {
		name_sealed: String::new(),
		identity_sealed: identity_sealed(&encryptor, 42, Gender::Male),
		medicines: vec![1, 4, 5],
		side_effects: vec![2],
		treatment_sealed: String::new(),
	}]);

	let server_ctx = mk_radius_ctx();
	let server_evaluator = BFVEvaluator::new(&server_ctx).unwrap();
	let server_encoder = BFVEncoder::new(&server_ctx).unwrap();
	let server = ServerDriver::with_profile(
		store,
		server_ctx,
		server_evaluator,
		server_encoder,
		MatchProfile::Radius { radius: 2, relin_keys },
	);

	let client = ClientDriver::new(&encryptor, &decryptor, &client_encoder, &client_ctx);
	let query = client.build_query(40, Gender::Male, vec![1], vec![2]).unwrap();

	let (_token, result) = server.handle_query(&query).await.unwrap();
	let matches = client.collect_matches(&result).unwrap();

	assert_eq!(matches, vec![0]);
}
