//! Benchmarks the match evaluator's per-candidate cost: a ciphertext
//! subtraction, a fresh randomizer draw and encode, and a
//! ciphertext-plaintext multiplication.

use criterion::{criterion_group, criterion_main, Criterion};
use discreto_crypto::{encrypt_token, evaluate};
use discreto_seal::{
	BFVEncoder, BFVEvaluator, BfvEncryptionParametersBuilder, CoefficientModulus, Context,
	DegreeType, Encryptor, KeyGenerator, PlainModulus, SecurityLevel,
};

fn bench_evaluate(c: &mut Criterion) {
	let params = BfvEncryptionParametersBuilder::new()
		.set_poly_modulus_degree(DegreeType::D4096)
		.set_coefficient_modulus(CoefficientModulus::bfv_default(DegreeType::D4096, SecurityLevel::TC128).unwrap())
		.set_plain_modulus(PlainModulus::batching(DegreeType::D4096, 20).unwrap())
		.build()
		.unwrap();

	let ctx = Context::new(&params, true, SecurityLevel::TC128).unwrap();
	let keygen = KeyGenerator::new(&ctx).unwrap();
	let public_key = keygen.create_public_key().unwrap();

	let encoder = BFVEncoder::new(&ctx).unwrap();
	let encryptor = Encryptor::new(&ctx, &public_key).unwrap();
	let evaluator = BFVEvaluator::new(&ctx).unwrap();

	let ct_q = encrypt_token(&encryptor, 45).unwrap();
	let ct_r = encrypt_token(&encryptor, 46).unwrap();

	c.bench_function("match_evaluate", |b| {
		b.iter(|| {
			let y = evaluate(&evaluator, &encoder, &ct_q, &ct_r).unwrap();
			criterion::black_box(y);
		});
	});
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
