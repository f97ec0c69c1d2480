use discreto_seal::{Context, FromBytes, KeyGenerator, PublicKey, RelinearizationKeys, SecretKey, ToBytes};

/// A BFV keypair as held by the client (spec §3's lifecycle note: the
/// secret key is generated once by the client and persisted; the client
/// is the sole holder of it).
pub struct Keypair {
	/// Derives ciphertexts only the matching [`SecretKey`] can decrypt.
	pub public_key: PublicKey,
	/// Never leaves this process.
	pub secret_key: SecretKey,
}

/// Loads a keypair from `public_key_path`/`secret_key_path` if both
/// files exist, otherwise generates a fresh one and writes it there.
pub fn load_or_generate(ctx: &Context, public_key_path: &str, secret_key_path: &str) -> anyhow::Result<Keypair> {
	let both_exist = std::path::Path::new(public_key_path).exists() && std::path::Path::new(secret_key_path).exists();

	if both_exist {
		tracing::info!(public_key_path, secret_key_path, "loading BFV keypair");
		let public_key = PublicKey::from_bytes(ctx, &std::fs::read(public_key_path)?)?;
		let secret_key = SecretKey::from_bytes(ctx, &std::fs::read(secret_key_path)?)?;
		return Ok(Keypair { public_key, secret_key });
	}

	tracing::warn!(public_key_path, secret_key_path, "no BFV keypair found, generating a fresh one");
	let keygen = KeyGenerator::new(ctx)?;
	let public_key = keygen.create_public_key()?;
	let secret_key_bytes = keygen.secret_key().as_bytes()?;
	let public_key_bytes = public_key.as_bytes()?;

	std::fs::write(public_key_path, &public_key_bytes)?;
	std::fs::write(secret_key_path, &secret_key_bytes)?;

	let secret_key = SecretKey::from_bytes(ctx, &secret_key_bytes)?;
	Ok(Keypair { public_key, secret_key })
}

/// Loads only the public key, for the server role (which never touches
/// the secret key — it only re-derives ciphertexts' identity context).
pub fn load_public_key(ctx: &Context, public_key_path: &str) -> anyhow::Result<PublicKey> {
	Ok(PublicKey::from_bytes(ctx, &std::fs::read(public_key_path)?)?)
}

/// Loads the relinearization keys a radius-profile query needs, or
/// generates and persists a fresh set derived from `secret_key` if none
/// exist yet. Only the secret-key holder (the client role) can take the
/// generating path; `secret_key` is reserialized into a throwaway copy
/// because [`KeyGenerator::new_from_secret_key`] consumes its argument.
pub fn load_or_generate_relin_keys(
	ctx: &Context,
	secret_key: &SecretKey,
	relin_keys_path: &str,
) -> anyhow::Result<RelinearizationKeys> {
	if std::path::Path::new(relin_keys_path).exists() {
		tracing::info!(relin_keys_path, "loading relinearization keys");
		return Ok(RelinearizationKeys::from_bytes(ctx, &std::fs::read(relin_keys_path)?)?);
	}

	tracing::warn!(relin_keys_path, "no relinearization keys found, generating fresh ones");
	let secret_copy = SecretKey::from_bytes(ctx, &secret_key.as_bytes()?)?;
	let keygen = KeyGenerator::new_from_secret_key(ctx, secret_copy)?;
	let relin_keys = keygen.create_relinearization_keys()?;

	std::fs::write(relin_keys_path, relin_keys.as_bytes()?)?;
	Ok(relin_keys)
}

/// Loads relinearization keys the server role never generates itself (it
/// holds no secret key); fails if `relin_keys_path` doesn't exist.
pub fn load_relin_keys(ctx: &Context, relin_keys_path: &str) -> anyhow::Result<RelinearizationKeys> {
	Ok(RelinearizationKeys::from_bytes(ctx, &std::fs::read(relin_keys_path)?)?)
}
