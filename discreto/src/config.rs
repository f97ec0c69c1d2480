use std::net::SocketAddr;

/// The two BFV parameter profiles spec.md §9 describes. Selected once at
/// startup via `DISCRETO_FHE_PROFILE`; nothing downstream re-checks it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FheProfile {
	/// Degree 4096, depth-1 match test. The default.
	Standard,
	/// Degree 8192, ciphertext-ciphertext multiplication with
	/// relinearization, accepting any row within a fixed radius of the
	/// query's token.
	Radius,
}

impl FheProfile {
	fn parse(s: &str) -> anyhow::Result<Self> {
		match s {
			"standard" => Ok(FheProfile::Standard),
			"radius" => Ok(FheProfile::Radius),
			other => anyhow::bail!("DISCRETO_FHE_PROFILE must be 'standard' or 'radius', got '{other}'"),
		}
	}

	/// The polynomial modulus degree this profile runs at.
	pub fn degree(self) -> discreto_seal::DegreeType {
		match self {
			FheProfile::Standard => discreto_seal::DegreeType::D4096,
			FheProfile::Radius => discreto_seal::DegreeType::D8192,
		}
	}
}

/// Optional TLS material for the server; present only if both environment
/// variables are set (spec §6: TLS is optional but supported).
#[derive(Debug, Clone)]
pub struct TlsConfig {
	/// Path to the PEM certificate chain.
	pub cert_path: String,
	/// Path to the PEM private key.
	pub key_path: String,
}

/// Every environment-derived setting this system reads, collected once at
/// process start (spec §12). Nothing re-reads the environment mid-run.
#[derive(Debug, Clone)]
pub struct Config {
	/// Address the server binds to.
	pub bind_addr: SocketAddr,
	/// Path to the dataset snapshot (or where to write a freshly seeded
	/// one).
	pub dataset_path: String,
	/// Path to the client's/server's public key.
	pub public_key_path: String,
	/// Path to the client's secret key. The server never reads this.
	pub secret_key_path: String,
	/// TLS material, if configured.
	pub tls: Option<TlsConfig>,
	/// Which BFV parameter profile to run.
	pub fhe_profile: FheProfile,
	/// Path to the relinearization keys, required only when `fhe_profile`
	/// is [`FheProfile::Radius`].
	pub relin_keys_path: Option<String>,
}

fn env_or(name: &str, default: &str) -> String {
	std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
	/// Reads every `DISCRETO_*` variable, applying the defaults spec §12
	/// documents. Fails fast if `DISCRETO_FHE_PROFILE=radius` is set
	/// without a relinearization-keys path, since the profile cannot
	/// function without them.
	pub fn from_env() -> anyhow::Result<Self> {
		let bind_addr = env_or("DISCRETO_BIND_ADDR", "127.0.0.1:8443").parse()?;
		let dataset_path = env_or("DISCRETO_DATASET_PATH", "./dataset.json");
		let public_key_path = env_or("DISCRETO_PUBLIC_KEY_PATH", "./public_key.bin");
		let secret_key_path = env_or("DISCRETO_SECRET_KEY_PATH", "./secret_key.bin");

		let tls = match (std::env::var("DISCRETO_TLS_CERT_PATH"), std::env::var("DISCRETO_TLS_KEY_PATH")) {
			(Ok(cert_path), Ok(key_path)) => Some(TlsConfig { cert_path, key_path }),
			_ => None,
		};

		let fhe_profile = FheProfile::parse(&env_or("DISCRETO_FHE_PROFILE", "standard"))?;
		let relin_keys_path = std::env::var("DISCRETO_RELIN_KEYS_PATH").ok();

		if fhe_profile == FheProfile::Radius && relin_keys_path.is_none() {
			anyhow::bail!("DISCRETO_FHE_PROFILE=radius requires DISCRETO_RELIN_KEYS_PATH");
		}

		Ok(Self { bind_addr, dataset_path, public_key_path, secret_key_path, tls, fhe_profile, relin_keys_path })
	}
}

/// Installs a `tracing-subscriber` formatter driven by `RUST_LOG`
/// (default `info`), the way `citadel-api`'s binaries do it.
pub fn init_tracing() {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
	tracing_subscriber::fmt().with_env_filter(filter).init();
}
