//! CLI client implementing spec §4.7 and the §6 CLI surface: builds an
//! identity ciphertext, queries a `discreto-server`, and reveals any
//! matching treatment records.

use std::time::Instant;

use clap::Parser;
use uuid::Uuid;

use discreto::{config::Config, dataset, keys};
use discreto_core::{ClientDriver, FetchRequest, QueryResult};
use discreto_crypto::Gender;
use discreto_seal::{
	BFVEncoder, BfvEncryptionParametersBuilder, CoefficientModulus, Context, Decryptor, Encryptor, PlainModulus,
	SecurityLevel,
};

const CONVERSATION_HEADER: &str = "x-discreto-conversation";

/// Query a discreto server for patients matching an age/gender/medicine
/// profile without revealing the age or gender in the clear.
#[derive(Parser, Debug)]
#[command(name = "discreto-client")]
struct Cli {
	/// Base URL of the server, e.g. https://host:port
	endpoint: String,

	/// Patient age, 1..=99
	#[arg(long)]
	age: u32,

	/// Patient gender
	#[arg(long, value_enum)]
	gender: CliGender,

	/// Comma-separated medicine IDs
	#[arg(long, value_delimiter = ',')]
	medicine_ids: Vec<u64>,

	/// Comma-separated side-effect IDs
	#[arg(long, value_delimiter = ',')]
	side_effect_ids: Vec<u64>,

	/// Write the result JSON here instead of stdout
	#[arg(long)]
	outfile: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CliGender {
	Male,
	Female,
}

impl From<CliGender> for Gender {
	fn from(g: CliGender) -> Self {
		match g {
			CliGender::Male => Gender::Male,
			CliGender::Female => Gender::Female,
		}
	}
}

fn build_context(profile: discreto::config::FheProfile) -> anyhow::Result<Context> {
	let degree = profile.degree();
	let params = BfvEncryptionParametersBuilder::new()
		.set_poly_modulus_degree(degree)
		.set_coefficient_modulus(CoefficientModulus::bfv_default(degree, SecurityLevel::TC128)?)
		.set_plain_modulus(PlainModulus::batching(degree, 20)?)
		.build()?;

	Ok(Context::new(&params, true, SecurityLevel::TC128)?)
}

fn main() -> anyhow::Result<()> {
	discreto::config::init_tracing();

	// S5: age/gender validation happens before any network I/O — clap
	// rejects an unparseable --gender outright, and build_query below
	// rejects an out-of-range age before the first request is sent.
	let cli = Cli::parse();

	let config = Config::from_env()?;
	let ctx = build_context(config.fhe_profile)?;
	let keypair = keys::load_or_generate(&ctx, &config.public_key_path, &config.secret_key_path)?;

	if config.fhe_profile == discreto::config::FheProfile::Radius {
		// Only the secret-key holder can derive these; the server only ever
		// loads what this run (or a prior one) leaves on disk.
		let relin_keys_path = config.relin_keys_path.as_deref().expect("checked by Config::from_env");
		keys::load_or_generate_relin_keys(&ctx, &keypair.secret_key, relin_keys_path)?;
	}

	let encryptor = Encryptor::new(&ctx, &keypair.public_key)?;
	let decryptor = Decryptor::new(&ctx, &keypair.secret_key)?;
	let encoder = BFVEncoder::new(&ctx)?;
	let driver = ClientDriver::new(&encryptor, &decryptor, &encoder, &ctx);

	let start = Instant::now();

	let query = driver.build_query(cli.age, cli.gender.into(), cli.medicine_ids.clone(), cli.side_effect_ids.clone())?;

	let http = reqwest::blocking::Client::builder().danger_accept_invalid_certs(true).build()?;

	let query_url = format!("{}/query", cli.endpoint.trim_end_matches('/'));
	let response = http.post(&query_url).json(&query).send()?.error_for_status()?;

	let token = response
		.headers()
		.get(CONVERSATION_HEADER)
		.and_then(|v| v.to_str().ok())
		.and_then(|v| Uuid::parse_str(v).ok());

	let result: QueryResult = response.json()?;

	let decrypt_start = Instant::now();
	let matches = driver.collect_matches(&result)?;
	eprintln!("[i] FHE decrypt completed after: {:.2?}", decrypt_start.elapsed());

	if matches.is_empty() {
		eprintln!("not found");
		eprintln!("[i] total wall time: {:.2?}", start.elapsed());
		std::process::exit(1);
	}

	let token = token.ok_or_else(|| anyhow::anyhow!("server omitted the conversation token"))?;
	let indexes_json = serde_json::to_string(&FetchRequest { indexes: matches })?;

	let mut get_url = reqwest::Url::parse(&query_url)?;
	get_url.query_pairs_mut().append_pair("indexes", &indexes_json);

	let fetch_response = http
		.get(get_url)
		.header(CONVERSATION_HEADER, token.to_string())
		.send()?
		.error_for_status()?
		.json()?;

	let revealed = driver.reveal(&dataset::DEMO_KEY, &dataset::DEMO_NONCE, &fetch_response)?;

	let output = serde_json::to_string_pretty(&revealed_to_json(&revealed))?;
	match &cli.outfile {
		Some(path) => std::fs::write(path, output)?,
		None => println!("{output}"),
	}

	eprintln!("[i] total wall time: {:.2?}", start.elapsed());
	Ok(())
}

fn revealed_to_json(revealed: &[discreto_core::RevealedRecord]) -> serde_json::Value {
	serde_json::Value::Array(
		revealed
			.iter()
			.map(|r| {
				serde_json::json!({
					"medicines": r.medicines,
					"side_effects": r.side_effects,
					"treatment": r.treatment,
				})
			})
			.collect(),
	)
}
