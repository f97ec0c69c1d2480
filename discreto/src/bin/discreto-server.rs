//! HTTP server implementing spec §4.8's state machine: `POST /query` runs
//! the prefilter and match evaluator and opens a conversation;
//! `GET /query?indexes=<json>` serves the paired fetch and closes it.

use std::sync::Arc;

use axum::extract::{Query as QueryParams, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use discreto::{config::Config, dataset, keys};
use discreto_core::{Error as CoreError, FetchRequest, MatchProfile, Query, ServerDriver};
use discreto_seal::{
	BFVEncoder, BFVEvaluator, BfvEncryptionParametersBuilder, CoefficientModulus, Context, Encryptor, PlainModulus,
	SecurityLevel,
};

const CONVERSATION_HEADER: &str = "x-discreto-conversation";

struct AppError(CoreError);

impl From<CoreError> for AppError {
	fn from(err: CoreError) -> Self {
		AppError(err)
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		let status = match &self.0 {
			CoreError::MalformedQuery(_) | CoreError::IndexOutOfRange { .. } | CoreError::NoActiveConversation => {
				StatusCode::BAD_REQUEST
			}
			CoreError::Crypto(_) | CoreError::Snapshot(_) | CoreError::SnapshotDecode(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		};

		tracing::warn!(error = %self.0, %status, "request rejected");
		(status, self.0.to_string()).into_response()
	}
}

#[derive(Deserialize)]
struct IndexesQuery {
	indexes: String,
}

async fn post_query(State(server): State<Arc<ServerDriver>>, Json(query): Json<Query>) -> Result<Response, AppError> {
	let (token, result) = server.handle_query(&query).await?;

	let mut headers = HeaderMap::new();
	headers.insert(
		HeaderName::from_static(CONVERSATION_HEADER),
		HeaderValue::from_str(&token.to_string()).expect("uuid renders as a valid header value"),
	);

	Ok((headers, Json(result)).into_response())
}

async fn get_query(
	State(server): State<Arc<ServerDriver>>,
	headers: HeaderMap,
	QueryParams(params): QueryParams<IndexesQuery>,
) -> Result<Response, AppError> {
	let token = headers
		.get(CONVERSATION_HEADER)
		.and_then(|v| v.to_str().ok())
		.and_then(|v| Uuid::parse_str(v).ok())
		.ok_or(CoreError::NoActiveConversation)?;

	let request: FetchRequest =
		serde_json::from_str(&params.indexes).map_err(|e| CoreError::MalformedQuery(format!("indexes: {e}")))?;

	let response = server.handle_fetch(token, &request).await?;
	Ok(Json(response).into_response())
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

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	discreto::config::init_tracing();
	let config = Config::from_env()?;

	let ctx = build_context(config.fhe_profile)?;
	let public_key = keys::load_public_key(&ctx, &config.public_key_path)?;
	let encryptor = Encryptor::new(&ctx, &public_key)?;

	let store = dataset::load_or_seed(&config.dataset_path, &encryptor, &dataset::DEMO_KEY, &dataset::DEMO_NONCE)?;

	let evaluator = BFVEvaluator::new(&ctx)?;
	let encoder = BFVEncoder::new(&ctx)?;

	let match_profile = match config.fhe_profile {
		discreto::config::FheProfile::Standard => MatchProfile::Standard,
		discreto::config::FheProfile::Radius => {
			let relin_keys_path = config.relin_keys_path.as_deref().expect("checked by Config::from_env");
			let relin_keys = keys::load_relin_keys(&ctx, relin_keys_path)?;
			// Matches the radius the original prototype's demo query used.
			MatchProfile::Radius { radius: 2, relin_keys }
		}
	};

	let server = Arc::new(ServerDriver::with_profile(store, ctx, evaluator, encoder, match_profile));

	let app = Router::new().route("/query", get(get_query).post(post_query)).with_state(server);

	tracing::info!(bind_addr = %config.bind_addr, "starting discreto-server");

	match &config.tls {
		Some(tls) => {
			let rustls_config =
				axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;
			axum_server::bind_rustls(config.bind_addr, rustls_config).serve(app.into_make_service()).await?;
		}
		None => {
			let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
			axum::serve(listener, app).await?;
		}
	}

	Ok(())
}
