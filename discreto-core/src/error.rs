use thiserror::Error;

/// Errors the protocol layer can surface. Each variant is named after the
/// failure class in the error-handling design, not after where it happens
/// to be raised.
#[derive(Error, Debug)]
pub enum Error {
	/// The query body failed to parse, or an embedded hex/ciphertext field
	/// was malformed.
	#[error("malformed query: {0}")]
	MalformedQuery(String),

	/// A fetch index fell outside the current candidate set.
	#[error("index {index} out of range for candidate set of size {len}")]
	IndexOutOfRange {
		/// The offending index.
		index: usize,
		/// The candidate set's length at the time of the fetch.
		len: usize,
	},

	/// A GET fetch arrived with no preceding POST in the conversation, or
	/// arrived twice.
	#[error("no active conversation")]
	NoActiveConversation,

	/// A lower layer (FHE context, identity-token derivation) failed.
	#[error(transparent)]
	Crypto(#[from] discreto_crypto::Error),

	/// Loading or parsing a JSON snapshot failed.
	#[error("snapshot I/O: {0}")]
	Snapshot(#[from] std::io::Error),

	/// Snapshot JSON did not match the expected record shape.
	#[error("snapshot decode: {0}")]
	SnapshotDecode(#[from] serde_json::Error),
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;
