/// Errors returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A SEAL operation failed while deriving, encrypting, or evaluating
	/// an identity token.
	#[error("SEAL operation failed: {0}")]
	Seal(#[from] discreto_seal::Error),

	/// `age` fell outside the valid `[1, 99]` range for token derivation.
	#[error("age {0} is out of the valid range 1..=99")]
	AgeOutOfRange(u32),

	/// A hex-encoded field (ciphertext or payload) failed to decode.
	#[error("invalid hex encoding: {0}")]
	Hex(#[from] hex::FromHexError),

	/// A sealed payload's length was not a multiple of the cipher's
	/// block-independent stream, or otherwise malformed.
	#[error("malformed sealed payload")]
	MalformedPayload,
}

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
