#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Bindings to Microsoft SEAL, scoped to what a depth-1 BFV matching
//! protocol needs: batch-encoded plaintexts, public-key encryption,
//! ciphertext subtraction/multiplication-by-plaintext, and secret-key
//! decryption. Relinearization and Galois keys are exposed for the
//! higher-depth "radius" profile but most callers never touch them.
//!
//! # Notes
//! All types in this crate implement Sync/Send. So long as you never
//! dereference the internal handle on any type after it has been dropped,
//! these traits should safely hold. The internal handles should be of
//! little use to you anyways.
//!
//! This crate intentionally omits CKKS, batch-of-ciphertext helpers, and
//! the tensor extension present in some SEAL wrappers: only BFV is needed
//! here.

#![warn(missing_docs)]

#[cfg(not(target_arch = "wasm32"))]
extern crate link_cplusplus;

#[allow(dead_code)]
#[allow(non_camel_case_types)]
mod bindgen {
	use std::os::raw::c_long;

	include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

	pub const E_OK: c_long = 0x0;
	pub const E_POINTER: c_long = 0x80004003u32 as c_long;
	pub const E_INVALIDARG: c_long = 0x80070057u32 as c_long;
	pub const E_OUTOFMEMORY: c_long = 0x8007000Eu32 as c_long;
	pub const E_UNEXPECTED: c_long = 0x8000FFFFu32 as c_long;
	pub const COR_E_IO: c_long = 0x80131620u32 as c_long;
	pub const COR_E_INVALIDOPERATION: c_long = 0x80131509u32 as c_long;
}

mod ciphertext;
mod context;
mod decryptor;
mod encoder;
mod encryptor;
mod error;
mod evaluator;
mod key_generator;
mod memory;
mod modulus;
mod parameters;
mod plaintext;
mod serialization;

pub use ciphertext::Ciphertext;
pub use context::Context;
pub use decryptor::Decryptor;
pub use encoder::BFVEncoder;
pub use encryptor::Encryptor;
pub use error::{Error, Result};
pub use evaluator::BFVEvaluator;
pub use key_generator::{GaloisKeys, KeyGenerator, PublicKey, RelinearizationKeys, SecretKey};
pub use memory::MemoryPool;
pub use modulus::{CoefficientModulus, DegreeType, Modulus, PlainModulus, SecurityLevel};
pub use parameters::{BfvEncryptionParametersBuilder, EncryptionParameters, SchemeType};
pub use plaintext::Plaintext;
pub use serialization::CompressionType;

/// Converts an object into its serialized byte representation.
pub trait ToBytes {
	/// Returns the object as a byte array.
	fn as_bytes(&self) -> Result<Vec<u8>>;
}

/// Deserializes an object from a byte slice under a given SEAL context.
pub trait FromBytes {
	/// Deserialize an object from the given bytes using the given
	/// context.
	fn from_bytes(context: &Context, bytes: &[u8]) -> Result<Self>
	where
		Self: Sized;
}
