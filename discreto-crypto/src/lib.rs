//! Identity-token derivation, the BFV match expression, and the symmetric
//! cipher used to seal patient names and treatments at rest.
//!
//! Built on [`discreto_seal`] for every ciphertext/plaintext operation;
//! this crate adds no FFI of its own.

mod error;
mod matcher;
mod radius;
mod seal;
mod token;

pub use error::{Error, Result};
pub use matcher::evaluate;
pub use radius::{evaluate_radius, prepare_shifted};
pub use seal::{from_hex, seal, to_hex, unseal, Key, Nonce};
pub use token::{decrypt_token, derive, encode_vector, encrypt_token, Gender};
