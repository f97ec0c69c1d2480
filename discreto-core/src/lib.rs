//! Record storage, the cleartext prefilter, the query/fetch wire codec,
//! and both protocol drivers for the homomorphic lookup service.
//!
//! Built on [`discreto_crypto`] for every token/ciphertext operation; this
//! crate adds the record model, the prefilter, and the state machines
//! either side of the protocol runs, but performs no FHE arithmetic of its
//! own.

mod client;
mod conversation;
mod error;
mod prefilter;
mod record_store;
mod server;
mod wire;

pub use client::{ClientDriver, RevealedRecord};
pub use conversation::Table as ConversationTable;
pub use error::{Error, Result};
pub use prefilter::run as prefilter;
pub use record_store::{PublicRecord, Record, RecordStore};
pub use server::{MatchProfile, ServerDriver};
pub use wire::{FetchRequest, FetchResponse, FetchedRecord, Query, QueryResult};
