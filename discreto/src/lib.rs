//! Shared setup for the `discreto-server` and `discreto-client` binaries:
//! environment configuration, dataset provisioning, and BFV key
//! provisioning. The protocol logic itself lives in `discreto-core` and
//! `discreto-crypto`; this crate only wires it up to a process.

pub mod config;
pub mod dataset;
pub mod keys;
