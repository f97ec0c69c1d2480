//! Wire types for the query/fetch exchange (spec §4.6). One file per
//! message group, hand-written `serde` structs in place of generated
//! protocol-buffer types, since this system's contract is HTTP/JSON.

/// Query request body.
pub mod query;

/// Match-evaluator response body.
pub mod result;

/// Fetch request/response bodies.
pub mod fetch;

pub use fetch::{FetchRequest, FetchResponse, FetchedRecord};
pub use query::Query;
pub use result::QueryResult;
