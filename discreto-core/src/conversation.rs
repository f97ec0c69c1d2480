use std::collections::HashMap;

use tokio::sync::Mutex;
use uuid::Uuid;

/// Per-conversation transient state: the candidate set produced by the
/// most recent `POST /query` in this conversation, awaiting its paired
/// fetch.
///
/// Replaces the source's process-global singleton (spec §9's redesign
/// flag): each conversation gets its own entry, keyed by a server-issued
/// opaque token, so concurrent clients never observe or clobber one
/// another's candidate set (spec §5).
#[derive(Default)]
pub struct Table {
	entries: Mutex<HashMap<Uuid, Vec<usize>>>,
}

impl Table {
	/// An empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a new conversation holding `candidate_set`, returning its
	/// token. Overwrites nothing — every call mints a fresh `Uuid`.
	pub async fn start(&self, candidate_set: Vec<usize>) -> Uuid {
		let token = Uuid::new_v4();
		self.entries.lock().await.insert(token, candidate_set);
		token
	}

	/// Takes and removes the candidate set for `token`, if a query is
	/// still awaiting its fetch. Removal happens unconditionally so a
	/// second fetch against the same token also sees `None` (spec §4.8,
	/// §8 P6).
	pub async fn take(&self, token: Uuid) -> Option<Vec<usize>> {
		self.entries.lock().await.remove(&token)
	}
}
