use crate::record_store::RecordStore;
use crate::wire::Query;

/// Runs the cleartext set-membership prefilter (spec §4.3) and returns the
/// candidate set: the indices of every row whose medicines intersect
/// `query.medicines` AND whose side effects intersect `query.side_effects`,
/// in [`RecordStore`] order.
///
/// `O(N · (|M|+|S|))` — each row's membership test is a pair of hash-set
/// intersections against the (small) query sets, not the other way
/// around, since the query sets are rebuilt once and reused across all N
/// rows.
pub fn run(store: &RecordStore, query: &Query) -> Vec<usize> {
	let medicines: std::collections::HashSet<u64> = query.medicines.iter().copied().collect();
	let side_effects: std::collections::HashSet<u64> = query.side_effects.iter().copied().collect();

	(0..store.len())
		.filter(|&i| {
			let record = store.get(i).expect("index within store.len()");
			!record.medicines_set().is_disjoint(&medicines) && !record.side_effects_set().is_disjoint(&side_effects)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::record_store::Record;

	fn record(medicines: &[u64], side_effects: &[u64]) -> Record {
		Record {
			name_sealed: String::new(),
			identity_sealed: String::new(),
			medicines: medicines.to_vec(),
			side_effects: side_effects.to_vec(),
			treatment_sealed: String::new(),
		}
	}

	#[test]
	fn keeps_rows_with_both_intersections() {
		let store = RecordStore::new(vec![
			record(&[1, 4, 5], &[2]),
			record(&[9], &[2]),
			record(&[1], &[9]),
		]);
		let query = Query {
			medicines: vec![1, 2],
			side_effects: vec![2],
			encrypted_m: String::new(),
		};

		assert_eq!(run(&store, &query), vec![0]);
	}

	#[test]
	fn no_medicine_overlap_yields_empty_candidate_set() {
		let store = RecordStore::new(vec![record(&[1], &[2])]);
		let query = Query {
			medicines: vec![999],
			side_effects: vec![2],
			encrypted_m: String::new(),
		};

		assert!(run(&store, &query).is_empty());
	}

	#[test]
	fn preserves_store_order() {
		let store = RecordStore::new(vec![
			record(&[1], &[2]),
			record(&[1], &[2]),
			record(&[9], &[9]),
			record(&[1], &[2]),
		]);
		let query = Query {
			medicines: vec![1],
			side_effects: vec![2],
			encrypted_m: String::new(),
		};

		assert_eq!(run(&store, &query), vec![0, 1, 3]);
	}
}
