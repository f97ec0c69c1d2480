use discreto_seal::{BFVEvaluator, Ciphertext, Plaintext, RelinearizationKeys};

use crate::error::Result;

/// Builds `2*radius + 1` shifted copies of a query identity ciphertext:
/// `radius` copies shifted down by 1..=radius, the ciphertext itself, and
/// `radius` copies shifted up by 1..=radius. Each shift is one
/// `sub_plain`/`add_plain` against the plaintext literal `1`, chained from
/// the previous shift so the whole batch costs `2*radius` plaintext
/// operations, no ciphertext-ciphertext work yet.
///
/// Used by the "radius" match profile (§9 of the design notes): a query
/// matches a row if the row's token falls within `radius` of the query's,
/// rather than requiring exact equality.
pub fn prepare_shifted(evaluator: &BFVEvaluator, query_ct: &Ciphertext, radius: u32) -> Result<Vec<Ciphertext>> {
	let one = Plaintext::from_hex_string("1")?;
	let mut shifted = Vec::with_capacity(2 * radius as usize + 1);

	let mut down = query_ct.clone();
	for _ in 0..radius {
		down = evaluator.sub_plain(&down, &one)?;
		shifted.push(down.clone());
	}

	shifted.push(query_ct.clone());

	let mut up = query_ct.clone();
	for _ in 0..radius {
		up = evaluator.add_plain(&up, &one)?;
		shifted.push(up.clone());
	}

	Ok(shifted)
}

/// Evaluates the radius match expression for one candidate row: subtracts
/// the row's token ciphertext from every shifted query ciphertext, then
/// multiplies every one of those differences together and relinearizes.
///
/// Slot 0 of the result decrypts to 0 iff the row's token equals the
/// query's token shifted by some `k` with `|k| <= radius` — i.e. the row
/// falls within the radius of the query. This is a ciphertext-ciphertext
/// product of depth greater than 1, which is why the radius profile
/// requires relinearization keys and a larger polynomial modulus degree
/// (spec's FHE Context invariant on depth-1 arithmetic).
pub fn evaluate_radius(
	evaluator: &BFVEvaluator,
	relin_keys: &RelinearizationKeys,
	shifted: &[Ciphertext],
	ct_r: &Ciphertext,
) -> Result<Ciphertext> {
	let mut diffs = shifted.iter().map(|ct| evaluator.sub(ct, ct_r));
	let mut result = diffs.next().expect("prepare_shifted never returns an empty vector")?;

	for diff in diffs {
		let diff = diff?;
		evaluator.multiply_inplace(&mut result, &diff)?;
		evaluator.relinearize_inplace(&mut result, relin_keys)?;
	}

	Ok(result)
}
