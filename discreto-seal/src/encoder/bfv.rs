use std::ffi::c_void;
use std::ptr::null_mut;
use std::sync::atomic::{AtomicPtr, Ordering};

use crate::bindgen;
use crate::context::Context;
use crate::error::{try_seal, Result};
use crate::plaintext::Plaintext;

/// CRT batch encoder. If the polynomial modulus degree is `N` and the
/// plaintext modulus `T` is congruent to 1 modulo `2N`, this views a
/// plaintext as a `2`-by-`(N/2)` matrix of integers modulo `T`: a "slot"
/// vector. Homomorphic operations apply coefficient-wise across slots,
/// which is what lets this system stack one candidate's match bit per
/// slot and clear them all with a single ciphertext-plaintext
/// multiplication.
///
/// Requires encryption parameters built with
/// [`PlainModulus::batching`](crate::PlainModulus::batching).
pub struct BFVEncoder {
	handle: AtomicPtr<c_void>,
}

unsafe impl Sync for BFVEncoder {}
unsafe impl Send for BFVEncoder {}

impl BFVEncoder {
	/// Creates an encoder for the given context. The context's plaintext
	/// modulus must have been chosen with batching enabled.
	pub fn new(ctx: &Context) -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::BatchEncoder_Create(ctx.get_handle(), &mut handle) })?;

		Ok(Self {
			handle: AtomicPtr::new(handle),
		})
	}

	fn get_handle(&self) -> *mut c_void {
		self.handle.load(Ordering::SeqCst)
	}

	/// The number of slots a plaintext this encoder produces holds. Equal
	/// to the polynomial modulus degree.
	pub fn get_slot_count(&self) -> usize {
		let mut count: u64 = 0;

		try_seal!(unsafe { bindgen::BatchEncoder_GetSlotCount(self.get_handle(), &mut count) })
			.expect("internal error in BFVEncoder::get_slot_count()");

		count as usize
	}

	/// Batches a vector of unsigned integers, one per slot, into a single
	/// plaintext. `data.len()` must be at most [`get_slot_count`](Self::get_slot_count).
	pub fn encode_u64(&self, data: &[u64]) -> Result<Plaintext> {
		let plaintext = Plaintext::new()?;

		try_seal!(unsafe {
			bindgen::BatchEncoder_Encode1(
				self.get_handle(),
				data.len() as u64,
				data.as_ptr() as *mut u64,
				plaintext.get_handle(),
			)
		})?;

		Ok(plaintext)
	}

	/// Inverse of [`encode_u64`](Self::encode_u64).
	pub fn decode_u64(&self, plaintext: &Plaintext) -> Result<Vec<u64>> {
		let mut data = Vec::with_capacity(self.get_slot_count());
		let data_ptr = data.as_mut_ptr();
		let mut size: u64 = 0;

		try_seal!(unsafe {
			bindgen::BatchEncoder_Decode1(self.get_handle(), plaintext.get_handle(), &mut size, data_ptr, null_mut())
		})?;

		if data.capacity() < size as usize {
			panic!("allocation overflow in BFVEncoder::decode_u64()");
		}

		unsafe { data.set_len(size as usize) };

		Ok(data)
	}

	/// Batches a vector of signed integers, one per slot, into a single
	/// plaintext.
	pub fn encode_i64(&self, data: &[i64]) -> Result<Plaintext> {
		let plaintext = Plaintext::new()?;

		try_seal!(unsafe {
			bindgen::BatchEncoder_Encode2(
				self.get_handle(),
				data.len() as u64,
				data.as_ptr() as *mut i64,
				plaintext.get_handle(),
			)
		})?;

		Ok(plaintext)
	}

	/// Inverse of [`encode_i64`](Self::encode_i64).
	pub fn decode_i64(&self, plaintext: &Plaintext) -> Result<Vec<i64>> {
		let mut data = Vec::with_capacity(self.get_slot_count());
		let data_ptr = data.as_mut_ptr();
		let mut size: u64 = 0;

		try_seal!(unsafe {
			bindgen::BatchEncoder_Decode2(self.get_handle(), plaintext.get_handle(), &mut size, data_ptr, null_mut())
		})?;

		if data.capacity() < size as usize {
			panic!("allocation overflow in BFVEncoder::decode_i64()");
		}

		unsafe { data.set_len(size as usize) };

		Ok(data)
	}
}

impl Drop for BFVEncoder {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::BatchEncoder_Destroy(self.get_handle()) })
			.expect("internal error in BFVEncoder::drop()");
	}
}

#[cfg(test)]
mod tests {
	use crate::{
		BfvEncryptionParametersBuilder, CoefficientModulus, Context, DegreeType, PlainModulus,
		SecurityLevel,
	};

	use super::*;

	fn mk_ctx() -> Context {
		let params = BfvEncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D4096)
			.set_coefficient_modulus(
				CoefficientModulus::bfv_default(DegreeType::D4096, SecurityLevel::TC128).unwrap(),
			)
			.set_plain_modulus(PlainModulus::batching(DegreeType::D4096, 20).unwrap())
			.build()
			.unwrap();

		Context::new(&params, true, SecurityLevel::TC128).unwrap()
	}

	#[test]
	fn can_get_slots_bfv_encoder() {
		let ctx = mk_ctx();
		let encoder = BFVEncoder::new(&ctx).unwrap();

		assert_eq!(encoder.get_slot_count(), 4096);
	}

	#[test]
	fn vector_encoder_can_encode_decode_unsigned() {
		let ctx = mk_ctx();
		let encoder = BFVEncoder::new(&ctx).unwrap();

		let data: Vec<u64> = (0..encoder.get_slot_count() as u64).collect();

		let plaintext = encoder.encode_u64(&data).unwrap();
		let decoded = encoder.decode_u64(&plaintext).unwrap();

		assert_eq!(data, decoded);
	}

	#[test]
	fn scalar_encoder_can_encode_decode_signed() {
		let ctx = mk_ctx();
		let encoder = BFVEncoder::new(&ctx).unwrap();

		let encoded = encoder.encode_i64(&[-15i64]).unwrap();
		let decoded = encoder.decode_i64(&encoded).unwrap();

		assert_eq!(decoded[0], -15);
	}
}
