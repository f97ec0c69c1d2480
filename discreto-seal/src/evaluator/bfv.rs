use std::ffi::c_void;
use std::ptr::null_mut;

use crate::bindgen;
use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::error::{try_seal, Result};
use crate::key_generator::RelinearizationKeys;
use crate::plaintext::Plaintext;

/// Homomorphic arithmetic on BFV ciphertexts.
///
/// The default match path only needs [`sub`](Self::sub) and
/// [`multiply_plain`](Self::multiply_plain): subtract a candidate's token
/// ciphertext from the query ciphertext, then multiply by a randomization
/// plaintext so a non-match decrypts to noise instead of a telltale zero
/// pattern. [`multiply`](Self::multiply)/[`relinearize`](Self::relinearize)
/// only come into play for the higher-depth "radius" profile.
pub struct BFVEvaluator {
	handle: *mut c_void,
}

unsafe impl Sync for BFVEvaluator {}
unsafe impl Send for BFVEvaluator {}

impl BFVEvaluator {
	/// Creates an evaluator bound to the given context.
	pub fn new(ctx: &Context) -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::Evaluator_Create(ctx.get_handle(), &mut handle) })?;

		Ok(Self { handle })
	}

	/// `a - b`, as a new ciphertext.
	pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
		let out = Ciphertext::new()?;

		try_seal!(unsafe { bindgen::Evaluator_Sub(self.handle, a.get_handle(), b.get_handle(), out.get_handle()) })?;

		Ok(out)
	}

	/// `a - b`, written back into `a`.
	pub fn sub_inplace(&self, a: &mut Ciphertext, b: &Ciphertext) -> Result<()> {
		try_seal!(unsafe { bindgen::Evaluator_Sub(self.handle, a.get_handle(), b.get_handle(), a.get_handle()) })
	}

	/// `a + b`, as a new ciphertext.
	pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
		let out = Ciphertext::new()?;

		try_seal!(unsafe { bindgen::Evaluator_Add(self.handle, a.get_handle(), b.get_handle(), out.get_handle()) })?;

		Ok(out)
	}

	/// Multiplies two ciphertexts together. Grows the result to degree 3;
	/// call [`relinearize`](Self::relinearize) afterwards before any
	/// further multiplication. Used only by the "radius" profile.
	pub fn multiply(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
		let out = Ciphertext::new()?;

		try_seal!(unsafe {
			bindgen::Evaluator_Multiply(self.handle, a.get_handle(), b.get_handle(), out.get_handle(), null_mut())
		})?;

		Ok(out)
	}

	/// Multiplies two ciphertexts together in place. See [`multiply`](Self::multiply).
	pub fn multiply_inplace(&self, a: &mut Ciphertext, b: &Ciphertext) -> Result<()> {
		try_seal!(unsafe {
			bindgen::Evaluator_Multiply(self.handle, a.get_handle(), b.get_handle(), a.get_handle(), null_mut())
		})
	}

	/// `a * b` where `b` is a plaintext, as a new ciphertext. Does not
	/// increase the ciphertext's polynomial count, so no relinearization
	/// is needed afterwards.
	pub fn multiply_plain(&self, a: &Ciphertext, b: &Plaintext) -> Result<Ciphertext> {
		let out = Ciphertext::new()?;

		try_seal!(unsafe {
			bindgen::Evaluator_MultiplyPlain(self.handle, a.get_handle(), b.get_handle(), out.get_handle(), null_mut())
		})?;

		Ok(out)
	}

	/// `a * b` where `b` is a plaintext, written back into `a`.
	pub fn multiply_plain_inplace(&self, a: &mut Ciphertext, b: &Plaintext) -> Result<()> {
		try_seal!(unsafe {
			bindgen::Evaluator_MultiplyPlain(self.handle, a.get_handle(), b.get_handle(), a.get_handle(), null_mut())
		})
	}

	/// `a + b` where `b` is a plaintext, as a new ciphertext.
	pub fn add_plain(&self, a: &Ciphertext, b: &Plaintext) -> Result<Ciphertext> {
		let out = Ciphertext::new()?;

		try_seal!(unsafe {
			bindgen::Evaluator_AddPlain(self.handle, a.get_handle(), b.get_handle(), out.get_handle())
		})?;

		Ok(out)
	}

	/// `a - b` where `b` is a plaintext, as a new ciphertext.
	pub fn sub_plain(&self, a: &Ciphertext, b: &Plaintext) -> Result<Ciphertext> {
		let out = Ciphertext::new()?;

		try_seal!(unsafe {
			bindgen::Evaluator_SubPlain(self.handle, a.get_handle(), b.get_handle(), out.get_handle())
		})?;

		Ok(out)
	}

	/// Relinearizes a ciphertext back down to two polynomials after a
	/// ciphertext-ciphertext multiplication.
	pub fn relinearize(&self, a: &Ciphertext, relin_keys: &RelinearizationKeys) -> Result<Ciphertext> {
		let out = Ciphertext::new()?;

		try_seal!(unsafe {
			bindgen::Evaluator_Relinearize(
				self.handle,
				a.get_handle(),
				relin_keys.get_handle(),
				out.get_handle(),
				null_mut(),
			)
		})?;

		Ok(out)
	}

	/// Relinearizes a ciphertext in place. See [`relinearize`](Self::relinearize).
	pub fn relinearize_inplace(&self, a: &mut Ciphertext, relin_keys: &RelinearizationKeys) -> Result<()> {
		try_seal!(unsafe {
			bindgen::Evaluator_Relinearize(
				self.handle,
				a.get_handle(),
				relin_keys.get_handle(),
				a.get_handle(),
				null_mut(),
			)
		})
	}
}

impl Drop for BFVEvaluator {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::Evaluator_Destroy(self.handle) })
			.expect("internal error in BFVEvaluator::drop()");
	}
}

#[cfg(test)]
mod tests {
	use crate::{
		BFVEncoder, BFVEvaluator, BfvEncryptionParametersBuilder, CoefficientModulus, Context,
		Decryptor, DegreeType, Encryptor, KeyGenerator, PlainModulus, SecurityLevel,
	};

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
	fn sub_then_multiply_plain_zeroes_on_match() {
		let ctx = mk_ctx();
		let keygen = KeyGenerator::new(&ctx).unwrap();
		let public_key = keygen.create_public_key().unwrap();

		let encoder = BFVEncoder::new(&ctx).unwrap();
		let encryptor = Encryptor::new(&ctx, &public_key).unwrap();
		let decryptor = Decryptor::new(&ctx, keygen.secret_key()).unwrap();
		let evaluator = BFVEvaluator::new(&ctx).unwrap();

		let slots = encoder.get_slot_count();
		let query = encoder.encode_u64(&vec![42u64; slots]).unwrap();
		let token = encoder.encode_u64(&vec![42u64; slots]).unwrap();
		let mask = encoder.encode_u64(&vec![7u64; slots]).unwrap();

		let ct_query = encryptor.encrypt(&query).unwrap();
		let ct_token = encryptor.encrypt(&token).unwrap();

		let diff = evaluator.sub(&ct_query, &ct_token).unwrap();
		let masked = evaluator.multiply_plain(&diff, &mask).unwrap();

		let decrypted = decryptor.decrypt(&masked).unwrap();
		let values = encoder.decode_u64(&decrypted).unwrap();

		assert!(values.iter().all(|v| *v == 0));
	}
}
