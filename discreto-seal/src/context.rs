use std::ffi::{c_int, c_void};
use std::ptr::null_mut;

use crate::bindgen;
use crate::error::{try_seal, Result};
use crate::modulus::SecurityLevel;
use crate::parameters::EncryptionParameters;

/// Validates a set of [`EncryptionParameters`] and precomputes the data SEAL
/// needs to operate on them: the key and data context data, NTT tables, and
/// (for BFV) the plaintext-to-ciphertext scaling factor.
pub struct Context {
	pub(crate) handle: *mut c_void,
}

unsafe impl Sync for Context {}
unsafe impl Send for Context {}

impl Context {
	/// Validates `params` and builds the derived context SEAL needs for
	/// every later operation. `security_level` should be
	/// [`SecurityLevel::TC128`] outside of tests.
	pub fn new(
		params: &EncryptionParameters,
		expand_mod_chain: bool,
		security_level: SecurityLevel,
	) -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe {
			bindgen::SEALContext_Create(
				params.get_handle(),
				expand_mod_chain,
				security_level as c_int,
				&mut handle,
			)
		})?;

		Ok(Self { handle })
	}

	/// Builds a context without enforcing a security level. Only meant for
	/// tests that use toy parameters too small to meet any standard.
	#[cfg(feature = "insecure-params")]
	pub fn new_insecure(params: &EncryptionParameters, expand_mod_chain: bool) -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe {
			bindgen::SEALContext_Create(params.get_handle(), expand_mod_chain, 0, &mut handle)
		})?;

		Ok(Self { handle })
	}

	pub(crate) fn get_handle(&self) -> *mut c_void {
		self.handle
	}
}

impl Drop for Context {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::SEALContext_Destroy(self.handle) })
			.expect("internal error in Context::drop()");
	}
}

#[cfg(test)]
mod tests {
	use crate::{
		BfvEncryptionParametersBuilder, CoefficientModulus, Context, DegreeType, PlainModulus,
		SecurityLevel,
	};

	#[test]
	fn can_create_and_drop_context() {
		let params = BfvEncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D4096)
			.set_coefficient_modulus(
				CoefficientModulus::bfv_default(DegreeType::D4096, SecurityLevel::TC128).unwrap(),
			)
			.set_plain_modulus(PlainModulus::batching(DegreeType::D4096, 20).unwrap())
			.build()
			.unwrap();

		let ctx = Context::new(&params, true, SecurityLevel::TC128).unwrap();

		std::mem::drop(ctx);
	}
}
