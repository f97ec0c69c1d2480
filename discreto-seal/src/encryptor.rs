use std::ffi::c_void;
use std::ptr::null_mut;

use crate::bindgen;
use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::error::{try_seal, Result};
use crate::key_generator::PublicKey;
use crate::plaintext::Plaintext;

/// Encrypts [`Plaintext`]s into [`Ciphertext`]s under a public key.
///
/// The resulting ciphertext's encryption parameters correspond to the
/// highest (data) level of the modulus switching chain.
pub struct Encryptor {
	handle: *mut c_void,
}

unsafe impl Sync for Encryptor {}
unsafe impl Send for Encryptor {}

impl Encryptor {
	/// Creates an encryptor for the given context's public key.
	pub fn new(ctx: &Context, public_key: &PublicKey) -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe {
			bindgen::Encryptor_Create(
				ctx.get_handle(),
				public_key.get_handle(),
				null_mut(),
				&mut handle,
			)
		})?;

		Ok(Self { handle })
	}

	/// Encrypts `plaintext` with the public key this encryptor was built
	/// from.
	pub fn encrypt(&self, plaintext: &Plaintext) -> Result<Ciphertext> {
		let ciphertext = Ciphertext::new()?;

		try_seal!(unsafe {
			bindgen::Encryptor_Encrypt(self.handle, plaintext.get_handle(), ciphertext.get_handle(), null_mut())
		})?;

		Ok(ciphertext)
	}
}

impl Drop for Encryptor {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::Encryptor_Destroy(self.handle) })
			.expect("internal error in Encryptor::drop()");
	}
}
