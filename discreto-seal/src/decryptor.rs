use std::ffi::c_void;
use std::ptr::null_mut;
use std::sync::atomic::{AtomicPtr, Ordering};

use crate::bindgen;
use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::error::{try_seal, Result};
use crate::key_generator::SecretKey;
use crate::plaintext::Plaintext;

/// Decrypts [`Ciphertext`]s into [`Plaintext`]s using a [`SecretKey`], and
/// reports the remaining invariant noise budget of a ciphertext.
pub struct Decryptor {
	handle: AtomicPtr<c_void>,
}

impl Decryptor {
	/// Creates a decryptor for the given context's secret key.
	pub fn new(ctx: &Context, secret_key: &SecretKey) -> Result<Self> {
		let mut handle = null_mut();

		try_seal!(unsafe {
			bindgen::Decryptor_Create(ctx.get_handle(), secret_key.get_handle(), &mut handle)
		})?;

		Ok(Self {
			handle: AtomicPtr::new(handle),
		})
	}

	fn get_handle(&self) -> *mut c_void {
		self.handle.load(Ordering::SeqCst)
	}

	/// Decrypts `ciphertext`.
	pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Plaintext> {
		let plaintext = Plaintext::new()?;

		try_seal!(unsafe {
			bindgen::Decryptor_Decrypt(self.get_handle(), ciphertext.get_handle(), plaintext.get_handle())
		})?;

		Ok(plaintext)
	}

	/// The remaining invariant noise budget of `ciphertext`, in bits. Zero
	/// means decryption is no longer guaranteed to be correct.
	pub fn invariant_noise_budget(&self, ciphertext: &Ciphertext) -> Result<u32> {
		let mut noise: i32 = 0;

		try_seal!(unsafe {
			bindgen::Decryptor_InvariantNoiseBudget(self.get_handle(), ciphertext.get_handle(), &mut noise)
		})?;

		Ok(noise as u32)
	}
}

impl Drop for Decryptor {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::Decryptor_Destroy(self.get_handle()) })
			.expect("internal error in Decryptor::drop()");
	}
}
