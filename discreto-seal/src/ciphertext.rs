use std::ffi::c_void;
use std::fmt::Debug;
use std::ptr::null_mut;
use std::sync::atomic::{AtomicPtr, Ordering};

use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use crate::bindgen;
use crate::context::Context;
use crate::error::{try_seal, Result};
use crate::serialization::CompressionType;
use crate::{FromBytes, ToBytes};

/// An encrypted [`Plaintext`](crate::Plaintext). Opaque apart from its size
/// and the arithmetic [`BFVEvaluator`](crate::BFVEvaluator) performs on it.
pub struct Ciphertext {
	handle: AtomicPtr<c_void>,
}

unsafe impl Sync for Ciphertext {}
unsafe impl Send for Ciphertext {}

impl Ciphertext {
	pub(crate) fn get_handle(&self) -> *mut c_void {
		self.handle.load(Ordering::SeqCst)
	}

	/// Constructs an empty ciphertext allocating no memory. Most callers
	/// want [`BFVEvaluator`](crate::BFVEvaluator) or
	/// [`Encryptor::encrypt`](crate::Encryptor::encrypt) to fill one in
	/// rather than constructing one directly.
	pub fn new() -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::Ciphertext_Create1(null_mut(), &mut handle) })?;

		Ok(Self {
			handle: AtomicPtr::new(handle),
		})
	}

	/// The number of polynomials this ciphertext holds. A freshly encrypted
	/// ciphertext has size 2; multiplying two ciphertexts together (not
	/// used by this system's depth-1 match path) grows it further.
	pub fn size(&self) -> usize {
		let mut size: u64 = 0;

		try_seal!(unsafe { bindgen::Ciphertext_Size(self.get_handle(), &mut size) })
			.expect("internal error in Ciphertext::size()");

		size as usize
	}
}

impl Debug for Ciphertext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Ciphertext").field("handle", &self.handle).finish()
	}
}

impl Clone for Ciphertext {
	fn clone(&self) -> Self {
		let mut copy = null_mut();

		try_seal!(unsafe { bindgen::Ciphertext_Create2(self.get_handle(), &mut copy) })
			.expect("internal error copying Ciphertext");

		Self {
			handle: AtomicPtr::new(copy),
		}
	}
}

impl Serialize for Ciphertext {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let bytes = self
			.as_bytes()
			.map_err(|e| S::Error::custom(format!("failed to serialize ciphertext: {e}")))?;

		serializer.serialize_bytes(&bytes)
	}
}

impl FromBytes for Ciphertext {
	fn from_bytes(context: &Context, data: &[u8]) -> Result<Self> {
		let mut bytes_read = 0;

		let ciphertext = Ciphertext::new()?;

		try_seal!(unsafe {
			bindgen::Ciphertext_Load(
				ciphertext.get_handle(),
				context.get_handle(),
				data.as_ptr() as *mut u8,
				data.len() as u64,
				&mut bytes_read,
			)
		})?;

		Ok(ciphertext)
	}
}

impl ToBytes for Ciphertext {
	fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut num_bytes: i64 = 0;

		try_seal!(unsafe {
			bindgen::Ciphertext_SaveSize(self.get_handle(), CompressionType::ZStd as u8, &mut num_bytes)
		})?;

		let mut data: Vec<u8> = Vec::with_capacity(num_bytes as usize);
		let mut bytes_written: i64 = 0;

		try_seal!(unsafe {
			bindgen::Ciphertext_Save(
				self.get_handle(),
				data.as_mut_ptr(),
				num_bytes as u64,
				CompressionType::ZStd as u8,
				&mut bytes_written,
			)
		})?;

		unsafe { data.set_len(bytes_written as usize) };

		Ok(data)
	}
}

impl Drop for Ciphertext {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::Ciphertext_Destroy(self.get_handle()) })
			.expect("internal error in Ciphertext::drop()");
	}
}
