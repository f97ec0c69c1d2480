use core::hash::Hash;
use std::ffi::{c_void, CString};
use std::fmt::Debug;
use std::ptr::null_mut;
use std::sync::atomic::{AtomicPtr, Ordering};

use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use crate::bindgen;
use crate::context::Context;
use crate::error::{try_seal, Result};
use crate::memory::MemoryPool;
use crate::serialization::CompressionType;
use crate::{FromBytes, ToBytes};

/// A polynomial with coefficients modulo the plaintext modulus: the
/// unencrypted, batch-encoded form a message takes before encryption and
/// after decryption.
///
/// The degree of the plaintext polynomial is one less than the polynomial
/// modulus degree. The backing array allocates one 64-bit word per
/// coefficient.
pub struct Plaintext {
	handle: AtomicPtr<c_void>,
}

impl Plaintext {
	pub(crate) fn get_handle(&self) -> *mut c_void {
		self.handle.load(Ordering::SeqCst)
	}

	/// Constructs an empty plaintext allocating no memory.
	pub fn new() -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::Plaintext_Create1(null_mut(), &mut handle) })?;

		Ok(Self {
			handle: AtomicPtr::new(handle),
		})
	}

	/// Constructs an empty plaintext allocated from the given memory pool.
	pub fn new_with_pool(memory: &MemoryPool) -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::Plaintext_Create1(memory.get_handle(), &mut handle) })?;

		Ok(Self {
			handle: AtomicPtr::new(handle),
		})
	}

	/// Constructs a plaintext from a hexadecimal polynomial string, e.g.
	/// `"1234x^2 + 4321"`. Identity tokens in this system are encoded this
	/// way: a single-term constant hex literal, no `x^n` part.
	///
	/// # Panics
	/// Panics if `hex_str` contains an interior null byte.
	pub fn from_hex_string(hex_str: &str) -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		let hex_string = CString::new(hex_str).expect("hex_str must not contain a null byte");

		try_seal!(unsafe {
			bindgen::Plaintext_Create4(hex_string.as_ptr() as *mut u8, null_mut(), &mut handle)
		})?;

		Ok(Self {
			handle: AtomicPtr::new(handle),
		})
	}

	/// Gets the coefficient at the given location, ordered from lowest to
	/// highest degree.
	///
	/// # Panics
	/// Panics if `index >= self.len()`.
	pub fn get_coefficient(&self, index: usize) -> u64 {
		let mut coeff: u64 = 0;

		if index >= self.len() {
			panic!("index {} out of bounds {}", index, self.len());
		}

		try_seal!(unsafe { bindgen::Plaintext_CoeffAt(self.get_handle(), index as u64, &mut coeff) })
			.expect("internal error in Plaintext::get_coefficient()");

		coeff
	}

	/// Sets the coefficient at the given location.
	///
	/// # Panics
	/// Panics if `index >= self.len()`.
	pub fn set_coefficient(&mut self, index: usize, value: u64) {
		if index >= self.len() {
			panic!("index {} out of bounds {}", index, self.len());
		}

		try_seal!(unsafe { bindgen::Plaintext_SetCoeffAt(self.get_handle(), index as u64, value) })
			.expect("internal error in Plaintext::set_coefficient()");
	}

	/// Resizes the backing coefficient array to hold `count` coefficients.
	pub fn resize(&mut self, count: usize) {
		try_seal!(unsafe { bindgen::Plaintext_Resize(self.get_handle(), count as u64) })
			.expect("internal error in Plaintext::resize()");
	}

	/// The number of coefficients this plaintext holds.
	pub fn len(&self) -> usize {
		let mut size: u64 = 0;

		try_seal!(unsafe { bindgen::Plaintext_CoeffCount(self.get_handle(), &mut size) })
			.expect("internal error in Plaintext::len()");

		size as usize
	}

	/// Returns `true` if this plaintext holds no coefficients.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns whether this plaintext is in NTT form. Should always be
	/// `false` for BFV plaintexts before encryption.
	pub fn is_ntt_form(&self) -> bool {
		let mut result = false;

		try_seal!(unsafe { bindgen::Plaintext_IsNTTForm(self.get_handle(), &mut result) })
			.expect("internal error in Plaintext::is_ntt_form()");

		result
	}
}

impl Debug for Plaintext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Plaintext").field("handle", &self.handle).finish()
	}
}

impl Clone for Plaintext {
	fn clone(&self) -> Self {
		let mut copy = null_mut();

		try_seal!(unsafe { bindgen::Plaintext_Create5(self.get_handle(), &mut copy) })
			.expect("internal error copying Plaintext");

		Self {
			handle: AtomicPtr::new(copy),
		}
	}
}

impl AsRef<Plaintext> for Plaintext {
	fn as_ref(&self) -> &Self {
		self
	}
}

impl PartialEq for Plaintext {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && (0..self.len()).all(|i| self.get_coefficient(i) == other.get_coefficient(i))
	}
}

impl Hash for Plaintext {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		for i in 0..self.len() {
			state.write_u64(self.get_coefficient(i));
		}
	}
}

impl Serialize for Plaintext {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let bytes = self
			.as_bytes()
			.map_err(|e| S::Error::custom(format!("failed to serialize plaintext: {e}")))?;

		serializer.serialize_bytes(&bytes)
	}
}

impl FromBytes for Plaintext {
	fn from_bytes(context: &Context, data: &[u8]) -> Result<Self> {
		let mut bytes_read = 0;

		let plaintext = Plaintext::new()?;

		try_seal!(unsafe {
			bindgen::Plaintext_Load(
				plaintext.get_handle(),
				context.get_handle(),
				data.as_ptr() as *mut u8,
				data.len() as u64,
				&mut bytes_read,
			)
		})?;

		Ok(plaintext)
	}
}

impl ToBytes for Plaintext {
	fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut num_bytes: i64 = 0;

		try_seal!(unsafe {
			bindgen::Plaintext_SaveSize(self.get_handle(), CompressionType::ZStd as u8, &mut num_bytes)
		})?;

		let mut data: Vec<u8> = Vec::with_capacity(num_bytes as usize);
		let mut bytes_written: i64 = 0;

		try_seal!(unsafe {
			bindgen::Plaintext_Save(
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

impl Drop for Plaintext {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::Plaintext_Destroy(self.get_handle()) })
			.expect("internal error in Plaintext::drop()");
	}
}
