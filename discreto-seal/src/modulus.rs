use std::ffi::c_void;
use std::ptr::null_mut;

use crate::bindgen;
use crate::error::{try_seal, Result};

/// The polynomial modulus degree. Only the degrees this system's two FHE
/// profiles need are exposed (spec.md §9: `D4096` for the default depth-1
/// profile, `D8192` for the "radius" extension).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DegreeType {
	/// N = 4096 — the standard, depth-1 match-test profile.
	D4096,
	/// N = 8192 — the "radius" profile; requires relinearization keys.
	D8192,
}

impl DegreeType {
	pub(crate) fn value(self) -> u64 {
		match self {
			DegreeType::D4096 => 4096,
			DegreeType::D8192 => 8192,
		}
	}
}

/// The security level to enforce when validating encryption parameters,
/// per the HomomorphicEncryption.org standard.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
pub enum SecurityLevel {
	/// No security enforcement — for testing only.
	None = 0,
	/// 128-bit classical security.
	TC128 = 128,
	/// 192-bit classical security.
	TC192 = 192,
	/// 256-bit classical security.
	TC256 = 256,
}

impl Default for SecurityLevel {
	fn default() -> Self {
		SecurityLevel::TC128
	}
}

/// A single prime modulus, as used in a coefficient modulus chain or as a
/// plaintext modulus.
pub struct Modulus {
	pub(crate) handle: *mut c_void,
}

unsafe impl Sync for Modulus {}
unsafe impl Send for Modulus {}

impl Modulus {
	/// Wraps a handle SEAL has already allocated (used when reading a
	/// modulus back out of `EncryptionParameters`).
	pub(crate) unsafe fn unchecked_from_handle(handle: *mut c_void) -> Self {
		Self { handle }
	}

	pub(crate) fn get_handle(&self) -> *mut c_void {
		self.handle
	}

	/// Creates a modulus from a raw value. Prefer
	/// [`CoefficientModulus::bfv_default`]/[`PlainModulus::batching`] unless
	/// you have a specific prime in mind.
	pub fn new(value: u64) -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::Modulus_Create1(value, &mut handle) })?;

		Ok(Self { handle })
	}

	/// Returns this modulus's value.
	pub fn value(&self) -> u64 {
		let mut value: u64 = 0;

		try_seal!(unsafe { bindgen::Modulus_Value(self.handle, &mut value) })
			.expect("internal error in Modulus::value()");

		value
	}
}

impl Clone for Modulus {
	fn clone(&self) -> Self {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::Modulus_Create2(self.handle, &mut handle) })
			.expect("internal error in Modulus::clone()");

		Self { handle }
	}
}

impl Drop for Modulus {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::Modulus_Destroy(self.handle) })
			.expect("internal error in Modulus::drop()");
	}
}

/// Factory for coefficient modulus chains.
pub struct CoefficientModulus;

impl CoefficientModulus {
	/// The library-default coefficient modulus chain for the given degree at
	/// the given security level. This is what spec.md §4.1 means by "the
	/// library default chain ... at 128-bit classical security".
	pub fn bfv_default(degree: DegreeType, security_level: SecurityLevel) -> Result<Vec<Modulus>> {
		let mut len: u64 = 0;

		try_seal!(unsafe {
			bindgen::CoeffModulus_BFVDefault(degree.value(), security_level as i32, &mut len, null_mut())
		})?;

		let mut handles: Vec<*mut c_void> = vec![null_mut(); len as usize];

		try_seal!(unsafe {
			bindgen::CoeffModulus_BFVDefault(
				degree.value(),
				security_level as i32,
				&mut len,
				handles.as_mut_ptr(),
			)
		})?;

		Ok(handles
			.into_iter()
			.map(|h| unsafe { Modulus::unchecked_from_handle(h) })
			.collect())
	}

	/// Builds a custom coefficient modulus chain from the given bit sizes.
	/// Only used by the "radius" profile's relinearization setup.
	pub fn create(degree: DegreeType, bit_sizes: &[i32]) -> Result<Vec<Modulus>> {
		let mut handles: Vec<*mut c_void> = vec![null_mut(); bit_sizes.len()];

		try_seal!(unsafe {
			bindgen::CoeffModulus_Create(
				degree.value(),
				bit_sizes.len() as u64,
				bit_sizes.as_ptr() as *mut i32,
				handles.as_mut_ptr(),
			)
		})?;

		Ok(handles
			.into_iter()
			.map(|h| unsafe { Modulus::unchecked_from_handle(h) })
			.collect())
	}
}

/// Factory for plaintext moduli.
pub struct PlainModulus;

impl PlainModulus {
	/// A plaintext modulus that enables batching with the given number of
	/// bits of slot width. spec.md §4.1 asks for "a prime enabling batching
	/// with 20-bit plaintext slots", i.e. `PlainModulus::batching(degree, 20)`.
	pub fn batching(degree: DegreeType, bit_size: i32) -> Result<Modulus> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe {
			bindgen::PlainModulus_Batching(degree.value(), bit_size, &mut handle)
		})?;

		Ok(unsafe { Modulus::unchecked_from_handle(handle) })
	}
}
