use std::ffi::c_void;
use std::mem::forget;
use std::ptr::null_mut;

use crate::bindgen;
use crate::error::{try_seal, Result};
use crate::modulus::{DegreeType, Modulus};

mod bfv;
pub use bfv::BfvEncryptionParametersBuilder;

/// The FHE scheme an [`EncryptionParameters`] instance configures. This
/// system uses `Bfv` exclusively (spec.md §4.1).
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SchemeType {
	/// Brakerski/Fan-Vercauteren scheme.
	Bfv = 0x1,
}

/// An immutable set of validated encryption parameters. Build one with
/// [`BfvEncryptionParametersBuilder`].
pub struct EncryptionParameters {
	pub(crate) handle: *mut c_void,
}

unsafe impl Sync for EncryptionParameters {}
unsafe impl Send for EncryptionParameters {}

pub(crate) enum CoefficientModulusType {
	NotSet,
	Modulus(Vec<Modulus>),
}

pub(crate) enum PlainModulusType {
	NotSet,
	Modulus(Modulus),
}

impl EncryptionParameters {
	fn new(scheme: SchemeType) -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::EncParams_Create1(scheme as u8, &mut handle) })?;

		Ok(Self { handle })
	}

	pub(crate) fn get_handle(&self) -> *mut c_void {
		self.handle
	}

	fn set_poly_modulus_degree(&mut self, degree: DegreeType) -> Result<()> {
		try_seal!(unsafe { bindgen::EncParams_SetPolyModulusDegree(self.handle, degree.value()) })
	}

	fn set_coefficient_modulus(&mut self, modulus: &[Modulus]) -> Result<()> {
		let handles: Vec<*mut c_void> = modulus.iter().map(|m| m.get_handle()).collect();

		try_seal!(unsafe {
			bindgen::EncParams_SetCoeffModulus(
				self.handle,
				handles.len() as u64,
				handles.as_ptr() as *mut *mut c_void,
			)
		})
	}

	fn set_plain_modulus(&mut self, modulus: &Modulus) -> Result<()> {
		try_seal!(unsafe { bindgen::EncParams_SetPlainModulus2(self.handle, modulus.get_handle()) })
	}

	/// The polynomial modulus degree these parameters were built with.
	pub fn get_poly_modulus_degree(&self) -> u64 {
		let mut degree: u64 = 0;

		try_seal!(unsafe { bindgen::EncParams_GetPolyModulusDegree(self.handle, &mut degree) })
			.expect("internal error in EncryptionParameters::get_poly_modulus_degree()");

		degree
	}

	/// The plaintext modulus these parameters were built with.
	pub fn get_plain_modulus(&self) -> Modulus {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::EncParams_GetPlainModulus(self.handle, &mut handle) })
			.expect("internal error in EncryptionParameters::get_plain_modulus()");

		let borrowed = unsafe { Modulus::unchecked_from_handle(handle) };
		let owned = borrowed.clone();
		forget(borrowed);
		owned
	}
}

impl Drop for EncryptionParameters {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::EncParams_Destroy(self.handle) })
			.expect("internal error in EncryptionParameters::drop()");
	}
}
