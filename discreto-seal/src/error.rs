use std::os::raw::c_long;

/// Errors returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// SEAL reported a null handle where one was expected.
	#[error("SEAL returned an invalid (null) handle")]
	InvalidPointer,

	/// SEAL was given a parameter it rejected.
	#[error("invalid argument passed to SEAL")]
	InvalidArgument,

	/// SEAL ran out of memory while performing an operation.
	#[error("SEAL ran out of memory")]
	OutOfMemory,

	/// SEAL reported an I/O failure, generally while (de)serializing.
	#[error("SEAL I/O failure")]
	Io,

	/// SEAL rejected the current operation given its current state.
	#[error("invalid operation for the current SEAL object state")]
	InvalidOperation,

	/// A parameter builder was asked to `build()` without a required field set.
	#[error("coefficient modulus was not set")]
	CoefficientModulusNotSet,

	/// A parameter builder was asked to `build()` without a required field set.
	#[error("plain modulus was not set")]
	PlainModulusNotSet,

	/// An unrecognized status code came back from the native library.
	#[error("SEAL returned an unrecognized status code: {0:#x}")]
	Unexpected(c_long),
}

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Translates a SEAL native status code into a [`Result`].
pub(crate) fn convert_seal_error(status: c_long) -> Result<()> {
	match status {
		s if s == crate::bindgen::E_OK => Ok(()),
		s if s == crate::bindgen::E_POINTER => Err(Error::InvalidPointer),
		s if s == crate::bindgen::E_INVALIDARG => Err(Error::InvalidArgument),
		s if s == crate::bindgen::E_OUTOFMEMORY => Err(Error::OutOfMemory),
		s if s == crate::bindgen::COR_E_IO => Err(Error::Io),
		s if s == crate::bindgen::COR_E_INVALIDOPERATION => Err(Error::InvalidOperation),
		s => Err(Error::Unexpected(s)),
	}
}

/// Runs a SEAL FFI call and converts its `c_long` status into a [`Result`].
macro_rules! try_seal {
	($call:expr) => {
		$crate::error::convert_seal_error($call)
	};
}

pub(crate) use try_seal;
