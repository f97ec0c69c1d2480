use std::ffi::c_void;
use std::ptr::null_mut;

use crate::bindgen;
use crate::error::{try_seal, Result};

/// A handle to a SEAL memory pool.
///
/// Heavily incomplete — this crate lets SEAL use its global memory pool for
/// everything except the handful of call sites that accept one explicitly.
pub struct MemoryPool {
	pub(crate) handle: *mut c_void,
}

unsafe impl Sync for MemoryPool {}
unsafe impl Send for MemoryPool {}

impl MemoryPool {
	/// Creates a new thread-safe memory pool.
	pub fn new() -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::MemoryPoolHandle_New(true, &mut handle) })?;

		Ok(Self { handle })
	}

	pub(crate) fn get_handle(&self) -> *mut c_void {
		self.handle
	}
}

impl Drop for MemoryPool {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::MemoryPoolHandle_Destroy(self.handle) })
			.expect("internal error in MemoryPool::drop()");
	}
}
