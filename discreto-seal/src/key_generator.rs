use std::ffi::c_void;
use std::ptr::null_mut;

use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use crate::bindgen;
use crate::context::Context;
use crate::error::{try_seal, Result};
use crate::serialization::CompressionType;
use crate::{FromBytes, ToBytes};

/// An asymmetric public key, used by [`Encryptor`](crate::Encryptor) to
/// encrypt messages that only the matching [`SecretKey`] can decrypt.
pub struct PublicKey {
	handle: *mut c_void,
}

unsafe impl Sync for PublicKey {}
unsafe impl Send for PublicKey {}

impl PublicKey {
	fn new() -> Result<Self> {
		let mut handle: *mut c_void = null_mut();
		try_seal!(unsafe { bindgen::PublicKey_Create1(&mut handle) })?;
		Ok(Self { handle })
	}

	pub(crate) fn get_handle(&self) -> *mut c_void {
		self.handle
	}
}

impl ToBytes for PublicKey {
	fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut num_bytes: i64 = 0;

		try_seal!(unsafe {
			bindgen::PublicKey_SaveSize(self.handle, CompressionType::ZStd as u8, &mut num_bytes)
		})?;

		let mut data: Vec<u8> = Vec::with_capacity(num_bytes as usize);
		let mut bytes_written: i64 = 0;

		try_seal!(unsafe {
			bindgen::PublicKey_Save(
				self.handle,
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

impl FromBytes for PublicKey {
	fn from_bytes(context: &Context, data: &[u8]) -> Result<Self> {
		let key = PublicKey::new()?;
		let mut bytes_read = 0;

		try_seal!(unsafe {
			bindgen::PublicKey_Load(
				key.handle,
				context.get_handle(),
				data.as_ptr() as *mut u8,
				data.len() as u64,
				&mut bytes_read,
			)
		})?;

		Ok(key)
	}
}

impl Serialize for PublicKey {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let bytes = self
			.as_bytes()
			.map_err(|e| S::Error::custom(format!("failed to serialize public key: {e}")))?;
		serializer.serialize_bytes(&bytes)
	}
}

impl Drop for PublicKey {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::PublicKey_Destroy(self.handle) })
			.expect("internal error in PublicKey::drop()");
	}
}

/// A secret key, used by [`Decryptor`](crate::Decryptor) and by
/// [`Encryptor`] for symmetric encryption. Never leaves the party that
/// generated it.
pub struct SecretKey {
	handle: *mut c_void,
}

unsafe impl Sync for SecretKey {}
unsafe impl Send for SecretKey {}

impl SecretKey {
	fn new() -> Result<Self> {
		let mut handle: *mut c_void = null_mut();
		try_seal!(unsafe { bindgen::SecretKey_Create1(&mut handle) })?;
		Ok(Self { handle })
	}

	pub(crate) fn get_handle(&self) -> *mut c_void {
		self.handle
	}
}

impl ToBytes for SecretKey {
	fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut num_bytes: i64 = 0;

		try_seal!(unsafe {
			bindgen::SecretKey_SaveSize(self.handle, CompressionType::ZStd as u8, &mut num_bytes)
		})?;

		let mut data: Vec<u8> = Vec::with_capacity(num_bytes as usize);
		let mut bytes_written: i64 = 0;

		try_seal!(unsafe {
			bindgen::SecretKey_Save(
				self.handle,
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

impl FromBytes for SecretKey {
	fn from_bytes(context: &Context, data: &[u8]) -> Result<Self> {
		let key = SecretKey::new()?;
		let mut bytes_read = 0;

		try_seal!(unsafe {
			bindgen::SecretKey_Load(
				key.handle,
				context.get_handle(),
				data.as_ptr() as *mut u8,
				data.len() as u64,
				&mut bytes_read,
			)
		})?;

		Ok(key)
	}
}

impl Drop for SecretKey {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::SecretKey_Destroy(self.handle) })
			.expect("internal error in SecretKey::drop()");
	}
}

/// Relinearization keys, letting the evaluator collapse a degree-2
/// ciphertext product back down to the usual degree-2 form after a
/// ciphertext-ciphertext multiplication. Only the "radius" profile needs
/// these; the default depth-1 match path never multiplies two ciphertexts
/// together.
pub struct RelinearizationKeys {
	handle: *mut c_void,
}

unsafe impl Sync for RelinearizationKeys {}
unsafe impl Send for RelinearizationKeys {}

impl RelinearizationKeys {
	fn new() -> Result<Self> {
		let mut handle: *mut c_void = null_mut();
		try_seal!(unsafe { bindgen::KSwitchKeys_Create1(&mut handle) })?;
		Ok(Self { handle })
	}

	pub(crate) fn get_handle(&self) -> *mut c_void {
		self.handle
	}
}

impl ToBytes for RelinearizationKeys {
	fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut num_bytes: i64 = 0;

		try_seal!(unsafe {
			bindgen::RelinKeys_SaveSize(self.handle, CompressionType::ZStd as u8, &mut num_bytes)
		})?;

		let mut data: Vec<u8> = Vec::with_capacity(num_bytes as usize);
		let mut bytes_written: i64 = 0;

		try_seal!(unsafe {
			bindgen::RelinKeys_Save(
				self.handle,
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

impl FromBytes for RelinearizationKeys {
	fn from_bytes(context: &Context, data: &[u8]) -> Result<Self> {
		let keys = RelinearizationKeys::new()?;
		let mut bytes_read = 0;

		try_seal!(unsafe {
			bindgen::RelinKeys_Load(
				keys.handle,
				context.get_handle(),
				data.as_ptr() as *mut u8,
				data.len() as u64,
				&mut bytes_read,
			)
		})?;

		Ok(keys)
	}
}

impl Drop for RelinearizationKeys {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::KSwitchKeys_Destroy(self.handle) })
			.expect("internal error in RelinearizationKeys::drop()");
	}
}

/// Galois keys, needed for `rotate_rows`/`rotate_columns` on a batched
/// ciphertext. Unused by this system today but kept alongside
/// [`RelinearizationKeys`] for parity with the rest of the key set.
pub struct GaloisKeys {
	handle: *mut c_void,
}

unsafe impl Sync for GaloisKeys {}
unsafe impl Send for GaloisKeys {}

impl GaloisKeys {
	fn new() -> Result<Self> {
		let mut handle: *mut c_void = null_mut();
		try_seal!(unsafe { bindgen::KSwitchKeys_Create1(&mut handle) })?;
		Ok(Self { handle })
	}

	pub(crate) fn get_handle(&self) -> *mut c_void {
		self.handle
	}
}

impl Drop for GaloisKeys {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::KSwitchKeys_Destroy(self.handle) })
			.expect("internal error in GaloisKeys::drop()");
	}
}

/// Generates the key material for a [`Context`]: a secret key plus the
/// derived public key, and on request the relinearization/Galois keys the
/// "radius" profile needs.
pub struct KeyGenerator {
	handle: *mut c_void,
	secret_key: SecretKey,
}

unsafe impl Sync for KeyGenerator {}
unsafe impl Send for KeyGenerator {}

impl KeyGenerator {
	/// Creates a key generator that samples a fresh secret key.
	pub fn new(context: &Context) -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::KeyGenerator_Create1(context.get_handle(), &mut handle) })?;

		let mut secret_key_handle: *mut c_void = null_mut();
		try_seal!(unsafe { bindgen::KeyGenerator_SecretKey(handle, &mut secret_key_handle) })?;

		Ok(Self {
			handle,
			secret_key: SecretKey {
				handle: secret_key_handle,
			},
		})
	}

	/// Creates a key generator from an already-generated secret key,
	/// letting a client re-derive its public key after loading its secret
	/// key from disk.
	pub fn new_from_secret_key(context: &Context, secret_key: SecretKey) -> Result<Self> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe {
			bindgen::KeyGenerator_Create2(context.get_handle(), secret_key.get_handle(), &mut handle)
		})?;

		Ok(Self { handle, secret_key })
	}

	/// The secret key this generator holds.
	pub fn secret_key(&self) -> &SecretKey {
		&self.secret_key
	}

	/// Derives the public key matching this generator's secret key.
	pub fn create_public_key(&self) -> Result<PublicKey> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe { bindgen::KeyGenerator_CreatePublicKey(self.handle, false, &mut handle) })?;

		Ok(PublicKey { handle })
	}

	/// Derives relinearization keys for the "radius" profile's
	/// ciphertext-ciphertext multiplications.
	pub fn create_relinearization_keys(&self) -> Result<RelinearizationKeys> {
		let mut handle: *mut c_void = null_mut();

		try_seal!(unsafe {
			bindgen::KeyGenerator_CreateRelinKeys(self.handle, false, &mut handle)
		})?;

		Ok(RelinearizationKeys { handle })
	}
}

impl Drop for KeyGenerator {
	fn drop(&mut self) {
		try_seal!(unsafe { bindgen::KeyGenerator_Destroy(self.handle) })
			.expect("internal error in KeyGenerator::drop()");
	}
}
