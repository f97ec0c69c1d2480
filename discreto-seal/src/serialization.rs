/// The compression applied to a SEAL object's serialized form.
#[allow(unused)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum CompressionType {
	/// No compression.
	None = 0,
	/// zlib compression.
	ZLib = 1,
	/// zstd compression. What this crate uses when saving to bytes.
	ZStd = 2,
}
