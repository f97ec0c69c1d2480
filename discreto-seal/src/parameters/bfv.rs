use crate::error::{Error, Result};
use crate::modulus::{DegreeType, Modulus};

use super::{CoefficientModulusType, EncryptionParameters, PlainModulusType, SchemeType};

/// Fluent builder for BFV [`EncryptionParameters`].
///
/// ```
/// use discreto_seal::{
///     BfvEncryptionParametersBuilder, CoefficientModulus, DegreeType, PlainModulus,
///     SecurityLevel,
/// };
///
/// let params = BfvEncryptionParametersBuilder::new()
///     .set_poly_modulus_degree(DegreeType::D4096)
///     .set_coefficient_modulus(
///         CoefficientModulus::bfv_default(DegreeType::D4096, SecurityLevel::TC128).unwrap(),
///     )
///     .set_plain_modulus(PlainModulus::batching(DegreeType::D4096, 20).unwrap())
///     .build()
///     .unwrap();
/// ```
pub struct BfvEncryptionParametersBuilder {
	poly_modulus_degree: Option<DegreeType>,
	coefficient_modulus: CoefficientModulusType,
	plain_modulus: PlainModulusType,
}

impl BfvEncryptionParametersBuilder {
	/// Starts a new builder with nothing set.
	pub fn new() -> Self {
		Self {
			poly_modulus_degree: None,
			coefficient_modulus: CoefficientModulusType::NotSet,
			plain_modulus: PlainModulusType::NotSet,
		}
	}

	/// Sets the polynomial modulus degree, i.e. the batch-encoder slot count.
	pub fn set_poly_modulus_degree(mut self, degree: DegreeType) -> Self {
		self.poly_modulus_degree = Some(degree);
		self
	}

	/// Sets the coefficient modulus chain, usually
	/// [`CoefficientModulus::bfv_default`](crate::CoefficientModulus::bfv_default).
	pub fn set_coefficient_modulus(mut self, modulus: Vec<Modulus>) -> Self {
		self.coefficient_modulus = CoefficientModulusType::Modulus(modulus);
		self
	}

	/// Sets the plaintext modulus from an already-constructed [`Modulus`],
	/// usually [`PlainModulus::batching`](crate::PlainModulus::batching).
	pub fn set_plain_modulus(mut self, modulus: Modulus) -> Self {
		self.plain_modulus = PlainModulusType::Modulus(modulus);
		self
	}

	/// Sets the plaintext modulus directly from a raw prime value. Prefer
	/// [`set_plain_modulus`](Self::set_plain_modulus) with
	/// [`PlainModulus::batching`](crate::PlainModulus::batching) unless you
	/// need batching disabled.
	pub fn set_plain_modulus_u64(mut self, value: u64) -> Result<Self> {
		self.plain_modulus = PlainModulusType::Modulus(Modulus::new(value)?);
		Ok(self)
	}

	/// Validates the builder's fields and constructs the parameters.
	pub fn build(self) -> Result<EncryptionParameters> {
		let mut params = EncryptionParameters::new(SchemeType::Bfv)?;

		let degree = self.poly_modulus_degree.unwrap_or(DegreeType::D4096);
		params.set_poly_modulus_degree(degree)?;

		match self.coefficient_modulus {
			CoefficientModulusType::Modulus(m) => params.set_coefficient_modulus(&m)?,
			CoefficientModulusType::NotSet => return Err(Error::CoefficientModulusNotSet),
		}

		match self.plain_modulus {
			PlainModulusType::Modulus(m) => params.set_plain_modulus(&m)?,
			PlainModulusType::NotSet => return Err(Error::PlainModulusNotSet),
		}

		Ok(params)
	}
}

impl Default for BfvEncryptionParametersBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use crate::{
		BfvEncryptionParametersBuilder, CoefficientModulus, DegreeType, PlainModulus, SecurityLevel,
	};

	#[test]
	fn can_build_bfv_params() {
		let params = BfvEncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D4096)
			.set_coefficient_modulus(
				CoefficientModulus::bfv_default(DegreeType::D4096, SecurityLevel::TC128).unwrap(),
			)
			.set_plain_modulus(PlainModulus::batching(DegreeType::D4096, 20).unwrap())
			.build()
			.unwrap();

		assert_eq!(params.get_poly_modulus_degree(), 4096);
	}

	#[test]
	fn build_without_coefficient_modulus_fails() {
		let result = BfvEncryptionParametersBuilder::new()
			.set_poly_modulus_degree(DegreeType::D4096)
			.set_plain_modulus(PlainModulus::batching(DegreeType::D4096, 20).unwrap())
			.build();

		assert!(result.is_err());
	}
}
