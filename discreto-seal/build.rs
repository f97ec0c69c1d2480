use std::env;
use std::path::PathBuf;

/// Builds Microsoft SEAL as a static library via CMake and generates Rust
/// bindings to its C shim (`native/src/seal_c`). The real C++ library is
/// fetched and compiled at build time; nothing is vendored.
fn main() {
	let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

	let seal = cmake::Config::new("vendor/seal")
		.define("SEAL_USE_CXX17", "ON")
		.define("SEAL_BUILD_SEAL_C", "ON")
		.define("SEAL_BUILD_SHARED_LIBS", "OFF")
		.define("SEAL_BUILD_DEPS", "ON")
		.define("CMAKE_BUILD_TYPE", "Release")
		.build();

	println!("cargo:rustc-link-search=native={}/lib", seal.display());
	println!("cargo:rustc-link-search=native={}/lib64", seal.display());
	println!("cargo:rustc-link-lib=static=sealc-4.1");
	println!("cargo:rustc-link-lib=static=seal-4.1");

	let bindings = bindgen::Builder::default()
		.header("vendor/seal_c_wrapper.h")
		.clang_arg(format!("-I{}/include", seal.display()))
		.clang_arg("-std=c++17")
		.allowlist_function("(SEALContext|EncParams|Modulus|CoeffModulus|PlainModulus|KeyGenerator|PublicKey|SecretKey|RelinKeys|GaloisKeys|Encryptor|Decryptor|Evaluator|BatchEncoder|Plaintext|Ciphertext|MemoryPoolHandle)_.*")
		.parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
		.generate()
		.expect("failed to generate SEAL bindings");

	bindings
		.write_to_file(out_dir.join("bindings.rs"))
		.expect("failed to write SEAL bindings");

	println!("cargo:rerun-if-changed=vendor/seal_c_wrapper.h");
}
