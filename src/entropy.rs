//! Cryptographically strong random strings for generated client secrets.
//!
//! Values are drawn from the operating system's CSPRNG and encoded with the URL-safe base64
//! alphabet without padding, so they never contain `+`, `/`, or `=` and can be embedded in URLs
//! or configuration without escaping.

// std
use std::{num::NonZeroUsize, process};
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};

/// Entropy used for every generated secret unless a caller has a specific requirement.
pub const DEFAULT_SECRET_BITS: NonZeroUsize = NonZeroUsize::new(256).expect("256 is non-zero");

/// Returns `ceil(bits / 8)` bytes from the OS random source.
///
/// Aborts the process if the random source fails; a predictable fallback would silently
/// weaken every secret derived from it.
pub fn random_bits(bits: NonZeroUsize) -> Vec<u8> {
	let mut bytes = vec![0_u8; bits.get().div_ceil(8)];

	if let Err(e) = OsRng.try_fill_bytes(&mut bytes) {
		#[cfg(feature = "tracing")]
		tracing::error!(error = %e, "secure random source failed");
		#[cfg(not(feature = "tracing"))]
		let _ = e;

		process::abort();
	}

	bytes
}

/// Returns a random string carrying at least `bits` bits of entropy.
pub fn random_bits_string(bits: NonZeroUsize) -> String {
	URL_SAFE_NO_PAD.encode(random_bits(bits))
}

/// Shorthand for [`random_bits_string`] with [`DEFAULT_SECRET_BITS`]; 32 bytes encode to 43
/// characters.
pub fn random_256_bits_string() -> String {
	random_bits_string(DEFAULT_SECRET_BITS)
}
