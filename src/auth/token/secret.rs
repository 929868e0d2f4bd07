//! Opaque token secrets: generation, redaction, and digest keys.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Draws `len` bytes from the thread-local CSPRNG and encodes them as unpadded URL-safe
	/// base64.
	pub fn generate(len: usize) -> Self {
		let mut bytes = vec![0_u8; len];

		rand::rng().fill_bytes(&mut bytes);

		Self(URL_SAFE_NO_PAD.encode(bytes))
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Digest used to index the secret without keeping it as a map key.
	pub fn digest(&self) -> TokenDigest {
		TokenDigest::of(&self.0)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// SHA-256 digest of a token value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenDigest([u8; 32]);
impl TokenDigest {
	/// Hashes a raw token value presented by a caller.
	pub fn of(value: &str) -> Self {
		let mut bytes = [0_u8; 32];

		bytes.copy_from_slice(&Sha256::digest(value.as_bytes()));

		Self(bytes)
	}
}
impl Debug for TokenDigest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenDigest({})", URL_SAFE_NO_PAD.encode(&self.0[..6]))
	}
}
