//! Argon2 password hashing used for user credentials.

// crates.io
use argon2::{
	Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier as _, Version,
	password_hash::SaltString,
};
use rand::RngCore;
// self
use crate::{_prelude::*, error::ConfigError};

const SALT_LEN: usize = 16;

/// One-way credential hasher producing PHC-format Argon2id strings.
#[derive(Clone, Debug)]
pub struct CredentialHasher {
	params: Params,
}
impl CredentialHasher {
	/// Creates a hasher with explicit Argon2 cost parameters.
	pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, ConfigError> {
		Ok(Self { params: Params::new(memory_kib, iterations, parallelism, None)? })
	}

	/// Hashes a plaintext password with a fresh random salt.
	pub fn hash(&self, password: &str) -> Result<String, ConfigError> {
		let mut salt = [0_u8; SALT_LEN];

		rand::rng().fill_bytes(&mut salt);

		let salt = SaltString::encode_b64(&salt)?;
		let hash = self.argon2().hash_password(password.as_bytes(), &salt)?;

		Ok(hash.to_string())
	}

	/// Verifies a plaintext password against a stored PHC string.
	///
	/// Returns `Ok(false)` on mismatch; errors only when the stored hash cannot be parsed. The
	/// parameters embedded in the stored hash win over the hasher's own.
	pub fn verify(&self, password: &str, stored: &str) -> Result<bool, ConfigError> {
		let parsed = PasswordHash::new(stored)?;

		Ok(self.argon2().verify_password(password.as_bytes(), &parsed).is_ok())
	}

	fn argon2(&self) -> Argon2<'static> {
		Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
	}
}
impl Default for CredentialHasher {
	fn default() -> Self {
		Self { params: Params::default() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn cheap() -> CredentialHasher {
		CredentialHasher::new(8, 1, 1).expect("Minimal Argon2 parameters should be accepted.")
	}

	#[test]
	fn hash_then_verify() {
		let hasher = cheap();
		let stored = hasher.hash("1234").expect("Hashing should succeed.");

		assert!(stored.starts_with("$argon2id$"));
		assert!(hasher.verify("1234", &stored).expect("Stored hash should parse."));
		assert!(!hasher.verify("12345", &stored).expect("Stored hash should parse."));
	}

	#[test]
	fn salts_differ_per_hash() {
		let hasher = cheap();
		let a = hasher.hash("pw").expect("Hashing should succeed.");
		let b = hasher.hash("pw").expect("Hashing should succeed.");

		assert_ne!(a, b);
	}

	#[test]
	fn malformed_hash_is_a_config_error() {
		assert!(matches!(cheap().verify("pw", "not-a-hash"), Err(ConfigError::PasswordHash(_))));
		assert!(matches!(CredentialHasher::new(0, 0, 0), Err(ConfigError::PasswordCost(_))));
	}
}
