//! Issuer configuration: token lifetimes, token entropy, and password hashing cost.

// self
use crate::{_prelude::*, account::CredentialHasher, error::ConfigError};

/// Argon2 cost parameters used when hashing registration passwords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordCost {
	/// Memory cost in KiB.
	pub memory_kib: u32,
	/// Number of passes.
	pub iterations: u32,
	/// Degree of parallelism.
	pub parallelism: u32,
}
impl Default for PasswordCost {
	fn default() -> Self {
		Self {
			memory_kib: argon2::Params::DEFAULT_M_COST,
			iterations: argon2::Params::DEFAULT_T_COST,
			parallelism: argon2::Params::DEFAULT_P_COST,
		}
	}
}

/// Issuer configuration.
///
/// Construct with [`IssuerConfig::default`] plus the `with_*` setters, or parse JSON via
/// [`IssuerConfig::from_json_str`]; both paths finish in [`IssuerConfig::build`], which
/// validates the values.
///
/// ```json
/// { "access_token_lifetime": 3600, "refresh_token_lifetime": 86400, "token_bytes": 32 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuerConfig {
	/// Access token lifetime in seconds.
	pub access_token_lifetime: i64,
	/// Refresh token lifetime in seconds.
	pub refresh_token_lifetime: i64,
	/// Random bytes per token value before encoding.
	pub token_bytes: usize,
	/// Argon2 cost for newly hashed passwords.
	pub password_cost: PasswordCost,
}
impl IssuerConfig {
	/// Default access token lifetime (two minutes).
	pub const DEFAULT_ACCESS_LIFETIME: i64 = 120;
	/// Default refresh token lifetime (one day).
	pub const DEFAULT_REFRESH_LIFETIME: i64 = 60 * 60 * 24;
	/// Default token entropy (160 bits).
	pub const DEFAULT_TOKEN_BYTES: usize = 20;
	/// Longest accepted token lifetime in seconds (ten years).
	pub const MAX_LIFETIME: i64 = 60 * 60 * 24 * 365 * 10;
	/// Smallest accepted token entropy (128 bits).
	pub const MIN_TOKEN_BYTES: usize = 16;

	/// Parses a JSON document; errors name the offending field path.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(raw);
		let config: Self = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::Parse { source })?;

		config.build()
	}

	/// Overrides the access token lifetime.
	pub fn with_access_lifetime(mut self, lifetime: Duration) -> Self {
		self.access_token_lifetime = lifetime.whole_seconds();

		self
	}

	/// Overrides the refresh token lifetime.
	pub fn with_refresh_lifetime(mut self, lifetime: Duration) -> Self {
		self.refresh_token_lifetime = lifetime.whole_seconds();

		self
	}

	/// Overrides the number of random bytes per token.
	pub fn with_token_bytes(mut self, bytes: usize) -> Self {
		self.token_bytes = bytes;

		self
	}

	/// Overrides the Argon2 cost parameters.
	pub fn with_password_cost(
		mut self,
		memory_kib: u32,
		iterations: u32,
		parallelism: u32,
	) -> Self {
		self.password_cost = PasswordCost { memory_kib, iterations, parallelism };

		self
	}

	/// Validates the configuration.
	pub fn build(self) -> Result<Self, ConfigError> {
		check_lifetime("access token", self.access_token_lifetime)?;
		check_lifetime("refresh token", self.refresh_token_lifetime)?;

		if self.token_bytes < Self::MIN_TOKEN_BYTES {
			return Err(ConfigError::TokenTooShort {
				min: Self::MIN_TOKEN_BYTES,
				actual: self.token_bytes,
			});
		}

		self.password_hasher()?;

		Ok(self)
	}

	/// Access token lifetime as a [`Duration`].
	pub fn access_lifetime(&self) -> Duration {
		Duration::seconds(self.access_token_lifetime)
	}

	/// Refresh token lifetime as a [`Duration`].
	pub fn refresh_lifetime(&self) -> Duration {
		Duration::seconds(self.refresh_token_lifetime)
	}

	/// Hasher configured with [`Self::password_cost`].
	pub fn password_hasher(&self) -> Result<CredentialHasher, ConfigError> {
		let PasswordCost { memory_kib, iterations, parallelism } = self.password_cost;

		CredentialHasher::new(memory_kib, iterations, parallelism)
	}
}
impl Default for IssuerConfig {
	fn default() -> Self {
		Self {
			access_token_lifetime: Self::DEFAULT_ACCESS_LIFETIME,
			refresh_token_lifetime: Self::DEFAULT_REFRESH_LIFETIME,
			token_bytes: Self::DEFAULT_TOKEN_BYTES,
			password_cost: PasswordCost::default(),
		}
	}
}

fn check_lifetime(which: &'static str, seconds: i64) -> Result<(), ConfigError> {
	if seconds <= 0 {
		return Err(ConfigError::NonPositiveLifetime { which });
	}
	if seconds > IssuerConfig::MAX_LIFETIME {
		return Err(ConfigError::LifetimeTooLong { which, max: IssuerConfig::MAX_LIFETIME });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_are_valid() {
		let config = IssuerConfig::default().build().expect("Defaults should validate.");

		assert_eq!(config.access_lifetime(), Duration::seconds(120));
		assert_eq!(config.refresh_lifetime(), Duration::days(1));
		assert_eq!(config.token_bytes, 20);
	}

	#[test]
	fn json_overrides_merge_with_defaults() {
		let config = IssuerConfig::from_json_str(r#"{ "access_token_lifetime": 3600 }"#)
			.expect("Partial JSON should parse.");

		assert_eq!(config.access_lifetime(), Duration::hours(1));
		assert_eq!(config.refresh_lifetime(), Duration::days(1));
	}

	#[test]
	fn json_errors_name_the_field() {
		let err = IssuerConfig::from_json_str(r#"{ "password_cost": { "iterations": "two" } }"#)
			.expect_err("Wrong type must fail.");

		match err {
			ConfigError::Parse { source } =>
				assert_eq!(source.path().to_string(), "password_cost.iterations"),
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn invalid_values_are_rejected() {
		assert!(matches!(
			IssuerConfig::default().with_access_lifetime(Duration::ZERO).build(),
			Err(ConfigError::NonPositiveLifetime { .. })
		));
		assert!(matches!(
			IssuerConfig::default().with_token_bytes(8).build(),
			Err(ConfigError::TokenTooShort { min: 16, actual: 8 })
		));
		assert!(matches!(
			IssuerConfig::default().with_password_cost(0, 0, 0).build(),
			Err(ConfigError::PasswordCost(_))
		));
	}

	#[test]
	fn lifetimes_are_capped() {
		IssuerConfig::default()
			.with_refresh_lifetime(Duration::seconds(IssuerConfig::MAX_LIFETIME))
			.build()
			.expect("Lifetime at the cap should validate.");

		assert!(matches!(
			IssuerConfig::default().with_access_lifetime(Duration::days(365 * 11)).build(),
			Err(ConfigError::LifetimeTooLong { which: "access token", .. })
		));

		let err =
			IssuerConfig::from_json_str(r#"{ "refresh_token_lifetime": 9223372036854775807 }"#)
				.expect_err("Huge refresh lifetime must be rejected.");

		assert!(matches!(err, ConfigError::LifetimeTooLong { which: "refresh token", .. }));
	}
}
