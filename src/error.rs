//! Issuer-level error types shared across flows, guards, and stores.

// self
use crate::_prelude::*;

/// Issuer-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical issuer error exposed by public APIs.
///
/// Every variant is terminal for the current request; nothing is retried internally.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// A background hashing job ended without producing a result.
	#[error("Background worker exited without a result.")]
	Worker(#[from] tokio::sync::oneshot::error::RecvError),

	/// Username is unknown or the password did not verify.
	#[error("Invalid user credentials.")]
	InvalidCredentials,
	/// Client authentication failed or the client is unknown.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Issuer-supplied reason string.
		reason: String,
	},
	/// Grant was rejected (bad user credentials, unknown or expired refresh token, grant not
	/// enabled for the client).
	#[error("Invalid grant: {reason}.")]
	InvalidGrant {
		/// Issuer-supplied reason string.
		reason: String,
	},
	/// Requested scope is malformed or exceeds what the grant may issue.
	#[error("Invalid scope: {reason}.")]
	InvalidScope {
		/// Issuer-supplied reason string.
		reason: String,
	},
	/// Request is missing a parameter or carries a malformed one.
	#[error("Invalid request: {reason}.")]
	InvalidRequest {
		/// Issuer-supplied reason string.
		reason: String,
	},
	/// The `grant_type` parameter names a grant this issuer does not implement.
	#[error("Unsupported grant type: {grant_type}.")]
	UnsupportedGrantType {
		/// Raw grant type received.
		grant_type: String,
	},
	/// Bearer token is missing, malformed, unknown, or expired.
	#[error("Unauthorized: {reason}.")]
	Unauthorized {
		/// Issuer-supplied reason string.
		reason: String,
	},
	/// Principal lacks the required scope or role.
	#[error("Forbidden: {reason}.")]
	Forbidden {
		/// Issuer-supplied reason string.
		reason: String,
	},
	/// Registration attempted with a username that already exists.
	#[error("Username already exists")]
	DuplicateUser {
		/// Username that collided.
		username: String,
	},
}
impl Error {
	/// HTTP status code the transport layer should answer with.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::InvalidGrant { .. }
			| Self::InvalidScope { .. }
			| Self::InvalidRequest { .. }
			| Self::UnsupportedGrantType { .. }
			| Self::DuplicateUser { .. } => 400,
			Self::InvalidCredentials | Self::InvalidClient { .. } | Self::Unauthorized { .. } =>
				401,
			Self::Forbidden { .. } => 403,
			Self::Storage(_) | Self::Config(_) | Self::Worker(_) => 500,
		}
	}

	/// RFC 6749 / RFC 6750 error code for the response body.
	pub fn oauth_code(&self) -> &'static str {
		match self {
			Self::InvalidCredentials | Self::InvalidGrant { .. } => "invalid_grant",
			Self::InvalidClient { .. } => "invalid_client",
			Self::InvalidScope { .. } => "invalid_scope",
			Self::InvalidRequest { .. } | Self::DuplicateUser { .. } => "invalid_request",
			Self::UnsupportedGrantType { .. } => "unsupported_grant_type",
			Self::Unauthorized { .. } => "invalid_token",
			Self::Forbidden { .. } => "insufficient_scope",
			Self::Storage(_) | Self::Config(_) | Self::Worker(_) => "server_error",
		}
	}

	/// Converts the error into the JSON body relayed by the transport layer.
	pub fn to_response(&self) -> ErrorResponse {
		ErrorResponse { error: self.oauth_code(), error_description: self.to_string() }
	}

	pub(crate) fn invalid_grant(reason: impl Into<String>) -> Self {
		Self::InvalidGrant { reason: reason.into() }
	}

	pub(crate) fn invalid_client(reason: impl Into<String>) -> Self {
		Self::InvalidClient { reason: reason.into() }
	}

	pub(crate) fn unauthorized(reason: impl Into<String>) -> Self {
		Self::Unauthorized { reason: reason.into() }
	}

	pub(crate) fn forbidden(reason: impl Into<String>) -> Self {
		Self::Forbidden { reason: reason.into() }
	}
}

/// JSON error body (`{"error": ..., "error_description": ...}`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
	/// OAuth error code.
	pub error: &'static str,
	/// Human-readable description.
	pub error_description: String,
}

/// Configuration and validation failures raised by the issuer.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A configured lifetime is zero or negative.
	#[error("The {which} lifetime must be positive.")]
	NonPositiveLifetime {
		/// Which lifetime failed validation.
		which: &'static str,
	},
	/// A configured lifetime exceeds the accepted maximum.
	#[error("The {which} lifetime must not exceed {max} seconds.")]
	LifetimeTooLong {
		/// Which lifetime failed validation.
		which: &'static str,
		/// Maximum permitted lifetime in seconds.
		max: i64,
	},
	/// Token length too short to keep values unguessable.
	#[error("Token length must be at least {min} bytes, got {actual}.")]
	TokenTooShort {
		/// Minimum permitted byte length.
		min: usize,
		/// Configured byte length.
		actual: usize,
	},
	/// Argon2 parameters were rejected.
	#[error("Password hashing parameters are invalid: {0}.")]
	PasswordCost(argon2::Error),
	/// Password hashing or hash parsing failed.
	#[error("Password hashing failed: {0}.")]
	PasswordHash(argon2::password_hash::Error),
	/// Configuration document could not be parsed.
	#[error("Configuration is malformed.")]
	Parse {
		/// Structured parsing failure naming the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Seed scopes cannot be normalized.
	#[error("Scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Seed identifier failed validation.
	#[error("Identifier is invalid.")]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// Token record builder validation failed.
	#[error("Unable to build token record.")]
	TokenBuild(#[from] crate::auth::TokenRecordBuilderError),
}
impl From<argon2::password_hash::Error> for ConfigError {
	fn from(e: argon2::password_hash::Error) -> Self {
		Self::PasswordHash(e)
	}
}
impl From<argon2::Error> for ConfigError {
	fn from(e: argon2::Error) -> Self {
		Self::PasswordCost(e)
	}
}
