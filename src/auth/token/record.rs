//! Immutable token record structs, expiry helpers, and builders.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet, Username, token::secret::TokenSecret},
};

/// Lifecycle status of one half (access or refresh) of a token record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Token is currently valid.
	Active,
	/// The instant reached or passed the expiry.
	Expired,
}

/// Errors produced by [`TokenRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TokenRecordBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no access lifetime was configured.
	#[error("Access token lifetime is required.")]
	MissingAccessLifetime,
	/// Issued when issue time plus a lifetime falls outside the representable calendar.
	#[error("Token expiry is out of range.")]
	ExpiryOutOfRange,
}

/// Token pair issued by a grant.
///
/// Expiry instants are absolute: `issued_at` plus the lifetime the issuer was configured with.
#[derive(Serialize, Deserialize, Clone)]
pub struct TokenRecord {
	/// Client the token was issued to.
	pub client: ClientId,
	/// Resource owner, absent for `client_credentials` tokens.
	pub user: Option<Username>,
	/// Scopes granted to this record.
	pub scope: ScopeSet,
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Access token expiry.
	pub access_expires_at: OffsetDateTime,
	/// Refresh token secret, when the grant issues one.
	pub refresh_token: Option<TokenSecret>,
	/// Refresh token expiry, present exactly when `refresh_token` is.
	pub refresh_expires_at: Option<OffsetDateTime>,
	/// Issue instant.
	pub issued_at: OffsetDateTime,
}
impl TokenRecord {
	/// Returns a builder for a record owned by `client` with the granted scope.
	pub fn builder(client: ClientId, scope: ScopeSet) -> TokenRecordBuilder {
		TokenRecordBuilder::new(client, scope)
	}

	/// Access-token status at a given instant.
	pub fn access_status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant >= self.access_expires_at { TokenStatus::Expired } else { TokenStatus::Active }
	}

	/// Returns `true` if the access token has expired at the provided instant.
	pub fn is_access_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.access_status_at(instant), TokenStatus::Expired)
	}

	/// Refresh-token status at a given instant; records without a refresh token are always
	/// expired.
	pub fn refresh_status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		match self.refresh_expires_at {
			Some(expiry) if instant < expiry => TokenStatus::Active,
			_ => TokenStatus::Expired,
		}
	}

	/// Returns `true` if the refresh token is missing or expired at the provided instant.
	pub fn is_refresh_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.refresh_status_at(instant), TokenStatus::Expired)
	}

	/// Whole seconds (floored, never negative) until the access token expires.
	pub fn access_expires_in(&self, instant: OffsetDateTime) -> i64 {
		(self.access_expires_at - instant).whole_seconds().max(0)
	}

	/// Returns `true` when both halves are expired and the record is useless.
	pub fn is_dead_at(&self, instant: OffsetDateTime) -> bool {
		self.is_access_expired_at(instant) && self.is_refresh_expired_at(instant)
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("client", &self.client)
			.field("user", &self.user)
			.field("scope", &self.scope)
			.field("access_token", &"<redacted>")
			.field("access_expires_at", &self.access_expires_at)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("refresh_expires_at", &self.refresh_expires_at)
			.field("issued_at", &self.issued_at)
			.finish()
	}
}

/// Builder for [`TokenRecord`].
#[derive(Clone, Debug)]
pub struct TokenRecordBuilder {
	client: ClientId,
	scope: ScopeSet,
	user: Option<Username>,
	access_token: Option<TokenSecret>,
	refresh_token: Option<TokenSecret>,
	issued_at: Option<OffsetDateTime>,
	access_lifetime: Option<Duration>,
	refresh_lifetime: Option<Duration>,
}
impl TokenRecordBuilder {
	fn new(client: ClientId, scope: ScopeSet) -> Self {
		Self {
			client,
			scope,
			user: None,
			access_token: None,
			refresh_token: None,
			issued_at: None,
			access_lifetime: None,
			refresh_lifetime: None,
		}
	}

	/// Associates the record with a resource owner.
	pub fn user(mut self, user: Option<Username>) -> Self {
		self.user = user;

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Provides the access token value.
	pub fn access_token(mut self, token: TokenSecret) -> Self {
		self.access_token = Some(token);

		self
	}

	/// Sets the access token lifetime relative to the issued instant.
	pub fn access_lifetime(mut self, lifetime: Duration) -> Self {
		self.access_lifetime = Some(lifetime);

		self
	}

	/// Provides the refresh token value and its lifetime.
	pub fn refresh_token(mut self, token: TokenSecret, lifetime: Duration) -> Self {
		self.refresh_token = Some(token);
		self.refresh_lifetime = Some(lifetime);

		self
	}

	/// Consumes the builder and produces a [`TokenRecord`].
	pub fn build(self) -> Result<TokenRecord, TokenRecordBuilderError> {
		let access_token = self.access_token.ok_or(TokenRecordBuilderError::MissingAccessToken)?;
		let access_lifetime =
			self.access_lifetime.ok_or(TokenRecordBuilderError::MissingAccessLifetime)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = |lifetime: Duration| {
			issued_at.checked_add(lifetime).ok_or(TokenRecordBuilderError::ExpiryOutOfRange)
		};
		let access_expires_at = expires_at(access_lifetime)?;
		let refresh_expires_at = match (&self.refresh_token, self.refresh_lifetime) {
			(Some(_), Some(lifetime)) => Some(expires_at(lifetime)?),
			_ => None,
		};

		Ok(TokenRecord {
			client: self.client,
			user: self.user,
			scope: self.scope,
			access_token,
			access_expires_at,
			refresh_token: self.refresh_token,
			refresh_expires_at,
			issued_at,
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn client() -> ClientId {
		ClientId::new("webapp").expect("Client fixture should be valid.")
	}

	fn scope() -> ScopeSet {
		ScopeSet::new(["user.read"]).expect("Scope fixture should be valid.")
	}

	#[test]
	fn expiry_is_issue_time_plus_lifetime() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let record = TokenRecord::builder(client(), scope())
			.user(Some(Username::new("admin").expect("Username fixture should be valid.")))
			.access_token(TokenSecret::new("access"))
			.refresh_token(TokenSecret::new("refresh"), Duration::days(1))
			.issued_at(issued)
			.access_lifetime(Duration::seconds(120))
			.build()
			.expect("Token record builder should succeed.");

		assert_eq!(record.access_expires_at, macros::datetime!(2025-01-01 00:02 UTC));
		assert_eq!(record.refresh_expires_at, Some(macros::datetime!(2025-01-02 00:00 UTC)));
		assert_eq!(record.access_expires_in(issued), 120);
	}

	#[test]
	fn expiry_boundary_is_inclusive() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let record = TokenRecord::builder(client(), scope())
			.access_token(TokenSecret::new("access"))
			.issued_at(issued)
			.access_lifetime(Duration::minutes(1))
			.build()
			.expect("Access-only record should build.");

		assert_eq!(
			record.access_status_at(macros::datetime!(2025-01-01 00:00:59 UTC)),
			TokenStatus::Active
		);
		assert_eq!(
			record.access_status_at(macros::datetime!(2025-01-01 00:01 UTC)),
			TokenStatus::Expired
		);
		assert!(record.is_refresh_expired_at(issued), "Missing refresh token counts as expired.");
		assert!(record.is_dead_at(macros::datetime!(2025-01-01 00:01 UTC)));
		assert_eq!(record.access_expires_in(macros::datetime!(2025-01-01 00:05 UTC)), 0);
	}

	#[test]
	fn builder_requires_lifetimes() {
		let missing_access = TokenRecord::builder(client(), scope())
			.access_token(TokenSecret::new("access"))
			.build()
			.expect_err("Access lifetime must be required.");

		assert_eq!(missing_access, TokenRecordBuilderError::MissingAccessLifetime);

		let missing_token = TokenRecord::builder(client(), scope())
			.access_lifetime(Duration::minutes(1))
			.build()
			.expect_err("Access token must be required.");

		assert_eq!(missing_token, TokenRecordBuilderError::MissingAccessToken);
	}

	#[test]
	fn overflowing_expiry_is_an_error() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let access = TokenRecord::builder(client(), scope())
			.access_token(TokenSecret::new("access"))
			.issued_at(issued)
			.access_lifetime(Duration::MAX)
			.build()
			.expect_err("Access expiry past the calendar must fail.");

		assert_eq!(access, TokenRecordBuilderError::ExpiryOutOfRange);

		let refresh = TokenRecord::builder(client(), scope())
			.access_token(TokenSecret::new("access"))
			.refresh_token(TokenSecret::new("refresh"), Duration::seconds(i64::MAX))
			.issued_at(issued)
			.access_lifetime(Duration::minutes(1))
			.build()
			.expect_err("Refresh expiry past the calendar must fail.");

		assert_eq!(refresh, TokenRecordBuilderError::ExpiryOutOfRange);
	}

	#[test]
	fn debug_redacts_secrets() {
		let record = TokenRecord::builder(client(), scope())
			.access_token(TokenSecret::new("plain-access"))
			.access_lifetime(Duration::minutes(1))
			.build()
			.expect("Record should build.");
		let rendered = format!("{record:?}");

		assert!(!rendered.contains("plain-access"));
		assert!(rendered.contains("<redacted>"));
	}
}
