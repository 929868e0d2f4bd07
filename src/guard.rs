//! Bearer token authentication and scope/role authorization.

pub mod bearer;

pub use bearer::parse_bearer;

// self
use crate::{
	_prelude::*,
	auth::{ClientId, Role, ScopeSet, Username},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::{CredentialStore, TokenStore},
};

/// Authenticated user behind a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalUser {
	/// Resource owner name.
	pub username: Username,
	/// Current role from the credential store.
	pub role: Role,
}

/// Identity behind a validated access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	/// Client the token was issued to.
	pub client: ClientId,
	/// Resource owner; absent for client-only tokens.
	pub user: Option<PrincipalUser>,
	/// Scopes granted to the token.
	pub scope: ScopeSet,
}
impl Principal {
	/// Chaining form of [`require_scopes`].
	pub fn require_scopes(&self, required: &ScopeSet) -> Result<&Self> {
		require_scopes(&self.scope, required)?;

		Ok(self)
	}

	/// Chaining form of [`require_role`].
	pub fn require_role(&self, allowed: &[Role]) -> Result<&Self> {
		require_role(self, allowed)?;

		Ok(self)
	}
}

/// Validates bearer tokens against the token store.
#[derive(Clone)]
pub struct Authenticator {
	store: Arc<dyn TokenStore>,
	credentials: Arc<CredentialStore>,
}
impl Authenticator {
	/// Creates an authenticator over the given stores.
	pub fn new(store: Arc<dyn TokenStore>, credentials: Arc<CredentialStore>) -> Self {
		Self { store, credentials }
	}

	/// Authenticates an `Authorization` header value using the current clock.
	pub async fn authenticate(&self, header: Option<&str>) -> Result<Principal> {
		self.authenticate_at(header, OffsetDateTime::now_utc()).await
	}

	/// Authenticates an `Authorization` header value as of `now`.
	pub async fn authenticate_at(
		&self,
		header: Option<&str>,
		now: OffsetDateTime,
	) -> Result<Principal> {
		const KIND: FlowKind = FlowKind::Authenticate;

		let span = FlowSpan::new(KIND, "authenticate");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = parse_bearer(header)?;

				self.authenticate_token_at(token, now).await
			})
			.await;

		obs::finish(KIND, &result);

		result
	}

	/// Authenticates a raw access token value as of `now`.
	pub async fn authenticate_token_at(
		&self,
		token: &str,
		now: OffsetDateTime,
	) -> Result<Principal> {
		let record = self
			.store
			.find_by_access_token(token)
			.await?
			.ok_or_else(|| Error::unauthorized("invalid access token"))?;

		if record.is_access_expired_at(now) {
			return Err(Error::unauthorized("access token has expired"));
		}

		let user = match record.user {
			Some(username) => {
				let role = self
					.credentials
					.find_user(&username)
					.ok_or_else(|| Error::unauthorized("token owner no longer exists"))?
					.role;

				Some(PrincipalUser { username, role })
			},
			None => None,
		};

		Ok(Principal { client: record.client, user, scope: record.scope })
	}
}
impl Debug for Authenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator").finish_non_exhaustive()
	}
}

/// Succeeds iff every scope in `required` is present in `granted`.
pub fn require_scopes(granted: &ScopeSet, required: &ScopeSet) -> Result<()> {
	let missing = granted.missing(required);

	if missing.is_empty() {
		Ok(())
	} else {
		Err(Error::forbidden(format!("missing scope: {}", missing.join(" "))))
	}
}

/// Succeeds iff the principal carries a user whose role is in `allowed`.
pub fn require_role(principal: &Principal, allowed: &[Role]) -> Result<()> {
	let user = principal.user.as_ref().ok_or_else(|| Error::unauthorized("Missing user role"))?;

	if allowed.contains(&user.role) {
		Ok(())
	} else {
		Err(Error::forbidden(format!("role `{}` is not allowed", user.role)))
	}
}
