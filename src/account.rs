//! Resource owners and registered clients.

pub mod password;

pub use password::*;

// crates.io
use subtle::ConstantTimeEq;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, Role, ScopeSet, Username},
	flows::{GrantType, SupportedGrants},
};

/// Registered resource owner.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
	/// Unique login name.
	pub username: Username,
	/// PHC-format password hash.
	pub password_hash: String,
	/// Role used by role gates.
	pub role: Role,
	/// Capabilities granted to this user's tokens.
	pub scope: ScopeSet,
}
impl User {
	/// Creates a user record from an already hashed password.
	pub fn new(username: Username, password_hash: String, role: Role, scope: ScopeSet) -> Self {
		Self { username, password_hash, role, scope }
	}
}
impl Debug for User {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("User")
			.field("username", &self.username)
			.field("password_hash", &"<redacted>")
			.field("role", &self.role)
			.field("scope", &self.scope)
			.finish()
	}
}

/// Public view of a user without credential material, suitable for listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserSummary {
	/// Login name.
	pub username: Username,
	/// Assigned role.
	pub role: Role,
	/// Granted capabilities.
	pub scopes: ScopeSet,
}
impl From<&User> for UserSummary {
	fn from(user: &User) -> Self {
		Self { username: user.username.clone(), role: user.role, scopes: user.scope.clone() }
	}
}

/// Confidential OAuth client allowed to request tokens.
#[derive(Clone, Serialize, Deserialize)]
pub struct Client {
	/// Client identifier.
	pub id: ClientId,
	secret: String,
	/// Grants this client may use.
	pub grants: SupportedGrants,
	/// Default capabilities for tokens issued to this client.
	pub scope: ScopeSet,
}
impl Client {
	/// Creates a client with no grants and an empty scope set.
	pub fn new(id: ClientId, secret: impl Into<String>) -> Self {
		Self {
			id,
			secret: secret.into(),
			grants: SupportedGrants::default(),
			scope: ScopeSet::default(),
		}
	}

	/// Enables the provided grants.
	pub fn with_grants<I>(mut self, grants: I) -> Self
	where
		I: IntoIterator<Item = GrantType>,
	{
		for grant in grants {
			self.grants = self.grants.enable(grant);
		}

		self
	}

	/// Replaces the default scope set.
	pub fn with_scope(mut self, scope: ScopeSet) -> Self {
		self.scope = scope;

		self
	}

	/// Returns true if the client may use the grant.
	pub fn supports(&self, grant: GrantType) -> bool {
		self.grants.supports(grant)
	}

	/// Constant-time comparison of the presented secret.
	pub fn secret_matches(&self, presented: &str) -> bool {
		self.secret.as_bytes().ct_eq(presented.as_bytes()).into()
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("id", &self.id)
			.field("secret", &"<redacted>")
			.field("grants", &self.grants)
			.field("scope", &self.scope)
			.finish()
	}
}
