//! User roles and the default scopes attached to each.

// self
use crate::{_prelude::*, auth::ScopeSet};

/// Role assigned to a registered user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	/// Administrator; may list every user.
	Admin,
	/// Regular user.
	User,
}
impl Role {
	/// Username reserved for the administrator role at registration time.
	pub const RESERVED_ADMIN_NAME: &'static str = "admin";

	/// Registration policy: the reserved name becomes an admin, everyone else a user.
	pub fn for_new_username(username: &str) -> Self {
		if username == Self::RESERVED_ADMIN_NAME { Self::Admin } else { Self::User }
	}

	/// Scopes granted to freshly registered users of this role.
	pub fn default_scopes(self) -> ScopeSet {
		match self {
			Self::Admin => ScopeSet::parse_lenient("user.read user.write"),
			Self::User => ScopeSet::parse_lenient("user.read"),
		}
	}

	/// Returns the stable label used on the wire and in role checks.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Admin => "admin",
			Self::User => "user",
		}
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
