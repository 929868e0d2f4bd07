//! Grant types and per-client grant flags.

// self
use crate::_prelude::*;

/// OAuth 2.0 grant types implemented by the issuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Resource Owner Password Credentials grant.
	Password,
	/// Client Credentials grant for app-only tokens.
	ClientCredentials,
	/// Refresh Token grant for rotating a token pair.
	RefreshToken,
}
impl GrantType {
	/// Every implemented grant, in declaration order.
	pub const ALL: [GrantType; 3] =
		[GrantType::Password, GrantType::ClientCredentials, GrantType::RefreshToken];

	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::Password => "password",
			GrantType::ClientCredentials => "client_credentials",
			GrantType::RefreshToken => "refresh_token",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for GrantType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		GrantType::ALL
			.into_iter()
			.find(|grant| grant.as_str() == s)
			.ok_or_else(|| Error::UnsupportedGrantType { grant_type: s.to_owned() })
	}
}

/// Collection of grant flags a client is allowed to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedGrants {
	/// Indicates whether the Password grant is enabled.
	pub password: bool,
	/// Indicates whether the Client Credentials grant is enabled.
	pub client_credentials: bool,
	/// Indicates whether the Refresh Token grant is enabled.
	pub refresh_token: bool,
}
impl SupportedGrants {
	/// Returns true if the provided grant is supported.
	pub fn supports(self, grant: GrantType) -> bool {
		match grant {
			GrantType::Password => self.password,
			GrantType::ClientCredentials => self.client_credentials,
			GrantType::RefreshToken => self.refresh_token,
		}
	}

	/// Marks a grant as supported.
	pub fn enable(mut self, grant: GrantType) -> Self {
		match grant {
			GrantType::Password => self.password = true,
			GrantType::ClientCredentials => self.client_credentials = true,
			GrantType::RefreshToken => self.refresh_token = true,
		}

		self
	}

	/// Returns true when no grants are enabled.
	pub fn is_empty(self) -> bool {
		!self.password && !self.client_credentials && !self.refresh_token
	}
}
impl FromIterator<GrantType> for SupportedGrants {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = GrantType>,
	{
		iter.into_iter().fold(Self::default(), Self::enable)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn grant_types_parse_wire_names() {
		assert_eq!(GrantType::from_str("password").ok(), Some(GrantType::Password));
		assert_eq!(GrantType::from_str("refresh_token").ok(), Some(GrantType::RefreshToken));
		assert!(matches!(
			GrantType::from_str("authorization_code"),
			Err(Error::UnsupportedGrantType { .. })
		));
	}

	#[test]
	fn supported_grants_collect_from_iterator() {
		let grants: SupportedGrants =
			[GrantType::Password, GrantType::RefreshToken].into_iter().collect();

		assert!(grants.supports(GrantType::Password));
		assert!(grants.supports(GrantType::RefreshToken));
		assert!(!grants.supports(GrantType::ClientCredentials));
		assert!(SupportedGrants::default().is_empty());
	}
}
