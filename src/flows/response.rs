//! Response bodies produced by the token and registration endpoints.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenRecord},
};

/// Successful token endpoint response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Freshly issued access token.
	pub access_token: String,
	/// Refresh token, when the grant issues one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<String>,
	/// Always `Bearer`.
	pub token_type: String,
	/// Whole seconds until the access token expires.
	pub expires_in: i64,
	/// Scopes granted to the access token.
	pub scope: ScopeSet,
}
impl TokenResponse {
	/// Token type advertised for every issued access token.
	pub const TOKEN_TYPE: &'static str = "Bearer";

	/// Renders a stored record as seen at `now`.
	pub fn from_record(record: &TokenRecord, now: OffsetDateTime) -> Self {
		Self {
			access_token: record.access_token.expose().to_owned(),
			refresh_token: record.refresh_token.as_ref().map(|secret| secret.expose().to_owned()),
			token_type: Self::TOKEN_TYPE.into(),
			expires_in: record.access_expires_in(now),
			scope: record.scope.clone(),
		}
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("token_type", &self.token_type)
			.field("expires_in", &self.expires_in)
			.field("scope", &self.scope)
			.finish()
	}
}

/// Body returned after a successful registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
	/// Human-readable confirmation.
	pub message: String,
}
impl RegistrationResponse {
	/// HTTP status a transport should answer with.
	pub const STATUS: u16 = 201;

	pub(crate) fn created() -> Self {
		Self { message: "User registered successfully".into() }
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::auth::{ClientId, TokenSecret};

	#[test]
	fn json_omits_missing_refresh_token_and_floors_expiry() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let record = TokenRecord::builder(
			ClientId::new("application").expect("Client id should be valid."),
			ScopeSet::from_str("service.read").expect("Scope should parse."),
		)
		.issued_at(issued)
		.access_token(TokenSecret::new("access-value"))
		.access_lifetime(Duration::seconds(120))
		.build()
		.expect("Record should build.");
		let response = TokenResponse::from_record(&record, issued + Duration::milliseconds(1_500));
		let json = serde_json::to_value(&response).expect("Response should serialize.");

		assert_eq!(response.expires_in, 118);
		assert_eq!(json["token_type"], "Bearer");
		assert_eq!(json["scope"], "service.read");
		assert!(json.get("refresh_token").is_none());
		assert!(!format!("{response:?}").contains("access-value"));
	}

	#[test]
	fn registration_message_matches_contract() {
		let body = serde_json::to_string(&RegistrationResponse::created())
			.expect("Registration body should serialize.");

		assert_eq!(body, r#"{"message":"User registered successfully"}"#);
		assert_eq!(RegistrationResponse::STATUS, 201);
	}
}
