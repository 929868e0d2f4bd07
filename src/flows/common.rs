//! Shared helpers for grant implementations (client authentication, scope narrowing, minting).

// self
use crate::{
	_prelude::*,
	account::Client,
	auth::{ClientId, ScopeSet, TokenRecord, TokenRecordBuilderError, TokenSecret, Username},
	error::ConfigError,
	flows::{GrantRequest, GrantType, Issuer},
	store::CredentialStore,
};

/// Authenticates the client by id + secret.
pub(crate) fn authenticate_client(
	credentials: &CredentialStore,
	client_id: &str,
	client_secret: &str,
) -> Result<Client> {
	if client_id.is_empty() || client_secret.is_empty() {
		return Err(Error::invalid_client("cannot retrieve client credentials"));
	}

	credentials
		.find_client(client_id, Some(client_secret))
		.ok_or_else(|| Error::invalid_client("client is invalid"))
}

/// Rejects grants the client is not registered for.
pub(crate) fn ensure_grant(client: &Client, grant: GrantType) -> Result<()> {
	if client.supports(grant) {
		Ok(())
	} else {
		Err(Error::invalid_grant(format!("client `{}` may not use the {grant} grant", client.id)))
	}
}

/// Returns the named parameter or an `invalid_request` error when it is missing or blank.
pub(crate) fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str> {
	value
		.filter(|value| !value.is_empty())
		.ok_or_else(|| Error::InvalidRequest { reason: format!("missing parameter `{name}`") })
}

/// Applies an optional requested scope on top of the grant's default scope.
///
/// The request may only narrow: every requested scope must already be in `default`.
pub(crate) fn narrow_scope(default: &ScopeSet, requested: Option<&str>) -> Result<ScopeSet> {
	let Some(raw) = requested else {
		return Ok(default.clone());
	};
	let requested = ScopeSet::from_str(raw)
		.map_err(|e| Error::InvalidScope { reason: e.to_string() })?;

	if requested.is_empty() {
		return Ok(default.clone());
	}

	let missing = default.missing(&requested);

	if !missing.is_empty() {
		return Err(Error::InvalidScope {
			reason: format!("requested scope exceeds the grant: {}", missing.join(" ")),
		});
	}

	Ok(requested)
}

/// Normalizes token builder errors into issuer errors.
pub(crate) fn map_token_builder_error(err: TokenRecordBuilderError) -> Error {
	ConfigError::from(err).into()
}

impl Issuer {
	/// Authenticates the request's client and checks it may use `grant`.
	pub(crate) fn client_for(&self, request: &GrantRequest, grant: GrantType) -> Result<Client> {
		let client =
			authenticate_client(&self.credentials, &request.client_id, &request.client_secret)?;

		ensure_grant(&client, grant)?;

		Ok(client)
	}

	/// Builds a fresh record with random secrets and configured lifetimes, issued at `now`.
	pub(crate) fn mint(
		&self,
		client: &ClientId,
		user: Option<Username>,
		scope: ScopeSet,
		with_refresh: bool,
		now: OffsetDateTime,
	) -> Result<TokenRecord> {
		let token_bytes = self.config.token_bytes;
		let mut builder = TokenRecord::builder(client.clone(), scope)
			.user(user)
			.issued_at(now)
			.access_token(TokenSecret::generate(token_bytes))
			.access_lifetime(self.config.access_lifetime());

		if with_refresh {
			builder = builder
				.refresh_token(TokenSecret::generate(token_bytes), self.config.refresh_lifetime());
		}

		builder.build().map_err(map_token_builder_error)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn narrow_scope_only_narrows() {
		let default = ScopeSet::from_str("user.read user.write").expect("Default should parse.");

		assert_eq!(narrow_scope(&default, None).expect("No request keeps default."), default);
		assert_eq!(
			narrow_scope(&default, Some("user.read")).expect("Subset should pass.").normalized(),
			"user.read"
		);
		assert_eq!(narrow_scope(&default, Some("")).expect("Blank keeps default."), default);
		assert!(matches!(
			narrow_scope(&default, Some("user.read admin.write")),
			Err(Error::InvalidScope { .. })
		));
		assert!(matches!(narrow_scope(&default, Some("   ")), Err(Error::InvalidScope { .. })));
	}

	#[test]
	fn required_rejects_missing_and_blank() {
		assert_eq!(required(Some("bob"), "username").ok(), Some("bob"));
		assert!(matches!(required(Some(""), "username"), Err(Error::InvalidRequest { .. })));
		assert!(matches!(required(None, "password"), Err(Error::InvalidRequest { .. })));
	}
}
