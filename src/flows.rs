//! Grant processing: the token endpoint, registration, and revocation, fronted by [`Issuer`].

mod common;
pub mod grant;
pub mod refresh;
pub mod request;
pub mod response;

mod client_credentials;
mod password;

pub use grant::*;
pub use refresh::*;
pub use request::*;
pub use response::*;

// self
use crate::{
	_prelude::*,
	config::IssuerConfig,
	guard::Authenticator,
	store::{CredentialStore, TokenStore},
};

/// Authorization-server core that validates grant requests and issues tokens.
///
/// The issuer owns references to the credential directory and the token store plus the
/// validated configuration, so each grant implementation only has to express its own rules.
/// Token insertion is always the final step of a grant; a failed grant leaves the store as it
/// found it.
#[derive(Clone)]
pub struct Issuer {
	/// Users and clients.
	pub credentials: Arc<CredentialStore>,
	/// Token store implementation that persists issued secrets.
	pub store: Arc<dyn TokenStore>,
	/// Lifetimes, token entropy, and hashing cost.
	pub config: IssuerConfig,
	/// Shared counters for refresh rotation outcomes.
	pub rotation_metrics: Arc<RotationMetrics>,
}
impl Issuer {
	/// Creates an issuer over the provided stores.
	pub fn new(
		credentials: Arc<CredentialStore>,
		store: Arc<dyn TokenStore>,
		config: IssuerConfig,
	) -> Self {
		Self { credentials, store, config, rotation_metrics: Default::default() }
	}

	/// Processes a token endpoint request using the current clock.
	pub async fn token(&self, request: GrantRequest) -> Result<TokenResponse> {
		self.token_at(request, OffsetDateTime::now_utc()).await
	}

	/// Processes a token endpoint request as of `now`.
	pub async fn token_at(
		&self,
		request: GrantRequest,
		now: OffsetDateTime,
	) -> Result<TokenResponse> {
		let record = match request.grant_type {
			GrantType::Password => self.password(&request, now).await?,
			GrantType::ClientCredentials => self.client_credentials(&request, now).await?,
			GrantType::RefreshToken => self.refresh(&request, now).await?,
		};

		Ok(TokenResponse::from_record(&record, now))
	}

	/// Registers a user through the credential store.
	pub async fn register(&self, username: &str, password: &str) -> Result<RegistrationResponse> {
		self.credentials.register(username, password).await?;

		Ok(RegistrationResponse::created())
	}

	/// Revokes an access or refresh token on behalf of the client that owns it.
	///
	/// Returns `Ok(false)` when the token is unknown or belongs to a different client, so callers
	/// cannot learn whether another client's token exists.
	pub async fn revoke(&self, client_id: &str, client_secret: &str, token: &str) -> Result<bool> {
		let client = common::authenticate_client(&self.credentials, client_id, client_secret)?;

		if let Some(record) = self.store.find_by_refresh_token(token).await? {
			if record.client != client.id {
				return Ok(false);
			}

			return Ok(self.store.revoke_by_refresh_token(token).await?);
		}

		match self.store.find_by_access_token(token).await? {
			Some(record) if record.client == client.id =>
				Ok(self.store.revoke_by_access_token(token).await?),
			_ => Ok(false),
		}
	}

	/// Authenticator sharing this issuer's stores.
	pub fn authenticator(&self) -> Authenticator {
		Authenticator::new(self.store.clone(), self.credentials.clone())
	}
}
impl Debug for Issuer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Issuer")
			.field("config", &self.config)
			.field("rotation_metrics", &self.rotation_metrics)
			.finish()
	}
}
