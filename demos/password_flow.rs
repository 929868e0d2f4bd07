//! Walks through registration, the password grant, bearer authentication, and refresh rotation
//! using the demo credential fixtures and the in-memory token store.

// std
use std::sync::Arc;
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use oauth2_issuer::{
	auth::{Role, ScopeSet},
	config::IssuerConfig,
	flows::{GrantRequest, Issuer, RegistrationResponse},
	store::{CredentialStore, MemoryStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = IssuerConfig::default().build()?;
	let credentials = Arc::new(CredentialStore::demo(config.password_hasher()?)?);
	let memory = Arc::new(MemoryStore::default());
	let store: Arc<dyn TokenStore> = memory.clone();
	let issuer = Issuer::new(credentials, store, config);
	let registered = issuer.register("bob", "correct horse").await?;

	println!("{} {}", RegistrationResponse::STATUS, registered.message);

	if let Err(e) = issuer.register("bob", "again").await {
		println!("{} {}", e.status_code(), e);
	}

	let first = issuer
		.token(GrantRequest::password("webapp", "websecret", "bob", "correct horse"))
		.await?;
	let authenticator = issuer.authenticator();
	let principal =
		authenticator.authenticate(Some(&format!("Bearer {}", first.access_token))).await?;

	principal
		.require_role(&[Role::Admin, Role::User])?
		.require_scopes(&ScopeSet::new(["user.read"])?)?;

	println!("authenticated {principal:?}");

	let refresh = first.refresh_token.as_deref().ok_or_else(|| eyre!("no refresh token issued"))?;
	let second = issuer.token(GrantRequest::refresh_token("webapp", "websecret", refresh)).await?;

	println!("rotated; expires in {}s, scope `{}`", second.expires_in, second.scope);

	match authenticator.authenticate(Some(&format!("Bearer {}", first.access_token))).await {
		Ok(_) => println!("old access token unexpectedly still valid"),
		Err(e) => println!("old access token rejected: {}", e.oauth_code()),
	}

	println!(
		"{} record(s) stored, {} rotation(s)",
		memory.len(),
		issuer.rotation_metrics.rotated()
	);

	Ok(())
}
