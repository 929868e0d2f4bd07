//! Resource Owner Password Credentials grant.

// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	flows::{GrantRequest, GrantType, Issuer, common},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl Issuer {
	/// Exchanges a username/password pair for an access + refresh token pair.
	///
	/// The default scope is the user's own scope set, falling back to the client's when the user
	/// has none.
	pub(crate) async fn password(
		&self,
		request: &GrantRequest,
		now: OffsetDateTime,
	) -> Result<TokenRecord> {
		const KIND: FlowKind = FlowKind::Password;

		let span = FlowSpan::new(KIND, "password");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let client = self.client_for(request, GrantType::Password)?;
				let username = common::required(request.username.as_deref(), "username")?;
				let password = common::required(request.password.as_deref(), "password")?;
				let user = self.credentials.verify_user(username, password).await.map_err(
					|err| match err {
						Error::InvalidCredentials =>
							Error::invalid_grant("invalid resource owner credentials"),
						other => other,
					},
				)?;
				let default_scope =
					if user.scope.is_empty() { &client.scope } else { &user.scope };
				let scope = common::narrow_scope(default_scope, request.scope.as_deref())?;
				let record = self.mint(&client.id, Some(user.username), scope, true, now)?;

				self.store.save(record.clone()).await?;

				Ok(record)
			})
			.await;

		obs::finish(KIND, &result);

		result
	}
}
