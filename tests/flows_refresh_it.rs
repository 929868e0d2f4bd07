// crates.io
use time::macros;
// self
use oauth2_issuer::{
	_preludet::*,
	auth::{ClientId, ScopeSet, TokenRecord, TokenSecret},
	flows::{GrantRequest, Issuer, TokenResponse},
	store::TokenStore,
};

fn now() -> OffsetDateTime {
	macros::datetime!(2025-06-01 09:00 UTC)
}

async fn login(issuer: &Issuer) -> TokenResponse {
	issuer
		.token_at(GrantRequest::password("webapp", "websecret", "admin", "1234"), now())
		.await
		.expect("Password grant fixture should succeed.")
}

fn refresh_of(response: &TokenResponse) -> &str {
	response.refresh_token.as_deref().expect("Password grant should issue a refresh token.")
}

#[tokio::test]
async fn refresh_rotates_and_invalidates_the_old_pair() {
	let (issuer, store) = build_test_issuer();
	let first = login(&issuer).await;
	let later = now() + Duration::minutes(5);
	let second = issuer
		.token_at(GrantRequest::refresh_token("webapp", "websecret", refresh_of(&first)), later)
		.await
		.expect("Refresh with a live token should succeed.");

	assert_ne!(second.access_token, first.access_token);
	assert_ne!(refresh_of(&second), refresh_of(&first));
	assert_eq!(second.scope, first.scope);
	assert_eq!(second.expires_in, 120);

	let rotated = store
		.find_by_access_token(&second.access_token)
		.await
		.expect("Lookup should succeed.")
		.expect("Rotated pair should be stored.");

	assert_eq!(rotated.user.as_deref(), Some("admin"));
	assert_eq!(rotated.issued_at, later);
	assert!(
		store
			.find_by_access_token(&first.access_token)
			.await
			.expect("Lookup should succeed.")
			.is_none(),
		"The old access token dies with its record."
	);
	assert_eq!(store.len(), 1);

	let replay = issuer
		.token_at(GrantRequest::refresh_token("webapp", "websecret", refresh_of(&first)), later)
		.await
		.expect_err("A consumed refresh token must not work twice.");

	assert!(matches!(replay, Error::InvalidGrant { .. }));
	assert_eq!(issuer.rotation_metrics.attempts(), 2);
	assert_eq!(issuer.rotation_metrics.rotated(), 1);
	assert_eq!(issuer.rotation_metrics.rejected(), 1);
}

#[tokio::test]
async fn expired_refresh_token_is_rejected() {
	let (issuer, store) = build_test_issuer();
	let first = login(&issuer).await;
	let err = issuer
		.token_at(
			GrantRequest::refresh_token("webapp", "websecret", refresh_of(&first)),
			now() + Duration::days(1),
		)
		.await
		.expect_err("Refresh at its expiry instant must fail.");

	assert!(matches!(err, Error::InvalidGrant { .. }));
	assert!(
		store
			.find_by_refresh_token(refresh_of(&first))
			.await
			.expect("Lookup should succeed.")
			.is_some(),
		"A rejected refresh leaves the store untouched."
	);
}

#[tokio::test]
async fn unknown_or_foreign_refresh_token_is_rejected() {
	let (issuer, store) = build_test_issuer();
	let unknown = issuer
		.token_at(GrantRequest::refresh_token("webapp", "websecret", "not-a-token"), now())
		.await
		.expect_err("Unknown refresh token must fail.");

	assert!(matches!(unknown, Error::InvalidGrant { .. }));

	// A second client allowed to refresh, presenting webapp's token.
	let mut other = issuer
		.credentials
		.find_client("webapp", None)
		.expect("Demo client should exist.");

	other.id = ClientId::new("mobile").expect("Client id should be valid.");
	issuer.credentials.insert_client(other);

	let first = login(&issuer).await;
	let foreign = issuer
		.token_at(GrantRequest::refresh_token("mobile", "websecret", refresh_of(&first)), now())
		.await
		.expect_err("Another client's refresh token must fail.");

	assert!(matches!(foreign, Error::InvalidGrant { .. }));
	assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn refresh_may_narrow_but_not_widen() {
	let (issuer, _) = build_test_issuer();
	let first = login(&issuer).await;
	let narrowed = issuer
		.token_at(
			GrantRequest::refresh_token("webapp", "websecret", refresh_of(&first))
				.with_scope("user.read"),
			now(),
		)
		.await
		.expect("Narrowing refresh should succeed.");

	assert_eq!(narrowed.scope.normalized(), "user.read");

	let widened = issuer
		.token_at(
			GrantRequest::refresh_token("webapp", "websecret", refresh_of(&narrowed))
				.with_scope("user.read user.write"),
			now(),
		)
		.await
		.expect_err("Widening beyond the stored scope must fail.");

	assert!(matches!(widened, Error::InvalidScope { .. }));
}

#[tokio::test]
async fn client_without_refresh_grant_is_rejected() {
	let (issuer, store) = build_test_issuer();
	let record = TokenRecord::builder(
		ClientId::new("application").expect("Client id should be valid."),
		ScopeSet::from_str("service.read").expect("Scope should parse."),
	)
	.issued_at(now())
	.access_token(TokenSecret::new("access-fixture"))
	.access_lifetime(Duration::minutes(2))
	.refresh_token(TokenSecret::new("refresh-fixture"), Duration::days(1))
	.build()
	.expect("Record fixture should build.");

	store.save(record).await.expect("Saving fixture should succeed.");

	let err = issuer
		.token_at(GrantRequest::refresh_token("application", "secret", "refresh-fixture"), now())
		.await
		.expect_err("Client without the refresh grant must fail.");

	assert!(matches!(err, Error::InvalidGrant { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_refreshes_have_one_winner() {
	let (issuer, store) = build_test_issuer();
	let first = login(&issuer).await;
	let refresh = refresh_of(&first).to_owned();
	let tasks = (0..8)
		.map(|_| {
			let issuer = issuer.clone();
			let refresh = refresh.clone();

			tokio::spawn(async move {
				issuer
					.token_at(GrantRequest::refresh_token("webapp", "websecret", &refresh), now())
					.await
			})
		})
		.collect::<Vec<_>>();
	let mut winners = 0;

	for task in tasks {
		match task.await.expect("Refresh task should not panic.") {
			Ok(_) => winners += 1,
			Err(err) => assert!(matches!(err, Error::InvalidGrant { .. })),
		}
	}

	assert_eq!(winners, 1);
	assert_eq!(store.len(), 1);
	assert_eq!(issuer.rotation_metrics.rotated(), 1);
	assert_eq!(issuer.rotation_metrics.rejected(), 7);
}

#[tokio::test]
async fn revocation_is_scoped_to_the_owning_client() {
	let (issuer, store) = build_test_issuer();
	let first = login(&issuer).await;

	assert!(
		!issuer
			.revoke("application", "secret", refresh_of(&first))
			.await
			.expect("Revocation by another client should not error."),
		"Other clients cannot revoke webapp's tokens."
	);
	assert!(
		issuer
			.revoke("webapp", "websecret", refresh_of(&first))
			.await
			.expect("Owner revocation should succeed.")
	);
	assert!(store.is_empty());
}
