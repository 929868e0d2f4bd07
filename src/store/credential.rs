//! In-memory user and client directory with credential verification and registration.

// self
use crate::{
	_prelude::*,
	account::{Client, CredentialHasher, User, UserSummary},
	auth::{ClientId, Role, ScopeSet, Username},
	blocking,
	error::ConfigError,
	flows::GrantType,
};

/// Users and clients known to the issuer.
///
/// Clients are seeded at startup and never change. Users are appended by registration and never
/// removed. Each table sits behind its own lock; registration holds the user write lock across
/// the duplicate check and the insert.
#[derive(Debug)]
pub struct CredentialStore {
	hasher: CredentialHasher,
	users: RwLock<HashMap<Username, User>>,
	clients: RwLock<HashMap<ClientId, Client>>,
}
impl CredentialStore {
	/// Creates an empty store that hashes registration passwords with `hasher`.
	pub fn new(hasher: CredentialHasher) -> Self {
		Self { hasher, users: Default::default(), clients: Default::default() }
	}

	/// Creates a store seeded with the demo fixtures: clients `application` (client
	/// credentials) and `webapp` (password + refresh), users `admin` and `andre` (password
	/// `1234`).
	pub fn demo(hasher: CredentialHasher) -> Result<Self> {
		let store = Self::new(hasher);
		let service_scope =
			ScopeSet::new(["service.read", "service.write"]).map_err(ConfigError::from)?;
		let user_scope = ScopeSet::new(["user.read", "user.write"]).map_err(ConfigError::from)?;

		store.insert_client(
			Client::new(ClientId::new("application").map_err(ConfigError::from)?, "secret")
				.with_grants([GrantType::ClientCredentials])
				.with_scope(service_scope),
		);
		store.insert_client(
			Client::new(ClientId::new("webapp").map_err(ConfigError::from)?, "websecret")
				.with_grants([GrantType::Password, GrantType::RefreshToken])
				.with_scope(user_scope),
		);
		store.seed_user("admin", "1234", Role::Admin, Role::Admin.default_scopes())?;
		store.seed_user("andre", "1234", Role::User, Role::User.default_scopes())?;

		Ok(store)
	}

	/// Hasher used for registration.
	pub fn hasher(&self) -> &CredentialHasher {
		&self.hasher
	}

	/// Adds or replaces a client.
	pub fn insert_client(&self, client: Client) {
		self.clients.write().insert(client.id.clone(), client);
	}

	/// Adds a fully formed user record; fails with [`Error::DuplicateUser`] on collision.
	pub fn insert_user(&self, user: User) -> Result<()> {
		let mut users = self.users.write();

		if users.contains_key(&user.username) {
			return Err(Error::DuplicateUser { username: user.username.to_string() });
		}

		users.insert(user.username.clone(), user);

		Ok(())
	}

	/// Hashes `password` and inserts a user with an explicit role and scope set.
	///
	/// Hashes on the calling thread; meant for startup seeding, not request handling.
	pub fn seed_user(
		&self,
		username: &str,
		password: &str,
		role: Role,
		scope: ScopeSet,
	) -> Result<User> {
		let username = Username::new(username).map_err(ConfigError::from)?;
		let hash = self.hasher.hash(password)?;
		let user = User::new(username, hash, role, scope);

		self.insert_user(user.clone())?;

		Ok(user)
	}

	/// Looks up a user by name.
	pub fn find_user(&self, username: &str) -> Option<User> {
		self.users.read().get(username).cloned()
	}

	/// Verifies a username/password pair; the Argon2 check runs on the blocking pool.
	pub async fn verify_user(&self, username: &str, password: &str) -> Result<User> {
		let user = self.find_user(username).ok_or(Error::InvalidCredentials)?;
		let hasher = self.hasher.clone();
		let password = password.to_owned();
		let stored = user.password_hash.clone();

		if blocking::cpu(move || hasher.verify(&password, &stored)).await?? {
			Ok(user)
		} else {
			Err(Error::InvalidCredentials)
		}
	}

	/// Looks up a client; when `secret` is given it must match.
	pub fn find_client(&self, client_id: &str, secret: Option<&str>) -> Option<Client> {
		self.clients
			.read()
			.get(client_id)
			.filter(|client| secret.is_none_or(|secret| client.secret_matches(secret)))
			.cloned()
	}

	/// Registers a new user with the role and default scopes chosen by [`Role::for_new_username`].
	///
	/// The password is hashed on the blocking pool.
	pub async fn register(&self, username: &str, password: &str) -> Result<User> {
		if username.is_empty() || password.is_empty() {
			return Err(Error::InvalidRequest {
				reason: "username and password are required".into(),
			});
		}

		let username = Username::new(username)
			.map_err(|e| Error::InvalidRequest { reason: e.to_string() })?;

		// Cheap early exit; the authoritative check happens under the write lock.
		if self.users.read().contains_key(&username) {
			return Err(Error::DuplicateUser { username: username.to_string() });
		}

		let hasher = self.hasher.clone();
		let password = password.to_owned();
		let hash = blocking::cpu(move || hasher.hash(&password)).await??;
		let role = Role::for_new_username(&username);
		let user = User::new(username, hash, role, role.default_scopes());

		self.insert_user(user.clone())?;

		Ok(user)
	}

	/// Snapshot of every user without credential material, ordered by username.
	pub fn users(&self) -> Vec<UserSummary> {
		let mut listing = self.users.read().values().map(UserSummary::from).collect::<Vec<_>>();

		listing.sort_by(|a, b| a.username.cmp(&b.username));

		listing
	}
}
