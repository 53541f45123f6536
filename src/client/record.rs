//! Desired and stored OAuth client records plus the builder used to assemble them.

// self
use crate::{
	_prelude::*,
	client::{ClientName, ClientSecret, GrantMethod, ScopeRestriction},
	entropy,
};

/// Target (or current) shape of one OAuth client.
///
/// Equality is structural over every field, which is what the reconciler relies on to detect
/// that a merge produced no change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthClient {
	/// Unique, immutable client name.
	pub name: ClientName,
	/// Client secret; empty means the client authenticates without one.
	pub secret: ClientSecret,
	/// Whether the server answers unauthenticated requests with auth challenges.
	pub respond_with_challenges: bool,
	/// Redirect URIs in the order the consumer should try them.
	pub redirect_uris: Vec<String>,
	/// Grant approval policy.
	pub grant_method: GrantMethod,
	/// Scope restrictions, copied verbatim.
	pub scope_restrictions: Vec<ScopeRestriction>,
}
impl OAuthClient {
	/// Returns a builder for a client with the provided name.
	pub fn builder(name: ClientName) -> OAuthClientBuilder {
		OAuthClientBuilder::new(name)
	}
}

/// Builder for [`OAuthClient`].
///
/// When no secret is supplied, [`build`](Self::build) generates one with
/// [`entropy::random_256_bits_string`]. Use [`without_secret`](Self::without_secret) for public
/// clients.
#[derive(Clone, Debug)]
pub struct OAuthClientBuilder {
	name: ClientName,
	secret: Option<ClientSecret>,
	respond_with_challenges: bool,
	redirect_uris: Vec<String>,
	grant_method: GrantMethod,
	scope_restrictions: Vec<ScopeRestriction>,
}
impl OAuthClientBuilder {
	fn new(name: ClientName) -> Self {
		Self {
			name,
			secret: None,
			respond_with_challenges: false,
			redirect_uris: Vec::new(),
			grant_method: GrantMethod::default(),
			scope_restrictions: Vec::new(),
		}
	}

	/// Sets an explicit secret; an empty string marks a public client.
	pub fn secret(mut self, secret: impl Into<String>) -> Self {
		self.secret = Some(ClientSecret::new(secret));

		self
	}

	/// Marks the client as public (explicit empty secret).
	pub fn without_secret(mut self) -> Self {
		self.secret = Some(ClientSecret::empty());

		self
	}

	/// Toggles challenge responses.
	pub fn respond_with_challenges(mut self, enabled: bool) -> Self {
		self.respond_with_challenges = enabled;

		self
	}

	/// Appends a redirect URI, preserving insertion order.
	pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
		self.redirect_uris.push(uri.into());

		self
	}

	/// Replaces the redirect URI list.
	pub fn redirect_uris<I, S>(mut self, uris: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.redirect_uris = uris.into_iter().map(Into::into).collect();

		self
	}

	/// Sets the grant method.
	pub fn grant_method(mut self, method: GrantMethod) -> Self {
		self.grant_method = method;

		self
	}

	/// Appends a scope restriction.
	pub fn scope_restriction(mut self, restriction: ScopeRestriction) -> Self {
		self.scope_restrictions.push(restriction);

		self
	}

	/// Consumes the builder, generating a 256-bit secret if none was set.
	pub fn build(self) -> OAuthClient {
		let secret = self
			.secret
			.unwrap_or_else(|| ClientSecret::new(entropy::random_256_bits_string()));

		OAuthClient {
			name: self.name,
			secret,
			respond_with_challenges: self.respond_with_challenges,
			redirect_uris: self.redirect_uris,
			grant_method: self.grant_method,
			scope_restrictions: self.scope_restrictions,
		}
	}
}

/// Opaque optimistic-concurrency token assigned by the store on every write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVersion(u64);
impl ResourceVersion {
	/// Version assigned to a freshly created record.
	pub const INITIAL: Self = Self(1);

	/// Wraps a raw version value.
	pub const fn new(value: u64) -> Self {
		Self(value)
	}

	/// Returns the raw version value.
	pub const fn get(self) -> u64 {
		self.0
	}

	/// Version a store assigns after the next successful write.
	pub const fn next(self) -> Self {
		Self(self.0.saturating_add(1))
	}
}
impl Display for ResourceVersion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)
	}
}

/// Client as held by the store, with its version token and bookkeeping timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredClient {
	/// Client fields.
	pub client: OAuthClient,
	/// Version observed when the record was read.
	pub version: ResourceVersion,
	/// Instant the record was first created.
	pub created_at: OffsetDateTime,
	/// Instant of the last successful write.
	pub updated_at: OffsetDateTime,
}
impl StoredClient {
	/// Name of the stored client.
	pub fn name(&self) -> &ClientName {
		&self.client.name
	}

	/// Compares client fields only, ignoring the version token and timestamps.
	pub fn matches(&self, client: &OAuthClient) -> bool {
		&self.client == client
	}
}
