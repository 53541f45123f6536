//! The two well-known OAuth clients every cluster relies on.
//!
//! The browser client serves the token display page and authenticates with a generated
//! 256-bit secret; the challenging client is the public client used by command-line tools
//! and answers with auth challenges. Both are derived from the cluster's public URL.

// self
use crate::{
	_prelude::*,
	client::{ClientName, GrantMethod, OAuthClient},
	error::ConfigError,
	reconcile::{ReconcileOutcome, Reconciler},
};

/// Name of the browser-facing client.
pub const BROWSER_CLIENT_NAME: &str = "openshift-browser-client";
/// Name of the challenge-responding command-line client.
pub const CHALLENGING_CLIENT_NAME: &str = "openshift-challenging-client";

const TOKEN_DISPLAY_PATH: &str = "oauth/token/display";
const TOKEN_IMPLICIT_PATH: &str = "oauth/token/implicit";

/// Desired records for the bootstrap clients, built once per reconcile pass.
#[derive(Clone, Debug)]
pub struct BootstrapClients {
	/// Browser client with a generated secret.
	pub browser: OAuthClient,
	/// Public command-line client.
	pub challenging: OAuthClient,
}
impl BootstrapClients {
	/// Builds both clients for the provided public URL.
	///
	/// A fresh secret is generated for the browser client on every call; the reconciler's
	/// merge policy keeps an existing secret of equal length, so repeated passes do not rotate
	/// it.
	pub fn new(public_url: &Url) -> Result<Self, ConfigError> {
		let browser = OAuthClient::builder(ClientName::new(BROWSER_CLIENT_NAME)?)
			.respond_with_challenges(false)
			.redirect_uri(token_display_url(public_url)?)
			.grant_method(GrantMethod::Auto)
			.build();
		let challenging = OAuthClient::builder(ClientName::new(CHALLENGING_CLIENT_NAME)?)
			.without_secret()
			.respond_with_challenges(true)
			.redirect_uri(token_implicit_url(public_url)?)
			.grant_method(GrantMethod::Auto)
			.build();

		Ok(Self { browser, challenging })
	}

	/// Both clients in reconcile order.
	pub fn as_array(&self) -> [&OAuthClient; 2] {
		[&self.browser, &self.challenging]
	}
}

/// URL of the page that displays a freshly issued token.
pub fn token_display_url(public_url: &Url) -> Result<String, ConfigError> {
	Ok(join_path(public_url, TOKEN_DISPLAY_PATH)?.into())
}

/// Redirect target for the implicit token flow.
pub fn token_implicit_url(public_url: &Url) -> Result<String, ConfigError> {
	Ok(join_path(public_url, TOKEN_IMPLICIT_PATH)?.into())
}

fn join_path(base: &Url, path: &str) -> Result<Url, ConfigError> {
	let mut base = base.clone();

	// `Url::join` drops the last segment unless the base ends with a slash.
	if !base.path().ends_with('/') {
		let with_slash = format!("{}/", base.path());

		base.set_path(&with_slash);
	}

	Ok(base.join(path)?)
}

impl Reconciler {
	/// Ensures the browser client, then the challenging client, stopping at the first error.
	pub async fn ensure_bootstrap_clients(
		&self,
		clients: &BootstrapClients,
	) -> Result<[ReconcileOutcome; 2]> {
		let browser = self.ensure(&clients.browser).await?;
		let challenging = self.ensure(&clients.challenging).await?;

		Ok([browser, challenging])
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Public URL fixture should parse successfully.")
	}

	#[test]
	fn redirect_urls_append_to_base_path() {
		assert_eq!(
			token_display_url(&url("https://api.example.com:6443"))
				.expect("Display URL should join."),
			"https://api.example.com:6443/oauth/token/display"
		);
		assert_eq!(
			token_implicit_url(&url("https://example.com/prefix"))
				.expect("Implicit URL should join."),
			"https://example.com/prefix/oauth/token/implicit"
		);
		assert_eq!(
			token_implicit_url(&url("https://example.com/prefix/"))
				.expect("Implicit URL should join."),
			"https://example.com/prefix/oauth/token/implicit"
		);
	}

	#[test]
	fn bootstrap_clients_have_expected_shape() {
		let clients = BootstrapClients::new(&url("https://master.example.com"))
			.expect("Bootstrap clients should build.");

		assert_eq!(clients.browser.name.as_str(), BROWSER_CLIENT_NAME);
		assert_eq!(clients.browser.secret.len(), 43);
		assert!(!clients.browser.respond_with_challenges);
		assert_eq!(clients.browser.redirect_uris, ["https://master.example.com/oauth/token/display"]);
		assert_eq!(clients.browser.grant_method, GrantMethod::Auto);

		assert_eq!(clients.challenging.name.as_str(), CHALLENGING_CLIENT_NAME);
		assert!(clients.challenging.secret.is_empty());
		assert!(clients.challenging.respond_with_challenges);
		assert_eq!(
			clients.challenging.redirect_uris,
			["https://master.example.com/oauth/token/implicit"]
		);
		assert_eq!(clients.as_array()[1], &clients.challenging);
	}
}
