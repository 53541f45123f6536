// std
use std::sync::Arc;
// self
use oauth_client_reconciler::{
	bootstrap::{BROWSER_CLIENT_NAME, BootstrapClients, CHALLENGING_CLIENT_NAME},
	client::ClientName,
	reconcile::{ReconcileOutcome, Reconciler},
	store::MemoryStore,
	url::Url,
};

fn public_url() -> Url {
	Url::parse("https://api.cluster.example.com:6443").expect("Public URL fixture should parse.")
}

fn name(value: &str) -> ClientName {
	ClientName::new(value).expect("Client name fixture should be valid.")
}

#[tokio::test]
async fn bootstrap_is_stable_across_passes() -> color_eyre::Result<()> {
	let store = Arc::new(MemoryStore::default());
	let reconciler = Reconciler::new(store.clone());
	let first_pass = BootstrapClients::new(&public_url())?;
	let outcomes = reconciler.ensure_bootstrap_clients(&first_pass).await?;

	assert_eq!(outcomes, [ReconcileOutcome::Created, ReconcileOutcome::Created]);

	let browser_secret = store
		.snapshot(&name(BROWSER_CLIENT_NAME))
		.map(|stored| stored.client.secret)
		.expect("Browser client should be stored.");

	// A fresh pass generates a new secret of the same length, which must not rotate the
	// stored one.
	let second_pass = BootstrapClients::new(&public_url())?;

	assert_ne!(second_pass.browser.secret, browser_secret);

	let outcomes = reconciler.ensure_bootstrap_clients(&second_pass).await?;

	assert_eq!(outcomes, [ReconcileOutcome::Unchanged, ReconcileOutcome::Unchanged]);
	assert_eq!(
		store.snapshot(&name(BROWSER_CLIENT_NAME)).map(|stored| stored.client.secret),
		Some(browser_secret)
	);
	assert_eq!(reconciler.metrics.writes(), 2);

	Ok(())
}

#[tokio::test]
async fn moved_public_url_rewrites_redirects_only() -> color_eyre::Result<()> {
	let store = Arc::new(MemoryStore::default());
	let reconciler = Reconciler::new(store.clone());

	reconciler.ensure_bootstrap_clients(&BootstrapClients::new(&public_url())?).await?;

	let before = store
		.snapshot(&name(CHALLENGING_CLIENT_NAME))
		.expect("Challenging client should be stored.");
	let moved = Url::parse("https://oauth.example.org")?;
	let outcomes = reconciler.ensure_bootstrap_clients(&BootstrapClients::new(&moved)?).await?;

	assert_eq!(outcomes, [ReconcileOutcome::Updated { attempts: 1 }; 2]);

	let after = store
		.snapshot(&name(CHALLENGING_CLIENT_NAME))
		.expect("Challenging client should be stored.");

	assert_eq!(after.client.redirect_uris, ["https://oauth.example.org/oauth/token/implicit"]);
	assert!(after.client.secret.is_empty());
	assert_eq!(after.client.respond_with_challenges, before.client.respond_with_challenges);
	assert_eq!(after.version, before.version.next());

	Ok(())
}
