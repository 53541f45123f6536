//! Field-level merge policy applied when the desired client already exists.

// self
use crate::client::OAuthClient;

/// Merges `desired` into a copy of `current`.
///
/// | Field | Rule |
/// |---|---|
/// | `secret` | Empty desired secret clears it; otherwise replaced only when the current one is shorter. |
/// | `respond_with_challenges`, `redirect_uris`, `grant_method`, `scope_restrictions` | Replaced. |
/// | `name` | Kept. |
///
/// The secret rule keeps a previously rotated, longer secret from being downgraded by a pass
/// carrying an older value.
pub fn merge_into(current: &OAuthClient, desired: &OAuthClient) -> OAuthClient {
	let mut merged = current.clone();

	if desired.secret.is_empty() || merged.secret.len() < desired.secret.len() {
		merged.secret = desired.secret.clone();
	}

	merged.respond_with_challenges = desired.respond_with_challenges;
	merged.redirect_uris = desired.redirect_uris.clone();
	merged.grant_method = desired.grant_method;
	merged.scope_restrictions = desired.scope_restrictions.clone();

	merged
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::client::{ClientName, ClusterRoleScopeRestriction, GrantMethod, ScopeRestriction};

	fn client(secret: &str) -> OAuthClient {
		let name = ClientName::new("merge-client").expect("Client name fixture should be valid.");

		OAuthClient::builder(name).secret(secret).build()
	}

	#[test]
	fn longer_desired_secret_wins() {
		let merged = merge_into(&client("abc"), &client("abcdXYZ12"));

		assert_eq!(merged.secret.expose(), "abcdXYZ12");
	}

	#[test]
	fn shorter_or_equal_desired_secret_is_ignored() {
		let merged = merge_into(&client("abcdXYZ12"), &client("abc"));

		assert_eq!(merged.secret.expose(), "abcdXYZ12");

		let merged = merge_into(&client("aaaa"), &client("bbbb"));

		assert_eq!(merged.secret.expose(), "aaaa");
	}

	#[test]
	fn empty_desired_secret_clears() {
		let merged = merge_into(&client("abcdXYZ12"), &client(""));

		assert!(merged.secret.is_empty());
	}

	#[test]
	fn secret_rule_holds_for_all_small_lengths() {
		for stored_len in 0..6 {
			for desired_len in 0..6 {
				let stored = client(&"s".repeat(stored_len));
				let desired = client(&"d".repeat(desired_len));
				let merged = merge_into(&stored, &desired);
				let expected = if desired_len == 0 || desired_len > stored_len {
					&desired.secret
				} else {
					&stored.secret
				};

				assert_eq!(&merged.secret, expected, "stored={stored_len} desired={desired_len}");
			}
		}
	}

	#[test]
	fn replace_fields_take_desired_values() {
		let mut current = client("secret");

		current.respond_with_challenges = true;
		current.redirect_uris =
			vec!["https://old.example.com".into(), "https://keep.example.com".into()];
		current.grant_method = GrantMethod::Deny;
		current.scope_restrictions = vec![ScopeRestriction::Literals(vec!["old".into()])];

		let mut desired = client("secret");

		desired.redirect_uris = vec!["https://new.example.com".into()];
		desired.grant_method = GrantMethod::Prompt;
		desired.scope_restrictions =
			vec![ScopeRestriction::ClusterRole(ClusterRoleScopeRestriction {
				role_names: vec!["view".into()],
				namespaces: vec!["*".into()],
				allow_escalation: false,
			})];

		let merged = merge_into(&current, &desired);

		assert!(!merged.respond_with_challenges);
		assert_eq!(merged.redirect_uris, desired.redirect_uris);
		assert_eq!(merged.grant_method, GrantMethod::Prompt);
		assert_eq!(merged.scope_restrictions, desired.scope_restrictions);
		assert_eq!(merged.name, current.name);
	}

	#[test]
	fn merging_a_matching_client_is_identity() {
		let current = client("secret");

		assert_eq!(merge_into(&current, &current), current);
	}
}
