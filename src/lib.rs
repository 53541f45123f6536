//! Desired-state reconciler for OAuth client records: create-if-absent, secret-preserving
//! merges, and conflict-aware retries against strongly consistent, versioned stores.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod bootstrap;
pub mod client;
pub mod entropy;
pub mod error;
pub mod obs;
pub mod reconcile;
pub mod store;

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use color_eyre as _;
