//! OAuth client records: validated names, redacted secrets, grant policies, and the desired /
//! stored record shapes the reconciler converges.

pub mod grant;
pub mod name;
pub mod record;
pub mod scope;
pub mod secret;

pub use grant::*;
pub use name::*;
pub use record::*;
pub use scope::*;
pub use secret::*;
