//! Domain types.

mod credentials;
mod diff;
mod entry;
mod keypair;
mod report;

pub use credentials::{CloudTarget, Credential, CredentialContext, Mode};
pub use diff::{Diff, DiffEntry, EntryStatus};
pub use entry::ConfigEntry;
pub use keypair::{Jwk, Jwks, SecretKeyPair};
pub use report::SyncReport;
