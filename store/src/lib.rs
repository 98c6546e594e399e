//! Abstract lookup traits for Eden delegates.
//!
//! Every backend (snapshot file, chain API, in-memory for testing) implements
//! these traits. The rest of the codebase depends only on the traits.

pub mod election;
pub mod error;
pub mod member;
pub mod snapshot;

pub use election::ElectionSource;
pub use error::StoreError;
pub use member::MemberDirectory;
pub use snapshot::{Snapshot, SnapshotStore};
