pub mod snapshot;

pub use crate::snapshot::{SnapshotError, SnapshotStore};
