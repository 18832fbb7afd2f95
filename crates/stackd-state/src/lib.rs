//! Lifecycle state recording for tasks, applications and stacks.
//!
//! The scheduler writes transitions here on a best-effort basis; nothing in
//! the matching path reads them back.
mod error;
pub use error::{StateError, StateResult};

mod record;
pub use record::{Props, RecordKind, StateRecord};

mod storage;
pub use storage::{StateHandle, StateStorage, noop_storage};

mod noop;
pub use noop::NoopStateStorage;

mod memory;
pub use memory::MemoryStateStorage;

mod redb_store;
pub use redb_store::RedbStateStorage;
