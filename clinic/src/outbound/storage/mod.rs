//! Key-value store adapters for the session store.

mod atomic_io;
mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
