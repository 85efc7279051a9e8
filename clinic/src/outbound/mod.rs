//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **storage**: key-value stores backing session persistence, in memory
//!   or as one file per key under a capability-scoped directory.
//!
//! Adapters translate between domain types and their medium. They contain
//! no business logic.

pub mod storage;
