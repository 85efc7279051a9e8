//! Clinic client core: session lifecycle and appointment scheduling.
//!
//! The crate is laid out hexagonally. `domain` owns the session store, the
//! scheduling rules, appointment intake and the notification counter, and
//! talks to the outside world only through `domain::ports`. `outbound`
//! provides storage adapters. Rendering and navigation live outside the
//! crate and consume the domain through [`domain::ports::SessionContext`].

pub mod config;
pub mod domain;
pub mod outbound;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ClientSettings;
