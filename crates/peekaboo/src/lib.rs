//! Umbrella crate for Peekaboo.
//!
//! This crate is intentionally small: it re-exports the engine and protocol
//! crates so downstream code can depend on a single crate name (`peekaboo`).

pub use peekaboo_engine as engine;
pub use peekaboo_protocol as protocol;
