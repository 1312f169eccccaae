#![deny(missing_docs)]
//! # conduit-memory
//!
//! Implementations of `conduit_core::MemoryBoundary` — `InMemoryMemory`,
//! `DisabledMemory`, `PersistentMemory` — plus the out-of-scope
//! `LongTermMemory` interface (§4.8).

mod disabled;
mod in_memory;
mod long_term;
mod persistent;

pub use disabled::DisabledMemory;
pub use in_memory::InMemoryMemory;
pub use long_term::{DisabledLongTermMemory, LongTermMemory};
pub use persistent::PersistentMemory;
