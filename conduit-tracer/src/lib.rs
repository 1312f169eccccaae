#![deny(missing_docs)]
//! # conduit-tracer
//!
//! Implementations of `conduit_core::Tracer`: a no-op default, a
//! `tracing`-crate-backed structured tracer enforcing the deny-list (§4.9),
//! and the invariant-alarm counter both can share.

mod alarm;
mod noop;
mod structured;

pub use alarm::InvariantAlarm;
pub use noop::NoopTracer;
pub use structured::StructuredTracer;
