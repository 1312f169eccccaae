#![deny(missing_docs)]
//! # conduit-prompt
//!
//! The system contract string and the pure `assemble_prompt` budget-trimming
//! function (§4.7).

mod assemble;
mod contract;

pub use assemble::assemble_prompt;
pub use contract::SYSTEM_CONTRACT;
