#![deny(missing_docs)]
//! # conduit-provider
//!
//! `ModelBackend` implementations: `MockBackend` for tests, `HttpChatBackend`
//! for any OpenAI-compatible chat endpoint, plus the shared `[TOOL_CALL]`
//! marker parser both rely on (§4.5, §6).

mod http_chat;
mod marker;
mod mock;

pub use http_chat::HttpChatBackend;
pub use marker::extract_tool_call;
pub use mock::MockBackend;
