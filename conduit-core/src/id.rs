//! Typed ID wrappers for conversations and trace correlation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed IDs prevent mixing up a conversation id with a trace id at a call
/// site. Both are plain strings underneath — the core never validates or
/// generates their format, it only carries whatever the caller supplied.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new typed ID from anything that converts to String.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

typed_id!(ConversationId, "Unique identifier for a conversation.");
typed_id!(
    TraceId,
    "Correlation identifier for a turn's trace spans and events. Always caller-supplied; the core never generates one."
);
