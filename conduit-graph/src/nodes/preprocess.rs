//! Task-preprocessing node (§4.3): deterministic, never fails.

use async_trait::async_trait;
use conduit_core::types::{PreprocessingResult, StateDelta, TurnState};
use conduit_core::Node;

/// Trims whitespace from `raw_input` and carries `input_type`/`media_url`
/// through unchanged into a `PreprocessingResult`.
pub struct PreprocessNode;

#[async_trait]
impl Node for PreprocessNode {
    fn name(&self) -> &'static str {
        "preprocess"
    }

    async fn run(&self, state: &TurnState) -> StateDelta {
        StateDelta {
            preprocessing_result: Some(PreprocessingResult {
                normalized_text: state.raw_input.trim().to_string(),
                input_type: state.input_type,
                media_url: state.media_url.clone(),
            }),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_core::types::InputType;
    use conduit_core::{ConversationId, TraceId};

    #[tokio::test]
    async fn trims_whitespace() {
        let state = TurnState::new(
            ConversationId::new("c"),
            TraceId::new("t"),
            0,
            "  hello  ".into(),
            InputType::Text,
            None,
        );
        let delta = PreprocessNode.run(&state).await;
        assert_eq!(
            delta.preprocessing_result.unwrap().normalized_text,
            "hello"
        );
    }

    #[tokio::test]
    async fn carries_media_url_through() {
        let state = TurnState::new(
            ConversationId::new("c"),
            TraceId::new("t"),
            0,
            String::new(),
            InputType::Image,
            Some("https://example.com/a.png".into()),
        );
        let delta = PreprocessNode.run(&state).await;
        let result = delta.preprocessing_result.unwrap();
        assert_eq!(result.media_url.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(result.input_type, InputType::Image);
    }
}
