use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;

use persona_agent_model::{
    ErrorKind, ModelFinishReason, ModelMessage, ModelProvider,
    ModelProviderError, ModelRequest, ModelResponse, ToolCallRequest,
};

#[derive(Debug)]
struct FakeModelProviderError(ErrorKind);

impl Display for FakeModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeModelProviderError {}

impl ModelProviderError for FakeModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user message back, or asks for the `lookup` tool when
/// the message starts with `lookup:`.
struct FakeModelProvider;

impl ModelProvider for FakeModelProvider {
    type Error = FakeModelProviderError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let result = 'blk: {
            let Some(input) = req.messages.iter().rev().find_map(|msg| match msg {
                ModelMessage::User(text) => Some(text.as_str()),
                _ => None,
            }) else {
                break 'blk Err(FakeModelProviderError(ErrorKind::Other));
            };

            if let Some(key) = input.strip_prefix("lookup:") {
                if req.tools.is_empty() {
                    break 'blk Err(FakeModelProviderError(
                        ErrorKind::InvalidResponse,
                    ));
                }
                break 'blk Ok(ModelResponse {
                    content: None,
                    tool_calls: vec![ToolCallRequest {
                        id: "call:0".to_owned(),
                        name: "lookup".to_owned(),
                        arguments: format!(r#"{{"key":"{}"}}"#, key.trim()),
                    }],
                    finish_reason: ModelFinishReason::ToolCalls,
                });
            }

            Ok(ModelResponse::text(format!("You said {input}")))
        };
        ready(result)
    }
}

mod tests {
    use persona_agent_model::ModelTool;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_completion() {
        let provider = FakeModelProvider;
        let req = ModelRequest {
            messages: vec![ModelMessage::User("Good morning".to_owned())],
            ..Default::default()
        };
        let resp = provider.send_request(&req).await.unwrap();

        assert_eq!(resp.content.as_deref(), Some("You said Good morning"));
        assert!(!resp.wants_tools());
    }

    #[tokio::test]
    async fn test_tool_call() {
        let provider = FakeModelProvider;
        let req = ModelRequest {
            messages: vec![ModelMessage::User("lookup: weather".to_owned())],
            tools: vec![ModelTool {
                name: "lookup".to_owned(),
                description: "Looks a key up.".to_owned(),
                parameters: json!({ "type": "object" }),
            }],
            response_format: None,
        };
        let resp = provider.send_request(&req).await.unwrap();

        assert!(resp.wants_tools());
        assert_eq!(resp.tool_calls.len(), 1);
        assert_eq!(resp.tool_calls[0].arguments, r#"{"key":"weather"}"#);
    }

    #[tokio::test]
    async fn test_error() {
        let provider = FakeModelProvider;
        let result = provider.send_request(&ModelRequest::default()).await;
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
