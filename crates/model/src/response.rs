use serde::{Deserialize, Serialize};

/// A complete response from the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The text content of the reply, if any.
    pub content: Option<String>,
    /// Tool calls requested by the model, in the order it returned them.
    pub tool_calls: Vec<ToolCallRequest>,
    /// The reason the model finished generating.
    pub finish_reason: ModelFinishReason,
}

impl ModelResponse {
    /// Creates a plain text response that finished normally.
    #[inline]
    pub fn text<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: vec![],
            finish_reason: ModelFinishReason::Stop,
        }
    }

    /// Returns `true` if the model is asking for tools to be called.
    #[inline]
    pub fn wants_tools(&self) -> bool {
        self.finish_reason == ModelFinishReason::ToolCalls
            || !self.tool_calls.is_empty()
    }
}

/// The reason why a model response has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFinishReason {
    /// The model needs to call a tool.
    ToolCalls,
    /// The model has finished generating text.
    Stop,
    /// The output was cut at the token limit.
    Length,
    /// The output was withheld by a content filter.
    ContentFilter,
}

/// Describes a tool call request from the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The arguments as produced by the model, expected to be a JSON
    /// object. They are not validated at this layer.
    pub arguments: String,
}
