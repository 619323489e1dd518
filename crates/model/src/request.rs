use serde_json::Value;

use crate::ToolCallRequest;

/// A request to be sent to the model provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelRequest {
    /// The input messages.
    pub messages: Vec<ModelMessage>,
    /// Tools that are available to the model.
    ///
    /// An empty list disables tool calling for this request.
    pub tools: Vec<ModelTool>,
    /// Constrains the reply to a JSON object of the given shape.
    pub response_format: Option<ResponseFormat>,
}

/// A complete message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelMessage {
    /// The system instructions.
    System(String),
    /// A user input text.
    User(String),
    /// An assistant text.
    Assistant(String),
    /// An assistant turn that asked for tools to be called.
    ///
    /// Backends usually require this turn to precede the matching
    /// [`ModelMessage::Tool`] results.
    ToolCalls(Vec<ToolCallRequest>),
    /// A tool call result.
    Tool(ToolCallResult),
}

/// The result of calling a tool.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolCallResult {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The result of the tool call.
    pub content: String,
}

/// Describes a tool that can be used by the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelTool {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool.
    ///
    /// For most model providers, the parameters should typically be
    /// defined by a [JSON schema](https://json-schema.org/).
    pub parameters: Value,
}

/// Asks the model to answer with a JSON object matching a schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseFormat {
    /// A short identifier for the schema.
    pub name: String,
    /// The JSON schema the reply must conform to.
    pub schema: Value,
}
