use persona_agent_model::{
    ErrorKind, ModelFinishReason, ModelResponse, ToolCallRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The preset outcome of one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PresetResponse {
    /// A plain text reply.
    Text(String),
    /// A reply asking for these tools to be called.
    ToolCalls(Vec<ToolCallRequest>),
    /// A fully specified response, for shapes the helpers don't cover.
    Raw(ModelResponse),
    /// The request fails with an error of this kind.
    Failure(ErrorKind),
}

impl PresetResponse {
    /// Creates a plain text reply.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text(text.into())
    }

    /// Creates a text reply holding the serialized JSON value.
    #[inline]
    pub fn json(value: Value) -> Self {
        Self::Text(value.to_string())
    }

    /// Creates a reply asking for a single tool call.
    #[inline]
    pub fn tool_call(id: &str, name: &str, arguments: Value) -> Self {
        Self::ToolCalls(vec![ToolCallRequest {
            id: id.to_owned(),
            name: name.to_owned(),
            arguments: arguments.to_string(),
        }])
    }

    pub(crate) fn into_result(self) -> Result<ModelResponse, ErrorKind> {
        match self {
            PresetResponse::Text(text) => Ok(ModelResponse::text(text)),
            PresetResponse::ToolCalls(tool_calls) => Ok(ModelResponse {
                content: None,
                tool_calls,
                finish_reason: ModelFinishReason::ToolCalls,
            }),
            PresetResponse::Raw(response) => Ok(response),
            PresetResponse::Failure(kind) => Err(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let response = PresetResponse::tool_call(
            "call_1",
            "record_user_details",
            json!({ "email": "john@acme.com" }),
        );

        let serialized = serde_json::to_string(&response).unwrap();
        let deserialized: PresetResponse =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(response, deserialized);
    }

    #[test]
    fn test_json_preset_is_text() {
        let response =
            PresetResponse::json(json!({ "is_acceptable": true })).into_result();
        assert_eq!(
            response.unwrap().content.as_deref(),
            Some(r#"{"is_acceptable":true}"#)
        );
    }
}
