use persona_agent_model::{ModelMessage, ModelRequest, ResponseFormat};
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use crate::conversation::ConversationTurn;
use crate::error::{Error, Result};
use crate::model_client::ModelClient;
use crate::persona::Persona;
use crate::prompt;

/// The evaluator's verdict on one candidate reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Evaluation {
    /// Whether the reply may be shown to the visitor.
    pub is_acceptable: bool,
    /// Why the reply was rejected, or remarks on an accepted one.
    pub feedback: String,
}

/// Judges drafts on the secondary backend.
pub(crate) struct Evaluator {
    client: ModelClient,
    system_prompt: String,
    response_format: ResponseFormat,
}

impl Evaluator {
    pub fn new(client: ModelClient, persona: &Persona) -> Self {
        Self {
            client,
            system_prompt: prompt::evaluator_system_prompt(persona),
            response_format: evaluation_format(),
        }
    }

    /// Evaluates `reply` as an answer to `message`.
    ///
    /// Every call is independent, nothing is remembered between them.
    pub async fn run(
        &self,
        reply: &str,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<Evaluation> {
        let req = ModelRequest {
            messages: vec![
                ModelMessage::System(self.system_prompt.clone()),
                ModelMessage::User(prompt::evaluator_user_prompt(
                    reply, message, history,
                )),
            ],
            tools: vec![],
            response_format: Some(self.response_format.clone()),
        };
        let resp = self.client.send_request(req).await?;

        let backend = self.client.backend();
        let Some(text) = resp.content else {
            return Err(Error::invalid_response(backend, "verdict has no text"));
        };
        serde_json::from_str(strip_code_fence(&text)).map_err(|err| {
            Error::invalid_response(backend, format!("malformed verdict: {err}"))
        })
    }
}

fn evaluation_format() -> ResponseFormat {
    let mut schema = schema_for!(Evaluation).to_value();
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }
    ResponseFormat {
        name: "evaluation".to_owned(),
        schema,
    }
}

/// Unwraps a markdown code block, which some backends emit around
/// structured output.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    match inner.split_once('\n') {
        Some((tag, body)) if !tag.contains('{') => body.trim(),
        _ => inner.trim(),
    }
}
