use persona_agent_model::{
    ModelFinishReason, ModelMessage, ModelRequest, ModelTool, ToolCallRequest,
};

use crate::conversation::ConversationTurn;
use crate::error::{Error, Result};
use crate::model_client::ModelClient;
use crate::persona::Persona;
use crate::prompt;

/// What the responder produced for one drafting request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Draft {
    /// The model wants these tools to run before it answers.
    ToolRequest(Vec<ToolCallRequest>),
    /// A reply meant for the visitor.
    Reply(String),
}

/// Drafts and revises replies on the primary backend.
pub(crate) struct Responder {
    client: ModelClient,
    persona: Persona,
    system_prompt: String,
}

impl Responder {
    pub fn new(client: ModelClient, persona: Persona) -> Self {
        let system_prompt = prompt::responder_system_prompt(&persona);
        Self {
            client,
            persona,
            system_prompt,
        }
    }

    #[inline]
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Returns the opening turns of a drafting request.
    pub fn initial_messages(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Vec<ModelMessage> {
        prompt::responder_messages(&self.system_prompt, history, message)
            .iter()
            .map(ConversationTurn::to_model_message)
            .collect()
    }

    /// Asks the backend for the next draft given the working messages.
    pub async fn generate(
        &self,
        messages: &[ModelMessage],
        tools: Vec<ModelTool>,
    ) -> Result<Draft> {
        let resp = self
            .client
            .send_request(ModelRequest {
                messages: messages.to_vec(),
                tools,
                response_format: None,
            })
            .await?;

        if resp.wants_tools() {
            if resp.tool_calls.is_empty() {
                return Err(Error::invalid_response(
                    self.client.backend(),
                    "finished for tool calls but requested none",
                ));
            }
            debug!("model requested {} tool call(s)", resp.tool_calls.len());
            return Ok(Draft::ToolRequest(resp.tool_calls));
        }

        if resp.finish_reason != ModelFinishReason::Stop {
            warn!("draft finished with {:?}", resp.finish_reason);
        }
        self.take_text(resp.content).map(Draft::Reply)
    }

    /// Asks for a corrected reply. No tools are offered, so the backend can
    /// only answer with text.
    pub async fn revise(
        &self,
        prior_draft: &str,
        message: &str,
        history: &[ConversationTurn],
        feedback: &str,
    ) -> Result<String> {
        let messages = prompt::revision_messages(
            &self.persona,
            prior_draft,
            feedback,
            history,
            message,
        )
        .iter()
        .map(ConversationTurn::to_model_message)
        .collect();

        let resp = self
            .client
            .send_request(ModelRequest {
                messages,
                ..Default::default()
            })
            .await?;
        self.take_text(resp.content)
    }

    fn take_text(&self, content: Option<String>) -> Result<String> {
        match content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(Error::invalid_response(
                self.client.backend(),
                "reply has no text",
            )),
        }
    }
}
