mod builder;
mod state;

use std::sync::Arc;

use persona_agent_model::{ModelProvider, ModelTool};
use tracing::Instrument;

use crate::conversation::ConversationTurn;
use crate::error::Result;
use crate::evaluator::{Evaluation, Evaluator};
use crate::persona::Persona;
use crate::responder::Responder;
use crate::tool::Registry;
pub use builder::AgentBuilder;
use state::TurnState;

/// How many times a rejected reply is revised before the last draft is
/// returned anyway.
pub const MAX_REEVALUATION_ATTEMPTS: usize = 3;

/// How many tool rounds one chat turn may take unless configured
/// otherwise.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// An agent answering as a persona, with every reply checked by a second
/// model before it is returned.
///
/// The agent holds no conversation state. Each call to [`Agent::chat`] gets
/// the whole history from the caller, and everything produced while
/// answering is dropped when it returns. Clones share the same backends and
/// tools, so one agent can serve many conversations concurrently. Turns of
/// the *same* conversation must be serialized by the caller.
#[derive(Clone)]
pub struct Agent {
    inner: Arc<AgentInner>,
}

struct AgentInner {
    responder: Responder,
    evaluator: Evaluator,
    registry: Registry,
    tool_definitions: Vec<ModelTool>,
    max_tool_rounds: Option<usize>,
}

/// Everything known about a finished chat turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatOutcome {
    /// The reply for the visitor.
    pub reply: String,
    /// The last verdict on `reply`. It is a rejection when the revision
    /// attempts ran out.
    pub evaluation: Evaluation,
    /// How many revision rounds were run.
    pub revisions: usize,
    /// How many tool calls were dispatched.
    pub tool_calls: usize,
}

impl Agent {
    /// Creates a builder with the persona and the two backends.
    #[inline]
    pub fn builder<R, E>(
        persona: Persona,
        responder_provider: R,
        evaluator_provider: E,
    ) -> AgentBuilder
    where
        R: ModelProvider + 'static,
        E: ModelProvider + 'static,
    {
        AgentBuilder::new(persona, responder_provider, evaluator_provider)
    }

    /// Returns the persona this agent speaks as.
    #[inline]
    pub fn persona(&self) -> &Persona {
        self.inner.responder.persona()
    }

    /// Answers `message` given the earlier `history`.
    ///
    /// The returned reply has always been evaluated. If it was rejected
    /// [`MAX_REEVALUATION_ATTEMPTS`] times after the first draft, the last
    /// revision is returned as is.
    pub async fn chat(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<String> {
        let outcome = self.chat_with_outcome(message, history).await?;
        Ok(outcome.reply)
    }

    /// Like [`Agent::chat`], but also reports how the reply was reached.
    pub async fn chat_with_outcome(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<ChatOutcome> {
        let span = info_span!("chat", history_len = history.len());
        async move {
            info!("answering a message");
            let result = TurnState::new(&self.inner, message, history).run().await;
            match &result {
                Ok(outcome) => info!(
                    accepted = outcome.evaluation.is_acceptable,
                    revisions = outcome.revisions,
                    tool_calls = outcome.tool_calls,
                    "chat turn finished"
                ),
                Err(err) => error!("chat turn failed: {err}"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
