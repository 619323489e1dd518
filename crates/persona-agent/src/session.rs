use persona_agent_core::{
    Agent, AgentBuilder, ChatOutcome, ConversationTurn, Persona, Result,
};
use persona_agent_model::ModelProvider;

use crate::tools::*;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder,
    contact_tool: RecordContactTool,
}

impl SessionBuilder {
    /// Creates a session builder with the persona and the two backends.
    pub fn new<R, E>(
        persona: Persona,
        responder_provider: R,
        evaluator_provider: E,
    ) -> Self
    where
        R: ModelProvider + 'static,
        E: ModelProvider + 'static,
    {
        let agent_builder =
            AgentBuilder::new(persona, responder_provider, evaluator_provider);
        Self {
            agent_builder,
            contact_tool: RecordContactTool::new(),
        }
    }

    /// Sets how many tool rounds a single message may take.
    #[inline]
    pub fn with_max_tool_rounds(mut self, limit: usize) -> Self {
        self.agent_builder = self.agent_builder.with_max_tool_rounds(limit);
        self
    }

    /// Attaches a callback to be invoked when a visitor leaves their
    /// contact details.
    #[inline]
    pub fn on_contact_recorded(
        mut self,
        on_record: impl Fn(&ContactRecord) + Send + Sync + 'static,
    ) -> Self {
        self.contact_tool = self.contact_tool.on_record(on_record);
        self
    }

    /// Builds a new session with the built-in tools registered.
    pub fn build(self) -> Result<Session> {
        let agent = self.agent_builder.with_tool(self.contact_tool).build()?;
        Ok(Session::new(agent))
    }
}

/// A chat session, like a chat window showing one conversation.
///
/// The agent itself keeps no history. The session owns it on behalf of the
/// host and replays it with every message.
pub struct Session {
    agent: Agent,
    history: Vec<ConversationTurn>,
}

impl Session {
    /// Creates an empty session around an agent.
    #[inline]
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            history: vec![],
        }
    }

    /// Sends a message and waits for the reply.
    ///
    /// The exchange is added to the history only when a reply is produced.
    /// A failed message leaves the history as it was, so it can be retried.
    pub async fn send_message(&mut self, message: &str) -> Result<String> {
        let outcome = self.send_message_with_outcome(message).await?;
        Ok(outcome.reply)
    }

    /// Like [`Session::send_message`], but also reports how the reply was
    /// reached.
    pub async fn send_message_with_outcome(
        &mut self,
        message: &str,
    ) -> Result<ChatOutcome> {
        let outcome = self.agent.chat_with_outcome(message, &self.history).await?;
        self.history.push(ConversationTurn::user(message));
        self.history
            .push(ConversationTurn::assistant(outcome.reply.clone()));
        Ok(outcome)
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Forgets the conversation.
    #[inline]
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Returns the underlying agent.
    #[inline]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}
