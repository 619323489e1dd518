use std::sync::Arc;

use persona_agent_model::ModelProvider;

use super::{Agent, AgentInner, DEFAULT_MAX_TOOL_ROUNDS};
use crate::error::{Backend, Result};
use crate::evaluator::Evaluator;
use crate::model_client::ModelClient;
use crate::persona::Persona;
use crate::responder::Responder;
use crate::tool::{Registry, Tool, ToolObject, ToolObjectImpl};

/// [`Agent`] builder.
pub struct AgentBuilder {
    persona: Persona,
    responder_client: ModelClient,
    evaluator_client: ModelClient,
    tools: Vec<Arc<dyn ToolObject>>,
    max_tool_rounds: Option<usize>,
}

impl AgentBuilder {
    /// Creates a new builder with the persona, the backend drafting replies
    /// and the backend judging them.
    #[inline]
    pub fn new<R, E>(
        persona: Persona,
        responder_provider: R,
        evaluator_provider: E,
    ) -> Self
    where
        R: ModelProvider + 'static,
        E: ModelProvider + 'static,
    {
        Self {
            persona,
            responder_client: ModelClient::new(
                responder_provider,
                Backend::Responder,
            ),
            evaluator_client: ModelClient::new(
                evaluator_provider,
                Backend::Evaluator,
            ),
            tools: vec![],
            max_tool_rounds: Some(DEFAULT_MAX_TOOL_ROUNDS),
        }
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        self.tools.push(Arc::new(ToolObjectImpl(tool)));
        self
    }

    /// Sets how many tool rounds a single chat turn may take.
    ///
    /// A turn whose model asks for tools once more fails with
    /// [`Error::ToolRoundLimitExceeded`](crate::Error::ToolRoundLimitExceeded).
    #[inline]
    pub fn with_max_tool_rounds(mut self, limit: usize) -> Self {
        self.max_tool_rounds = Some(limit);
        self
    }

    /// Lets the model request tools for as many rounds as it likes.
    #[inline]
    pub fn without_tool_round_limit(mut self) -> Self {
        self.max_tool_rounds = None;
        self
    }

    /// Builds the agent.
    ///
    /// Fails if two tools share a name.
    pub fn build(self) -> Result<Agent> {
        let Self {
            persona,
            responder_client,
            evaluator_client,
            tools,
            max_tool_rounds,
        } = self;

        let registry = Registry::with_tools(tools)?;
        let tool_definitions = registry.definitions();
        if registry.is_empty() {
            debug!("no tools registered, tool calling is disabled");
        }

        let evaluator = Evaluator::new(evaluator_client, &persona);
        let responder = Responder::new(responder_client, persona);
        Ok(Agent {
            inner: Arc::new(AgentInner {
                responder,
                evaluator,
                registry,
                tool_definitions,
                max_tool_rounds,
            }),
        })
    }
}
