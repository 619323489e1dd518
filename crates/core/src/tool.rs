//! Tool call supports.

mod error;
mod object;
mod registry;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::conversation::ConversationTurn;
pub use error::{Error, ErrorKind};
pub(crate) use object::{ToolObject, ToolObjectImpl};
pub(crate) use registry::Registry;

/// The result of a tool call.
pub type ToolResult<T = Value> = Result<T, Error>;

/// What a tool can see about the turn that invoked it.
#[derive(Clone, Debug)]
pub struct ToolContext {
    message: Arc<str>,
    history: Arc<[ConversationTurn]>,
}

impl ToolContext {
    /// Creates a context for answering `message` after `history`.
    #[inline]
    pub fn new(message: &str, history: &[ConversationTurn]) -> Self {
        Self {
            message: Arc::from(message),
            history: Arc::from(history),
        }
    }

    /// Returns the user message being answered.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the conversation history supplied by the caller.
    #[inline]
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }
}

/// A tool that can be called by the model.
///
/// Implementations of this trait should be stateless after construction.
/// A single instance serves every conversation the agent handles, possibly
/// concurrently.
///
/// Arguments produced by the model are deserialized into [`Tool::Input`]
/// before [`Tool::execute`] is called. If that fails the tool never runs,
/// so `execute` only has to check what the type system cannot express.
pub trait Tool: Send + Sync + 'static {
    /// The type of input that the tool accepts.
    type Input: DeserializeOwned;

    /// The structured result returned to the model.
    type Output: Serialize + Send;

    /// Returns the name of the tool, unique within an agent.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Returns the parameter schema of the tool.
    fn parameter_schema(&self) -> &Value;

    /// Executes the tool with the given input.
    ///
    /// This method must return a future that is fully independent of `self`.
    fn execute(
        &self,
        context: ToolContext,
        input: Self::Input,
    ) -> impl Future<Output = ToolResult<Self::Output>> + Send + 'static;
}
