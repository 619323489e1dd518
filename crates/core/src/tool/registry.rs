use std::collections::BTreeMap;
use std::sync::Arc;

use persona_agent_model::{ModelTool, ToolCallRequest};
use serde_json::Value;
use tracing::Instrument;

use crate::error::{Error, Result};
use crate::tool::{ErrorKind, ToolContext, ToolObject};

/// The set of tools an agent can dispatch to, keyed by name.
///
/// Built once when the agent is built and read-only afterwards.
#[derive(Clone, Default)]
pub struct Registry {
    tools: BTreeMap<String, Arc<dyn ToolObject>>,
}

impl Registry {
    pub fn with_tools(tools: Vec<Arc<dyn ToolObject>>) -> Result<Self> {
        let mut registry = Self::default();
        for tool in tools {
            let name = tool.name().to_owned();
            if registry.tools.contains_key(&name) {
                return Err(Error::DuplicateTool { name });
            }
            registry.tools.insert(name, tool);
        }
        Ok(registry)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns the schemas to advertise to the model, ordered by name.
    #[inline]
    pub fn definitions(&self) -> Vec<ModelTool> {
        self.tools
            .values()
            .map(|tool| ModelTool {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                parameters: tool.parameter_schema().clone(),
            })
            .collect()
    }

    /// Runs one tool call and returns its structured result.
    pub async fn dispatch(
        &self,
        req: &ToolCallRequest,
        context: ToolContext,
    ) -> Result<Value> {
        let Some(tool) = self.tools.get(&req.name) else {
            warn!("tool not found: {}", req.name);
            return Err(Error::ToolNotFound {
                name: req.name.clone(),
            });
        };

        let raw = req.arguments.trim();
        let arguments = if raw.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str::<Value>(raw).map_err(|err| {
                Error::InvalidToolArguments {
                    name: req.name.clone(),
                    reason: format!("{err}"),
                }
            })?
        };

        trace!("running tool {} ({}) with args: {arguments}", req.name, req.id);
        let span = debug_span!("tool dispatch", name = %req.name, id = %req.id);
        tool.execute(context, arguments)
            .instrument(span)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::MalformedArguments => Error::InvalidToolArguments {
                    name: req.name.clone(),
                    reason: err.reason().into_owned(),
                },
                _ => Error::ToolExecutionFailure {
                    name: req.name.clone(),
                    source: err,
                },
            })
    }
}
