use persona_agent_model::{ModelMessage, ToolCallRequest, ToolCallResult};

use super::{AgentInner, ChatOutcome, MAX_REEVALUATION_ATTEMPTS};
use crate::conversation::ConversationTurn;
use crate::error::{Error, Result};
use crate::evaluator::Evaluation;
use crate::responder::Draft;
use crate::tool::ToolContext;

/// Where a chat turn is in its lifecycle.
#[derive(Debug)]
enum Stage {
    Drafting,
    ToolDispatch(Vec<ToolCallRequest>),
    Evaluating(String),
    Revising { draft: String, feedback: String },
    Done(ChatOutcome),
}

/// The working state of one chat turn.
///
/// It borrows the caller's history and is dropped as soon as the turn ends,
/// so nothing leaks into the next turn.
pub(super) struct TurnState<'a> {
    inner: &'a AgentInner,
    message: &'a str,
    history: &'a [ConversationTurn],
    messages: Vec<ModelMessage>,
    tool_context: ToolContext,
    tool_rounds: usize,
    tool_calls: usize,
    revisions: usize,
}

impl<'a> TurnState<'a> {
    pub fn new(
        inner: &'a AgentInner,
        message: &'a str,
        history: &'a [ConversationTurn],
    ) -> Self {
        Self {
            inner,
            message,
            history,
            messages: inner.responder.initial_messages(message, history),
            tool_context: ToolContext::new(message, history),
            tool_rounds: 0,
            tool_calls: 0,
            revisions: 0,
        }
    }

    pub async fn run(mut self) -> Result<ChatOutcome> {
        let mut stage = Stage::Drafting;
        loop {
            stage = match stage {
                Stage::Drafting => self.draft().await?,
                Stage::ToolDispatch(calls) => self.dispatch(calls).await?,
                Stage::Evaluating(draft) => self.evaluate(draft).await?,
                Stage::Revising { draft, feedback } => {
                    self.revise(draft, feedback).await?
                }
                Stage::Done(outcome) => return Ok(outcome),
            };
        }
    }

    async fn draft(&mut self) -> Result<Stage> {
        let draft = self
            .inner
            .responder
            .generate(&self.messages, self.inner.tool_definitions.clone())
            .await?;
        match draft {
            Draft::Reply(text) => Ok(Stage::Evaluating(text)),
            Draft::ToolRequest(calls) => {
                match self.inner.max_tool_rounds {
                    Some(limit) if self.tool_rounds >= limit => {
                        warn!("model still requests tools after {limit} rounds");
                        return Err(Error::ToolRoundLimitExceeded { limit });
                    }
                    _ => {}
                }
                self.tool_rounds += 1;
                Ok(Stage::ToolDispatch(calls))
            }
        }
    }

    async fn dispatch(&mut self, calls: Vec<ToolCallRequest>) -> Result<Stage> {
        // Calls run one by one in the order the model listed them, and any
        // failure aborts the turn before the model sees a partial batch.
        let mut results = Vec::with_capacity(calls.len());
        for call in &calls {
            debug!("dispatching tool {} ({})", call.name, call.id);
            let value = self
                .inner
                .registry
                .dispatch(call, self.tool_context.clone())
                .await?;
            results.push(ModelMessage::Tool(ToolCallResult {
                id: call.id.clone(),
                content: value.to_string(),
            }));
        }

        self.tool_calls += calls.len();
        self.messages.push(ModelMessage::ToolCalls(calls));
        self.messages.extend(results);
        Ok(Stage::Drafting)
    }

    async fn evaluate(&mut self, draft: String) -> Result<Stage> {
        let evaluation = self
            .inner
            .evaluator
            .run(&draft, self.message, self.history)
            .await?;

        if evaluation.is_acceptable {
            debug!("draft accepted after {} revision(s)", self.revisions);
            return Ok(self.done(draft, evaluation));
        }
        if self.revisions < MAX_REEVALUATION_ATTEMPTS {
            self.revisions += 1;
            info!(
                attempt = self.revisions,
                "draft rejected: {}", evaluation.feedback
            );
            return Ok(Stage::Revising {
                draft,
                feedback: evaluation.feedback,
            });
        }

        warn!(
            "draft still rejected after {} revisions, returning it anyway: {}",
            self.revisions, evaluation.feedback
        );
        Ok(self.done(draft, evaluation))
    }

    async fn revise(&mut self, draft: String, feedback: String) -> Result<Stage> {
        let revised = self
            .inner
            .responder
            .revise(&draft, self.message, self.history, &feedback)
            .await?;
        Ok(Stage::Evaluating(revised))
    }

    fn done(&self, reply: String, evaluation: Evaluation) -> Stage {
        Stage::Done(ChatOutcome {
            reply,
            evaluation,
            revisions: self.revisions,
            tool_calls: self.tool_calls,
        })
    }
}
