//! Core logic of the persona agent: the draft, evaluate and revise loop,
//! tool dispatch, prompt building and conversation types.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod agent;
pub mod conversation;
mod error;
mod evaluator;
mod model_client;
mod persona;
pub mod prompt;
mod responder;
pub mod tool;

pub use agent::{
    Agent, AgentBuilder, ChatOutcome, DEFAULT_MAX_TOOL_ROUNDS,
    MAX_REEVALUATION_ATTEMPTS,
};
pub use conversation::{ConversationTurn, Role};
pub use error::{Backend, Error, Result};
pub use evaluator::Evaluation;
pub use persona::Persona;
