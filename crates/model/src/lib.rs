//! A backend-agnostic protocol for chat-completion models.
//!
//! This crate establishes the vocabulary that the agent uses to talk to
//! any supported language model: what a request carries, what a complete
//! response looks like, and how errors are classified. The responder and
//! the evaluator are both plain consumers of [`ModelProvider`], so either
//! of them can be pointed at a different backend, or at a scripted fake in
//! tests, without touching the agent loop.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
