//! An out-of-the-box persona agent that answers questions on someone's
//! website, with its built-in tools, configuration and logging setup.
//!
//! The crate includes a CLI tool for chatting in the terminal. And you can
//! also use it as a library to bring the agent into your own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod logging;
pub mod profile;
mod session;
pub mod tools;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`persona_agent_core`] crate.
pub mod core {
    pub use persona_agent_core::*;
}
