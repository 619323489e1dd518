use std::fmt::{self, Display};

use persona_agent_model::ErrorKind as ModelErrorKind;
use thiserror::Error;

use crate::tool::Error as ToolError;

/// Which of the two model backends an error came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    /// The backend drafting replies.
    Responder,
    /// The backend judging replies.
    Evaluator,
}

impl Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Responder => write!(f, "responder"),
            Backend::Evaluator => write!(f, "evaluator"),
        }
    }
}

/// The error returned when a chat turn cannot produce a reply.
///
/// Every variant aborts the whole turn. No partial reply is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// A backend call failed at the transport level.
    #[error("{backend} backend unavailable ({kind}): {message}")]
    BackendUnavailable {
        /// The backend that failed.
        backend: Backend,
        /// The classification reported by the provider.
        kind: ModelErrorKind,
        /// The provider's error message.
        message: String,
    },

    /// A backend answered with something the agent cannot use.
    #[error("{backend} backend returned an unusable response: {reason}")]
    InvalidBackendResponse {
        /// The backend that answered.
        backend: Backend,
        /// What was wrong with the response.
        reason: String,
    },

    /// The model asked for a tool that is not registered.
    #[error("tool not found: {name}")]
    ToolNotFound {
        /// The requested tool name.
        name: String,
    },

    /// The model's arguments could not be parsed for the tool.
    #[error("invalid arguments for tool {name}: {reason}")]
    InvalidToolArguments {
        /// The requested tool name.
        name: String,
        /// The parse failure.
        reason: String,
    },

    /// The tool ran and reported a failure.
    #[error("tool {name} failed: {source}")]
    ToolExecutionFailure {
        /// The tool name.
        name: String,
        /// The error reported by the tool.
        source: ToolError,
    },

    /// The model kept requesting tools past the configured limit.
    #[error("tool call rounds exceeded the limit of {limit}")]
    ToolRoundLimitExceeded {
        /// The configured number of rounds.
        limit: usize,
    },

    /// Two registered tools share a name.
    #[error("duplicate tool name: {name}")]
    DuplicateTool {
        /// The conflicting name.
        name: String,
    },
}

impl Error {
    #[inline]
    pub(crate) fn invalid_response<S: Into<String>>(
        backend: Backend,
        reason: S,
    ) -> Self {
        Error::InvalidBackendResponse {
            backend,
            reason: reason.into(),
        }
    }
}

/// A specialized result type for chat turns.
pub type Result<T, E = Error> = std::result::Result<T, E>;
