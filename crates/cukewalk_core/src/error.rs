//! Runner error types.

use std::convert::Infallible;

use thiserror::Error;

use crate::EventKind;

/// Error a listener may return from a notification.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort a traversal.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A listener failed while being notified.
    #[error("Listener failed during {event}: {source}")]
    Listener {
        event: EventKind,
        #[source]
        source: ListenerError,
    },

    /// A node was accepted by a visitor other than the session's own runner.
    #[error("Foreign traversal rejected: {event} may only be traversed by its runner")]
    ForeignTraversal { event: EventKind },

    /// A parked foreign traversal was not resumed in time.
    #[error("Foreign traversal of {event} timed out after {waited_ms}ms")]
    ForeignTraversalTimedOut { event: EventKind, waited_ms: u64 },

    /// A parked foreign traversal was cancelled.
    #[error("Foreign traversal of {event} was cancelled")]
    TraversalCancelled { event: EventKind },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RunnerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wraps a listener failure for `event`.
    pub fn listener(event: EventKind, source: impl Into<ListenerError>) -> Self {
        Self::Listener {
            event,
            source: source.into(),
        }
    }

    /// Returns true for the guard's foreign traversal outcomes.
    pub fn is_foreign_traversal(&self) -> bool {
        matches!(
            self,
            Self::ForeignTraversal { .. }
                | Self::ForeignTraversalTimedOut { .. }
                | Self::TraversalCancelled { .. }
        )
    }
}

impl From<Infallible> for RunnerError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
