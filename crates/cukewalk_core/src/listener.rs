//! Listener protocols and the legacy listener adapter.
//!
//! Two protocols coexist. Legacy listeners receive a generic `before`/`after`
//! pair for every event and are the only ones the runner notifies. Modern
//! listeners are dispatched by a different collaborator; the runner carries
//! them in the same list and skips them.

use std::any::Any;
use std::fmt;

use tracing::trace;

use crate::{Event, EventKind, ListenerError, RunnerError};

/// Old-style listener notified around every event.
///
/// # Example
///
/// ```rust
/// use cukewalk_core::{Event, EventKind, LegacyListener, ListenerError};
///
/// struct Depth(usize);
///
/// impl LegacyListener for Depth {
///     fn before(&mut self, _event: &Event<'_>) -> Result<(), ListenerError> {
///         self.0 += 1;
///         Ok(())
///     }
///
///     fn after(&mut self, _event: EventKind) -> Result<(), ListenerError> {
///         self.0 -= 1;
///         Ok(())
///     }
/// }
/// ```
pub trait LegacyListener {
    /// Called before the event's children are visited.
    fn before(&mut self, event: &Event<'_>) -> Result<(), ListenerError>;

    /// Called after the event's children were visited.
    fn after(&mut self, event: EventKind) -> Result<(), ListenerError>;
}

/// A registered listener, tagged with the protocol it speaks.
pub enum Listener {
    Legacy(Box<dyn LegacyListener>),
    Modern(Box<dyn Any>),
}

impl Listener {
    /// Registers an old-style listener.
    pub fn legacy(listener: impl LegacyListener + 'static) -> Self {
        Self::Legacy(Box::new(listener))
    }

    /// Registers a listener this runner does not notify.
    pub fn modern(listener: impl Any) -> Self {
        Self::Modern(Box::new(listener))
    }

    #[inline]
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    pub fn as_legacy_mut(&mut self) -> Option<&mut (dyn LegacyListener + 'static)> {
        match self {
            Self::Legacy(listener) => Some(listener.as_mut()),
            Self::Modern(_) => None,
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy(_) => f.write_str("Listener::Legacy"),
            Self::Modern(_) => f.write_str("Listener::Modern"),
        }
    }
}

/// Returns the listeners speaking the legacy protocol, in registration order.
pub fn legacy_listeners(
    listeners: &mut [Listener],
) -> impl Iterator<Item = &mut (dyn LegacyListener + 'static)> {
    listeners.iter_mut().filter_map(Listener::as_legacy_mut)
}

/// Pre-notifies every legacy listener. The first failure aborts.
pub(crate) fn run_before(listeners: &mut [Listener], event: &Event<'_>) -> Result<(), RunnerError> {
    trace!("before {}", event.kind());
    for listener in legacy_listeners(listeners) {
        listener
            .before(event)
            .map_err(|source| RunnerError::listener(event.kind(), source))?;
    }
    Ok(())
}

/// Post-notifies every legacy listener. The first failure aborts.
pub(crate) fn run_after(listeners: &mut [Listener], kind: EventKind) -> Result<(), RunnerError> {
    trace!("after {}", kind);
    for listener in legacy_listeners(listeners) {
        listener
            .after(kind)
            .map_err(|source| RunnerError::listener(kind, source))?;
    }
    Ok(())
}
