//! Foreign traversal guard.
//!
//! Listeners receive the first argument of every event wrapped in a
//! [`Guarded`] handle. Accepting it with the session's own runner traverses
//! normally. Any other visitor is a foreign traversal: it would walk the same
//! subtree a second time, so it is either rejected outright or parked on the
//! session's [`TraversalToken`] until someone resumes, cancels, or the session
//! ends, and in no case does it traverse.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cukewalk_ast::{NodeRef, SessionId, SessionKey, Visitor};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::{EventKind, ForeignTraversalPolicy, RunnerError};

/// How a parked foreign traversal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkOutcome {
    /// Woken by [`TraversalToken::resume_parked`].
    Resumed,
    /// The owning session finished.
    Released,
    /// Woken by [`TraversalToken::cancel`].
    Cancelled,
    /// The bounded wait expired.
    TimedOut,
}

#[derive(Debug, Default)]
struct TokenState {
    released: bool,
    cancelled: bool,
    /// Bumped by every resume; parked callers compare against their snapshot.
    generation: u64,
    parked: usize,
}

/// Ownership of one traversal session.
///
/// Held by the session for its whole lifetime and released when it ends.
/// Foreign callers park here under [`ForeignTraversalPolicy::Park`].
///
/// The token owns its session's [`SessionKey`] and never hands it out; only
/// the session itself lends it to the guard.
#[derive(Debug)]
pub struct TraversalToken {
    key: SessionKey,
    state: Mutex<TokenState>,
    wakeup: Condvar,
}

impl TraversalToken {
    /// Creates an active token with a fresh key.
    pub(crate) fn new() -> Self {
        Self {
            key: SessionKey::new(),
            state: Mutex::new(TokenState::default()),
            wakeup: Condvar::new(),
        }
    }

    /// Returns the id of the session this token belongs to.
    #[inline]
    pub fn owner(&self) -> SessionId {
        self.key.id()
    }

    #[inline]
    pub(crate) fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Returns true if `key` is this token's own key.
    #[inline]
    pub fn is_owned_by(&self, key: Option<&SessionKey>) -> bool {
        key.is_some_and(|key| key.is(&self.key))
    }

    /// Marks the session finished and wakes every parked caller.
    pub fn release(&self) {
        let mut state = self.state.lock();
        state.released = true;
        self.wakeup.notify_all();
    }

    pub fn is_released(&self) -> bool {
        self.state.lock().released
    }

    /// Wakes every currently parked caller. Returns how many were parked.
    ///
    /// Callers parking afterwards wait again.
    pub fn resume_parked(&self) -> usize {
        let mut state = self.state.lock();
        state.generation = state.generation.wrapping_add(1);
        self.wakeup.notify_all();
        state.parked
    }

    /// Fails every parked caller and every later attempt to park.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        state.cancelled = true;
        self.wakeup.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }

    /// Returns the number of callers currently parked.
    pub fn parked_count(&self) -> usize {
        self.state.lock().parked
    }

    /// Blocks the calling thread until resumed, released, cancelled, or
    /// `timeout` elapses.
    pub fn park(&self, timeout: Duration) -> ParkOutcome {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        let generation = state.generation;
        let mut timed_out = false;
        state.parked += 1;

        let outcome = loop {
            if state.cancelled {
                break ParkOutcome::Cancelled;
            }
            if state.released {
                break ParkOutcome::Released;
            }
            if state.generation != generation {
                break ParkOutcome::Resumed;
            }
            if timed_out {
                break ParkOutcome::TimedOut;
            }
            timed_out = self.wakeup.wait_until(&mut state, deadline).timed_out();
        };

        state.parked -= 1;
        outcome
    }
}

/// The first argument of an event, with its traversal contract guarded.
///
/// The guard lives only as long as the notification that carries it.
pub struct Guarded<'e> {
    node: NodeRef<'e>,
    event: EventKind,
    token: &'e Arc<TraversalToken>,
    policy: ForeignTraversalPolicy,
    quiet: bool,
}

impl<'e> Guarded<'e> {
    pub(crate) fn new(
        node: NodeRef<'e>,
        event: EventKind,
        token: &'e Arc<TraversalToken>,
        policy: ForeignTraversalPolicy,
        quiet: bool,
    ) -> Self {
        Self {
            node,
            event,
            token,
            policy,
            quiet,
        }
    }

    /// Returns the wrapped argument for read-only use.
    #[inline]
    pub fn node(&self) -> NodeRef<'e> {
        self.node
    }

    /// Returns the token of the session that emitted this event.
    #[inline]
    pub fn token(&self) -> &Arc<TraversalToken> {
        self.token
    }

    /// Traverses the wrapped node with `visitor`, if `visitor` presents the
    /// session's own [`SessionKey`].
    ///
    /// Any other visitor is handled according to the configured
    /// [`ForeignTraversalPolicy`] and never traverses:
    ///
    /// - `Reject` returns [`RunnerError::ForeignTraversal`] immediately.
    /// - `Park` blocks until the token is resumed or released (`Ok(())`),
    ///   cancelled ([`RunnerError::TraversalCancelled`]), or the wait times
    ///   out ([`RunnerError::ForeignTraversalTimedOut`]).
    pub fn accept<V>(&self, visitor: &mut V) -> Result<(), RunnerError>
    where
        V: Visitor<'e>,
        RunnerError: From<V::Error>,
    {
        if self.token.is_owned_by(visitor.session_key()) {
            return self.node.accept(visitor).map_err(RunnerError::from);
        }

        if !self.quiet {
            warn!(
                "Deprecated: stop visiting {} from a listener; the runner already traverses it",
                self.event
            );
        }

        let Some(timeout) = self.policy.park_timeout() else {
            return Err(RunnerError::ForeignTraversal { event: self.event });
        };

        debug!(
            "Parking foreign traversal of {} (session {})",
            self.event,
            self.token.owner().get()
        );
        match self.token.park(timeout) {
            ParkOutcome::Resumed | ParkOutcome::Released => Ok(()),
            ParkOutcome::Cancelled => Err(RunnerError::TraversalCancelled { event: self.event }),
            ParkOutcome::TimedOut => Err(RunnerError::ForeignTraversalTimedOut {
                event: self.event,
                waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}
