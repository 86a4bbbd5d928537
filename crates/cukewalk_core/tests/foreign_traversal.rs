//! Integration tests for listeners that try to traverse a node themselves.
//!
//! The runner already walks every node; a listener accepting the node it was
//! notified about with its own visitor would walk it twice. These tests cover
//! each handling policy and the warning emitted for such attempts.

use std::convert::Infallible;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cukewalk_ast::{Feature, Features, SessionId, SessionKey, Tags, Visitor};
use cukewalk_core::{
    Event, EventKind, ForeignTraversalPolicy, LegacyListener, Listener, ListenerError,
    ParkOutcome, Runner, RunnerConfig, RunnerError, TraversalToken,
};
use parking_lot::Mutex;

/// A listener's own visitor, counting tag names.
#[derive(Default)]
struct TagCounter(usize);

impl<'a> Visitor<'a> for TagCounter {
    type Error = Infallible;

    fn visit_tag_name(&mut self, _tag_name: &'a str) -> Result<(), Infallible> {
        self.0 += 1;
        Ok(())
    }
}

type Attempt = Box<dyn FnMut(&Event<'_>) -> Result<(), ListenerError>>;

/// Runs `attempt` on every feature notification.
struct OnFeature(Attempt);

impl LegacyListener for OnFeature {
    fn before(&mut self, event: &Event<'_>) -> Result<(), ListenerError> {
        if event.kind() == EventKind::Feature {
            (self.0)(event)?;
        }
        Ok(())
    }

    fn after(&mut self, _event: EventKind) -> Result<(), ListenerError> {
        Ok(())
    }
}

fn tagged_features() -> Features {
    Features::new(vec![
        Feature::new("Billing").with_tags(Tags::new(["invoice", "tax"])),
    ])
}

fn run(policy: ForeignTraversalPolicy, attempt: Attempt) -> Result<(), RunnerError> {
    let features = tagged_features();
    let config = RunnerConfig::new()
        .quiet(true)
        .with_foreign_traversal(policy);
    let mut runner = Runner::new(vec![Listener::legacy(OnFeature(attempt))], config);
    runner.visit_features(&features)
}

fn wait_until_parked(token: &TraversalToken) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while token.parked_count() == 0 {
        assert!(Instant::now() < deadline, "foreign traversal never parked");
        thread::sleep(Duration::from_millis(1));
    }
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_warnings<F: FnOnce()>(f: F) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = logs.0.lock();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[test]
fn test_reject_propagated_by_listener_aborts_run() {
    let result = run(
        ForeignTraversalPolicy::Reject,
        Box::new(|event: &Event<'_>| {
            event.subject().accept(&mut TagCounter::default())?;
            Ok(())
        }),
    );

    match result.unwrap_err() {
        RunnerError::Listener { event, source } => {
            assert_eq!(event, EventKind::Feature);
            let cause = source
                .downcast_ref::<RunnerError>()
                .expect("cause should be a runner error");
            assert!(cause.is_foreign_traversal());
        }
        other => panic!("Expected listener error, got {:?}", other),
    }
}

/// A visitor that copies everything it can learn about the running session.
struct Impostor {
    claimed_owner: SessionId,
    key: SessionKey,
    tags: usize,
}

impl<'a> Visitor<'a> for Impostor {
    type Error = Infallible;

    fn session_key(&self) -> Option<&SessionKey> {
        Some(&self.key)
    }

    fn visit_tag_name(&mut self, _tag_name: &'a str) -> Result<(), Infallible> {
        self.tags += 1;
        Ok(())
    }
}

#[test]
fn test_visitor_claiming_the_session_owner_is_rejected() {
    let outcome = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&outcome);
    run(
        ForeignTraversalPolicy::Reject,
        Box::new(move |event: &Event<'_>| {
            let mut impostor = Impostor {
                claimed_owner: event.subject().token().owner(),
                key: SessionKey::new(),
                tags: 0,
            };
            let result = event.subject().accept(&mut impostor);
            *seen.lock() = Some((
                result.map_err(|e| e.is_foreign_traversal()),
                impostor.tags,
                impostor.claimed_owner == event.subject().token().owner(),
            ));
            Ok(())
        }),
    )
    .unwrap();

    assert_eq!(*outcome.lock(), Some((Err(true), 0, true)));
}

#[test]
fn test_foreign_visitor_from_another_session_is_rejected() {
    let outcome = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&outcome);
    run(
        ForeignTraversalPolicy::Reject,
        Box::new(move |event: &Event<'_>| {
            let mut other_runner = Runner::new(Vec::new(), RunnerConfig::default());
            let mut other_session = other_runner.session();
            let result = event.subject().accept(&mut other_session);
            *seen.lock() = Some(result.is_err());
            Ok(())
        }),
    )
    .unwrap();

    assert_eq!(*outcome.lock(), Some(true));
}

#[test]
fn test_parked_traversal_resumes_without_walking() {
    let outcome = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&outcome);

    run(
        ForeignTraversalPolicy::Park { timeout_ms: 30_000 },
        Box::new(move |event: &Event<'_>| {
            let subject = event.subject();
            let result = thread::scope(|scope| {
                let foreign = scope.spawn(|| {
                    let mut counter = TagCounter::default();
                    let ok = subject.accept(&mut counter).is_ok();
                    (ok, counter.0)
                });
                wait_until_parked(subject.token());
                assert_eq!(subject.token().resume_parked(), 1);
                foreign.join().expect("foreign thread panicked")
            });
            *seen.lock() = Some(result);
            Ok(())
        }),
    )
    .unwrap();

    assert_eq!(*outcome.lock(), Some((true, 0)));
}

#[test]
fn test_parked_traversal_can_be_cancelled() {
    let outcome = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&outcome);

    run(
        ForeignTraversalPolicy::Park { timeout_ms: 30_000 },
        Box::new(move |event: &Event<'_>| {
            let subject = event.subject();
            let result = thread::scope(|scope| {
                let foreign = scope.spawn(|| subject.accept(&mut TagCounter::default()));
                wait_until_parked(subject.token());
                subject.token().cancel();
                foreign.join().expect("foreign thread panicked")
            });
            *seen.lock() = Some(matches!(
                result,
                Err(RunnerError::TraversalCancelled {
                    event: EventKind::Feature
                })
            ));
            Ok(())
        }),
    )
    .unwrap();

    assert_eq!(*outcome.lock(), Some(true));
}

#[test]
fn test_parked_traversal_times_out() {
    let outcome = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&outcome);

    run(
        ForeignTraversalPolicy::Park { timeout_ms: 20 },
        Box::new(move |event: &Event<'_>| {
            let result = event.subject().accept(&mut TagCounter::default());
            *seen.lock() = Some(result.map_err(|e| e.to_string()));
            Ok(())
        }),
    )
    .unwrap();

    assert_eq!(
        *outcome.lock(),
        Some(Err(
            "Foreign traversal of visit_feature timed out after 20ms".to_string()
        ))
    );
}

#[test]
fn test_session_end_releases_parked_callers() {
    let parked = Arc::new(Mutex::new(None));
    let handle = Arc::clone(&parked);

    run(
        ForeignTraversalPolicy::Park { timeout_ms: 30_000 },
        Box::new(move |event: &Event<'_>| {
            let token = Arc::clone(event.subject().token());
            let waiter = thread::spawn(move || token.park(Duration::from_secs(30)));
            wait_until_parked(event.subject().token());
            *handle.lock() = Some(waiter);
            Ok(())
        }),
    )
    .unwrap();

    let waiter = parked.lock().take().expect("listener never ran");
    assert_eq!(
        waiter.join().expect("parked thread panicked"),
        ParkOutcome::Released
    );
}

#[test]
fn test_foreign_traversal_warns_unless_quiet() {
    let features = tagged_features();
    let attempt = || -> Attempt {
        Box::new(|event: &Event<'_>| {
            let _ = event.subject().accept(&mut TagCounter::default());
            Ok(())
        })
    };

    let loud = capture_warnings(|| {
        let mut runner = Runner::new(
            vec![Listener::legacy(OnFeature(attempt()))],
            RunnerConfig::default(),
        );
        runner.visit_features(&features).unwrap();
    });
    let quiet = capture_warnings(|| {
        let mut runner = Runner::new(
            vec![Listener::legacy(OnFeature(attempt()))],
            RunnerConfig::new().quiet(true),
        );
        runner.visit_features(&features).unwrap();
    });

    assert!(
        loud.contains("Deprecated: stop visiting visit_feature from a listener"),
        "unexpected log output: {}",
        loud
    );
    assert!(quiet.is_empty(), "unexpected log output: {}", quiet);
}
