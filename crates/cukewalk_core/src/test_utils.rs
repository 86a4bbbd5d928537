use std::sync::Arc;

use cukewalk_ast::{
    Feature, FeatureElement, Features, Location, MultilineArg, Scenario, Step, StepStatus, Steps,
    Table,
};
use parking_lot::Mutex;

use crate::{Event, EventKind, LegacyListener, ListenerError};

/// Shared log of `before <kind>` / `after <kind>` lines.
pub type Log = Arc<Mutex<Vec<String>>>;

/// Legacy listener that records every notification it receives.
#[derive(Default)]
pub struct Recorder {
    log: Log,
}

impl Recorder {
    /// Creates a recorder and returns it with a handle to its log.
    pub fn new() -> (Self, Log) {
        let recorder = Self::default();
        let log = Arc::clone(&recorder.log);
        (recorder, log)
    }
}

impl LegacyListener for Recorder {
    fn before(&mut self, event: &Event<'_>) -> Result<(), ListenerError> {
        self.log.lock().push(format!("before {}", event.kind()));
        Ok(())
    }

    fn after(&mut self, event: EventKind) -> Result<(), ListenerError> {
        self.log.lock().push(format!("after {}", event));
        Ok(())
    }
}

/// One feature, one scenario, two passing steps.
pub fn one_scenario_two_steps() -> Features {
    Features::new(vec![Feature::new("Addition").with_element(
        FeatureElement::Scenario(
            Scenario::new("Scenario", "Add two numbers")
                .with_location(Location::new("features/addition.feature", 3))
                .with_steps(Steps::new(vec![
                    Step::new("Given", "I have entered 50").with_status(StepStatus::Passed),
                    Step::new("Then", "the result should be 50")
                        .with_status(StepStatus::Passed)
                        .with_multiline_arg(MultilineArg::Table(Table::from_values([["50"]]))),
                ])),
        ),
    )])
}
