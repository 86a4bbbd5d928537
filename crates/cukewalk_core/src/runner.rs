//! The canonical AST runner.
//!
//! A [`Runner`] owns the registered listeners and the configuration. Each
//! traversal happens in a [`Session`], the only visitor allowed to recurse
//! into nodes while it is alive. Every entry point of the session goes
//! through the session's broadcast: notify listeners before, run the
//! recursion block if the node has children, notify listeners after.

use std::sync::Arc;

use cukewalk_ast::{
    Accept, Background, Comment, Examples, ExamplesArray, Feature, FeatureElement, Features,
    Location, MultilineArg, OutlineTable, PyString, SessionId, SessionKey, Step, StepException,
    StepName, StepResult, StepStatus, Steps, TableCell, TableRow, Tags, Visitor,
};
use tracing::debug;

use crate::guard::{Guarded, TraversalToken};
use crate::listener::{run_after, run_before};
use crate::{Announcer, Event, EventArgs, EventKind, Listener, RunnerConfig, RunnerError};

/// Walks parsed features and notifies listeners around every node.
///
/// # Example
///
/// ```rust
/// use cukewalk_core::{
///     Event, EventKind, LegacyListener, Listener, ListenerError, Runner, RunnerConfig,
/// };
/// use cukewalk_ast::{Feature, Features};
///
/// struct Printer;
///
/// impl LegacyListener for Printer {
///     fn before(&mut self, event: &Event<'_>) -> Result<(), ListenerError> {
///         println!("-> {}", event.kind());
///         Ok(())
///     }
///
///     fn after(&mut self, event: EventKind) -> Result<(), ListenerError> {
///         println!("<- {}", event);
///         Ok(())
///     }
/// }
///
/// let features = Features::new(vec![Feature::new("Checkout")]);
/// let mut runner = Runner::new(vec![Listener::legacy(Printer)], RunnerConfig::default());
/// runner.visit_features(&features)?;
/// runner.announce("done")?;
/// # Ok::<(), cukewalk_core::RunnerError>(())
/// ```
#[derive(Debug)]
pub struct Runner {
    listeners: Vec<Listener>,
    config: RunnerConfig,
    announcer: Announcer,
}

impl Runner {
    /// Creates a runner. The listener set is fixed for its lifetime.
    pub fn new(listeners: Vec<Listener>, config: RunnerConfig) -> Self {
        Self {
            listeners,
            config,
            announcer: Announcer::new(),
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    /// Returns the handle collaborators use to announce while a traversal
    /// holds the runner.
    pub fn announcer(&self) -> &Announcer {
        &self.announcer
    }

    /// Gives back the listeners, e.g. to collect what they recorded.
    pub fn into_listeners(self) -> Vec<Listener> {
        self.listeners
    }

    /// Opens a traversal session.
    ///
    /// The session borrows the runner mutably, so at most one traversal runs
    /// per runner at a time.
    pub fn session<'a>(&mut self) -> Session<'_, 'a> {
        Session::new(&mut self.listeners, &self.config, &self.announcer)
    }

    /// Traverses `features` in a fresh session.
    ///
    /// Announcements queued before the walk are delivered first; any still
    /// queued when it ends are delivered last.
    pub fn visit_features(&mut self, features: &Features) -> Result<(), RunnerError> {
        let mut session = self.session();
        session.flush_announcements()?;
        session.visit_features(features)?;
        session.flush_announcements()
    }

    /// Pushes free text to the listeners outside of any traversal.
    pub fn announce(&mut self, announcement: &str) -> Result<(), RunnerError> {
        let mut session = self.session();
        session.announce(announcement)?;
        session.flush_announcements()
    }
}

/// Recursion block of a leaf event: there is none.
type Block<'r, 'a> = fn(&mut Session<'r, 'a>) -> Result<(), RunnerError>;

/// One traversal of the tree: the canonical visitor for its duration.
///
/// Dropping the session releases its [`TraversalToken`], waking any parked
/// foreign traversal.
pub struct Session<'r, 'a> {
    listeners: &'r mut [Listener],
    config: &'r RunnerConfig,
    announcer: &'r Announcer,
    token: Arc<TraversalToken>,
    current_table: Option<&'a OutlineTable>,
}

impl<'r, 'a> Session<'r, 'a> {
    fn new(
        listeners: &'r mut [Listener],
        config: &'r RunnerConfig,
        announcer: &'r Announcer,
    ) -> Self {
        let token = Arc::new(TraversalToken::new());
        let skipped = listeners.iter().filter(|l| !l.is_legacy()).count();
        debug!(
            "Opened traversal session {} ({} listeners, {} not notified)",
            token.owner().get(),
            listeners.len(),
            skipped
        );

        Self {
            listeners,
            config,
            announcer,
            token,
            current_table: None,
        }
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.token.owner()
    }

    /// Returns this session's ownership token.
    #[inline]
    pub fn token(&self) -> &Arc<TraversalToken> {
        &self.token
    }

    /// Returns the outline table most recently entered in this session.
    #[inline]
    pub fn current_table(&self) -> Option<&'a OutlineTable> {
        self.current_table
    }

    /// Pushes free text to the listeners, after anything still queued on the
    /// runner's [`Announcer`].
    pub fn announce(&mut self, announcement: &str) -> Result<(), RunnerError> {
        self.flush_announcements()?;
        self.notify(EventArgs::Announce(announcement))
    }

    /// Delivers every announcement queued on the runner's [`Announcer`].
    pub fn flush_announcements(&mut self) -> Result<(), RunnerError> {
        while let Some(announcement) = self.announcer.pop() {
            self.notify(EventArgs::Announce(&announcement))?;
        }
        Ok(())
    }

    /// Notifies listeners before `args`, runs `block`, then notifies after.
    ///
    /// Announcements queued during the pre-notification or the block are
    /// delivered before the post-notification. Errors from listeners or from
    /// the block are returned as-is and abort the remaining traversal.
    pub(crate) fn broadcast<F>(
        &mut self,
        args: EventArgs<'_>,
        block: Option<F>,
    ) -> Result<(), RunnerError>
    where
        F: FnOnce(&mut Self) -> Result<(), RunnerError>,
    {
        let kind = args.kind();
        {
            let subject = Guarded::new(
                args.subject(),
                kind,
                &self.token,
                self.config.foreign_traversal,
                self.config.quiet,
            );
            let event = Event::new(args, subject, self.announcer);
            run_before(self.listeners, &event)?;
        }

        if kind != EventKind::Announce {
            self.flush_announcements()?;
        }
        if let Some(block) = block {
            block(self)?;
            self.flush_announcements()?;
        }

        run_after(self.listeners, kind)
    }

    fn notify(&mut self, args: EventArgs<'_>) -> Result<(), RunnerError> {
        self.broadcast(args, None::<Block<'r, 'a>>)
    }
}

impl Drop for Session<'_, '_> {
    fn drop(&mut self) {
        self.token.release();
        debug!("Closed traversal session {}", self.token.owner().get());
    }
}

impl<'a> Visitor<'a> for Session<'_, 'a> {
    type Error = RunnerError;

    fn session_key(&self) -> Option<&SessionKey> {
        Some(self.token.key())
    }

    fn visit_features(&mut self, features: &'a Features) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::Features(features),
            Some(|s: &mut Self| features.accept(s)),
        )
    }

    fn visit_feature(&mut self, feature: &'a Feature) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::Feature(feature),
            Some(|s: &mut Self| feature.accept(s)),
        )
    }

    fn visit_comment(&mut self, comment: &'a Comment) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::Comment(comment),
            Some(|s: &mut Self| comment.accept(s)),
        )
    }

    fn visit_comment_line(&mut self, comment_line: &'a str) -> Result<(), RunnerError> {
        self.notify(EventArgs::CommentLine(comment_line))
    }

    fn visit_tags(&mut self, tags: &'a Tags) -> Result<(), RunnerError> {
        self.broadcast(EventArgs::Tags(tags), Some(|s: &mut Self| tags.accept(s)))
    }

    fn visit_tag_name(&mut self, tag_name: &'a str) -> Result<(), RunnerError> {
        self.notify(EventArgs::TagName(tag_name))
    }

    fn visit_feature_name(&mut self, name: &'a str) -> Result<(), RunnerError> {
        self.notify(EventArgs::FeatureName(name))
    }

    fn visit_feature_element(
        &mut self,
        feature_element: &'a FeatureElement,
    ) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::FeatureElement(feature_element),
            Some(|s: &mut Self| feature_element.accept(s)),
        )
    }

    fn visit_background(&mut self, background: &'a Background) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::Background(background),
            Some(|s: &mut Self| background.accept(s)),
        )
    }

    fn visit_background_name(
        &mut self,
        keyword: &'a str,
        name: &'a str,
        location: &'a Location,
        source_indent: usize,
    ) -> Result<(), RunnerError> {
        self.notify(EventArgs::BackgroundName(
            keyword,
            name,
            location,
            source_indent,
        ))
    }

    fn visit_examples_array(
        &mut self,
        examples_array: &'a ExamplesArray,
    ) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::ExamplesArray(examples_array),
            Some(|s: &mut Self| examples_array.accept(s)),
        )
    }

    fn visit_examples(&mut self, examples: &'a Examples) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::Examples(examples),
            Some(|s: &mut Self| examples.accept(s)),
        )
    }

    fn visit_examples_name(&mut self, keyword: &'a str, name: &'a str) -> Result<(), RunnerError> {
        self.notify(EventArgs::ExamplesName(keyword, name))
    }

    fn visit_outline_table(&mut self, outline_table: &'a OutlineTable) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::OutlineTable(outline_table),
            Some(|s: &mut Self| {
                s.current_table = Some(outline_table);
                outline_table.accept(s)
            }),
        )
    }

    fn visit_scenario_name(
        &mut self,
        keyword: &'a str,
        name: &'a str,
        location: &'a Location,
        source_indent: usize,
    ) -> Result<(), RunnerError> {
        self.notify(EventArgs::ScenarioName(
            keyword,
            name,
            location,
            source_indent,
        ))
    }

    fn visit_steps(&mut self, steps: &'a Steps) -> Result<(), RunnerError> {
        self.broadcast(EventArgs::Steps(steps), Some(|s: &mut Self| steps.accept(s)))
    }

    fn visit_step(&mut self, step: &'a Step) -> Result<(), RunnerError> {
        self.broadcast(EventArgs::Step(step), Some(|s: &mut Self| step.accept(s)))
    }

    fn visit_step_result(&mut self, step_result: StepResult<'a>) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::StepResult(step_result),
            Some(|s: &mut Self| step_result.accept(s)),
        )
    }

    fn visit_step_name(&mut self, step_name: StepName<'a>) -> Result<(), RunnerError> {
        self.notify(EventArgs::StepName(step_name))
    }

    fn visit_multiline_arg(&mut self, multiline_arg: &'a MultilineArg) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::MultilineArg(multiline_arg),
            Some(|s: &mut Self| multiline_arg.accept(s)),
        )
    }

    fn visit_exception(
        &mut self,
        exception: &'a StepException,
        status: StepStatus,
    ) -> Result<(), RunnerError> {
        self.notify(EventArgs::Exception(exception, status))
    }

    fn visit_py_string(&mut self, py_string: &'a PyString) -> Result<(), RunnerError> {
        self.notify(EventArgs::PyString(py_string))
    }

    fn visit_table_row(&mut self, table_row: &'a TableRow) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::TableRow(table_row),
            Some(|s: &mut Self| table_row.accept(s)),
        )
    }

    fn visit_table_cell(&mut self, table_cell: &'a TableCell) -> Result<(), RunnerError> {
        self.broadcast(
            EventArgs::TableCell(table_cell),
            Some(|s: &mut Self| table_cell.accept(s)),
        )
    }

    fn visit_table_cell_value(
        &mut self,
        value: &'a str,
        status: Option<StepStatus>,
    ) -> Result<(), RunnerError> {
        self.notify(EventArgs::TableCellValue(value, status))
    }
}
