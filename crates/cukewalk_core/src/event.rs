//! Event identities and argument shapes.
//!
//! Every runner entry point corresponds to exactly one [`EventKind`] and one
//! [`EventArgs`] variant. Both enums, the entry-point names and the
//! composite flag are generated from the single table below, so a label can
//! never drift from the arguments it announces.

use std::fmt;

use cukewalk_ast::{
    Background, Comment, Examples, ExamplesArray, Feature, FeatureElement, Features, Location,
    MultilineArg, NodeRef, OutlineTable, PyString, Step, StepException, StepName, StepResult,
    StepStatus, Steps, TableCell, TableRow, Tags,
};

use crate::Announcer;
use crate::guard::Guarded;

macro_rules! event_table {
    (
        $lt:lifetime;
        $(
            $(#[$doc:meta])*
            $variant:ident => $method:literal, composite: $composite:literal, ($($arg:ty),+ $(,)?);
        )*
    ) => {
        /// Identity of a notification: which runner entry point produced it.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EventKind {
            $( $(#[$doc])* $variant, )*
        }

        impl EventKind {
            /// Every event kind, in table order.
            pub const ALL: &'static [EventKind] = &[$(EventKind::$variant),*];

            /// Returns the name of the entry point that emits this event.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( EventKind::$variant => $method, )*
                }
            }

            /// Returns true if the event's entry point recurses into children.
            pub const fn is_composite(&self) -> bool {
                match self {
                    $( EventKind::$variant => $composite, )*
                }
            }
        }

        /// Positional arguments of a notification, one variant per [`EventKind`].
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum EventArgs<$lt> {
            $( $(#[$doc])* $variant($($arg),+), )*
        }

        impl EventArgs<'_> {
            /// Returns the identity of the entry point these arguments belong to.
            pub const fn kind(&self) -> EventKind {
                match self {
                    $( EventArgs::$variant(..) => EventKind::$variant, )*
                }
            }
        }
    };
}

event_table! {
    'a;
    /// Root of the run.
    Features => "visit_features", composite: true, (&'a Features);
    Feature => "visit_feature", composite: true, (&'a Feature);
    Comment => "visit_comment", composite: true, (&'a Comment);
    CommentLine => "visit_comment_line", composite: false, (&'a str);
    Tags => "visit_tags", composite: true, (&'a Tags);
    TagName => "visit_tag_name", composite: false, (&'a str);
    FeatureName => "visit_feature_name", composite: false, (&'a str);
    /// Scenario or scenario outline.
    FeatureElement => "visit_feature_element", composite: true, (&'a FeatureElement);
    Background => "visit_background", composite: true, (&'a Background);
    /// Keyword, name, location, source indent.
    BackgroundName => "visit_background_name", composite: false,
        (&'a str, &'a str, &'a Location, usize);
    ExamplesArray => "visit_examples_array", composite: true, (&'a ExamplesArray);
    Examples => "visit_examples", composite: true, (&'a Examples);
    /// Keyword, name.
    ExamplesName => "visit_examples_name", composite: false, (&'a str, &'a str);
    OutlineTable => "visit_outline_table", composite: true, (&'a OutlineTable);
    /// Keyword, name, location, source indent.
    ScenarioName => "visit_scenario_name", composite: false,
        (&'a str, &'a str, &'a Location, usize);
    Steps => "visit_steps", composite: true, (&'a Steps);
    Step => "visit_step", composite: true, (&'a Step);
    StepResult => "visit_step_result", composite: true, (StepResult<'a>);
    StepName => "visit_step_name", composite: false, (StepName<'a>);
    MultilineArg => "visit_multiline_arg", composite: true, (&'a MultilineArg);
    /// Exception, status.
    Exception => "visit_exception", composite: false, (&'a StepException, StepStatus);
    PyString => "visit_py_string", composite: false, (&'a PyString);
    TableRow => "visit_table_row", composite: true, (&'a TableRow);
    TableCell => "visit_table_cell", composite: true, (&'a TableCell);
    /// Value, status.
    TableCellValue => "visit_table_cell_value", composite: false, (&'a str, Option<StepStatus>);
    /// Free text pushed by a collaborator, outside of or during a traversal.
    Announce => "announce", composite: false, (&'a str);
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> EventArgs<'a> {
    /// Returns the first positional argument as a node reference.
    pub fn subject(&self) -> NodeRef<'a> {
        match *self {
            EventArgs::Features(n) => NodeRef::Features(n),
            EventArgs::Feature(n) => NodeRef::Feature(n),
            EventArgs::Comment(n) => NodeRef::Comment(n),
            EventArgs::Tags(n) => NodeRef::Tags(n),
            EventArgs::FeatureElement(n) => NodeRef::FeatureElement(n),
            EventArgs::Background(n) => NodeRef::Background(n),
            EventArgs::ExamplesArray(n) => NodeRef::ExamplesArray(n),
            EventArgs::Examples(n) => NodeRef::Examples(n),
            EventArgs::OutlineTable(n) => NodeRef::OutlineTable(n),
            EventArgs::Steps(n) => NodeRef::Steps(n),
            EventArgs::Step(n) => NodeRef::Step(n),
            EventArgs::StepResult(n) => NodeRef::StepResult(n),
            EventArgs::MultilineArg(n) => NodeRef::MultilineArg(n),
            EventArgs::Exception(n, _) => NodeRef::Exception(n),
            EventArgs::PyString(n) => NodeRef::PyString(n),
            EventArgs::TableRow(n) => NodeRef::TableRow(n),
            EventArgs::TableCell(n) => NodeRef::TableCell(n),
            EventArgs::StepName(n) => NodeRef::Text(n.keyword),
            EventArgs::CommentLine(text)
            | EventArgs::TagName(text)
            | EventArgs::FeatureName(text)
            | EventArgs::BackgroundName(text, ..)
            | EventArgs::ExamplesName(text, _)
            | EventArgs::ScenarioName(text, ..)
            | EventArgs::TableCellValue(text, _)
            | EventArgs::Announce(text) => NodeRef::Text(text),
        }
    }
}

/// A pre-notification as seen by a legacy listener.
///
/// The first argument is only reachable through [`Event::subject`], which
/// guards its traversal contract against visitors other than the runner.
pub struct Event<'e> {
    args: EventArgs<'e>,
    subject: Guarded<'e>,
    announcer: &'e Announcer,
}

impl<'e> Event<'e> {
    pub(crate) fn new(
        args: EventArgs<'e>,
        subject: Guarded<'e>,
        announcer: &'e Announcer,
    ) -> Self {
        Self {
            args,
            subject,
            announcer,
        }
    }

    /// Returns the identity of this notification.
    #[inline]
    pub fn kind(&self) -> EventKind {
        self.args.kind()
    }

    /// Returns the full positional arguments.
    #[inline]
    pub fn args(&self) -> &EventArgs<'e> {
        &self.args
    }

    /// Returns the guarded first argument.
    #[inline]
    pub fn subject(&self) -> &Guarded<'e> {
        &self.subject
    }

    /// Returns the runner's announcer. Text queued on it while a node is
    /// being visited is delivered before that node's post-notification.
    #[inline]
    pub fn announcer(&self) -> &Announcer {
        self.announcer
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind())
            .field("args", &self.args)
            .finish()
    }
}
