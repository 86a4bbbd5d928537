//! Step nodes and the execution data attached to them.
//!
//! Step execution itself happens elsewhere. By the time a step reaches a
//! visitor its match, status and any failure are plain data.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Location, MultilineArg};

/// Outcome of executing (or not executing) a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed,
    Undefined,
    Pending,
    #[default]
    Skipped,
    /// Step of a scenario outline, rendered as a template rather than run.
    Outline,
}

impl StepStatus {
    /// Returns the status name as used by formatters.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Passed => "passed",
            StepStatus::Failed => "failed",
            StepStatus::Undefined => "undefined",
            StepStatus::Pending => "pending",
            StepStatus::Skipped => "skipped",
            StepStatus::Outline => "outline",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value captured from the step text by a step definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepArgument {
    /// Byte offset of the capture within the step name.
    pub offset: usize,
    /// Captured text.
    pub value: String,
}

impl StepArgument {
    pub fn new(offset: usize, value: impl Into<String>) -> Self {
        Self {
            offset,
            value: value.into(),
        }
    }
}

/// The result of matching a step's text against the step definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepMatch {
    /// The step text as written in the feature file.
    pub name: String,
    /// Where the matching step definition lives, if one matched.
    #[serde(default)]
    pub step_definition: Option<Location>,
    /// Captured arguments, ordered by offset.
    #[serde(default)]
    pub args: Vec<StepArgument>,
}

impl StepMatch {
    /// Creates a match for a step no definition claimed.
    pub fn undefined(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            step_definition: None,
            args: Vec::new(),
        }
    }

    /// Creates a match against the step definition at `step_definition`.
    pub fn new(
        name: impl Into<String>,
        step_definition: Location,
        args: Vec<StepArgument>,
    ) -> Self {
        Self {
            name: name.into(),
            step_definition: Some(step_definition),
            args,
        }
    }

    /// Returns true if a step definition matched.
    #[inline]
    pub fn is_defined(&self) -> bool {
        self.step_definition.is_some()
    }

    /// Returns the step name with every captured argument passed through `format`.
    ///
    /// Arguments that overlap a previous one or fall outside the name are left
    /// untouched.
    ///
    /// ```rust
    /// use cukewalk_ast::{Location, StepArgument, StepMatch};
    ///
    /// let step_match = StepMatch::new(
    ///     "I have 3 cukes in my belly",
    ///     Location::new("steps.rs", 4),
    ///     vec![StepArgument::new(7, "3")],
    /// );
    /// assert_eq!(
    ///     step_match.format_args(|arg| format!("[{arg}]")),
    ///     "I have [3] cukes in my belly"
    /// );
    /// ```
    pub fn format_args<F>(&self, mut format: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let name = self.name.as_str();
        let mut formatted = String::with_capacity(name.len());
        let mut cursor = 0;

        for arg in &self.args {
            let start = arg.offset;
            let end = start + arg.value.len();
            if start < cursor
                || end > name.len()
                || !name.is_char_boundary(start)
                || !name.is_char_boundary(end)
                || name[start..end] != arg.value
            {
                continue;
            }
            formatted.push_str(&name[cursor..start]);
            formatted.push_str(&format(&arg.value));
            cursor = end;
        }

        formatted.push_str(&name[cursor..]);
        formatted
    }
}

/// A failure raised while executing a step, carried as data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepException {
    pub message: String,
    #[serde(default)]
    pub backtrace: Vec<String>,
}

impl StepException {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            backtrace: Vec::new(),
        }
    }

    pub fn with_backtrace(mut self, backtrace: Vec<String>) -> Self {
        self.backtrace = backtrace;
        self
    }
}

impl fmt::Display for StepException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A single step of a scenario, background or outline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Step {
    /// `Given`, `When`, `Then`, `And`, `But` or a localized equivalent.
    pub keyword: String,
    pub step_match: StepMatch,
    #[serde(default)]
    pub multiline_arg: Option<MultilineArg>,
    #[serde(default)]
    pub status: StepStatus,
    #[serde(default)]
    pub exception: Option<StepException>,
    /// Column at which formatters align the step's source comment.
    #[serde(default)]
    pub source_indent: usize,
    /// True when the step belongs to a background.
    #[serde(default)]
    pub background: bool,
}

impl Step {
    /// Creates an unexecuted step whose text matched no definition yet.
    pub fn new(keyword: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            step_match: StepMatch::undefined(name),
            ..Self::default()
        }
    }

    pub fn with_match(mut self, step_match: StepMatch) -> Self {
        self.step_match = step_match;
        self
    }

    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_exception(mut self, exception: StepException) -> Self {
        self.exception = Some(exception);
        self
    }

    pub fn with_multiline_arg(mut self, arg: MultilineArg) -> Self {
        self.multiline_arg = Some(arg);
        self
    }

    pub fn with_source_indent(mut self, source_indent: usize) -> Self {
        self.source_indent = source_indent;
        self
    }

    pub fn in_background(mut self) -> Self {
        self.background = true;
        self
    }

    /// Returns the step text.
    #[inline]
    pub fn name(&self) -> &str {
        &self.step_match.name
    }

    /// Borrows this step's execution data as a step result.
    pub fn result(&self) -> StepResult<'_> {
        StepResult {
            keyword: &self.keyword,
            step_match: &self.step_match,
            multiline_arg: self.multiline_arg.as_ref(),
            status: self.status,
            exception: self.exception.as_ref(),
            source_indent: self.source_indent,
            background: self.background,
        }
    }
}

/// Argument shape of the step result event.
///
/// Positional order: keyword, step match, multiline argument, status,
/// exception, source indent, background flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult<'a> {
    pub keyword: &'a str,
    pub step_match: &'a StepMatch,
    pub multiline_arg: Option<&'a MultilineArg>,
    pub status: StepStatus,
    pub exception: Option<&'a StepException>,
    pub source_indent: usize,
    pub background: bool,
}

impl<'a> StepResult<'a> {
    /// Returns the step name portion of this result.
    pub fn step_name(&self) -> StepName<'a> {
        StepName {
            keyword: self.keyword,
            step_match: self.step_match,
            status: self.status,
            source_indent: self.source_indent,
            background: self.background,
        }
    }
}

/// Argument shape of the step name event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepName<'a> {
    pub keyword: &'a str,
    pub step_match: &'a StepMatch,
    pub status: StepStatus,
    pub source_indent: usize,
    pub background: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::passed(StepStatus::Passed, "passed")]
    #[case::failed(StepStatus::Failed, "failed")]
    #[case::undefined(StepStatus::Undefined, "undefined")]
    #[case::pending(StepStatus::Pending, "pending")]
    #[case::skipped(StepStatus::Skipped, "skipped")]
    #[case::outline(StepStatus::Outline, "outline")]
    fn test_status_names(#[case] status: StepStatus, #[case] expected: &str) {
        assert_eq!(status.as_str(), expected);
        assert_eq!(status.to_string(), expected);
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, format!("\"{}\"", expected));
    }

    #[test]
    fn test_format_args_wraps_each_capture() {
        let step_match = StepMatch::new(
            "I transfer 20 from savings to checking",
            Location::new("steps.rs", 10),
            vec![
                StepArgument::new(11, "20"),
                StepArgument::new(19, "savings"),
                StepArgument::new(30, "checking"),
            ],
        );

        assert_eq!(
            step_match.format_args(|arg| format!("<b>{}</b>", arg)),
            "I transfer <b>20</b> from <b>savings</b> to <b>checking</b>"
        );
    }

    #[test]
    fn test_format_args_skips_misaligned_captures() {
        let step_match = StepMatch::new(
            "I have 3 cukes",
            Location::new("steps.rs", 1),
            vec![
                StepArgument::new(7, "3"),
                StepArgument::new(7, "3 cukes"),
                StepArgument::new(40, "x"),
            ],
        );

        assert_eq!(
            step_match.format_args(|arg| arg.to_uppercase() + "!"),
            "I have 3! cukes"
        );
    }

    #[test]
    fn test_format_args_without_captures_returns_name() {
        let step_match = StepMatch::undefined("nothing to see");
        assert!(!step_match.is_defined());
        assert_eq!(step_match.format_args(|_| unreachable!()), "nothing to see");
    }

    #[test]
    fn test_step_result_borrows_step_data() {
        let step = Step::new("Given", "a failing step")
            .with_status(StepStatus::Failed)
            .with_exception(StepException::new("boom"))
            .with_source_indent(20)
            .in_background();

        let result = step.result();
        assert_eq!(result.keyword, "Given");
        assert_eq!(result.step_match.name, "a failing step");
        assert_eq!(result.status, StepStatus::Failed);
        assert_eq!(result.exception.map(|e| e.message.as_str()), Some("boom"));
        assert_eq!(result.source_indent, 20);
        assert!(result.background);
        assert!(result.multiline_arg.is_none());

        let name = result.step_name();
        assert_eq!(name.keyword, "Given");
        assert_eq!(name.status, StepStatus::Failed);
        assert!(name.background);
    }

    #[test]
    fn test_step_deserializes_with_defaults() {
        let step: Step = serde_json::from_str(
            r#"{ "keyword": "When", "step_match": { "name": "I log in" } }"#,
        )
        .unwrap();

        assert_eq!(step.name(), "I log in");
        assert_eq!(step.status, StepStatus::Skipped);
        assert!(!step.background);
        assert!(step.exception.is_none());
    }
}
