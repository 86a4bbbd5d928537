//! Visitor trait for traversing Gherkin AST nodes.
//!
//! Each `visit_*` method has a default implementation that accepts the node,
//! recursing into its children. Override only the node kinds you care about.
//!
//! # Example
//!
//! ```rust
//! use cukewalk_ast::{Features, Feature, Tags, Visitor};
//! use std::convert::Infallible;
//!
//! /// Collects every tag in the run.
//! struct TagCollector<'a> {
//!     tags: Vec<&'a str>,
//! }
//!
//! impl<'a> Visitor<'a> for TagCollector<'a> {
//!     type Error = Infallible;
//!
//!     fn visit_tag_name(&mut self, tag_name: &'a str) -> Result<(), Infallible> {
//!         self.tags.push(tag_name);
//!         Ok(())
//!     }
//! }
//!
//! let features = Features::new(vec![
//!     Feature::new("Billing").with_tags(Tags::new(["slow", "billing"])),
//! ]);
//!
//! let mut collector = TagCollector { tags: Vec::new() };
//! collector.visit_features(&features).unwrap();
//! assert_eq!(collector.tags, vec!["slow", "billing"]);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    Background, Comment, Examples, ExamplesArray, Feature, FeatureElement, Features, Location,
    MultilineArg, OutlineTable, PyString, Step, StepException, StepName, StepResult, StepStatus,
    Steps, TableCell, TableRow, Tags,
};

use super::walk::Accept;

/// Identity of one traversal session.
///
/// Every call to [`SessionId::next`] yields an id distinct from all earlier
/// ones in the process. Ids are for logging and display; they prove nothing
/// about who holds them. See [`SessionKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocates a fresh session id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id, for logging.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Proof of being the canonical driver of one session.
///
/// A key is neither `Clone` nor `Copy`, and two keys are the same only if
/// they are the same object: [`SessionKey::is`] compares addresses. A visitor
/// can therefore only present a session's key if it was handed a reference to
/// that very key.
#[derive(Debug)]
pub struct SessionKey {
    id: SessionId,
}

impl SessionKey {
    /// Creates a key for a new session.
    pub fn new() -> Self {
        Self {
            id: SessionId::next(),
        }
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns true if `other` is this very key.
    #[inline]
    pub fn is(&self, other: &SessionKey) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Default for SessionKey {
    fn default() -> Self {
        Self::new()
    }
}

/// Visitor trait for walking a Gherkin AST.
///
/// # Lifetime
///
/// The `'a` lifetime ties visited nodes to the tree owned by the parser, so a
/// visitor may keep references to nodes for the rest of the walk.
///
/// # Errors
///
/// Every method returns `Result<(), Self::Error>`. The first error aborts the
/// rest of the traversal; use `?` to propagate it.
pub trait Visitor<'a>: Sized {
    /// Error that aborts the traversal.
    type Error;

    /// Returns the key of the session this visitor drives, if it is a
    /// canonical driver.
    ///
    /// Plain visitors are not bound to a session.
    #[inline]
    fn session_key(&self) -> Option<&SessionKey> {
        None
    }

    // === Structure ===

    /// Visit the root of a run.
    fn visit_features(&mut self, features: &'a Features) -> Result<(), Self::Error> {
        features.accept(self)
    }

    /// Visit a Feature node.
    fn visit_feature(&mut self, feature: &'a Feature) -> Result<(), Self::Error> {
        feature.accept(self)
    }

    /// Visit a Comment node.
    fn visit_comment(&mut self, comment: &'a Comment) -> Result<(), Self::Error> {
        comment.accept(self)
    }

    /// Visit one comment line.
    fn visit_comment_line(&mut self, _comment_line: &'a str) -> Result<(), Self::Error> {
        Ok(()) // Leaf
    }

    /// Visit a Tags node.
    fn visit_tags(&mut self, tags: &'a Tags) -> Result<(), Self::Error> {
        tags.accept(self)
    }

    /// Visit one tag name.
    fn visit_tag_name(&mut self, _tag_name: &'a str) -> Result<(), Self::Error> {
        Ok(()) // Leaf
    }

    /// Visit a feature's title.
    fn visit_feature_name(&mut self, _name: &'a str) -> Result<(), Self::Error> {
        Ok(()) // Leaf
    }

    /// Visit a scenario or scenario outline.
    fn visit_feature_element(
        &mut self,
        feature_element: &'a FeatureElement,
    ) -> Result<(), Self::Error> {
        feature_element.accept(self)
    }

    /// Visit a Background node.
    fn visit_background(&mut self, background: &'a Background) -> Result<(), Self::Error> {
        background.accept(self)
    }

    /// Visit a background's keyword line.
    fn visit_background_name(
        &mut self,
        _keyword: &'a str,
        _name: &'a str,
        _location: &'a Location,
        _source_indent: usize,
    ) -> Result<(), Self::Error> {
        Ok(()) // Leaf
    }

    // === Scenario outlines ===

    /// Visit all examples sections of an outline.
    fn visit_examples_array(
        &mut self,
        examples_array: &'a ExamplesArray,
    ) -> Result<(), Self::Error> {
        examples_array.accept(self)
    }

    /// Visit one examples section.
    fn visit_examples(&mut self, examples: &'a Examples) -> Result<(), Self::Error> {
        examples.accept(self)
    }

    /// Visit an examples section's keyword line.
    fn visit_examples_name(
        &mut self,
        _keyword: &'a str,
        _name: &'a str,
    ) -> Result<(), Self::Error> {
        Ok(()) // Leaf
    }

    /// Visit an examples section's parameter table.
    fn visit_outline_table(&mut self, outline_table: &'a OutlineTable) -> Result<(), Self::Error> {
        outline_table.accept(self)
    }

    /// Visit a scenario's keyword line.
    fn visit_scenario_name(
        &mut self,
        _keyword: &'a str,
        _name: &'a str,
        _location: &'a Location,
        _source_indent: usize,
    ) -> Result<(), Self::Error> {
        Ok(()) // Leaf
    }

    // === Steps ===

    /// Visit a step sequence.
    fn visit_steps(&mut self, steps: &'a Steps) -> Result<(), Self::Error> {
        steps.accept(self)
    }

    /// Visit a Step node.
    fn visit_step(&mut self, step: &'a Step) -> Result<(), Self::Error> {
        step.accept(self)
    }

    /// Visit the outcome of a step.
    fn visit_step_result(&mut self, step_result: StepResult<'a>) -> Result<(), Self::Error> {
        step_result.accept(self)
    }

    /// Visit a step's keyword and text.
    fn visit_step_name(&mut self, _step_name: StepName<'a>) -> Result<(), Self::Error> {
        Ok(()) // Leaf
    }

    /// Visit a step's table or doc string.
    fn visit_multiline_arg(&mut self, multiline_arg: &'a MultilineArg) -> Result<(), Self::Error> {
        multiline_arg.accept(self)
    }

    /// Visit the failure a step raised.
    fn visit_exception(
        &mut self,
        _exception: &'a StepException,
        _status: StepStatus,
    ) -> Result<(), Self::Error> {
        Ok(()) // Leaf
    }

    /// Visit a doc string.
    fn visit_py_string(&mut self, _py_string: &'a PyString) -> Result<(), Self::Error> {
        Ok(()) // Leaf
    }

    // === Tables ===

    /// Visit a TableRow node.
    fn visit_table_row(&mut self, table_row: &'a TableRow) -> Result<(), Self::Error> {
        table_row.accept(self)
    }

    /// Visit a TableCell node.
    fn visit_table_cell(&mut self, table_cell: &'a TableCell) -> Result<(), Self::Error> {
        table_cell.accept(self)
    }

    /// Visit a cell's value.
    fn visit_table_cell_value(
        &mut self,
        _value: &'a str,
        _status: Option<StepStatus>,
    ) -> Result<(), Self::Error> {
        Ok(()) // Leaf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_unique() {
        let a = SessionId::next();
        let b = SessionId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn test_plain_visitor_has_no_session() {
        struct Plain;
        impl<'a> Visitor<'a> for Plain {
            type Error = ();
        }

        assert!(Plain.session_key().is_none());
    }

    #[test]
    fn test_session_key_is_compared_by_identity() {
        let key = SessionKey::new();
        let other = SessionKey::new();

        assert!(key.is(&key));
        assert!(!key.is(&other));
        assert_ne!(key.id(), other.id());
    }
}
