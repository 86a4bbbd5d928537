//! Borrowed, type-erased view of any node a visitor can be handed.

use crate::visitor::{Accept, Visitor};
use crate::{
    Background, Comment, Examples, ExamplesArray, Feature, FeatureElement, Features,
    MultilineArg, OutlineTable, PyString, Step, StepException, StepResult, Steps, TableCell,
    TableRow, Tags,
};

/// A reference to one node of the tree, or to a plain text value.
///
/// Leaf values such as names, keywords and cell values are [`NodeRef::Text`];
/// accepting them does nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Features(&'a Features),
    Feature(&'a Feature),
    Comment(&'a Comment),
    Tags(&'a Tags),
    FeatureElement(&'a FeatureElement),
    Background(&'a Background),
    ExamplesArray(&'a ExamplesArray),
    Examples(&'a Examples),
    OutlineTable(&'a OutlineTable),
    Steps(&'a Steps),
    Step(&'a Step),
    StepResult(StepResult<'a>),
    MultilineArg(&'a MultilineArg),
    Exception(&'a StepException),
    PyString(&'a PyString),
    TableRow(&'a TableRow),
    TableCell(&'a TableCell),
    Text(&'a str),
}

impl<'a> NodeRef<'a> {
    /// Returns true if accepting this node calls back into the visitor.
    pub const fn is_composite(&self) -> bool {
        !matches!(
            self,
            NodeRef::Exception(_) | NodeRef::PyString(_) | NodeRef::Text(_)
        )
    }

    /// Drives `visitor` over this node's children.
    pub fn accept<V>(&self, visitor: &mut V) -> Result<(), V::Error>
    where
        V: Visitor<'a>,
    {
        match *self {
            NodeRef::Features(n) => n.accept(visitor),
            NodeRef::Feature(n) => n.accept(visitor),
            NodeRef::Comment(n) => n.accept(visitor),
            NodeRef::Tags(n) => n.accept(visitor),
            NodeRef::FeatureElement(n) => n.accept(visitor),
            NodeRef::Background(n) => n.accept(visitor),
            NodeRef::ExamplesArray(n) => n.accept(visitor),
            NodeRef::Examples(n) => n.accept(visitor),
            NodeRef::OutlineTable(n) => n.accept(visitor),
            NodeRef::Steps(n) => n.accept(visitor),
            NodeRef::Step(n) => n.accept(visitor),
            NodeRef::StepResult(n) => n.accept(visitor),
            NodeRef::MultilineArg(n) => n.accept(visitor),
            NodeRef::TableRow(n) => n.accept(visitor),
            NodeRef::TableCell(n) => n.accept(visitor),
            NodeRef::Exception(_) | NodeRef::PyString(_) | NodeRef::Text(_) => Ok(()),
        }
    }
}
