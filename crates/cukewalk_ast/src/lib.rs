//! # cukewalk_ast
//!
//! Gherkin AST definitions for cukewalk.
//!
//! This crate provides the node types produced by a feature-file parser and the
//! [`Visitor`] trait that drives traversal over them. Nodes know their own
//! children; a visitor decides what happens before and after each of them.
//!
//! ## Architecture
//!
//! - Nodes are plain owned data (`Vec`, `String`) produced by the parser
//! - Every composite node implements [`Accept`], calling back into the
//!   visitor once per child in document order
//! - Leaf values (names, tag names, cell values) are passed to the visitor as
//!   borrowed strings
//!
//! ## Example
//!
//! ```rust
//! use cukewalk_ast::{Feature, FeatureElement, Features, Scenario, Visitor};
//! use std::convert::Infallible;
//!
//! struct ScenarioNames(Vec<String>);
//!
//! impl<'a> Visitor<'a> for ScenarioNames {
//!     type Error = Infallible;
//!
//!     fn visit_scenario_name(
//!         &mut self,
//!         _keyword: &'a str,
//!         name: &'a str,
//!         _location: &'a cukewalk_ast::Location,
//!         _source_indent: usize,
//!     ) -> Result<(), Infallible> {
//!         self.0.push(name.to_string());
//!         Ok(())
//!     }
//! }
//!
//! let features = Features::new(vec![Feature::new("Login").with_element(
//!     FeatureElement::Scenario(Scenario::new("Scenario", "Valid password")),
//! )]);
//!
//! let mut names = ScenarioNames(Vec::new());
//! names.visit_features(&features).unwrap();
//! assert_eq!(names.0, vec!["Valid password"]);
//! ```

mod location;
mod node;
mod node_ref;
mod step;
pub mod visitor;

pub use location::Location;
pub use node::{
    Background, Comment, Examples, ExamplesArray, Feature, FeatureElement, Features,
    MultilineArg, OutlineTable, PyString, Scenario, ScenarioOutline, Steps, Table, TableCell,
    TableRow, Tags,
};
pub use node_ref::NodeRef;
pub use step::{Step, StepArgument, StepException, StepMatch, StepName, StepResult, StepStatus};

// Re-export commonly used visitor items for convenience
pub use visitor::{Accept, SessionId, SessionKey, Visitor};
