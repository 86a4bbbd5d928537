//! Visitor pattern for Gherkin AST traversal.
//!
//! # Overview
//!
//! - [`Visitor`] - One entry point per node kind; defaults recurse into children
//! - [`Accept`] - Implemented by composite nodes to call back into a visitor
//!   for each child, in document order
//! - [`SessionKey`] - Proves a visitor is the canonical driver of a traversal
//! - [`SessionId`] - Loggable id of a traversal session
//!
//! # Traversal order
//!
//! | Node              | Children, in order                                              |
//! |-------------------|-----------------------------------------------------------------|
//! | `Features`        | feature*                                                        |
//! | `Feature`         | comment?, tags?, feature name, background?, feature element*    |
//! | `Comment`         | comment line* (blank lines skipped)                             |
//! | `Tags`            | tag name*                                                       |
//! | `Background`      | comment?, background name, steps                                |
//! | `Scenario`        | comment?, tags?, scenario name, steps                           |
//! | `ScenarioOutline` | comment?, tags?, scenario name, steps, examples array           |
//! | `ExamplesArray`   | examples*                                                       |
//! | `Examples`        | examples name, outline table                                    |
//! | `OutlineTable`    | table row*                                                      |
//! | `Steps`           | step*                                                           |
//! | `Step`            | step result                                                     |
//! | `StepResult`      | step name, multiline arg?, exception?                           |
//! | `MultilineArg`    | table row* or py string                                         |
//! | `TableRow`        | table cell*                                                     |
//! | `TableCell`       | table cell value                                                |
//!
//! Optional children marked `?` are skipped when absent or empty.

mod visit;
mod walk;

pub use visit::{SessionId, SessionKey, Visitor};
pub use walk::Accept;
