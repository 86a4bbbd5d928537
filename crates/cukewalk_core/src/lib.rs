//! # cukewalk_core
//!
//! Canonical runner for the cukewalk Gherkin AST.
//!
//! This crate provides:
//! - The [`Runner`] and its per-traversal [`Session`], which walk the tree in
//!   document order and notify listeners before and after every node
//! - The [`EventKind`] / [`EventArgs`] table of event identities
//! - The legacy listener adapter ([`Listener`], [`LegacyListener`])
//! - The foreign traversal guard ([`Guarded`], [`TraversalToken`])
//! - Announcements queued from inside a traversal ([`Announcer`])
//! - Configuration loading ([`RunnerConfig`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use cukewalk_core::{Listener, Runner, RunnerConfig};
//!
//! let config = RunnerConfig::from_file("cukewalk.json")?;
//! let mut runner = Runner::new(vec![Listener::legacy(ProgressPrinter::default())], config);
//!
//! runner.visit_features(&features)?;
//! ```

mod announcer;
mod config;
mod error;
pub mod event;
pub mod guard;
pub mod listener;
mod runner;

#[cfg(test)]
pub mod test_utils;

pub use announcer::Announcer;
pub use config::{ForeignTraversalPolicy, RunnerConfig};
pub use error::{ListenerError, RunnerError};
pub use event::{Event, EventArgs, EventKind};
pub use guard::{Guarded, ParkOutcome, TraversalToken};
pub use listener::{LegacyListener, Listener};
pub use runner::{Runner, Session};

pub use cukewalk_ast::{Accept, Visitor};
