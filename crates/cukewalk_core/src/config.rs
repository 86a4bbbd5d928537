//! Runner configuration.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use crate::RunnerError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/runner.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration for a [`Runner`](crate::Runner).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Suppress warnings when a listener tries to traverse a node itself.
    #[serde(default)]
    pub quiet: bool,

    /// How foreign traversal attempts are handled.
    #[serde(default)]
    pub foreign_traversal: ForeignTraversalPolicy,
}

/// Handling of a node accepted by a visitor other than its session's runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ForeignTraversalPolicy {
    /// Fail the attempt immediately.
    #[default]
    Reject,
    /// Block the caller until the traversal is resumed, released or
    /// cancelled, for at most `timeout_ms`.
    Park { timeout_ms: u64 },
}

impl ForeignTraversalPolicy {
    /// Returns the bounded wait of a parking policy.
    pub fn park_timeout(&self) -> Option<Duration> {
        match self {
            ForeignTraversalPolicy::Reject => None,
            ForeignTraversalPolicy::Park { timeout_ms } => Some(Duration::from_millis(*timeout_ms)),
        }
    }
}

impl RunnerConfig {
    /// Creates the default configuration: warnings on, foreign traversal rejected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_foreign_traversal(mut self, policy: ForeignTraversalPolicy) -> Self {
        self.foreign_traversal = policy;
        self
    }

    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RunnerError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| RunnerError::config(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parses configuration from JSON string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, RunnerError> {
        // Parse into Value first for validation
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| RunnerError::config(format!("Invalid JSON: {}", e)))?;

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded runner schema");
            Validator::new(&schema_json).expect("Invalid runner schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(RunnerError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| RunnerError::config(format!("Invalid config: {}", e)))
    }
}
