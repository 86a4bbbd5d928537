//! Source locations for feature elements and step definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `file:line` position in a feature file or step definition file.
///
/// Lines are 1-indexed, matching what editors and backtraces report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    /// Path of the source file, as given to the parser.
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
}

impl Location {
    /// Creates a new location.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Returns the location formatted as `file:line`.
    #[inline]
    pub fn file_colon_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_colon_line() {
        let location = Location::new("features/login.feature", 12);
        assert_eq!(location.file_colon_line(), "features/login.feature:12");
    }

    #[test]
    fn test_default_location_is_empty() {
        let location = Location::default();
        assert_eq!(location.to_string(), ":0");
    }

    #[test]
    fn test_location_deserializes_from_json() {
        let location: Location =
            serde_json::from_str(r#"{ "file": "a.feature", "line": 3 }"#).unwrap();
        assert_eq!(location, Location::new("a.feature", 3));
    }
}
