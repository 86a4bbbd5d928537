//! Gherkin document nodes.
//!
//! The tree mirrors the feature file grammar: a set of features, each with an
//! optional background and a list of scenarios or scenario outlines, each with
//! steps that may carry tables or doc strings.

use serde::{Deserialize, Serialize};

use crate::{Location, Step, StepStatus};

/// Root of a parsed run: every feature file loaded for it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Features {
    pub features: Vec<Feature>,
}

impl Features {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// A single feature file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub comment: Comment,
    #[serde(default)]
    pub tags: Tags,
    /// Feature title and free-form description, as written.
    pub name: String,
    #[serde(default)]
    pub background: Option<Background>,
    #[serde(default)]
    pub feature_elements: Vec<FeatureElement>,
    #[serde(default)]
    pub location: Location,
}

impl Feature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_element(mut self, element: FeatureElement) -> Self {
        self.feature_elements.push(element);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

/// `#` comment lines preceding a feature or scenario.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comment {
    pub lines: Vec<String>,
}

impl Comment {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if there is no non-blank line to visit.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}

/// `@tag` annotations on a feature or scenario.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags {
    /// Tag names without the leading `@`.
    pub names: Vec<String>,
}

impl Tags {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Either kind of runnable element inside a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureElement {
    Scenario(Scenario),
    ScenarioOutline(ScenarioOutline),
}

impl FeatureElement {
    pub fn name(&self) -> &str {
        match self {
            FeatureElement::Scenario(s) => &s.name,
            FeatureElement::ScenarioOutline(o) => &o.name,
        }
    }

    pub fn tags(&self) -> &Tags {
        match self {
            FeatureElement::Scenario(s) => &s.tags,
            FeatureElement::ScenarioOutline(o) => &o.tags,
        }
    }
}

/// Steps run before every scenario of a feature.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Background {
    #[serde(default)]
    pub comment: Comment,
    pub keyword: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub source_indent: usize,
    #[serde(default)]
    pub steps: Steps,
}

impl Background {
    pub fn new(keyword: impl Into<String>, steps: Steps) -> Self {
        Self {
            keyword: keyword.into(),
            steps,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub comment: Comment,
    #[serde(default)]
    pub tags: Tags,
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub source_indent: usize,
    #[serde(default)]
    pub steps: Steps,
}

impl Scenario {
    pub fn new(keyword: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_steps(mut self, steps: Steps) -> Self {
        self.steps = steps;
        self
    }
}

/// A scenario template expanded once per examples row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioOutline {
    #[serde(default)]
    pub comment: Comment,
    #[serde(default)]
    pub tags: Tags,
    pub keyword: String,
    pub name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub source_indent: usize,
    #[serde(default)]
    pub steps: Steps,
    #[serde(default)]
    pub examples_array: ExamplesArray,
}

impl ScenarioOutline {
    pub fn new(keyword: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_steps(mut self, steps: Steps) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_examples(mut self, examples: Examples) -> Self {
        self.examples_array.examples.push(examples);
        self
    }
}

/// All `Examples:` sections of a scenario outline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamplesArray {
    pub examples: Vec<Examples>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Examples {
    pub keyword: String,
    #[serde(default)]
    pub name: String,
    pub outline_table: OutlineTable,
}

impl Examples {
    pub fn new(
        keyword: impl Into<String>,
        name: impl Into<String>,
        outline_table: OutlineTable,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            name: name.into(),
            outline_table,
        }
    }
}

/// The parameter table of an `Examples:` section. The first row is the header.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutlineTable {
    pub rows: Vec<TableRow>,
}

impl OutlineTable {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    pub fn header(&self) -> Option<&TableRow> {
        self.rows.first()
    }

    /// Rows that each produce one run of the outline.
    pub fn example_rows(&self) -> &[TableRow] {
        self.rows.get(1..).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Steps {
    pub steps: Vec<Step>,
}

impl Steps {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Extra input attached to a step: a data table or a doc string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultilineArg {
    Table(Table),
    PyString(PyString),
}

/// A data table passed to a step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    /// Builds a table of unexecuted cells from raw values.
    pub fn from_values<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(TableRow::from_values).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: values.into_iter().map(TableCell::new).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableCell {
    pub value: String,
    /// Set once the row has been executed as an outline example.
    #[serde(default)]
    pub status: Option<StepStatus>,
}

impl TableCell {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// A triple-quoted doc string passed to a step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PyString {
    pub text: String,
}

impl PyString {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_with_only_blank_lines_is_empty() {
        assert!(Comment::default().is_empty());
        assert!(Comment::new(["", "   "]).is_empty());
        assert!(!Comment::new(["# a note"]).is_empty());
    }

    #[test]
    fn test_tags_contains() {
        let tags = Tags::new(["wip", "slow"]);
        assert!(tags.contains("slow"));
        assert!(!tags.contains("fast"));
    }

    #[test]
    fn test_outline_table_header_and_examples() {
        let table = OutlineTable::new(vec![
            TableRow::from_values(["start", "eat", "left"]),
            TableRow::from_values(["12", "5", "7"]),
            TableRow::from_values(["20", "5", "15"]),
        ]);

        assert_eq!(table.header().map(|r| r.cells.len()), Some(3));
        assert_eq!(table.example_rows().len(), 2);
        assert_eq!(table.example_rows()[1].cells[2].value, "15");
    }

    #[test]
    fn test_empty_outline_table_has_no_examples() {
        let table = OutlineTable::default();
        assert!(table.header().is_none());
        assert!(table.example_rows().is_empty());
    }

    #[test]
    fn test_feature_element_accessors() {
        let scenario = FeatureElement::Scenario(
            Scenario::new("Scenario", "Plain").with_tags(Tags::new(["smoke"])),
        );
        let outline = FeatureElement::ScenarioOutline(ScenarioOutline::new(
            "Scenario Outline",
            "Templated",
        ));

        assert_eq!(scenario.name(), "Plain");
        assert!(scenario.tags().contains("smoke"));
        assert_eq!(outline.name(), "Templated");
        assert!(outline.tags().is_empty());
    }

    #[test]
    fn test_feature_deserializes_from_json() {
        let json = r#"{
            "name": "Eating",
            "tags": ["food"],
            "feature_elements": [
                {
                    "type": "scenario",
                    "keyword": "Scenario",
                    "name": "One cuke",
                    "steps": [
                        { "keyword": "Given", "step_match": { "name": "a cuke" } }
                    ]
                },
                {
                    "type": "scenario_outline",
                    "keyword": "Scenario Outline",
                    "name": "Many cukes",
                    "examples_array": [
                        {
                            "keyword": "Examples",
                            "outline_table": [
                                [{ "value": "n" }],
                                [{ "value": "5", "status": "passed" }]
                            ]
                        }
                    ]
                }
            ]
        }"#;

        let feature: Feature = serde_json::from_str(json).unwrap();
        assert_eq!(feature.name, "Eating");
        assert!(feature.tags.contains("food"));
        assert!(feature.comment.is_empty());
        assert_eq!(feature.feature_elements.len(), 2);

        match &feature.feature_elements[1] {
            FeatureElement::ScenarioOutline(outline) => {
                let table = &outline.examples_array.examples[0].outline_table;
                assert_eq!(table.rows[1].cells[0].status, Some(StepStatus::Passed));
            }
            other => panic!("Expected scenario outline, got {:?}", other),
        }
    }
}
