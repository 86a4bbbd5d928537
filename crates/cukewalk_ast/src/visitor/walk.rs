//! Traversal contracts of the composite nodes.
//!
//! Each implementation calls the visitor's matching entry point once per
//! child, in document order. Leaf values have no `Accept` implementation.

use crate::{
    Background, Comment, Examples, ExamplesArray, Feature, FeatureElement, Features,
    MultilineArg, OutlineTable, Scenario, ScenarioOutline, Step, StepResult, Steps, TableCell,
    TableRow, Tags,
};

use super::visit::Visitor;

/// A node that can drive a visitor over its children.
///
/// Implemented for shared references to composite nodes and for the borrowed
/// [`StepResult`] view.
pub trait Accept<'a> {
    /// Calls back into `visitor` once for each child of this node.
    fn accept<V>(self, visitor: &mut V) -> Result<(), V::Error>
    where
        V: Visitor<'a>;
}

impl<'a> Accept<'a> for &'a Features {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        for feature in &self.features {
            visitor.visit_feature(feature)?;
        }
        Ok(())
    }
}

impl<'a> Accept<'a> for &'a Feature {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        if !self.comment.is_empty() {
            visitor.visit_comment(&self.comment)?;
        }
        if !self.tags.is_empty() {
            visitor.visit_tags(&self.tags)?;
        }
        visitor.visit_feature_name(&self.name)?;
        if let Some(background) = &self.background {
            visitor.visit_background(background)?;
        }
        for feature_element in &self.feature_elements {
            visitor.visit_feature_element(feature_element)?;
        }
        Ok(())
    }
}

impl<'a> Accept<'a> for &'a Comment {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        for line in &self.lines {
            let line = line.trim();
            if !line.is_empty() {
                visitor.visit_comment_line(line)?;
            }
        }
        Ok(())
    }
}

impl<'a> Accept<'a> for &'a Tags {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        for name in &self.names {
            visitor.visit_tag_name(name)?;
        }
        Ok(())
    }
}

impl<'a> Accept<'a> for &'a FeatureElement {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            FeatureElement::Scenario(scenario) => scenario.accept(visitor),
            FeatureElement::ScenarioOutline(outline) => outline.accept(visitor),
        }
    }
}

impl<'a> Accept<'a> for &'a Background {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        if !self.comment.is_empty() {
            visitor.visit_comment(&self.comment)?;
        }
        visitor.visit_background_name(
            &self.keyword,
            &self.name,
            &self.location,
            self.source_indent,
        )?;
        visitor.visit_steps(&self.steps)
    }
}

impl<'a> Accept<'a> for &'a Scenario {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        if !self.comment.is_empty() {
            visitor.visit_comment(&self.comment)?;
        }
        if !self.tags.is_empty() {
            visitor.visit_tags(&self.tags)?;
        }
        visitor.visit_scenario_name(
            &self.keyword,
            &self.name,
            &self.location,
            self.source_indent,
        )?;
        visitor.visit_steps(&self.steps)
    }
}

impl<'a> Accept<'a> for &'a ScenarioOutline {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        if !self.comment.is_empty() {
            visitor.visit_comment(&self.comment)?;
        }
        if !self.tags.is_empty() {
            visitor.visit_tags(&self.tags)?;
        }
        visitor.visit_scenario_name(
            &self.keyword,
            &self.name,
            &self.location,
            self.source_indent,
        )?;
        visitor.visit_steps(&self.steps)?;
        visitor.visit_examples_array(&self.examples_array)
    }
}

impl<'a> Accept<'a> for &'a ExamplesArray {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        for examples in &self.examples {
            visitor.visit_examples(examples)?;
        }
        Ok(())
    }
}

impl<'a> Accept<'a> for &'a Examples {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_examples_name(&self.keyword, &self.name)?;
        visitor.visit_outline_table(&self.outline_table)
    }
}

impl<'a> Accept<'a> for &'a OutlineTable {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        for row in &self.rows {
            visitor.visit_table_row(row)?;
        }
        Ok(())
    }
}

impl<'a> Accept<'a> for &'a Steps {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        for step in &self.steps {
            visitor.visit_step(step)?;
        }
        Ok(())
    }
}

impl<'a> Accept<'a> for &'a Step {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_step_result(self.result())
    }
}

impl<'a> Accept<'a> for StepResult<'a> {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_step_name(self.step_name())?;
        if let Some(multiline_arg) = self.multiline_arg {
            visitor.visit_multiline_arg(multiline_arg)?;
        }
        if let Some(exception) = self.exception {
            visitor.visit_exception(exception, self.status)?;
        }
        Ok(())
    }
}

impl<'a> Accept<'a> for &'a MultilineArg {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            MultilineArg::Table(table) => {
                for row in &table.rows {
                    visitor.visit_table_row(row)?;
                }
                Ok(())
            }
            MultilineArg::PyString(py_string) => visitor.visit_py_string(py_string),
        }
    }
}

impl<'a> Accept<'a> for &'a TableRow {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        for cell in &self.cells {
            visitor.visit_table_cell(cell)?;
        }
        Ok(())
    }
}

impl<'a> Accept<'a> for &'a TableCell {
    fn accept<V: Visitor<'a>>(self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_table_cell_value(&self.value, self.status)
    }
}
