//! Prompt templates with named `{placeholder}` variables.

use crate::error::{Error, Result};

/// A named-placeholder template. Every declared input variable must be
/// supplied at format time; substitution replaces all occurrences.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>, input_variables: &[&str]) -> Self {
        Self {
            template: template.into(),
            input_variables: input_variables.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Render the template, substituting `{name}` for each declared
    /// variable. Fails with `MissingVariable` if a declared variable has
    /// no supplied value.
    pub fn format(&self, values: &[(&str, &str)]) -> Result<String> {
        let mut rendered = self.template.clone();
        for name in &self.input_variables {
            let value = values
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| *v)
                .ok_or_else(|| Error::MissingVariable(name.clone()))?;
            rendered = rendered.replace(&format!("{{{}}}", name), value);
        }
        Ok(rendered)
    }
}
