//! Parameter definitions and constraints.
//!
//! Parameters ("knobs") are the configuration surface an operator shows to
//! its host. They are set once and read on every validation pass, unlike
//! inputs which are connected to upstream images.

use serde::{Deserialize, Serialize};

/// UI hints for parameter display.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "widget", content = "options")]
pub enum UiHint {
    /// Default input widget based on type
    #[default]
    Default,
    /// Dropdown for selecting from options
    Dropdown {
        /// Available options
        options: Vec<String>,
    },
}

/// Constraints that parameter values must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "params")]
pub enum Constraint {
    /// Value must be one of the specified options
    OneOf(Vec<String>),
}

/// Definition of an operator parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterDefinition {
    /// Unique name within the operator (used in code and config files)
    pub name: String,
    /// Label shown next to the widget
    pub display_name: String,
    /// Default value
    pub default_value: String,
    /// Tooltip text
    pub tooltip: String,
    /// Constraints for validation
    pub constraints: Vec<Constraint>,
    /// UI widget hint
    pub ui_hint: UiHint,
}

impl ParameterDefinition {
    /// Create a new parameter definition.
    pub fn new(name: impl Into<String>, default_value: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            default_value: default_value.into(),
            tooltip: String::new(),
            constraints: Vec::new(),
            ui_hint: UiHint::Default,
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    /// Restrict the value to `options` and show them as a dropdown.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        self.constraints.push(Constraint::OneOf(options.clone()));
        self.ui_hint = UiHint::Dropdown { options };
        self
    }

    /// Dropdown options, if this is an enumeration parameter.
    pub fn options(&self) -> &[String] {
        match &self.ui_hint {
            UiHint::Dropdown { options } => options,
            UiHint::Default => &[],
        }
    }

    /// Validate a value against this parameter's constraints.
    pub fn validate(&self, value: &str) -> Result<(), String> {
        for constraint in &self.constraints {
            constraint
                .validate(value)
                .map_err(|e| format!("Parameter '{}': {}", self.name, e))?;
        }
        Ok(())
    }
}

impl Constraint {
    /// Validate a value against this constraint.
    pub fn validate(&self, value: &str) -> Result<(), String> {
        match self {
            Constraint::OneOf(options) => {
                if !options.iter().any(|opt| opt == value) {
                    return Err(format!("'{}' is not allowed ({})", value, self.description()));
                }
            }
        }

        Ok(())
    }

    /// Get a human-readable description of this constraint.
    pub fn description(&self) -> String {
        match self {
            Constraint::OneOf(options) => format!("One of: {}", options.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_builder() {
        let param = ParameterDefinition::new("bbox", "union")
            .with_display_name("set bbox to")
            .with_tooltip("Clip one input to match the other if wanted")
            .with_options(["union", "A", "B"]);

        assert_eq!(param.name, "bbox");
        assert_eq!(param.display_name, "set bbox to");
        assert_eq!(param.options(), ["union", "A", "B"]);
        assert_eq!(param.constraints.len(), 1);
    }

    #[test]
    fn test_one_of_validation() {
        let param = ParameterDefinition::new("bbox", "union").with_options(["union", "A", "B"]);

        assert!(param.validate("A").is_ok());
        assert!(param.validate("union").is_ok());
        assert!(param.validate("a").is_err());
        assert_eq!(
            param.validate("intersection").unwrap_err(),
            "Parameter 'bbox': 'intersection' is not allowed (One of: union, A, B)"
        );
    }

    #[test]
    fn test_constraint_description() {
        let constraint = Constraint::OneOf(vec!["union".to_string(), "A".to_string()]);
        assert_eq!(constraint.description(), "One of: union, A");
    }

    #[test]
    fn test_free_parameter_has_no_options() {
        let param = ParameterDefinition::new("label", "");
        assert!(param.options().is_empty());
        assert!(param.validate("anything").is_ok());
    }
}
