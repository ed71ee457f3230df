//! Structured cost optimization recommendations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{check_min_f64, ValidationError};

/// How much work a recommendation takes to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ImplementationEffort {
    Low,
    Medium,
    High,
}

/// How urgently a recommendation should be acted on
///
/// Ordered so that `High` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Parse `Low`/`Medium`/`High` ignoring case
fn parse_level(field: &'static str, value: &str) -> Result<usize, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(0),
        "medium" => Ok(1),
        "high" => Ok(2),
        _ => Err(ValidationError::NotAllowed {
            field,
            allowed: "Low, Medium, High",
            actual: value.to_string(),
        }),
    }
}

impl ImplementationEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImplementationEffort::Low => "Low",
            ImplementationEffort::Medium => "Medium",
            ImplementationEffort::High => "High",
        }
    }
}

impl FromStr for ImplementationEffort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match parse_level("implementation_effort", s)? {
            0 => ImplementationEffort::Low,
            1 => ImplementationEffort::Medium,
            _ => ImplementationEffort::High,
        })
    }
}

impl TryFrom<String> for ImplementationEffort {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ImplementationEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match parse_level("priority", s)? {
            0 => Priority::Low,
            1 => Priority::Medium,
            _ => Priority::High,
        })
    }
}

impl TryFrom<String> for Priority {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single suggested cost-saving action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OptimizationRecommendationSpec")]
pub struct OptimizationRecommendation {
    category: String,
    description: String,
    potential_savings: f64,
    implementation_effort: ImplementationEffort,
    priority: Priority,
}

impl OptimizationRecommendation {
    /// `potential_savings` is a monthly USD figure and must be >= 0
    pub fn new(
        category: impl Into<String>,
        description: impl Into<String>,
        potential_savings: f64,
        implementation_effort: ImplementationEffort,
        priority: Priority,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            category: category.into(),
            description: description.into(),
            potential_savings: check_min_f64("potential_savings", potential_savings, 0.0)?,
            implementation_effort,
            priority,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn potential_savings(&self) -> f64 {
        self.potential_savings
    }

    pub fn implementation_effort(&self) -> ImplementationEffort {
        self.implementation_effort
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

#[derive(Deserialize)]
struct OptimizationRecommendationSpec {
    category: String,
    description: String,
    potential_savings: f64,
    implementation_effort: ImplementationEffort,
    priority: Priority,
}

impl TryFrom<OptimizationRecommendationSpec> for OptimizationRecommendation {
    type Error = ValidationError;

    fn try_from(spec: OptimizationRecommendationSpec) -> Result<Self, Self::Error> {
        OptimizationRecommendation::new(
            spec.category,
            spec.description,
            spec.potential_savings,
            spec.implementation_effort,
            spec.priority,
        )
    }
}
