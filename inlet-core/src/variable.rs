use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a variable's value is allowed to change over simulation time.
///
/// Matches the lowercase variability strings used in model-description
/// metadata, so descriptors can be lifted straight out of a model's
/// variable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variability {
    /// Never changes.
    Constant,
    /// Set before initialization, then frozen for the run.
    Fixed,
    /// May be adjusted between events, constant otherwise.
    Tunable,
    /// Piecewise-constant; changes only at event instants.
    Discrete,
    /// Evolves smoothly between samples.
    #[default]
    Continuous,
}

impl Variability {
    /// Returns the lowercase string form used in model descriptions.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Variability::Constant => "constant",
            Variability::Fixed => "fixed",
            Variability::Tunable => "tunable",
            Variability::Discrete => "discrete",
            Variability::Continuous => "continuous",
        }
    }
}

impl fmt::Display for Variability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized variability string.
#[derive(Debug, Error)]
#[error("unknown variability: {value:?}")]
pub struct UnknownVariabilityError {
    pub value: String,
}

impl FromStr for Variability {
    type Err = UnknownVariabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(Variability::Constant),
            "fixed" => Ok(Variability::Fixed),
            "tunable" => Ok(Variability::Tunable),
            "discrete" => Ok(Variability::Discrete),
            "continuous" => Ok(Variability::Continuous),
            _ => Err(UnknownVariabilityError {
                value: s.to_string(),
            }),
        }
    }
}

/// Name and variability of a model variable.
///
/// This is the only part of a model's variable-description metadata that
/// signal sampling and event location depend on.
///
/// # Examples
///
/// ```
/// use inlet_core::{Variability, VariableDescriptor};
///
/// let valve = VariableDescriptor::new("valve_open", Variability::Discrete);
/// assert!(valve.is_discrete());
/// assert_eq!(valve.variability.to_string(), "discrete");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub name: String,
    pub variability: Variability,
}

impl VariableDescriptor {
    /// Creates a descriptor for the named variable.
    pub fn new(name: impl Into<String>, variability: Variability) -> Self {
        Self {
            name: name.into(),
            variability,
        }
    }

    /// Returns `true` if the variable changes value only at event instants.
    #[must_use]
    pub fn is_discrete(&self) -> bool {
        self.variability == Variability::Discrete
    }
}
