use thiserror::Error;

use super::parameter_type::{Severity, UniqueParameterType};

/// A parameter value no validator for its slot accepts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parameter {param_index} '{value}' is not a valid {} ({severity})", accepted_names(.accepted))]
pub struct ComplianceError {
    pub param_index: usize,
    pub value: String,
    pub severity: Severity,
    /// The validators that were tried.
    pub accepted: Vec<UniqueParameterType>,
}

fn accepted_names(accepted: &[UniqueParameterType]) -> String {
    accepted
        .iter()
        .map(|t| t.parameter_name())
        .collect::<Vec<_>>()
        .join(" or ")
}

/// One lint finding about a directive in a ruleset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{severity}: \"{text}\": {message}")]
pub struct RulesetError {
    /// The offending directive (or conditional) text.
    pub text: String,
    pub message: String,
    pub severity: Severity,
}

impl RulesetError {
    pub(crate) fn new(text: &str, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.to_owned(),
            message: message.into(),
            severity,
        }
    }
}
