//! Lint pass over directive data.
//!
//! Nothing here affects evaluation: a directive that fails every check is
//! still parsed, stored and matched. The findings are meant for mod authors.

use crate::types::{
    ComplianceError, ModifierType, Ruleset, RulesetError, Severity, Unique, UniqueFlag,
    UniqueTarget,
};

/// Parameter values of `unique` that no accepted validator for their slot
/// takes. Untyped directives have no slots and yield nothing.
///
/// Each error carries the least severe verdict among the slot's validators.
#[must_use]
pub fn compliance_errors(unique: &Unique, ruleset: &Ruleset) -> Vec<ComplianceError> {
    let Some(unique_type) = unique.unique_type() else {
        return Vec::new();
    };
    let mut errors = Vec::new();
    for (param_index, (value, accepted)) in unique
        .params()
        .iter()
        .zip(unique_type.parameter_type_map())
        .enumerate()
    {
        let verdicts: Option<Vec<Severity>> = accepted
            .iter()
            .map(|validator| validator.error_severity(value, ruleset))
            .collect();
        let Some(severity) = verdicts.and_then(|v| v.into_iter().min()) else {
            continue;
        };
        errors.push(ComplianceError {
            param_index,
            value: value.clone(),
            severity,
            accepted: accepted.clone(),
        });
    }
    errors
}

/// Every finding for `unique` as carried by an object of kind `target`.
#[must_use]
pub fn check_unique(unique: &Unique, target: UniqueTarget, ruleset: &Ruleset) -> Vec<RulesetError> {
    let mut errors = Vec::new();
    let Some(unique_type) = unique.unique_type() else {
        errors.push(RulesetError::new(
            unique.text(),
            "not a recognized unique",
            Severity::PossibleFilteringUnique,
        ));
        return errors;
    };

    if !unique_type.can_accept_unique_target(target) {
        errors.push(RulesetError::new(
            unique.text(),
            format!("{unique_type} is not allowed on {target}"),
            Severity::PossibleFilteringUnique,
        ));
    }

    push_compliance(&mut errors, unique, ruleset);

    if unique_type.has_flag(UniqueFlag::NoConditionals) && !unique.conditionals().is_empty() {
        errors.push(RulesetError::new(
            unique.text(),
            "conditionals are not allowed on this unique",
            Severity::RulesetInvariant,
        ));
    }

    for conditional in unique.conditionals() {
        check_conditional(&mut errors, unique, conditional, ruleset);
    }

    tracing::debug!(
        unique = unique.text(),
        %target,
        findings = errors.len(),
        "checked unique"
    );
    errors
}

/// [`check_unique`] over a whole list, in order.
#[must_use]
pub fn check_uniques<'a>(
    uniques: impl IntoIterator<Item = &'a Unique>,
    target: UniqueTarget,
    ruleset: &Ruleset,
) -> Vec<RulesetError> {
    let errors: Vec<_> = uniques
        .into_iter()
        .flat_map(|unique| check_unique(unique, target, ruleset))
        .collect();
    let worst = errors.iter().map(|e| e.severity).max();
    tracing::debug!(findings = errors.len(), ?worst, "checked unique list");
    errors
}

fn check_conditional(
    errors: &mut Vec<RulesetError>,
    unique: &Unique,
    conditional: &Unique,
    ruleset: &Ruleset,
) {
    let Some(conditional_type) = conditional.unique_type() else {
        errors.push(RulesetError::new(
            conditional.text(),
            format!("unknown conditional in \"{}\"", unique.text()),
            Severity::PossibleFilteringUnique,
        ));
        return;
    };
    if conditional_type.modifier_type() == ModifierType::None {
        errors.push(RulesetError::new(
            conditional.text(),
            format!("{conditional_type} cannot be used as a conditional"),
            Severity::RulesetInvariant,
        ));
        return;
    }
    if conditional_type.is_trigger_condition() && !unique.is_triggerable() {
        errors.push(RulesetError::new(
            conditional.text(),
            format!("trigger condition on \"{}\", which cannot be triggered", unique.text()),
            Severity::PossibleFilteringUnique,
        ));
    }
    push_compliance(errors, conditional, ruleset);
}

fn push_compliance(errors: &mut Vec<RulesetError>, unique: &Unique, ruleset: &Ruleset) {
    errors.extend(
        compliance_errors(unique, ruleset)
            .into_iter()
            .map(|e| RulesetError::new(unique.text(), e.to_string(), e.severity)),
    );
}
