//! Compound filter syntax shared by every filter parameter.
//!
//! - `{A} {B}` matches when every part matches.
//! - `non-[A]` (or `not-[A]`) matches when `A` does not.
//!
//! Anything else is a single filter handed to the caller's predicate.

use crate::types::Severity;

fn negated(filter: &str) -> Option<&str> {
    filter
        .strip_prefix("non-[")
        .or_else(|| filter.strip_prefix("not-["))
        .and_then(|rest| rest.strip_suffix(']'))
}

fn conjunction(filter: &str) -> Option<impl Iterator<Item = &str>> {
    let inner = filter.strip_prefix('{')?.strip_suffix('}')?;
    Some(inner.split("} {"))
}

/// Whether `filter` matches, given a predicate for single filters.
pub fn matches_multi_filter(filter: &str, single: &dyn Fn(&str) -> bool) -> bool {
    if let Some(inner) = negated(filter) {
        return !matches_multi_filter(inner, single);
    }
    if let Some(mut parts) = conjunction(filter) {
        return parts.all(|part| matches_multi_filter(part, single));
    }
    single(filter)
}

/// The most severe error among the parts of a compound filter.
pub fn multi_filter_severity(
    filter: &str,
    single: &dyn Fn(&str) -> Option<Severity>,
) -> Option<Severity> {
    if let Some(inner) = negated(filter) {
        return multi_filter_severity(inner, single);
    }
    if let Some(parts) = conjunction(filter) {
        return parts.filter_map(|part| multi_filter_severity(part, single)).max();
    }
    single(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_melee(f: &str) -> bool {
        f == "Melee" || f == "Land"
    }

    #[test]
    fn single_filter_uses_predicate() {
        assert!(matches_multi_filter("Melee", &is_melee));
        assert!(!matches_multi_filter("Ranged", &is_melee));
    }

    #[test]
    fn conjunction_requires_all_parts() {
        assert!(matches_multi_filter("{Melee} {Land}", &is_melee));
        assert!(!matches_multi_filter("{Melee} {Water}", &is_melee));
    }

    #[test]
    fn negation_inverts() {
        assert!(matches_multi_filter("non-[Ranged]", &is_melee));
        assert!(!matches_multi_filter("not-[Melee]", &is_melee));
        assert!(matches_multi_filter("{Land} {non-[Ranged]}", &is_melee));
    }

    #[test]
    fn severity_reports_worst_part() {
        let check = |f: &str| match f {
            "ok" => None,
            "typo" => Some(Severity::PossibleFilteringUnique),
            _ => Some(Severity::RulesetSpecific),
        };
        assert_eq!(multi_filter_severity("ok", &check), None);
        assert_eq!(
            multi_filter_severity("{ok} {typo}", &check),
            Some(Severity::PossibleFilteringUnique)
        );
        assert_eq!(
            multi_filter_severity("{typo} {non-[bad]}", &check),
            Some(Severity::RulesetSpecific)
        );
    }
}
