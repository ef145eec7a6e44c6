mod common;

use std::sync::OnceLock;

use common::{World, world, world_with};
use proptest::prelude::*;
use strategies::{
    arb_bracket_soup, arb_directive, arb_gen_expr, arb_param_value, arb_stats_text,
};
use uniques::parse::{conditional_texts, fill_placeholders, params, placeholder_text, remove_conditionals};
use uniques::{
    Expression, GameContext, TemporaryUnique, TemporaryUniques, Unique, UniqueMap, UniqueType,
    countables,
};

fn shared_world() -> &'static World {
    static WORLD: OnceLock<World> = OnceLock::new();
    WORLD.get_or_init(world)
}

// ---------------------------------------------------------------------------
// Expressions agree with wide-integer arithmetic
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn expression_matches_reference(tree in arb_gen_expr()) {
        let text = tree.render();
        let parsed = Expression::parse(&text);
        prop_assert!(parsed.is_ok(), "{text} failed to parse: {parsed:?}");
        let value = parsed.unwrap().evaluate(&GameContext::empty());
        prop_assert_eq!(value, tree.reference(), "{}", text);
    }

    #[test]
    fn multiplication_binds_tighter_than_addition(a in 0_i32..1000, b in 0_i32..1000, c in 0_i32..1000) {
        let ctx = GameContext::empty();
        let eval = |text: String| Expression::parse(&text).and_then(|e| e.evaluate(&ctx));
        prop_assert_eq!(eval(format!("{a} + {b} * {c}")), Ok(a + b * c));
        prop_assert_eq!(eval(format!("{a} - {b} - {c}")), Ok(a - b - c));
        prop_assert_eq!(eval(format!("-{a} + {b}")), Ok(-a + b));
    }

    #[test]
    fn resolving_never_panics(text in arb_bracket_soup()) {
        let w = shared_world();
        let _ = countables::resolve(&text, &GameContext::empty());
        let _ = countables::resolve(&text, &w.rome_ctx());
        let _ = Expression::parse(&text).map(|e| e.evaluate(&w.roma_ctx()));
    }
}

// ---------------------------------------------------------------------------
// Structural parsing
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn placeholders_round_trip(values in prop::collection::vec(arb_param_value(), 0..4), conditional in arb_directive()) {
        let mut text = String::from("Gain");
        for value in &values {
            text.push_str(" [");
            text.push_str(value);
            text.push(']');
        }
        prop_assert_eq!(params(&text), values.clone());
        prop_assert_eq!(fill_placeholders(&placeholder_text(&text), &params(&text)), text.clone());

        // Conditionals never leak into the parameters.
        let with_conditional = format!("{text} <{conditional}>");
        prop_assert_eq!(params(&with_conditional), values);
        prop_assert_eq!(conditional_texts(&with_conditional).len(), 1);
    }

    #[test]
    fn parsing_is_total(text in arb_bracket_soup()) {
        let unique = Unique::new(text.as_str());
        prop_assert_eq!(unique.conditionals().len(), conditional_texts(&text).len());
        prop_assert!(placeholder_text(&text).matches("[]").count() >= unique.params().len());
        prop_assert!(remove_conditionals(&text).len() <= text.len());
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn matching_yields_each_directive_multiplier_times(lines in prop::collection::vec(arb_directive(), 0..12)) {
        let w = shared_world();
        let map = UniqueMap::from_text(&lines.join("\n"));
        prop_assert_eq!(map.len(), lines.len());

        for ctx in [w.rome_ctx(), w.roma_ctx(), GameContext::for_civ(w.greece), GameContext::empty()] {
            let expected: usize = map
                .bucket(UniqueType::Stats)
                .iter()
                .filter(|u| u.satisfied_by(&ctx))
                .map(|u| u.multiplier(&ctx))
                .sum();
            prop_assert_eq!(map.matching(UniqueType::Stats, &ctx).count(), expected);
            // Repeated queries roll the same chances.
            prop_assert_eq!(map.matching(UniqueType::Stats, &ctx).count(), expected);
        }

        let ignoring = GameContext::ignore_multiplication_for_caching();
        prop_assert_eq!(map.matching(UniqueType::Stats, &ignoring).count(), lines.len());
    }

    #[test]
    fn certain_chances_are_certain(stats in arb_stats_text(), turns in -500_i32..5000) {
        let w = world_with(|s| s.game.turns = turns);
        let ctx = w.rome_ctx();
        let always = format!("{stats} <with [100]% chance>");
        let never = format!("{stats} <with [0]% chance>");
        prop_assert!(Unique::new(always).satisfied_by(&ctx));
        prop_assert!(!Unique::new(never).satisfied_by(&ctx));
    }

    #[test]
    fn temporary_effects_last_their_duration(durations in prop::collection::vec(-1_i32..8, 0..8), elapsed in 0_i32..10) {
        let template = Unique::new("[+1 Gold] <for [1] turns>");
        let mut active = TemporaryUniques::new();
        for &turns in &durations {
            active.push(TemporaryUnique::with_turns(&template, turns));
        }
        for _ in 0..elapsed {
            active.end_turn();
        }
        let expected = durations
            .iter()
            .filter(|&&t| t < 0 || elapsed == 0 || t > elapsed)
            .count();
        prop_assert_eq!(active.len(), expected);
        if elapsed > 0 {
            prop_assert!(active.iter().all(|t| t.turns_left() != 0));
        }
    }
}
