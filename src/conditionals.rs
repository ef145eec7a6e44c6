//! Evaluation of `<...>` conditionals against a [`GameContext`].
//!
//! One dispatch table covers every conditional template. Evaluation is
//! pure: the same conditional under the same context always gives the same
//! answer, chance conditionals included.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::countables;
use crate::game::{City, Civilization, CombatAction, ReligionState};
use crate::types::{GameContext, Stat, Unique, UniqueTarget, UniqueType};

/// Whether `conditional` holds under `ctx`.
///
/// `unique` is the directive carrying the conditional; some conditionals
/// read it (chance seeding, game-speed scaling, "first to research this").
/// Effect-only markers always hold. Untyped conditionals, conditionals of
/// a non-conditional type, and conditionals whose inputs are missing from
/// `ctx` never hold.
#[must_use]
pub fn conditional_applies(
    unique: Option<&Unique>,
    conditional: &Unique,
    ctx: &GameContext<'_>,
) -> bool {
    let Some(kind) = conditional.unique_type() else {
        tracing::trace!(text = conditional.text(), "unknown conditional never applies");
        return false;
    };
    if kind.is_effect_only() {
        return true;
    }
    evaluate(kind, unique, conditional, ctx).unwrap_or(false)
}

/// `None` when something the check needs is absent from the context.
fn evaluate(
    kind: UniqueType,
    unique: Option<&Unique>,
    conditional: &Unique,
    ctx: &GameContext<'_>,
) -> Option<bool> {
    use UniqueType as T;

    let param = |i: usize| conditional.param(i);
    let number = |i: usize| param(i).parse::<i32>().ok();
    let countable = |i: usize| countables::resolve(param(i), ctx);
    let civ = || ctx.relevant_civ();
    let city = || ctx.relevant_city();
    let tile = || ctx.relevant_tile();
    let unit = || ctx.relevant_unit();
    let game = || ctx.relevant_game_info();
    let modified_by_speed = unique.is_some_and(Unique::is_modified_by_game_speed);

    let compare_era = |compare: fn(usize, usize) -> bool| -> Option<bool> {
        let era = game()?.ruleset().era_number(param(0))?;
        Some(compare(civ()?.era_number(), era))
    };

    let applies = match kind {
        // -- Randomness and time --------------------------------------------
        T::ConditionalChance => {
            let percent = param(0).parse::<f32>().ok()?;
            state_based_random(ctx, unique) < percent / 100.0
        }
        T::ConditionalEveryTurns => {
            let every = number(0).filter(|n| *n > 0)?;
            game()?.turns() % every == 0
        }
        T::ConditionalBeforeTurns => game()?.turns() < number(0)?,
        T::ConditionalAfterTurns => game()?.turns() >= number(0)?,

        // -- Civilization ---------------------------------------------------
        T::ConditionalCivFilter => civ()?.matches_filter(param(0)),
        T::ConditionalWar => civ()?.is_at_war(),
        T::ConditionalNotWar => !civ()?.is_at_war(),
        T::ConditionalGoldenAge => civ()?.is_golden_age(),
        T::ConditionalNotGoldenAge => !civ()?.is_golden_age(),
        T::ConditionalHappy => civ()?.happiness() >= 0,
        T::ConditionalDuringEra => compare_era(|current, era| current == era)?,
        T::ConditionalBeforeEra => compare_era(|current, era| current < era)?,
        T::ConditionalStartingFromEra => compare_era(|current, era| current >= era)?,
        T::ConditionalIfStartingInEra => game()?.parameters().starting_era == param(0),
        T::ConditionalSpeed => game()?.speed().name == param(0),
        T::ConditionalDifficulty => game()?.parameters().difficulty == param(0),
        T::ConditionalDifficultyOrHigher => {
            // Holds when the game's difficulty ranks at or above the named one.
            let game = game()?;
            let wanted = game.ruleset().difficulty_index(param(0))?;
            game.difficulty_index()? >= wanted
        }
        T::ConditionalVictoryEnabled => game()?
            .parameters()
            .victory_types
            .iter()
            .any(|v| v == param(0)),
        T::ConditionalVictoryDisabled => !game()?
            .parameters()
            .victory_types
            .iter()
            .any(|v| v == param(0)),
        T::ConditionalReligionEnabled => game()?.parameters().religion_enabled,
        T::ConditionalReligionDisabled => !game()?.parameters().religion_enabled,
        T::ConditionalEspionageEnabled => game()?.parameters().espionage_enabled,
        T::ConditionalEspionageDisabled => !game()?.parameters().espionage_enabled,
        T::ConditionalNuclearWeaponsEnabled => game()?.parameters().nuclear_weapons_enabled,
        T::ConditionalModEnabled => game()?
            .parameters()
            .mods
            .iter()
            .any(|m| mod_name_matches(m, param(0))),
        T::ConditionalModNotEnabled => !game()?
            .parameters()
            .mods
            .iter()
            .any(|m| mod_name_matches(m, param(0))),
        T::ConditionalTech => has_researched_matching(civ()?, param(0)),
        T::ConditionalNoTech => !has_researched_matching(civ()?, param(0)),
        T::ConditionalWhileResearching => {
            let civ = civ()?;
            let ruleset = civ.game_info().ruleset();
            civ.current_research()
                .is_some_and(|tech| ruleset.tech_matches_filter(tech, param(0)))
        }
        T::ConditionalAfterPolicyOrBelief => {
            let civ = civ()?;
            civ.is_adopted(param(0)) || civ.has_belief(param(0))
        }
        T::ConditionalBeforePolicyOrBelief => {
            let civ = civ()?;
            !civ.is_adopted(param(0)) && !civ.has_belief(param(0))
        }
        T::ConditionalBeforePantheon => civ()?.religion_state() == ReligionState::None,
        T::ConditionalAfterPantheon => civ()?.religion_state() != ReligionState::None,
        T::ConditionalBeforeReligion => civ()?.religion_state() < ReligionState::Religion,
        T::ConditionalAfterReligion => civ()?.religion_state() >= ReligionState::Religion,
        T::ConditionalBeforeEnhancingReligion => {
            civ()?.religion_state() < ReligionState::EnhancedReligion
        }
        T::ConditionalAfterEnhancingReligion => {
            civ()?.religion_state() >= ReligionState::EnhancedReligion
        }
        T::ConditionalAfterGeneratingGreatProphet => civ()?.great_prophets_earned() > 0,
        T::ConditionalBuildingBuilt => civ()?.cities().iter().any(|c| c.has_building(param(0))),
        T::ConditionalBuildingNotBuilt => {
            !civ()?.cities().iter().any(|c| c.has_building(param(0)))
        }
        T::ConditionalBuildingBuiltAll => {
            let civ = civ()?;
            civ.cities()
                .iter()
                .filter(|c| c.matches_filter(param(1), Some(civ)))
                .all(|c| c.has_building(param(0)))
        }
        T::ConditionalBuildingBuiltAmount => {
            let civ = civ()?;
            let needed = number(1)?;
            let built = civ
                .cities()
                .iter()
                .filter(|c| c.has_building(param(0)) && c.matches_filter(param(2), Some(civ)))
                .count();
            i64::try_from(built).unwrap_or(i64::MAX) >= i64::from(needed)
        }
        T::ConditionalBuildingBuiltByAnybody => built_by_anybody(game()?.civilizations(), param(0)),
        T::ConditionalBuildingNotBuiltByAnybody => {
            !built_by_anybody(game()?.civilizations(), param(0))
        }
        T::ConditionalWithResource => ctx.resource_amount(param(0)) > 0,
        T::ConditionalWithoutResource => ctx.resource_amount(param(0)) <= 0,
        T::ConditionalWhenAboveAmountStatResource | T::ConditionalWhenAboveAmountStatResourceSpeed => {
            let speed = modified_by_speed || kind == T::ConditionalWhenAboveAmountStatResourceSpeed;
            let limit = param(0).parse::<f32>().ok()?;
            resource_or_stat_within(ctx, param(1), speed, |current, factor| {
                current > limit * factor
            })?
        }
        T::ConditionalWhenBelowAmountStatResource | T::ConditionalWhenBelowAmountStatResourceSpeed => {
            let speed = modified_by_speed || kind == T::ConditionalWhenBelowAmountStatResourceSpeed;
            let limit = param(0).parse::<f32>().ok()?;
            resource_or_stat_within(ctx, param(1), speed, |current, factor| {
                current < limit * factor
            })?
        }
        T::ConditionalWhenBetweenStatResource | T::ConditionalWhenBetweenStatResourceSpeed => {
            let speed = modified_by_speed || kind == T::ConditionalWhenBetweenStatResourceSpeed;
            let lower = param(0).parse::<f32>().ok()?;
            let upper = param(1).parse::<f32>().ok()?;
            resource_or_stat_within(ctx, param(2), speed, |current, factor| {
                current >= lower * factor && current <= upper * factor
            })?
        }

        // -- Cities ---------------------------------------------------------
        T::ConditionalInThisCity => city().is_some(),
        T::ConditionalCityFilter => city()?.matches_filter(param(0), civ()),
        T::ConditionalCityConnected => city()?.is_connected_to_capital(),
        T::ConditionalCityMajorReligion => {
            city()?.majority_religion_state() >= ReligionState::Religion
        }
        T::ConditionalCityEnhancedReligion => {
            city()?.majority_religion_state() == ReligionState::EnhancedReligion
        }
        T::ConditionalCityThisReligion => {
            let majority = city()?.majority_religion_name();
            let ours = civ()?.religion_name();
            majority.is_some() && majority == ours
        }
        T::ConditionalCityReligion => majority_religion_matches(city()?, civ(), param(0)),
        T::ConditionalCityNotReligion => !majority_religion_matches(city()?, civ(), param(0)),
        T::ConditionalCityWithBuilding => city()?.has_building(param(0)),
        T::ConditionalCityWithoutBuilding => !city()?.has_building(param(0)),
        T::ConditionalPopulationFilter => city()?.population_count(param(1)) >= number(0)?,
        T::ConditionalExactPopulationFilter => city()?.population_count(param(1)) == number(0)?,
        T::ConditionalBetweenPopulationFilter => {
            let population = city()?.population_count(param(2));
            (number(0)?..=number(1)?).contains(&population)
        }
        T::ConditionalBelowPopulationFilter => city()?.population_count(param(1)) < number(0)?,
        T::ConditionalWLTKD => city()?.is_we_love_the_king_day(),
        T::ConditionalWhenGarrisoned => city()?.is_garrisoned(),

        // -- Units and combat -----------------------------------------------
        T::ConditionalVsCity => ctx.their_combatant_ref()?.is_city(),
        T::ConditionalVsUnits | T::ConditionalVsCombatant => {
            ctx.their_combatant_ref()?.matches_filter(param(0))
        }
        T::ConditionalOurUnit | T::ConditionalOurUnitOnUnit => unit()?.matches_filter(param(0)),
        T::ConditionalUnitWithPromotion => unit()?.has_promotion(param(0)),
        T::ConditionalUnitWithoutPromotion => !unit()?.has_promotion(param(0)),
        T::ConditionalAttacking => ctx.combat_action_kind() == Some(CombatAction::Attack),
        T::ConditionalDefending => ctx.combat_action_kind() == Some(CombatAction::Defend),
        T::ConditionalFightingInTiles => {
            ctx.attacked_tile_ref()?.matches_filter(param(0), civ())
        }
        T::ConditionalForeignContinent => {
            let civ = civ()?;
            let tile = tile()?;
            let capital_continent = civ
                .cities()
                .into_iter()
                .find(|c| c.matches_filter("Capital", Some(civ)))
                .and_then(|c| c.center_tile())
                .map(|t| t.continent());
            capital_continent != Some(tile.continent())
        }
        T::ConditionalAdjacentUnit => {
            let civ = civ()?;
            let unit = unit()?;
            tile()?.neighbors().iter().any(|n| {
                n.units().iter().any(|other| {
                    other.id() != unit.id()
                        && other.civ().civ_name() == civ.civ_name()
                        && other.matches_filter(param(0))
                })
            })
        }
        T::ConditionalStackedWithUnit => {
            let unit = unit()?;
            unit.tile()?
                .units()
                .iter()
                .any(|other| other.id() != unit.id() && other.matches_filter(param(0)))
        }
        T::ConditionalAboveHP => {
            let hp = number(0)?;
            unit().is_some_and(|u| u.health() > hp)
                || ctx.our_combatant_ref().is_some_and(|c| c.health() > hp)
        }
        T::ConditionalBelowHP => {
            let hp = number(0)?;
            unit().is_some_and(|u| u.health() < hp)
                || ctx.our_combatant_ref().is_some_and(|c| c.health() < hp)
        }
        T::ConditionalHasNotUsedOtherActions => unit().is_none_or(|u| !u.has_used_abilities()),
        T::ConditionalVsLargerCiv => {
            let ours = civ().map_or(1, |c| c.cities().len());
            let theirs = ctx
                .their_combatant_ref()
                .map_or(0, |c| c.civ().cities().len());
            ours < theirs
        }

        // -- Tiles and regions ----------------------------------------------
        T::ConditionalInTiles => tile()?.matches_filter(param(0), civ()),
        T::ConditionalInTilesNot => !tile()?.matches_filter(param(0), civ()),
        T::ConditionalAdjacentTo => tile()?.is_adjacent_to(param(0), civ()),
        T::ConditionalNotAdjacentTo => !tile()?.is_adjacent_to(param(0), civ()),
        T::ConditionalNearTiles => {
            let distance = number(0)?;
            tile()?
                .tiles_in_distance(distance)
                .iter()
                .any(|t| t.matches_filter(param(1), civ()))
        }
        T::ConditionalNeighborTiles => {
            let (min, max) = (number(0)?, number(1)?);
            let matching = tile()?
                .neighbors()
                .iter()
                .filter(|t| t.matches_filter(param(2), civ()))
                .count();
            let matching = i32::try_from(matching).unwrap_or(i32::MAX);
            (min..=max).contains(&matching)
        }
        T::ConditionalOnWaterMaps => ctx.region_ref()?.continent_id == -1,
        T::ConditionalInRegionOfType => ctx.region_ref()?.kind == param(0),
        T::ConditionalInRegionExceptOfType => ctx.region_ref().is_none_or(|r| r.kind != param(0)),

        // -- First to unlock ------------------------------------------------
        T::ConditionalFirstCivToResearch => {
            let unique = unique.filter(|u| u.source_object_type() == Some(UniqueTarget::Tech))?;
            let tech = unique.source_object_name()?;
            no_other_major_civ(ctx, |c| c.is_researched(tech))?
        }
        T::ConditionalFirstCivToAdopt => {
            let unique = unique.filter(|u| u.source_object_type() == Some(UniqueTarget::Policy))?;
            let policy = unique.source_object_name()?;
            no_other_major_civ(ctx, |c| c.is_adopted(policy))?
        }

        // -- Countable comparisons ------------------------------------------
        T::ConditionalCountableEqualTo => countable(0)? == countable(1)?,
        T::ConditionalCountableDifferentThan => countable(0)? != countable(1)?,
        T::ConditionalCountableMoreThan => countable(0)? > countable(1)?,
        T::ConditionalCountableLessThan => countable(0)? < countable(1)?,
        T::ConditionalCountableBetween => {
            let value = countable(0)?;
            (countable(1)?..=countable(2)?).contains(&value)
        }

        _ => {
            tracing::trace!(%kind, "not a conditional");
            return None;
        }
    };
    Some(applies)
}

/// Deterministic roll in `[0, 1)` seeded from the turn, the carrying
/// directive and the context.
fn state_based_random(ctx: &GameContext<'_>, unique: Option<&Unique>) -> f32 {
    let turns = ctx.relevant_game_info().map_or(0, |g| g.turns());
    let mut seed = u64::from(turns.unsigned_abs());
    seed = seed
        .wrapping_mul(31)
        .wrapping_add(unique.map_or(0, Unique::stable_hash));
    seed = seed.wrapping_mul(31).wrapping_add(ctx.stable_hash());
    ChaCha8Rng::seed_from_u64(seed).r#gen::<f32>()
}

/// Compare the stockpile of a resource or stat. `check` receives the
/// current amount and the game-speed factor to scale limits by.
fn resource_or_stat_within(
    ctx: &GameContext<'_>,
    name: &str,
    modified_by_speed: bool,
    check: impl Fn(f32, f32) -> bool,
) -> Option<bool> {
    let game = ctx.relevant_game_info()?;
    let speed = game.speed();
    if game.ruleset().has_resource(name) {
        let factor = if modified_by_speed { speed.modifier } else { 1.0 };
        return Some(check(ctx.resource_amount(name) as f32, factor));
    }
    let stat = Stat::from_name(name)?;
    let factor = if modified_by_speed {
        speed.stat_cost_modifier(stat)
    } else {
        1.0
    };
    Some(check(ctx.stat_amount(stat) as f32, factor))
}

/// Whether the city's majority religion passes `filter` as seen by `civ`.
/// A city without one matches nothing.
fn majority_religion_matches(city: &dyn City, civ: Option<&dyn Civilization>, filter: &str) -> bool {
    let Some(religion) = city.majority_religion_name() else {
        return false;
    };
    let ours = civ.and_then(|c| c.religion_name());
    match filter {
        "any" => true,
        "major" => city.majority_religion_state() >= ReligionState::Religion,
        "enhanced" => city.majority_religion_state() == ReligionState::EnhancedReligion,
        "your" => ours == Some(religion),
        "foreign" => ours != Some(religion),
        "enemy" => civ.is_some_and(|civ| {
            civ.game_info()
                .civilizations()
                .into_iter()
                .find(|founder| founder.religion_name() == Some(religion))
                .is_some_and(|founder| civ.is_at_war_with(founder))
        }),
        name => name == religion,
    }
}

fn has_researched_matching(civ: &dyn Civilization, filter: &str) -> bool {
    let ruleset = civ.game_info().ruleset();
    if ruleset.has_tech(filter) {
        return civ.is_researched(filter);
    }
    civ.researched_techs()
        .iter()
        .any(|tech| ruleset.tech_matches_filter(tech, filter))
}

fn built_by_anybody(civs: Vec<&dyn Civilization>, filter: &str) -> bool {
    civs.iter()
        .any(|civ| civ.cities().iter().any(|c| c.has_building(filter)))
}

/// True when no major civilization other than the relevant one satisfies
/// `done`.
fn no_other_major_civ(
    ctx: &GameContext<'_>,
    done: impl Fn(&dyn Civilization) -> bool,
) -> Option<bool> {
    let me = ctx.relevant_civ().map(|c| c.civ_name());
    let game = ctx.relevant_game_info()?;
    let taken = game
        .civilizations()
        .into_iter()
        .any(|c| Some(c.civ_name()) != me && c.is_major_civ() && done(c));
    Some(!taken)
}

/// Mod names match exactly, or by a `*` wildcard at either end.
fn mod_name_matches(name: &str, filter: &str) -> bool {
    match (filter.strip_prefix('*'), filter.strip_suffix('*')) {
        (Some(rest), Some(_)) => {
            let inner = rest.strip_suffix('*').unwrap_or(rest);
            name.contains(inner)
        }
        (Some(suffix), None) => name.ends_with(suffix),
        (None, Some(prefix)) => name.starts_with(prefix),
        (None, None) => name == filter,
    }
}
