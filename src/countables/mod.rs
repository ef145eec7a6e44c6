//! Numeric references into game state.
//!
//! A countable is either a simple reference (`turns`, `Gold`,
//! `[Melee] Units`, `Iron`, a literal integer ...) or an arithmetic
//! [`Expression`] over simple references. Resolution never fails loudly:
//! anything that cannot be computed resolves to `None`.

mod expression;

pub use expression::{BinaryOp, Expression, ExpressionError, Operand};

use std::cell::OnceCell;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::game::{City, Civilization, GameInfo};
use crate::parse;
use crate::types::{GameContext, Ruleset, Severity, Stat, UniqueParameterType};

/// The families of simple countables, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Countable {
    Integer,
    Turns,
    Year,
    Cities,
    Units,
    Stat,
    PolicyBranches,
    FilteredCities,
    FilteredUnits,
    FilteredBuildings,
    FilteredPolicies,
    RemainingCivs,
    OwnedTiles,
    TileFilterTiles,
    TileResource,
    CityStates,
    DifficultyNumber,
    EraNumber,
    SpeedModifier,
    Expression,
}

impl Countable {
    pub const ALL: &'static [Countable] = &[
        Self::Integer,
        Self::Turns,
        Self::Year,
        Self::Cities,
        Self::Units,
        Self::Stat,
        Self::PolicyBranches,
        Self::FilteredCities,
        Self::FilteredUnits,
        Self::FilteredBuildings,
        Self::FilteredPolicies,
        Self::RemainingCivs,
        Self::OwnedTiles,
        Self::TileFilterTiles,
        Self::TileResource,
        Self::CityStates,
        Self::DifficultyNumber,
        Self::EraNumber,
        Self::SpeedModifier,
        Self::Expression,
    ];

    /// Recognition key: a fixed keyword or a template with one placeholder.
    /// Empty for families recognized by shape rather than by text.
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Turns => "turns",
            Self::Year => "year",
            Self::Cities => "Cities",
            Self::Units => "Units",
            Self::PolicyBranches => "Completed Policy branches",
            Self::FilteredCities => "[cityFilter] Cities",
            Self::FilteredUnits => "[mapUnitFilter] Units",
            Self::FilteredBuildings => "[buildingFilter] Buildings",
            Self::FilteredPolicies => "Adopted [policyFilter] Policies",
            Self::RemainingCivs => "Remaining [civFilter] Civilizations",
            Self::OwnedTiles => "Owned [tileFilter] Tiles",
            Self::TileFilterTiles => "[tileFilter] Tiles",
            Self::CityStates => "City-States",
            Self::DifficultyNumber => "Difficulty number",
            Self::EraNumber => "Era number",
            Self::SpeedModifier => "Speed modifier for [stat]",
            Self::Integer | Self::Stat | Self::TileResource | Self::Expression => "",
        }
    }

    /// The validator for the single placeholder, for templated families.
    fn parameter_type(self) -> Option<UniqueParameterType> {
        match self {
            Self::FilteredCities => Some(UniqueParameterType::CityFilter),
            Self::FilteredUnits => Some(UniqueParameterType::MapUnitFilter),
            Self::FilteredBuildings => Some(UniqueParameterType::BuildingFilter),
            Self::FilteredPolicies => Some(UniqueParameterType::PolicyFilter),
            Self::RemainingCivs => Some(UniqueParameterType::CivFilter),
            Self::OwnedTiles | Self::TileFilterTiles => Some(UniqueParameterType::TileFilter),
            Self::SpeedModifier => Some(UniqueParameterType::StatName),
            _ => None,
        }
    }

    /// Placeholder form of [`text`](Self::text) for templated families.
    fn placeholder(self) -> Option<&'static str> {
        static PLACEHOLDERS: LazyLock<HashMap<Countable, String>> = LazyLock::new(|| {
            Countable::ALL
                .iter()
                .filter(|c| c.parameter_type().is_some())
                .map(|&c| (c, parse::placeholder_text(c.text())))
                .collect()
        });
        PLACEHOLDERS.get(&self).map(String::as_str)
    }

    /// Whether `text` belongs to this family. Resource names need a
    /// ruleset to be recognized.
    #[must_use]
    pub fn matches(self, text: &str, ruleset: Option<&Ruleset>) -> bool {
        match self {
            Self::Expression => parse_expression(text).is_some(),
            _ => match self.placeholder() {
                Some(template) => parse::placeholder_text(text) == template,
                None => self.matches_plain(text, ruleset),
            },
        }
    }

    /// Families recognized by shape or by a fixed keyword.
    fn matches_plain(self, text: &str, ruleset: Option<&Ruleset>) -> bool {
        match self {
            Self::Integer => text.parse::<i32>().is_ok(),
            Self::Stat => Stat::from_name(text).is_some(),
            Self::TileResource => ruleset.is_some_and(|r| r.has_resource(text)),
            _ => text == self.text(),
        }
    }

    /// The first family `text` belongs to.
    #[must_use]
    pub fn matching(text: &str, ruleset: Option<&Ruleset>) -> Option<Countable> {
        recognize(text, ruleset, true).map(|r| match r {
            Recognized::Simple(countable) => countable,
            Recognized::Expression(_) => Countable::Expression,
        })
    }

    /// Evaluate `text`, already known to belong to this family.
    #[must_use]
    pub fn eval(self, text: &str, ctx: &GameContext<'_>) -> Option<i32> {
        let civ = ctx.relevant_civ();
        let game = ctx.relevant_game_info();
        let param = || parse::params(text).into_iter().next().unwrap_or_default();

        match self {
            Self::Integer => text.parse().ok(),
            Self::Turns => game.map(|g| g.turns()),
            Self::Year => game.map(|g| g.year()),
            Self::Cities => civ.map(|c| count(c.cities().len())),
            Self::Units => civ.map(|c| count(c.units().len())),
            Self::Stat => {
                let stat = Stat::from_name(text)?;
                if stat == Stat::Happiness {
                    return civ.map(|c| c.happiness());
                }
                Some(ctx.stat_amount(stat))
            }
            Self::PolicyBranches => civ.map(|c| c.completed_policy_branches()),
            Self::FilteredCities => {
                let filter = param();
                civ.map(|c| {
                    count(
                        c.cities()
                            .iter()
                            .filter(|city| city.matches_filter(&filter, Some(c)))
                            .count(),
                    )
                })
            }
            Self::FilteredUnits => {
                let filter = param();
                civ.map(|c| count(c.units().iter().filter(|u| u.matches_filter(&filter)).count()))
            }
            Self::FilteredBuildings => {
                let filter = param();
                civ.map(|c| {
                    c.cities()
                        .iter()
                        .map(|city| city.count_buildings_matching(&filter))
                        .sum::<i32>()
                })
            }
            Self::FilteredPolicies => {
                let filter = param();
                let ruleset = game?.ruleset();
                civ.map(|c| {
                    count(
                        c.adopted_policies()
                            .iter()
                            .filter(|p| ruleset.policy_matches_filter(p, &filter))
                            .count(),
                    )
                })
            }
            Self::RemainingCivs => {
                let filter = param();
                game.map(|g| {
                    count(
                        g.civilizations()
                            .iter()
                            .filter(|c| c.is_alive() && c.matches_filter(&filter))
                            .count(),
                    )
                })
            }
            Self::OwnedTiles => {
                let filter = param();
                civ.map(|c| {
                    c.cities()
                        .iter()
                        .map(|city| owned_tiles_matching(*city, &filter, c))
                        .sum::<i32>()
                })
            }
            Self::TileFilterTiles => {
                let filter = param();
                game.map(|g| g.count_tiles_matching(&filter, civ))
            }
            Self::TileResource => Some(ctx.resource_amount(text)),
            Self::CityStates => game.map(|g| {
                count(
                    g.civilizations()
                        .iter()
                        .filter(|c| c.is_alive() && !c.is_major_civ())
                        .count(),
                )
            }),
            Self::DifficultyNumber => {
                game.and_then(|g| g.difficulty_index()).map(count)
            }
            Self::EraNumber => civ.map(|c| count(c.era_number())),
            Self::SpeedModifier => {
                let stat = Stat::from_name(&param())?;
                game.map(|g| speed_percent(g, stat))
            }
            Self::Expression => match Expression::parse(text) {
                Ok(expr) => evaluate_expression(&expr, text, ctx),
                Err(error) => {
                    tracing::trace!(%text, %error, "expression did not parse");
                    None
                }
            },
        }
    }

    /// Compliance check for `text`, already known to belong to this family.
    #[must_use]
    pub fn error_severity(self, text: &str, ruleset: &Ruleset) -> Option<Severity> {
        if self == Self::Expression {
            return match Expression::parse(text) {
                Ok(expr) => expr.error_severity(ruleset),
                Err(_) => Some(Severity::RulesetInvariant),
            };
        }
        let parameter_type = self.parameter_type()?;
        let param = parse::params(text).into_iter().next().unwrap_or_default();
        parameter_type.error_severity(&param, ruleset)
    }
}

/// A recognized countable. Expressions keep their parsed form so they are
/// not parsed again for evaluation.
enum Recognized {
    Simple(Countable),
    Expression(Expression),
}

fn parse_expression(text: &str) -> Option<Expression> {
    Expression::parse(text).ok().filter(|expr| !expr.is_bare_word())
}

/// The first family `text` belongs to, computing its placeholder form at
/// most once. Expressions are only tried when `expressions` is set.
fn recognize(text: &str, ruleset: Option<&Ruleset>, expressions: bool) -> Option<Recognized> {
    let placeholder = OnceCell::new();
    for &countable in Countable::ALL {
        let matched = match (countable, countable.placeholder()) {
            (Countable::Expression, _) => {
                if !expressions {
                    continue;
                }
                if let Some(expr) = parse_expression(text) {
                    return Some(Recognized::Expression(expr));
                }
                false
            }
            (_, Some(template)) => {
                placeholder.get_or_init(|| parse::placeholder_text(text)).as_str() == template
            }
            (_, None) => countable.matches_plain(text, ruleset),
        };
        if matched {
            return Some(Recognized::Simple(countable));
        }
    }
    None
}

fn evaluate_expression(expr: &Expression, text: &str, ctx: &GameContext<'_>) -> Option<i32> {
    match expr.evaluate(ctx) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::trace!(%text, %error, "expression did not resolve");
            None
        }
    }
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn owned_tiles_matching(city: &dyn City, filter: &str, civ: &dyn Civilization) -> i32 {
    count(
        city.tiles()
            .iter()
            .filter(|t| t.matches_filter(filter, Some(civ)))
            .count(),
    )
}

/// Game speed cost modifier for `stat` as a percentage. Food and Happiness
/// use the overall modifier.
fn speed_percent(game: &dyn GameInfo, stat: Stat) -> i32 {
    let speed = game.speed();
    let modifier = match stat {
        Stat::Food | Stat::Happiness => speed.modifier,
        _ => speed.stat_cost_modifier(stat),
    };
    (modifier * 100.0) as i32
}

/// Resolve `text` to a number under `ctx`.
///
/// Returns `None` for unknown references, malformed expressions, division
/// or modulo by zero, overflow, and references whose backing state is
/// missing from `ctx` (no civilization for `Cities`, ...). Callers treat
/// `None` as "does not apply".
///
/// # Example
///
/// ```
/// use uniques::{GameContext, countables};
///
/// let ctx = GameContext::empty();
/// assert_eq!(countables::resolve("2+3*4", &ctx), Some(14));
/// assert_eq!(countables::resolve("5/0", &ctx), None);
/// ```
#[must_use]
pub fn resolve(text: &str, ctx: &GameContext<'_>) -> Option<i32> {
    let text = text.trim();
    let ruleset = ctx.relevant_game_info().map(|g| g.ruleset());
    match recognize(text, ruleset, true) {
        Some(Recognized::Simple(countable)) => countable.eval(text, ctx),
        Some(Recognized::Expression(expr)) => evaluate_expression(&expr, text, ctx),
        None => {
            tracing::trace!(%text, "unknown countable");
            None
        }
    }
}

/// Resolve a simple reference only; expressions are not considered.
pub(crate) fn resolve_simple(text: &str, ctx: &GameContext<'_>) -> Option<i32> {
    let ruleset = ctx.relevant_game_info().map(|g| g.ruleset());
    match recognize(text, ruleset, false)? {
        Recognized::Simple(countable) => countable.eval(text, ctx),
        Recognized::Expression(_) => None,
    }
}

fn recognized_severity(recognized: Option<Recognized>, text: &str, ruleset: &Ruleset) -> Option<Severity> {
    match recognized {
        Some(Recognized::Simple(countable)) => countable.error_severity(text, ruleset),
        Some(Recognized::Expression(expr)) => expr.error_severity(ruleset),
        None => Some(Severity::RulesetSpecific),
    }
}

/// Compliance check for a countable parameter. Text that is no countable
/// at all is a ruleset-specific error.
#[must_use]
pub fn error_severity(text: &str, ruleset: &Ruleset) -> Option<Severity> {
    let text = text.trim();
    recognized_severity(recognize(text, Some(ruleset), true), text, ruleset)
}

pub(crate) fn simple_error_severity(text: &str, ruleset: &Ruleset) -> Option<Severity> {
    recognized_severity(recognize(text, Some(ruleset), false), text, ruleset)
}
