//! A rule engine for text-defined game modifiers ("uniques").
//!
//! Directives are short templated sentences such as
//! `"[+1 Gold] [in all cities] <when at war>"`. Square brackets hold
//! parameters, angle brackets hold conditionals that gate or multiply the
//! directive. This crate parses them against a typed registry, stores them
//! in an indexed [`UniqueMap`], evaluates conditionals and numeric
//! countables against a read-only [`GameContext`], and lints them against a
//! [`Ruleset`].
//!
//! ```
//! use uniques::{GameContext, Stat, UniqueMap, UniqueType};
//!
//! let map = UniqueMap::from_text(
//!     "[+2 Gold]\n[+1 Gold] <when at war>\n[+1 Food] <for every [2]>",
//! );
//! let ctx = GameContext::empty();
//! let gold: f32 = map
//!     .matching(UniqueType::Stats, &ctx)
//!     .map(|u| u.stats()[Stat::Gold])
//!     .sum();
//! assert_eq!(gold, 2.0);
//! assert_eq!(map.matching(UniqueType::Stats, &ctx).count(), 3);
//! ```
//!
//! Countable expressions can be used on their own:
//!
//! ```
//! use uniques::{Expression, GameContext};
//!
//! let expr = Expression::parse("(2 + 3) * -4 ^ 2").unwrap();
//! assert_eq!(expr.evaluate(&GameContext::empty()), Ok(80));
//! assert_eq!(uniques::countables::resolve("7 % 0", &GameContext::empty()), None);
//! ```

mod cache;
mod error;
mod types;

pub mod conditionals;
pub mod countables;
pub mod filter;
pub mod game;
pub mod parse;
pub mod validate;

pub use cache::LocalUniqueCache;
pub use countables::{Countable, Expression, ExpressionError};
pub use error::UniquesError;
pub use game::{
    City, Civilization, CombatAction, Combatant, GameInfo, GameParameters, MapUnit, Region,
    ReligionState, Speed, Tile, UniqueOwner,
};
pub use types::{
    BuildingDef, BuildingKind, ComplianceError, GameContext, MatchOptions, ModifierType,
    PolicyDef, REGION_TYPES, ResourceDef, Ruleset, RulesetBuilder, RulesetError, Severity, Stat,
    Stats, TechDef, TemporaryUnique, TemporaryUniques, TerrainDef, TerrainKind, Unique,
    UniqueFlag, UniqueKey, UniqueMap, UniqueParameterType, UniqueTarget, UniqueType, UnitDef,
};
