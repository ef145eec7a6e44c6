use std::fmt;

use crate::filter::multi_filter_severity;

use super::ruleset::Ruleset;
use super::stats::{Stat, Stats};

/// How serious a parameter compliance failure is.
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// The value may be a legitimate filter this validator does not know.
    PossibleFilteringUnique,
    /// The value does not exist in this particular ruleset.
    RulesetSpecific,
    /// The value can never be valid, whatever the ruleset.
    RulesetInvariant,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::PossibleFilteringUnique => f.write_str("warning"),
            Severity::RulesetSpecific => f.write_str("ruleset-specific error"),
            Severity::RulesetInvariant => f.write_str("ruleset-invariant error"),
        }
    }
}

/// Region kinds assigned by map generation.
pub const REGION_TYPES: &[&str] = &[
    "Hybrid", "Tundra", "Jungle", "Forest", "Desert", "Hills", "Plains", "Grassland",
];

const UNIT_FILTER_KEYWORDS: &[&str] = &[
    "All", "all", "Melee", "Ranged", "Civilian", "Military", "Land", "Water", "Air", "non-air",
    "Nuclear Weapon", "Great Person", "Religious", "Wounded", "Barbarian", "Barbarians",
    "City-State", "Embarked", "Non-City", "Submarine", "Wonder",
];

const CIV_FILTER_KEYWORDS: &[&str] = &[
    "All", "all", "Major", "City-States", "Human player", "AI player", "Open borders",
    "Open Borders", "Barbarians", "Barbarian",
];

const CITY_FILTER_KEYWORDS: &[&str] = &[
    "in this city", "in all cities", "All", "in your cities", "Your", "in all coastal cities",
    "Coastal", "in capital", "Capital", "in all non-occupied cities", "Non-occupied",
    "in all cities with a world wonder", "in all cities connected to capital",
    "in all cities with a garrison", "Garrisoned",
    "in all cities in which the majority religion is a major religion",
    "in all cities in which the majority religion is an enhanced religion",
    "in non-enemy foreign cities", "in enemy cities", "Enemy", "in foreign cities", "Foreign",
    "in annexed cities", "Annexed", "in puppeted cities", "Puppeted", "in resisting cities",
    "in cities being razed", "Being razed", "in holy cities", "Holy",
    "in City-State cities", "in cities following this religion", "in cities following our religion",
];

const POPULATION_FILTER_KEYWORDS: &[&str] = &[
    "Population", "Specialists", "Unemployed", "Followers of the Majority Religion",
    "Followers of this Religion",
];

const TERRAIN_FILTER_KEYWORDS: &[&str] = &[
    "All", "all", "Terrain", "Water", "Land", "Coastal", "River", "Open terrain", "Rough terrain",
    "Water resource", "Foreign Land", "Foreign", "Friendly Land", "Friendly", "Enemy Land",
    "Enemy", "Featureless", "Fresh Water", "non-fresh water", "Natural Wonder", "Impassable",
    "Resource", "Bonus resource", "Luxury resource", "Strategic resource", "Tile",
];

const TILE_FILTER_KEYWORDS: &[&str] = &[
    "unimproved", "Unimproved", "improved", "Improved", "worked", "Worked", "pillaged",
    "Pillaged", "All Road", "Road", "Railroad", "Great Improvement", "Great",
];

const IMPROVEMENT_FILTER_KEYWORDS: &[&str] = &["All", "all", "Improvement", "All Road", "Great Improvement", "Great"];

const RELIGION_FILTER_KEYWORDS: &[&str] = &["any", "major", "enhanced", "your", "foreign", "enemy"];

/// A validator for one directive parameter slot.
///
/// Each variant checks a text value, optionally against the ruleset, and
/// reports `None` when the value is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueParameterType {
    Number,
    PositiveNumber,
    NonNegativeNumber,
    Fraction,
    RelativeNumber,
    Countable,
    KeywordAll,
    CombatantFilter,
    MapUnitFilter,
    BaseUnitFilter,
    UnitName,
    UnitType,
    UnitTriggerTarget,
    Stats,
    StatName,
    CivWideStatName,
    CivFilter,
    CityFilter,
    BuildingName,
    BuildingFilter,
    PopulationFilter,
    TerrainFilter,
    TileFilter,
    RegionType,
    Promotion,
    Era,
    Speed,
    Difficulty,
    ImprovementName,
    ImprovementFilter,
    Resource,
    StockpiledResource,
    Belief,
    ReligionFilter,
    Event,
    Technology,
    TechFilter,
    Specialist,
    Policy,
    PolicyFilter,
    VictoryType,
    ModFilter,
    Comment,
    /// Placeholder name with no known validator; accepts everything.
    Unknown,
}

impl UniqueParameterType {
    pub const ALL: &'static [UniqueParameterType] = &[
        Self::Number,
        Self::PositiveNumber,
        Self::NonNegativeNumber,
        Self::Fraction,
        Self::RelativeNumber,
        Self::Countable,
        Self::KeywordAll,
        Self::CombatantFilter,
        Self::MapUnitFilter,
        Self::BaseUnitFilter,
        Self::UnitName,
        Self::UnitType,
        Self::UnitTriggerTarget,
        Self::Stats,
        Self::StatName,
        Self::CivWideStatName,
        Self::CivFilter,
        Self::CityFilter,
        Self::BuildingName,
        Self::BuildingFilter,
        Self::PopulationFilter,
        Self::TerrainFilter,
        Self::TileFilter,
        Self::RegionType,
        Self::Promotion,
        Self::Era,
        Self::Speed,
        Self::Difficulty,
        Self::ImprovementName,
        Self::ImprovementFilter,
        Self::Resource,
        Self::StockpiledResource,
        Self::Belief,
        Self::ReligionFilter,
        Self::Event,
        Self::Technology,
        Self::TechFilter,
        Self::Specialist,
        Self::Policy,
        Self::PolicyFilter,
        Self::VictoryType,
        Self::ModFilter,
        Self::Comment,
        Self::Unknown,
    ];

    /// The placeholder name used inside templates, e.g. `cityFilter`.
    #[must_use]
    pub fn parameter_name(self) -> &'static str {
        match self {
            Self::Number => "amount",
            Self::PositiveNumber => "positiveAmount",
            Self::NonNegativeNumber => "nonNegativeAmount",
            Self::Fraction => "fraction",
            Self::RelativeNumber => "relativeAmount",
            Self::Countable => "countable",
            Self::KeywordAll => "'all'",
            Self::CombatantFilter => "combatantFilter",
            Self::MapUnitFilter => "mapUnitFilter",
            Self::BaseUnitFilter => "baseUnitFilter",
            Self::UnitName => "unit",
            Self::UnitType => "unitType",
            Self::UnitTriggerTarget => "unitTriggerTarget",
            Self::Stats => "stats",
            Self::StatName => "stat",
            Self::CivWideStatName => "civWideStat",
            Self::CivFilter => "civFilter",
            Self::CityFilter => "cityFilter",
            Self::BuildingName => "buildingName",
            Self::BuildingFilter => "buildingFilter",
            Self::PopulationFilter => "populationFilter",
            Self::TerrainFilter => "terrainFilter",
            Self::TileFilter => "tileFilter",
            Self::RegionType => "regionType",
            Self::Promotion => "promotion",
            Self::Era => "era",
            Self::Speed => "speed",
            Self::Difficulty => "difficulty",
            Self::ImprovementName => "improvementName",
            Self::ImprovementFilter => "improvementFilter",
            Self::Resource => "resource",
            Self::StockpiledResource => "stockpiledResource",
            Self::Belief => "belief",
            Self::ReligionFilter => "religionFilter",
            Self::Event => "event",
            Self::Technology => "tech",
            Self::TechFilter => "techFilter",
            Self::Specialist => "specialist",
            Self::Policy => "policy",
            Self::PolicyFilter => "policyFilter",
            Self::VictoryType => "victoryType",
            Self::ModFilter => "modFilter",
            Self::Comment => "comment",
            Self::Unknown => "param",
        }
    }

    /// Validators accepted by a template placeholder such as `stat/resource`
    /// or `cityFilter2`: split on `/`, strip trailing digits, look up by name.
    #[must_use]
    pub fn for_placeholder(placeholder: &str) -> Vec<UniqueParameterType> {
        placeholder
            .split('/')
            .map(|name| {
                let name = name.trim_end_matches(|c: char| c.is_ascii_digit());
                Self::ALL
                    .iter()
                    .copied()
                    .find(|t| t.parameter_name() == name)
                    .unwrap_or(Self::Unknown)
            })
            .collect()
    }

    /// Check `text` against this validator.
    ///
    /// Returns `None` if the value is acceptable, otherwise how bad it is.
    #[must_use]
    pub fn error_severity(self, text: &str, ruleset: &Ruleset) -> Option<Severity> {
        use Severity::{PossibleFilteringUnique, RulesetInvariant, RulesetSpecific};

        let known = |ok: bool, severity: Severity| if ok { None } else { Some(severity) };

        match self {
            Self::Number | Self::RelativeNumber => known(text.parse::<i32>().is_ok(), RulesetInvariant),
            Self::PositiveNumber => known(text.parse::<i32>().is_ok_and(|n| n > 0), RulesetInvariant),
            Self::NonNegativeNumber => {
                known(text.parse::<i32>().is_ok_and(|n| n >= 0), RulesetInvariant)
            }
            Self::Fraction => known(
                text.parse::<f32>().is_ok_and(|f| (0.0..=1.0).contains(&f)),
                RulesetInvariant,
            ),
            Self::Countable => crate::countables::error_severity(text, ruleset),
            Self::KeywordAll => known(text == "All" || text == "all", RulesetInvariant),
            Self::CombatantFilter => {
                if text == "City" {
                    None
                } else {
                    Self::MapUnitFilter.error_severity(text, ruleset)
                }
            }
            Self::MapUnitFilter => multi_filter_severity(text, &|f: &str| {
                if let Some(civ) = f.strip_suffix(" units") {
                    return Self::CivFilter.error_severity(civ, ruleset);
                }
                if ruleset.has_promotion(f) {
                    return None;
                }
                Self::BaseUnitFilter.error_severity(f, ruleset)
            }),
            Self::BaseUnitFilter => multi_filter_severity(text, &|f: &str| {
                known(
                    UNIT_FILTER_KEYWORDS.contains(&f) || ruleset.has_unit(f) || ruleset.has_unit_type(f),
                    PossibleFilteringUnique,
                )
            }),
            Self::UnitName => known(ruleset.has_unit(text), RulesetSpecific),
            Self::UnitType => known(
                ruleset.has_unit_type(text) || matches!(text, "Land" | "Water" | "Air"),
                RulesetSpecific,
            ),
            Self::UnitTriggerTarget => {
                known(matches!(text, "This Unit" | "Target Unit"), RulesetInvariant)
            }
            Self::Stats => known(Stats::is_stats(text), RulesetInvariant),
            Self::StatName => known(Stat::from_name(text).is_some(), RulesetInvariant),
            Self::CivWideStatName => known(
                Stat::from_name(text).is_some_and(Stat::is_civ_wide),
                RulesetInvariant,
            ),
            Self::CivFilter => multi_filter_severity(text, &|f: &str| {
                known(
                    CIV_FILTER_KEYWORDS.contains(&f) || ruleset.has_nation(f),
                    PossibleFilteringUnique,
                )
            }),
            Self::CityFilter => multi_filter_severity(text, &|f: &str| {
                if CITY_FILTER_KEYWORDS.contains(&f) {
                    return None;
                }
                Self::CivFilter
                    .error_severity(f, ruleset)
                    .map(|_| RulesetSpecific)
            }),
            Self::BuildingName => known(ruleset.has_building(text), RulesetSpecific),
            Self::BuildingFilter => multi_filter_severity(text, &|f: &str| {
                known(
                    ruleset.is_building_filter(f) || Stat::from_name(f).is_some(),
                    RulesetSpecific,
                )
            }),
            Self::PopulationFilter => multi_filter_severity(text, &|f: &str| {
                known(
                    POPULATION_FILTER_KEYWORDS.contains(&f) || ruleset.has_specialist(f),
                    RulesetSpecific,
                )
            }),
            Self::TerrainFilter => multi_filter_severity(text, &|f: &str| {
                known(
                    TERRAIN_FILTER_KEYWORDS.contains(&f)
                        || ruleset.has_terrain(f)
                        || ruleset.has_resource(f)
                        || Stat::from_name(f).is_some()
                        || REGION_TYPES.contains(&f),
                    PossibleFilteringUnique,
                )
            }),
            Self::TileFilter => multi_filter_severity(text, &|f: &str| {
                if TILE_FILTER_KEYWORDS.contains(&f) || ruleset.has_improvement(f) {
                    return None;
                }
                Self::TerrainFilter.error_severity(f, ruleset)
            }),
            Self::RegionType => known(REGION_TYPES.contains(&text), RulesetSpecific),
            Self::Promotion => known(ruleset.has_promotion(text), RulesetSpecific),
            Self::Era => known(ruleset.era_number(text).is_some(), RulesetSpecific),
            Self::Speed => known(ruleset.has_speed(text), RulesetSpecific),
            Self::Difficulty => known(ruleset.difficulty_index(text).is_some(), RulesetSpecific),
            Self::ImprovementName => known(ruleset.has_improvement(text), RulesetSpecific),
            Self::ImprovementFilter => multi_filter_severity(text, &|f: &str| {
                known(
                    IMPROVEMENT_FILTER_KEYWORDS.contains(&f) || ruleset.has_improvement(f),
                    RulesetSpecific,
                )
            }),
            Self::Resource => known(ruleset.has_resource(text), RulesetSpecific),
            Self::StockpiledResource => known(ruleset.is_stockpiled(text), RulesetSpecific),
            Self::Belief => known(ruleset.has_belief(text), RulesetSpecific),
            Self::ReligionFilter => known(
                RELIGION_FILTER_KEYWORDS.contains(&text) || ruleset.has_belief(text),
                RulesetSpecific,
            ),
            Self::Event => known(ruleset.has_event(text), RulesetSpecific),
            Self::Technology => known(ruleset.has_tech(text), RulesetSpecific),
            Self::TechFilter => multi_filter_severity(text, &|f: &str| {
                known(
                    f == "All" || f == "all" || ruleset.has_tech(f) || ruleset.era_number(f).is_some(),
                    RulesetSpecific,
                )
            }),
            Self::Specialist => known(ruleset.has_specialist(text), RulesetSpecific),
            Self::Policy => known(ruleset.has_policy(text), RulesetSpecific),
            Self::PolicyFilter => multi_filter_severity(text, &|f: &str| {
                known(f == "All" || f == "all" || ruleset.has_policy(f), RulesetSpecific)
            }),
            Self::VictoryType => known(ruleset.has_victory_type(text), RulesetSpecific),
            Self::ModFilter => known(!text.trim().is_empty(), RulesetInvariant),
            Self::Comment | Self::Unknown => None,
        }
    }
}

impl fmt::Display for UniqueParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.parameter_name())
    }
}
