//! Read-only views of live game state.
//!
//! The engine never owns game objects. Hosts implement these traits over
//! their own domain model and hand references to a
//! [`GameContext`](crate::GameContext). Every method is a pure query; none
//! may mutate state, since evaluation can run many times per frame.

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{Ruleset, Stat, Unique, UniqueType};

/// Phase of a combat exchange from the acting side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatAction {
    Attack,
    Defend,
    Intercept,
}

/// Progress of a civilization (or a city's majority faith) through religion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReligionState {
    #[default]
    None,
    Pantheon,
    Religion,
    EnhancedReligion,
}

/// A map-generation region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    /// Region type, e.g. `Tundra` or `Hybrid`.
    pub kind: String,
    /// Continent the region was generated on; `-1` on water maps.
    pub continent_id: i32,
}

/// Game speed and its per-stat cost scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct Speed {
    pub name: String,
    pub modifier: f32,
    pub stat_cost_modifiers: HashMap<Stat, f32>,
}

impl Speed {
    #[must_use]
    pub fn new(name: &str, modifier: f32) -> Self {
        Self {
            name: name.to_owned(),
            modifier,
            stat_cost_modifiers: HashMap::new(),
        }
    }

    /// Cost scaling for `stat`, falling back to the overall modifier.
    #[must_use]
    pub fn stat_cost_modifier(&self, stat: Stat) -> f32 {
        self.stat_cost_modifiers
            .get(&stat)
            .copied()
            .unwrap_or(self.modifier)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::new("Standard", 1.0)
    }
}

/// Settings chosen when the game was created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameParameters {
    pub starting_era: String,
    pub difficulty: String,
    pub victory_types: Vec<String>,
    pub religion_enabled: bool,
    pub espionage_enabled: bool,
    pub nuclear_weapons_enabled: bool,
    /// Active mods, base ruleset included.
    pub mods: Vec<String>,
}

/// Something that carries directives and can list them by type.
///
/// Used by [`LocalUniqueCache`](crate::LocalUniqueCache) as the expensive
/// scan it memoizes.
pub trait UniqueOwner {
    /// Category of the owner, e.g. `"civ"` or `"city"`.
    fn owner_kind(&self) -> &'static str;

    /// Identifier unique among owners of the same kind.
    fn owner_id(&self) -> String;

    /// Every directive of `unique_type` this owner carries, in order,
    /// before any conditional filtering.
    fn unique_candidates(&self, unique_type: UniqueType) -> Vec<Arc<Unique>>;
}

/// Whole-game queries.
pub trait GameInfo {
    fn turns(&self) -> i32;

    /// Calendar year of the current turn.
    fn year(&self) -> i32;

    fn ruleset(&self) -> &Ruleset;

    fn speed(&self) -> &Speed;

    fn parameters(&self) -> &GameParameters;

    fn civilizations(&self) -> Vec<&dyn Civilization>;

    /// Map tiles matching `filter` as seen by `civ`.
    fn count_tiles_matching(&self, filter: &str, civ: Option<&dyn Civilization>) -> i32;

    /// Difficulty index of the current game within the ruleset's ordering.
    fn difficulty_index(&self) -> Option<usize> {
        self.ruleset().difficulty_index(&self.parameters().difficulty)
    }
}

pub trait Civilization: UniqueOwner {
    fn civ_name(&self) -> &str;

    fn game_info(&self) -> &dyn GameInfo;

    /// Civilization filter predicate, e.g. `Major` or a nation name.
    fn matches_filter(&self, filter: &str) -> bool;

    fn is_at_war(&self) -> bool;

    fn is_at_war_with(&self, other: &dyn Civilization) -> bool;

    fn is_major_civ(&self) -> bool;

    fn is_alive(&self) -> bool;

    fn era_number(&self) -> usize;

    fn happiness(&self) -> i32;

    fn is_golden_age(&self) -> bool;

    fn resource_amount(&self, resource: &str) -> i32;

    /// Stockpiled amount of a civ-wide stat.
    fn stat_reserve(&self, stat: Stat) -> i32;

    fn researched_techs(&self) -> Vec<&str>;

    fn is_researched(&self, tech: &str) -> bool {
        self.researched_techs().contains(&tech)
    }

    fn current_research(&self) -> Option<&str>;

    fn adopted_policies(&self) -> Vec<&str>;

    fn is_adopted(&self, policy: &str) -> bool {
        self.adopted_policies().contains(&policy)
    }

    fn completed_policy_branches(&self) -> i32;

    fn has_belief(&self, belief: &str) -> bool;

    fn religion_state(&self) -> ReligionState;

    /// Name of the religion this civilization founded.
    fn religion_name(&self) -> Option<&str>;

    fn great_prophets_earned(&self) -> i32;

    fn cities(&self) -> Vec<&dyn City>;

    fn units(&self) -> Vec<&dyn MapUnit>;
}

pub trait City: UniqueOwner {
    fn id(&self) -> &str;

    fn civ(&self) -> &dyn Civilization;

    fn center_tile(&self) -> Option<&dyn Tile>;

    fn tiles(&self) -> Vec<&dyn Tile>;

    /// City filter predicate, e.g. `in capital` or `Coastal`.
    fn matches_filter(&self, filter: &str, viewing_civ: Option<&dyn Civilization>) -> bool;

    fn is_connected_to_capital(&self) -> bool;

    fn is_we_love_the_king_day(&self) -> bool;

    /// Whether a building matching `filter` (or its equivalent) stands here.
    fn has_building(&self, filter: &str) -> bool;

    fn count_buildings_matching(&self, filter: &str) -> i32;

    /// Population matching a population filter, e.g. `Specialists`.
    fn population_count(&self, filter: &str) -> i32;

    fn resource_amount(&self, resource: &str) -> i32;

    fn stat_reserve(&self, stat: Stat) -> i32;

    fn majority_religion_name(&self) -> Option<&str>;

    fn majority_religion_state(&self) -> ReligionState;

    fn is_garrisoned(&self) -> bool;
}

pub trait MapUnit {
    fn id(&self) -> u32;

    fn name(&self) -> &str;

    fn civ(&self) -> &dyn Civilization;

    /// Current tile; `None` while the unit is not placed on the map.
    fn tile(&self) -> Option<&dyn Tile>;

    fn matches_filter(&self, filter: &str) -> bool;

    fn has_promotion(&self, promotion: &str) -> bool;

    fn health(&self) -> i32;

    /// Whether any limited-use ability was spent this turn.
    fn has_used_abilities(&self) -> bool;
}

pub trait Tile {
    fn position(&self) -> (i32, i32);

    fn owning_city(&self) -> Option<&dyn City>;

    /// Tile filter predicate, e.g. `Coastal`, `Farm` or `Foreign Land`.
    fn matches_filter(&self, filter: &str, civ: Option<&dyn Civilization>) -> bool;

    fn neighbors(&self) -> Vec<&dyn Tile>;

    /// Tiles within `distance` steps, this tile included.
    fn tiles_in_distance(&self, distance: i32) -> Vec<&dyn Tile>;

    fn continent(&self) -> i32;

    fn units(&self) -> Vec<&dyn MapUnit>;

    fn is_adjacent_to(&self, filter: &str, civ: Option<&dyn Civilization>) -> bool {
        self.neighbors()
            .iter()
            .any(|n| n.matches_filter(filter, civ))
    }
}

pub trait Combatant {
    fn name(&self) -> &str;

    fn civ(&self) -> &dyn Civilization;

    fn tile(&self) -> &dyn Tile;

    fn health(&self) -> i32;

    /// Combatant filter predicate; cities match `City`.
    fn matches_filter(&self, filter: &str) -> bool;

    fn as_unit(&self) -> Option<&dyn MapUnit>;

    fn as_city(&self) -> Option<&dyn City>;

    fn is_city(&self) -> bool {
        self.as_city().is_some()
    }
}
