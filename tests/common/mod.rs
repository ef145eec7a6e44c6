//! A small leaked game world implementing every collaborator trait.
//!
//! Map (one row, neighbours are `i - 1` and `i + 1`):
//!
//! ```text
//! index    0          1        2            3       4
//! terrain  Grassland  Desert   Hill + Iron  Ocean   Grassland
//! cont.    1          1        1            -1      2
//! owner    Roma       Roma     Roma         -       Antium
//! units    Hoplite    Warrior  Archer
//! ```
//!
//! Rome (major, at war) owns Roma (capital) and Antium. Greece (major)
//! owns Athens, which is off the map. Monaco is a city-state.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use uniques::filter::matches_multi_filter;
use uniques::{
    City, Civilization, Combatant, GameContext, GameInfo, GameParameters, MapUnit,
    ReligionState, Ruleset, Speed, Stat, TerrainKind, Tile, Unique, UniqueOwner, UniqueType,
};

fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

fn owned_uniques(text: &str) -> Vec<Arc<Unique>> {
    Unique::parse_list(text).into_iter().map(Arc::new).collect()
}

fn scan(uniques: &[Arc<Unique>], scans: &AtomicUsize, unique_type: UniqueType) -> Vec<Arc<Unique>> {
    scans.fetch_add(1, Ordering::Relaxed);
    uniques
        .iter()
        .filter(|u| u.is_of_type(unique_type))
        .cloned()
        .collect()
}

pub fn ruleset() -> Ruleset {
    Ruleset::builder()
        .era("Ancient era")
        .era("Classical era")
        .era("Medieval era")
        .era("Renaissance era")
        .difficulty("Settler")
        .difficulty("Chieftain")
        .difficulty("Prince")
        .difficulty("King")
        .speed("Quick")
        .speed("Standard")
        .stockpiled_resource("Iron")
        .resource("Horses")
        .building("Monument")
        .building("Granary")
        .wonder("Great Library")
        .tech("Writing", "Ancient era")
        .tech("Bronze Working", "Ancient era")
        .tech("Philosophy", "Classical era")
        .tech("Optics", "Classical era")
        .policy_branch("Tradition")
        .policy("Aristocracy", "Tradition")
        .policy("Legalism", "Tradition")
        .policy_branch("Honor")
        .belief("God of War")
        .unit("Warrior", "Melee")
        .unit("Hoplite", "Melee")
        .unit("Archer", "Ranged")
        .promotion("Shock I")
        .terrain("Grassland", TerrainKind::Land)
        .terrain("Desert", TerrainKind::Land)
        .terrain("Hill", TerrainKind::TerrainFeature)
        .terrain("Ocean", TerrainKind::Water)
        .victory_type("Domination")
        .victory_type("Science")
        .build()
}

// -- Game ---------------------------------------------------------------------

pub struct MockGame {
    pub turns: i32,
    pub year: i32,
    pub ruleset: Ruleset,
    pub speed: Speed,
    pub parameters: GameParameters,
    civs: OnceLock<Vec<&'static MockCiv>>,
    tiles: OnceLock<Vec<&'static MockTile>>,
}

impl GameInfo for MockGame {
    fn turns(&self) -> i32 {
        self.turns
    }

    fn year(&self) -> i32 {
        self.year
    }

    fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    fn speed(&self) -> &Speed {
        &self.speed
    }

    fn parameters(&self) -> &GameParameters {
        &self.parameters
    }

    fn civilizations(&self) -> Vec<&dyn Civilization> {
        self.civs.get().into_iter().flatten().map(|c| *c as &dyn Civilization).collect()
    }

    fn count_tiles_matching(&self, filter: &str, civ: Option<&dyn Civilization>) -> i32 {
        let tiles = self.tiles.get().map_or(&[][..], Vec::as_slice);
        tiles.iter().filter(|t| t.matches_filter(filter, civ)).count() as i32
    }
}

// -- Civilization -------------------------------------------------------------

#[derive(Default)]
pub struct MockCiv {
    pub name: String,
    pub major: bool,
    pub alive: bool,
    pub at_war: bool,
    pub golden_age: bool,
    pub happiness: i32,
    pub era: usize,
    pub resources: HashMap<String, i32>,
    pub reserves: HashMap<Stat, i32>,
    pub techs: Vec<String>,
    pub current_research: Option<String>,
    pub policies: Vec<String>,
    pub completed_branches: i32,
    pub beliefs: Vec<String>,
    pub religion: ReligionState,
    pub religion_name: Option<String>,
    pub great_prophets: i32,
    pub uniques: Vec<Arc<Unique>>,
    pub scans: AtomicUsize,
    game: OnceLock<&'static MockGame>,
    cities: OnceLock<Vec<&'static MockCity>>,
    units: OnceLock<Vec<&'static MockUnit>>,
}

impl UniqueOwner for MockCiv {
    fn owner_kind(&self) -> &'static str {
        "civ"
    }

    fn owner_id(&self) -> String {
        self.name.clone()
    }

    fn unique_candidates(&self, unique_type: UniqueType) -> Vec<Arc<Unique>> {
        scan(&self.uniques, &self.scans, unique_type)
    }
}

impl Civilization for MockCiv {
    fn civ_name(&self) -> &str {
        &self.name
    }

    fn game_info(&self) -> &dyn GameInfo {
        *self.game.get().expect("civ is not attached to a game")
    }

    fn matches_filter(&self, filter: &str) -> bool {
        matches_multi_filter(filter, &|f: &str| match f {
            "All" | "all" => true,
            "Major" => self.major,
            "City-States" | "City-State" => !self.major,
            _ => f == self.name,
        })
    }

    fn is_at_war(&self) -> bool {
        self.at_war
    }

    fn is_at_war_with(&self, other: &dyn Civilization) -> bool {
        self.at_war && other.civ_name() != self.civ_name()
    }

    fn is_major_civ(&self) -> bool {
        self.major
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn era_number(&self) -> usize {
        self.era
    }

    fn happiness(&self) -> i32 {
        self.happiness
    }

    fn is_golden_age(&self) -> bool {
        self.golden_age
    }

    fn resource_amount(&self, resource: &str) -> i32 {
        self.resources.get(resource).copied().unwrap_or(0)
    }

    fn stat_reserve(&self, stat: Stat) -> i32 {
        self.reserves.get(&stat).copied().unwrap_or(0)
    }

    fn researched_techs(&self) -> Vec<&str> {
        self.techs.iter().map(String::as_str).collect()
    }

    fn current_research(&self) -> Option<&str> {
        self.current_research.as_deref()
    }

    fn adopted_policies(&self) -> Vec<&str> {
        self.policies.iter().map(String::as_str).collect()
    }

    fn completed_policy_branches(&self) -> i32 {
        self.completed_branches
    }

    fn has_belief(&self, belief: &str) -> bool {
        self.beliefs.iter().any(|b| b == belief)
    }

    fn religion_state(&self) -> ReligionState {
        self.religion
    }

    fn religion_name(&self) -> Option<&str> {
        self.religion_name.as_deref()
    }

    fn great_prophets_earned(&self) -> i32 {
        self.great_prophets
    }

    fn cities(&self) -> Vec<&dyn City> {
        self.cities.get().into_iter().flatten().map(|c| *c as &dyn City).collect()
    }

    fn units(&self) -> Vec<&dyn MapUnit> {
        self.units.get().into_iter().flatten().map(|u| *u as &dyn MapUnit).collect()
    }
}

// -- City ---------------------------------------------------------------------

#[derive(Default)]
pub struct MockCity {
    pub id: String,
    pub name: String,
    pub capital: bool,
    pub coastal: bool,
    pub connected: bool,
    pub wltkd: bool,
    pub garrisoned: bool,
    pub buildings: Vec<String>,
    pub population: i32,
    pub specialists: i32,
    pub resources: HashMap<String, i32>,
    pub reserves: HashMap<Stat, i32>,
    pub majority_religion: Option<String>,
    pub majority_religion_state: ReligionState,
    pub uniques: Vec<Arc<Unique>>,
    pub scans: AtomicUsize,
    pub center_index: Option<usize>,
    pub tile_indices: Vec<usize>,
    civ: OnceLock<&'static MockCiv>,
    center: OnceLock<&'static MockTile>,
    tiles: OnceLock<Vec<&'static MockTile>>,
}

impl MockCity {
    fn owner(&self) -> &'static MockCiv {
        self.civ.get().expect("city is not attached to a civ")
    }
}

impl UniqueOwner for MockCity {
    fn owner_kind(&self) -> &'static str {
        "city"
    }

    fn owner_id(&self) -> String {
        self.id.clone()
    }

    fn unique_candidates(&self, unique_type: UniqueType) -> Vec<Arc<Unique>> {
        scan(&self.uniques, &self.scans, unique_type)
    }
}

impl City for MockCity {
    fn id(&self) -> &str {
        &self.id
    }

    fn civ(&self) -> &dyn Civilization {
        self.owner()
    }

    fn center_tile(&self) -> Option<&dyn Tile> {
        self.center.get().map(|t| *t as &dyn Tile)
    }

    fn tiles(&self) -> Vec<&dyn Tile> {
        self.tiles.get().into_iter().flatten().map(|t| *t as &dyn Tile).collect()
    }

    fn matches_filter(&self, filter: &str, viewing_civ: Option<&dyn Civilization>) -> bool {
        matches_multi_filter(filter, &|f: &str| match f {
            "All" | "in all cities" | "in this city" => true,
            "Capital" | "in capital" => self.capital,
            "Coastal" | "in all coastal cities" => self.coastal,
            "Garrisoned" | "in all cities with a garrison" => self.garrisoned,
            "Your" | "in your cities" => {
                viewing_civ.is_some_and(|v| v.civ_name() == self.owner().name)
            }
            _ => f == self.name || self.owner().matches_filter(f),
        })
    }

    fn is_connected_to_capital(&self) -> bool {
        self.connected
    }

    fn is_we_love_the_king_day(&self) -> bool {
        self.wltkd
    }

    fn has_building(&self, filter: &str) -> bool {
        self.count_buildings_matching(filter) > 0
    }

    fn count_buildings_matching(&self, filter: &str) -> i32 {
        let ruleset = self.owner().game_info().ruleset();
        self.buildings
            .iter()
            .filter(|b| ruleset.building_matches_filter(b, filter))
            .count() as i32
    }

    fn population_count(&self, filter: &str) -> i32 {
        match filter {
            "Population" | "All" => self.population,
            "Specialists" => self.specialists,
            "Unemployed" => self.population - self.specialists,
            _ => 0,
        }
    }

    fn resource_amount(&self, resource: &str) -> i32 {
        self.resources.get(resource).copied().unwrap_or(0)
    }

    fn stat_reserve(&self, stat: Stat) -> i32 {
        match self.reserves.get(&stat) {
            Some(amount) => *amount,
            None if stat.is_civ_wide() => self.owner().stat_reserve(stat),
            None => 0,
        }
    }

    fn majority_religion_name(&self) -> Option<&str> {
        self.majority_religion.as_deref()
    }

    fn majority_religion_state(&self) -> ReligionState {
        self.majority_religion_state
    }

    fn is_garrisoned(&self) -> bool {
        self.garrisoned
    }
}

// -- Unit ---------------------------------------------------------------------

#[derive(Default)]
pub struct MockUnit {
    pub id: u32,
    pub name: String,
    pub unit_type: String,
    pub promotions: Vec<String>,
    pub health: i32,
    pub used_abilities: bool,
    pub tile_index: Option<usize>,
    civ: OnceLock<&'static MockCiv>,
    tile: OnceLock<&'static MockTile>,
}

impl MapUnit for MockUnit {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn civ(&self) -> &dyn Civilization {
        *self.civ.get().expect("unit is not attached to a civ")
    }

    fn tile(&self) -> Option<&dyn Tile> {
        self.tile.get().map(|t| *t as &dyn Tile)
    }

    fn matches_filter(&self, filter: &str) -> bool {
        matches_multi_filter(filter, &|f: &str| match f {
            "All" | "all" | "Land" => true,
            "Military" => self.unit_type != "Civilian",
            "Wounded" => self.health < 100,
            _ => f == self.name || f == self.unit_type,
        })
    }

    fn has_promotion(&self, promotion: &str) -> bool {
        self.promotions.iter().any(|p| p == promotion)
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn has_used_abilities(&self) -> bool {
        self.used_abilities
    }
}

// -- Tile ---------------------------------------------------------------------

#[derive(Default)]
pub struct MockTile {
    pub position: (i32, i32),
    pub terrain: String,
    pub features: Vec<String>,
    pub resource: Option<String>,
    pub continent: i32,
    owner: OnceLock<&'static MockCity>,
    neighbors: OnceLock<Vec<&'static MockTile>>,
    units: OnceLock<Vec<&'static MockUnit>>,
}

impl MockTile {
    fn new(x: i32, terrain: &str, continent: i32) -> Self {
        Self {
            position: (x, 0),
            terrain: terrain.into(),
            continent,
            ..Self::default()
        }
    }

    fn owner_civ_name(&self) -> Option<&str> {
        self.owner.get().map(|c| c.owner().name.as_str())
    }
}

impl Tile for MockTile {
    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn owning_city(&self) -> Option<&dyn City> {
        self.owner.get().map(|c| *c as &dyn City)
    }

    fn matches_filter(&self, filter: &str, civ: Option<&dyn Civilization>) -> bool {
        matches_multi_filter(filter, &|f: &str| match f {
            "All" | "all" => true,
            "Land" => self.continent >= 0,
            "Water" => self.continent < 0,
            "Friendly Land" => civ.is_some_and(|c| self.owner_civ_name() == Some(c.civ_name())),
            "Foreign Land" => civ.is_some_and(|c| {
                self.owner_civ_name().is_some_and(|owner| owner != c.civ_name())
            }),
            _ => {
                self.terrain == f
                    || self.features.iter().any(|x| x == f)
                    || self.resource.as_deref() == Some(f)
            }
        })
    }

    fn neighbors(&self) -> Vec<&dyn Tile> {
        self.neighbors.get().into_iter().flatten().map(|t| *t as &dyn Tile).collect()
    }

    fn tiles_in_distance(&self, distance: i32) -> Vec<&dyn Tile> {
        let mut seen: HashSet<(i32, i32)> = HashSet::from([self.position]);
        let mut frontier: Vec<&dyn Tile> = vec![self];
        let mut out: Vec<&dyn Tile> = vec![self];
        for _ in 0..distance.max(0) {
            let mut next = Vec::new();
            for tile in frontier {
                for n in tile.neighbors() {
                    if seen.insert(n.position()) {
                        next.push(n);
                        out.push(n);
                    }
                }
            }
            frontier = next;
        }
        out
    }

    fn continent(&self) -> i32 {
        self.continent
    }

    fn units(&self) -> Vec<&dyn MapUnit> {
        self.units.get().into_iter().flatten().map(|u| *u as &dyn MapUnit).collect()
    }
}

// -- Combatant ----------------------------------------------------------------

pub struct MockCombatant {
    pub name: String,
    pub health: i32,
    civ: &'static MockCiv,
    tile: &'static MockTile,
    unit: Option<&'static MockUnit>,
    city: Option<&'static MockCity>,
}

impl Combatant for MockCombatant {
    fn name(&self) -> &str {
        &self.name
    }

    fn civ(&self) -> &dyn Civilization {
        self.civ
    }

    fn tile(&self) -> &dyn Tile {
        self.tile
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn matches_filter(&self, filter: &str) -> bool {
        match (self.unit, self.city) {
            (Some(unit), _) => unit.matches_filter(filter),
            (None, Some(_)) => matches!(filter, "City" | "All" | "all"),
            (None, None) => false,
        }
    }

    fn as_unit(&self) -> Option<&dyn MapUnit> {
        self.unit.map(|u| u as &dyn MapUnit)
    }

    fn as_city(&self) -> Option<&dyn City> {
        self.city.map(|c| c as &dyn City)
    }
}

// -- World --------------------------------------------------------------------

/// Owned, editable world state. Tweak it in [`world_with`] before it is
/// leaked and linked.
pub struct Setup {
    pub game: MockGame,
    pub rome: MockCiv,
    pub greece: MockCiv,
    pub monaco: MockCiv,
    pub roma: MockCity,
    pub antium: MockCity,
    pub athens: MockCity,
    pub warrior: MockUnit,
    pub archer: MockUnit,
    pub hoplite: MockUnit,
    pub tiles: Vec<MockTile>,
}

pub struct World {
    pub game: &'static MockGame,
    pub rome: &'static MockCiv,
    pub greece: &'static MockCiv,
    pub monaco: &'static MockCiv,
    pub roma: &'static MockCity,
    pub antium: &'static MockCity,
    pub athens: &'static MockCity,
    pub warrior: &'static MockUnit,
    pub archer: &'static MockUnit,
    pub hoplite: &'static MockUnit,
    pub tiles: Vec<&'static MockTile>,
}

fn setup() -> Setup {
    let game = MockGame {
        turns: 42,
        year: -2000,
        ruleset: ruleset(),
        speed: Speed::default(),
        parameters: GameParameters {
            starting_era: "Ancient era".into(),
            difficulty: "Prince".into(),
            victory_types: vec!["Domination".into(), "Science".into()],
            religion_enabled: true,
            espionage_enabled: false,
            nuclear_weapons_enabled: false,
            mods: vec!["Civ V - Gods & Kings".into()],
        },
        civs: OnceLock::new(),
        tiles: OnceLock::new(),
    };

    let rome = MockCiv {
        name: "Rome".into(),
        major: true,
        alive: true,
        at_war: true,
        happiness: 5,
        era: 1,
        resources: HashMap::from([("Iron".into(), 3)]),
        reserves: HashMap::from([(Stat::Gold, 120), (Stat::Faith, 40), (Stat::Science, 15)]),
        techs: vec!["Writing".into(), "Bronze Working".into()],
        current_research: Some("Philosophy".into()),
        policies: vec!["Tradition".into(), "Aristocracy".into()],
        completed_branches: 1,
        beliefs: vec!["God of War".into()],
        religion: ReligionState::Pantheon,
        ..MockCiv::default()
    };
    let greece = MockCiv {
        name: "Greece".into(),
        major: true,
        alive: true,
        era: 2,
        techs: vec!["Writing".into(), "Philosophy".into()],
        policies: vec!["Legalism".into()],
        religion: ReligionState::Religion,
        religion_name: Some("Hellenism".into()),
        ..MockCiv::default()
    };
    let monaco = MockCiv {
        name: "Monaco".into(),
        major: false,
        alive: true,
        ..MockCiv::default()
    };

    let roma = MockCity {
        id: "rome-1".into(),
        name: "Roma".into(),
        capital: true,
        connected: true,
        garrisoned: true,
        buildings: vec!["Monument".into(), "Granary".into()],
        population: 6,
        specialists: 2,
        resources: HashMap::from([("Iron".into(), 3)]),
        reserves: HashMap::from([(Stat::Food, 30), (Stat::Production, 4)]),
        center_index: Some(0),
        tile_indices: vec![0, 1, 2],
        ..MockCity::default()
    };
    let antium = MockCity {
        id: "rome-2".into(),
        name: "Antium".into(),
        coastal: true,
        population: 2,
        majority_religion: Some("Hellenism".into()),
        majority_religion_state: ReligionState::Religion,
        center_index: Some(4),
        tile_indices: vec![4],
        ..MockCity::default()
    };
    let athens = MockCity {
        id: "greece-1".into(),
        name: "Athens".into(),
        capital: true,
        connected: true,
        buildings: vec!["Great Library".into(), "Monument".into()],
        population: 8,
        ..MockCity::default()
    };

    let warrior = MockUnit {
        id: 1,
        name: "Warrior".into(),
        unit_type: "Melee".into(),
        promotions: vec!["Shock I".into()],
        health: 100,
        tile_index: Some(1),
        ..MockUnit::default()
    };
    let archer = MockUnit {
        id: 2,
        name: "Archer".into(),
        unit_type: "Ranged".into(),
        health: 60,
        tile_index: Some(2),
        ..MockUnit::default()
    };
    let hoplite = MockUnit {
        id: 3,
        name: "Hoplite".into(),
        unit_type: "Melee".into(),
        health: 100,
        tile_index: Some(0),
        ..MockUnit::default()
    };

    let mut hill = MockTile::new(2, "Grassland", 1);
    hill.features = vec!["Hill".into()];
    hill.resource = Some("Iron".into());
    let tiles = vec![
        MockTile::new(0, "Grassland", 1),
        MockTile::new(1, "Desert", 1),
        hill,
        MockTile::new(3, "Ocean", -1),
        MockTile::new(4, "Grassland", 2),
    ];

    Setup {
        game,
        rome,
        greece,
        monaco,
        roma,
        antium,
        athens,
        warrior,
        archer,
        hoplite,
        tiles,
    }
}

pub fn world() -> World {
    world_with(|_| {})
}

/// The standard world after `tweak` has edited its owned state.
pub fn world_with(tweak: impl FnOnce(&mut Setup)) -> World {
    let mut setup = setup();
    tweak(&mut setup);

    let game = leak(setup.game);
    let rome = leak(setup.rome);
    let greece = leak(setup.greece);
    let monaco = leak(setup.monaco);
    let roma = leak(setup.roma);
    let antium = leak(setup.antium);
    let athens = leak(setup.athens);
    let warrior = leak(setup.warrior);
    let archer = leak(setup.archer);
    let hoplite = leak(setup.hoplite);
    let tiles: Vec<&'static MockTile> = setup.tiles.into_iter().map(leak).collect();

    let _ = game.civs.set(vec![rome, greece, monaco]);
    let _ = game.tiles.set(tiles.clone());
    for civ in [rome, greece, monaco] {
        let _ = civ.game.set(game);
    }
    let _ = rome.cities.set(vec![roma, antium]);
    let _ = greece.cities.set(vec![athens]);
    let _ = rome.units.set(vec![warrior, archer]);
    let _ = greece.units.set(vec![hoplite]);

    for (city, civ) in [(roma, rome), (antium, rome), (athens, greece)] {
        let _ = city.civ.set(civ);
        if let Some(center) = city.center_index {
            let _ = city.center.set(tiles[center]);
        }
        let _ = city.tiles.set(city.tile_indices.iter().map(|&i| tiles[i]).collect());
        for &i in &city.tile_indices {
            let _ = tiles[i].owner.set(city);
        }
    }

    for (i, tile) in tiles.iter().enumerate() {
        let mut neighbors = Vec::new();
        if i > 0 {
            neighbors.push(tiles[i - 1]);
        }
        if i + 1 < tiles.len() {
            neighbors.push(tiles[i + 1]);
        }
        let _ = tile.neighbors.set(neighbors);
    }

    let mut on_tile: Vec<Vec<&'static MockUnit>> = vec![Vec::new(); tiles.len()];
    for (unit, civ) in [(warrior, rome), (archer, rome), (hoplite, greece)] {
        let _ = unit.civ.set(civ);
        if let Some(i) = unit.tile_index {
            let _ = unit.tile.set(tiles[i]);
            on_tile[i].push(unit);
        }
    }
    for (tile, units) in tiles.iter().zip(on_tile) {
        let _ = tile.units.set(units);
    }

    World {
        game,
        rome,
        greece,
        monaco,
        roma,
        antium,
        athens,
        warrior,
        archer,
        hoplite,
        tiles,
    }
}

impl World {
    pub fn unit_combatant(&self, unit: &'static MockUnit) -> &'static MockCombatant {
        let tile = unit.tile.get().copied().unwrap_or(self.tiles[0]);
        leak(MockCombatant {
            name: unit.name.clone(),
            health: unit.health,
            civ: unit.civ.get().copied().expect("unit is attached"),
            tile,
            unit: Some(unit),
            city: None,
        })
    }

    pub fn city_combatant(&self, city: &'static MockCity) -> &'static MockCombatant {
        leak(MockCombatant {
            name: city.name.clone(),
            health: 200,
            civ: city.owner(),
            tile: city.center.get().copied().unwrap_or(self.tiles[0]),
            unit: None,
            city: Some(city),
        })
    }

    pub fn rome_ctx(&self) -> GameContext<'static> {
        GameContext::for_civ(self.rome)
    }

    pub fn roma_ctx(&self) -> GameContext<'static> {
        GameContext::for_city(self.roma)
    }
}

/// Attach directives to an owner before leaking.
pub fn with_uniques(text: &str) -> Vec<Arc<Unique>> {
    owned_uniques(text)
}
