use std::collections::{BTreeMap, BTreeSet};

/// Broad class of a building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "kebab-case"))]
pub enum BuildingKind {
    #[default]
    Regular,
    NationalWonder,
    WorldWonder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct BuildingDef {
    pub kind: BuildingKind,
    /// The building this one is a unique replacement for.
    pub replaces: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct ResourceDef {
    /// Stockpiled resources accumulate a reserve instead of a per-turn supply.
    pub stockpiled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct TechDef {
    pub era: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct PolicyDef {
    /// Owning branch; `None` when this policy is itself a branch.
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct UnitDef {
    pub unit_type: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "kebab-case"))]
pub enum TerrainKind {
    #[default]
    Land,
    Water,
    TerrainFeature,
    NaturalWonder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct TerrainDef {
    pub kind: TerrainKind,
}

/// Read-only lookup of every named game object definition.
///
/// Consulted by parameter compliance validation and by countables that
/// need to know whether a name is, e.g., a resource.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct Ruleset {
    eras: Vec<String>,
    difficulties: Vec<String>,
    speeds: Vec<String>,
    resources: BTreeMap<String, ResourceDef>,
    buildings: BTreeMap<String, BuildingDef>,
    technologies: BTreeMap<String, TechDef>,
    policies: BTreeMap<String, PolicyDef>,
    beliefs: BTreeSet<String>,
    units: BTreeMap<String, UnitDef>,
    unit_types: BTreeSet<String>,
    promotions: BTreeSet<String>,
    terrains: BTreeMap<String, TerrainDef>,
    improvements: BTreeSet<String>,
    nations: BTreeSet<String>,
    specialists: BTreeSet<String>,
    events: BTreeSet<String>,
    victory_types: BTreeSet<String>,
}

fn is_all(filter: &str) -> bool {
    filter == "All" || filter == "all"
}

impl Ruleset {
    #[must_use]
    pub fn builder() -> RulesetBuilder {
        RulesetBuilder::default()
    }

    /// Parse a ruleset from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`UniquesError::Toml`](crate::UniquesError::Toml) if the text
    /// is not a valid ruleset document.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> Result<Ruleset, crate::UniquesError> {
        let ruleset: Ruleset = toml::from_str(text)?;
        tracing::debug!(
            eras = ruleset.eras.len(),
            buildings = ruleset.buildings.len(),
            technologies = ruleset.technologies.len(),
            "loaded ruleset"
        );
        Ok(ruleset)
    }

    /// Read and parse a TOML ruleset file.
    ///
    /// # Errors
    ///
    /// Returns [`UniquesError::Io`](crate::UniquesError::Io) if the file
    /// cannot be read, or [`UniquesError::Toml`](crate::UniquesError::Toml)
    /// if its contents are invalid.
    #[cfg(feature = "serde")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Ruleset, crate::UniquesError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    // -- Eras, difficulties, speeds -----------------------------------------

    pub fn eras(&self) -> &[String] {
        &self.eras
    }

    /// Ordinal of an era, starting at 0.
    #[must_use]
    pub fn era_number(&self, era: &str) -> Option<usize> {
        self.eras.iter().position(|e| e == era)
    }

    pub fn difficulties(&self) -> &[String] {
        &self.difficulties
    }

    #[must_use]
    pub fn difficulty_index(&self, difficulty: &str) -> Option<usize> {
        self.difficulties.iter().position(|d| d == difficulty)
    }

    #[must_use]
    pub fn has_speed(&self, speed: &str) -> bool {
        self.speeds.iter().any(|s| s == speed)
    }

    // -- Resources ----------------------------------------------------------

    #[must_use]
    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    #[must_use]
    pub fn is_stockpiled(&self, name: &str) -> bool {
        self.resources.get(name).is_some_and(|r| r.stockpiled)
    }

    // -- Buildings ----------------------------------------------------------

    #[must_use]
    pub fn has_building(&self, name: &str) -> bool {
        self.buildings.contains_key(name)
    }

    pub fn buildings(&self) -> impl Iterator<Item = (&str, &BuildingDef)> {
        self.buildings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether building `name` matches `filter`.
    ///
    /// Accepts the building's own name, the name it replaces, `All`,
    /// `Building`/`Buildings` for non-wonders, `Wonder`/`Wonders`,
    /// `World Wonder` and `National Wonder`.
    #[must_use]
    pub fn building_matches_filter(&self, name: &str, filter: &str) -> bool {
        if is_all(filter) || name == filter {
            return true;
        }
        let Some(def) = self.buildings.get(name) else {
            return false;
        };
        match filter {
            "Building" | "Buildings" => def.kind == BuildingKind::Regular,
            "Wonder" | "Wonders" => def.kind != BuildingKind::Regular,
            "World Wonder" => def.kind == BuildingKind::WorldWonder,
            "National Wonder" => def.kind == BuildingKind::NationalWonder,
            _ => def.replaces.as_deref() == Some(filter),
        }
    }

    /// Whether `filter` could match at least one building filter keyword or name.
    #[must_use]
    pub fn is_building_filter(&self, filter: &str) -> bool {
        matches!(
            filter,
            "All" | "all" | "Building" | "Buildings" | "Wonder" | "Wonders" | "World Wonder"
                | "National Wonder"
        ) || self.has_building(filter)
    }

    // -- Technologies -------------------------------------------------------

    #[must_use]
    pub fn has_tech(&self, name: &str) -> bool {
        self.technologies.contains_key(name)
    }

    #[must_use]
    pub fn tech_era(&self, name: &str) -> Option<&str> {
        self.technologies.get(name).map(|t| t.era.as_str())
    }

    /// A tech matches its own name, its era's name, or `All`.
    #[must_use]
    pub fn tech_matches_filter(&self, name: &str, filter: &str) -> bool {
        is_all(filter) || name == filter || self.tech_era(name) == Some(filter)
    }

    // -- Policies -----------------------------------------------------------

    #[must_use]
    pub fn has_policy(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    #[must_use]
    pub fn is_policy_branch(&self, name: &str) -> bool {
        self.policies.get(name).is_some_and(|p| p.branch.is_none())
    }

    /// A policy matches its own name, its branch's name, or `All`.
    #[must_use]
    pub fn policy_matches_filter(&self, name: &str, filter: &str) -> bool {
        if is_all(filter) || name == filter {
            return true;
        }
        self.policies
            .get(name)
            .and_then(|p| p.branch.as_deref())
            .is_some_and(|branch| branch == filter)
    }

    // -- Everything else ----------------------------------------------------

    #[must_use]
    pub fn has_belief(&self, name: &str) -> bool {
        self.beliefs.contains(name)
    }

    #[must_use]
    pub fn has_unit(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    #[must_use]
    pub fn unit_type_of(&self, unit: &str) -> Option<&str> {
        self.units.get(unit).map(|u| u.unit_type.as_str())
    }

    #[must_use]
    pub fn has_unit_type(&self, name: &str) -> bool {
        self.unit_types.contains(name)
    }

    #[must_use]
    pub fn has_promotion(&self, name: &str) -> bool {
        self.promotions.contains(name)
    }

    #[must_use]
    pub fn terrain_kind(&self, name: &str) -> Option<TerrainKind> {
        self.terrains.get(name).map(|t| t.kind)
    }

    #[must_use]
    pub fn has_terrain(&self, name: &str) -> bool {
        self.terrains.contains_key(name)
    }

    #[must_use]
    pub fn has_improvement(&self, name: &str) -> bool {
        self.improvements.contains(name)
    }

    #[must_use]
    pub fn has_nation(&self, name: &str) -> bool {
        self.nations.contains(name)
    }

    #[must_use]
    pub fn has_specialist(&self, name: &str) -> bool {
        self.specialists.contains(name)
    }

    #[must_use]
    pub fn has_event(&self, name: &str) -> bool {
        self.events.contains(name)
    }

    #[must_use]
    pub fn has_victory_type(&self, name: &str) -> bool {
        self.victory_types.contains(name)
    }
}

/// Builder for constructing a [`Ruleset`] in code.
///
/// # Example
///
/// ```
/// use uniques::Ruleset;
///
/// let ruleset = Ruleset::builder()
///     .era("Ancient era")
///     .era("Classical era")
///     .resource("Iron")
///     .building("Monument")
///     .tech("Bronze Working", "Ancient era")
///     .build();
///
/// assert_eq!(ruleset.era_number("Classical era"), Some(1));
/// assert!(ruleset.has_resource("Iron"));
/// ```
#[derive(Debug, Default)]
pub struct RulesetBuilder {
    ruleset: Ruleset,
}

impl RulesetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an era; eras are numbered in insertion order.
    #[must_use]
    pub fn era(mut self, name: &str) -> Self {
        self.ruleset.eras.push(name.to_owned());
        self
    }

    /// Append a difficulty; difficulties are ordered easiest first.
    #[must_use]
    pub fn difficulty(mut self, name: &str) -> Self {
        self.ruleset.difficulties.push(name.to_owned());
        self
    }

    #[must_use]
    pub fn speed(mut self, name: &str) -> Self {
        self.ruleset.speeds.push(name.to_owned());
        self
    }

    #[must_use]
    pub fn resource(mut self, name: &str) -> Self {
        self.ruleset.resources.insert(name.to_owned(), ResourceDef::default());
        self
    }

    #[must_use]
    pub fn stockpiled_resource(mut self, name: &str) -> Self {
        self.ruleset
            .resources
            .insert(name.to_owned(), ResourceDef { stockpiled: true });
        self
    }

    #[must_use]
    pub fn building(self, name: &str) -> Self {
        self.building_def(name, BuildingDef::default())
    }

    #[must_use]
    pub fn wonder(self, name: &str) -> Self {
        self.building_def(
            name,
            BuildingDef {
                kind: BuildingKind::WorldWonder,
                replaces: None,
            },
        )
    }

    #[must_use]
    pub fn building_def(mut self, name: &str, def: BuildingDef) -> Self {
        self.ruleset.buildings.insert(name.to_owned(), def);
        self
    }

    #[must_use]
    pub fn tech(mut self, name: &str, era: &str) -> Self {
        self.ruleset.technologies.insert(
            name.to_owned(),
            TechDef {
                era: era.to_owned(),
            },
        );
        self
    }

    /// Add a policy branch.
    #[must_use]
    pub fn policy_branch(mut self, name: &str) -> Self {
        self.ruleset
            .policies
            .insert(name.to_owned(), PolicyDef { branch: None });
        self
    }

    /// Add a policy belonging to `branch`.
    #[must_use]
    pub fn policy(mut self, name: &str, branch: &str) -> Self {
        self.ruleset.policies.insert(
            name.to_owned(),
            PolicyDef {
                branch: Some(branch.to_owned()),
            },
        );
        self
    }

    #[must_use]
    pub fn belief(mut self, name: &str) -> Self {
        self.ruleset.beliefs.insert(name.to_owned());
        self
    }

    /// Add a unit and its unit type.
    #[must_use]
    pub fn unit(mut self, name: &str, unit_type: &str) -> Self {
        self.ruleset.units.insert(
            name.to_owned(),
            UnitDef {
                unit_type: unit_type.to_owned(),
            },
        );
        self.ruleset.unit_types.insert(unit_type.to_owned());
        self
    }

    #[must_use]
    pub fn promotion(mut self, name: &str) -> Self {
        self.ruleset.promotions.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn terrain(mut self, name: &str, kind: TerrainKind) -> Self {
        self.ruleset
            .terrains
            .insert(name.to_owned(), TerrainDef { kind });
        self
    }

    #[must_use]
    pub fn improvement(mut self, name: &str) -> Self {
        self.ruleset.improvements.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn nation(mut self, name: &str) -> Self {
        self.ruleset.nations.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn specialist(mut self, name: &str) -> Self {
        self.ruleset.specialists.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn event(mut self, name: &str) -> Self {
        self.ruleset.events.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn victory_type(mut self, name: &str) -> Self {
        self.ruleset.victory_types.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> Ruleset {
        self.ruleset
    }
}
