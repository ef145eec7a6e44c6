use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::parse::{placeholder_text, PARAM_MARKER};

use super::parameter_type::UniqueParameterType;
use super::unique_target::{ModifierType, UniqueTarget};

/// Extra behaviour switches attached to a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueFlag {
    /// Never shown in user-facing descriptions.
    HiddenToUsers,
    /// Conditionals on this directive are a data error.
    NoConditionals,
    /// Amounts scale with game speed when marked `<(modified by game speed)>`.
    AcceptsSpeedModifier,
    /// Amounts scale with game progress when so marked.
    AcceptsGameProgressModifier,
}

macro_rules! unique_types {
    (
        $(
            $variant:ident => $text:literal,
            [$($target:ident),+ $(,)?]
            $(, [$($flag:ident),+ $(,)?])?
            ;
        )*
    ) => {
        /// Every directive template the engine recognizes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum UniqueType {
            $($variant,)*
        }

        impl UniqueType {
            pub const ALL: &'static [UniqueType] = &[$(UniqueType::$variant,)*];

            /// The template, with typed placeholders such as `[cityFilter]`.
            #[must_use]
            pub const fn text(self) -> &'static str {
                match self {
                    $(UniqueType::$variant => $text,)*
                }
            }

            /// The object kinds this template is declared for.
            #[must_use]
            pub const fn targets(self) -> &'static [UniqueTarget] {
                match self {
                    $(UniqueType::$variant => &[$(UniqueTarget::$target),+],)*
                }
            }

            #[must_use]
            pub const fn flags(self) -> &'static [UniqueFlag] {
                match self {
                    $(UniqueType::$variant => &[$($(UniqueFlag::$flag),+)?],)*
                }
            }

            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(UniqueType::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

unique_types! {
    // -- Stats and yields ---------------------------------------------------
    Stats => "[stats]", [Global, Improvement, Terrain];
    StatsPerCity => "[stats] [cityFilter]", [Global, FollowerBelief];
    StatsFromSpecialist => "[stats] from every specialist [cityFilter]", [Global, FollowerBelief];
    StatsPerPopulation => "[stats] per [positiveAmount] population [cityFilter]", [Global, FollowerBelief];
    StatsFromTiles => "[stats] from [tileFilter] tiles [cityFilter]", [Global, FollowerBelief];
    StatsFromObject => "[stats] from every [tileFilter/specialist/buildingFilter]", [Global, FollowerBelief];
    StatPercentBonus => "[relativeAmount]% [stat]", [Global, FollowerBelief];
    StatPercentBonusCities => "[relativeAmount]% [stat] [cityFilter]", [Global, FollowerBelief];
    StatPercentFromObject => "[relativeAmount]% [stat] from every [tileFilter/buildingFilter]", [Global, FollowerBelief];
    CarryOverFood => "[relativeAmount]% Food is carried over after population increases [cityFilter]", [Global, FollowerBelief];
    GrowthPercentBonus => "[relativeAmount]% growth [cityFilter]", [Global, FollowerBelief];
    PercentProductionWonders => "[relativeAmount]% Production when constructing [buildingFilter] wonders [cityFilter]", [Global, Resource, FollowerBelief];

    // -- Resources ----------------------------------------------------------
    ProvidesResources => "Provides [amount] [resource]", [Global, Improvement, FollowerBelief];
    ConsumesResources => "Consumes [amount] [resource]", [Improvement, Building, Unit];

    // -- Units --------------------------------------------------------------
    Strength => "[relativeAmount]% Strength", [Unit, Global];
    Movement => "[amount] Movement", [Unit, Global];
    Sight => "[amount] Sight", [Unit, Global, Terrain];
    Range => "[amount] Range", [Unit, Global];
    UnitMaintenanceDiscount => "[relativeAmount]% maintenance costs", [Unit, Global];

    // -- Buildings ----------------------------------------------------------
    GainFreeBuildings => "Gain a free [buildingName] [cityFilter]", [Global, Triggerable];
    RemoveBuilding => "Remove [buildingFilter] [cityFilter]", [Global, Triggerable];

    // -- Triggerables -------------------------------------------------------
    OneTimeFreeUnit => "Free [unit] appears", [Triggerable];
    OneTimeAmountFreeUnits => "[amount] free [unit] units appear", [Triggerable];
    OneTimeFreePolicy => "Free Social Policy", [Triggerable];
    OneTimeEnterGoldenAge => "Empire enters golden age", [Triggerable];
    OneTimeGainStat => "Gain [amount] [stat]", [Triggerable], [AcceptsSpeedModifier, AcceptsGameProgressModifier];
    OneTimeGainStatRange => "Gain [amount]-[amount] [stat]", [Triggerable], [AcceptsSpeedModifier];
    OneTimeDiscoverTech => "Discover [tech]", [Triggerable];
    OneTimeAdoptPolicy => "Adopt [policy]", [Triggerable];
    OneTimeFreeTech => "[positiveAmount] Free Technologies", [Triggerable];
    OneTimeRevealEntireMap => "Reveals the entire map", [Triggerable];
    OneTimeGlobalAlert => "Triggers the following global alert: [comment]", [Triggerable];
    OneTimeGainPopulation => "[amount] population [cityFilter]", [Triggerable];
    UnitsGainPromotion => "[mapUnitFilter] units gain the [promotion] promotion", [Triggerable];
    TriggerEvent => "Triggers a [event] event", [Triggerable];
    OneTimeUnitHeal => "[unitTriggerTarget] heals [positiveAmount] HP", [UnitTriggerable];
    OneTimeUnitDamage => "[unitTriggerTarget] takes [positiveAmount] damage", [UnitTriggerable];
    OneTimeUnitGainXP => "[unitTriggerTarget] gains [amount] XP", [UnitTriggerable];

    // -- Documentation ------------------------------------------------------
    Comment => "Comment [comment]", [Nation, Era, Tech, Policy, FounderBelief, FollowerBelief, Building, Unit, UnitType, Promotion, Terrain, Improvement, Resource, Event, EventChoice], [HiddenToUsers, NoConditionals];
    HiddenFromCivilopedia => "Will not be displayed in Civilopedia", [Nation, Era, Tech, Policy, FounderBelief, FollowerBelief, Building, Unit, UnitType, Promotion, Terrain, Improvement, Resource, Event, EventChoice], [HiddenToUsers, NoConditionals];

    // -- Conditionals: randomness and time ----------------------------------
    ConditionalChance => "with [nonNegativeAmount]% chance", [Conditional];
    ConditionalEveryTurns => "every [positiveAmount] turns", [Conditional];
    ConditionalBeforeTurns => "before [amount] turns", [Conditional];
    ConditionalAfterTurns => "after [amount] turns", [Conditional];

    // -- Conditionals: civilization -----------------------------------------
    ConditionalCivFilter => "for [civFilter] Civilizations", [Conditional];
    ConditionalWar => "when at war", [Conditional];
    ConditionalNotWar => "when not at war", [Conditional];
    ConditionalGoldenAge => "during a Golden Age", [Conditional];
    ConditionalNotGoldenAge => "when not in a Golden Age", [Conditional];
    ConditionalHappy => "while the empire is happy", [Conditional];
    ConditionalDuringEra => "during the [era]", [Conditional];
    ConditionalBeforeEra => "before the [era]", [Conditional];
    ConditionalStartingFromEra => "starting from the [era]", [Conditional];
    ConditionalIfStartingInEra => "if starting in the [era]", [Conditional];
    ConditionalSpeed => "on [speed] game speed", [Conditional];
    ConditionalDifficulty => "on [difficulty] difficulty", [Conditional];
    ConditionalDifficultyOrHigher => "on [difficulty] difficulty or higher", [Conditional];
    ConditionalVictoryEnabled => "when [victoryType] Victory is enabled", [Conditional];
    ConditionalVictoryDisabled => "when [victoryType] Victory is disabled", [Conditional];
    ConditionalReligionEnabled => "when religion is enabled", [Conditional];
    ConditionalReligionDisabled => "when religion is disabled", [Conditional];
    ConditionalEspionageEnabled => "when espionage is enabled", [Conditional];
    ConditionalEspionageDisabled => "when espionage is disabled", [Conditional];
    ConditionalNuclearWeaponsEnabled => "when nuclear weapons are enabled", [Conditional];
    ConditionalModEnabled => "if [modFilter] is enabled", [Conditional];
    ConditionalModNotEnabled => "if [modFilter] is not enabled", [Conditional];
    ConditionalTech => "after discovering [techFilter]", [Conditional];
    ConditionalNoTech => "before discovering [techFilter]", [Conditional];
    ConditionalWhileResearching => "while researching [techFilter]", [Conditional];
    ConditionalAfterPolicyOrBelief => "after adopting [policy/belief]", [Conditional];
    ConditionalBeforePolicyOrBelief => "before adopting [policy/belief]", [Conditional];
    ConditionalBeforePantheon => "before founding a Pantheon", [Conditional];
    ConditionalAfterPantheon => "after founding a Pantheon", [Conditional];
    ConditionalBeforeReligion => "before founding a religion", [Conditional];
    ConditionalAfterReligion => "after founding a religion", [Conditional];
    ConditionalBeforeEnhancingReligion => "before enhancing a religion", [Conditional];
    ConditionalAfterEnhancingReligion => "after enhancing a religion", [Conditional];
    ConditionalAfterGeneratingGreatProphet => "after generating a Great Prophet", [Conditional];
    ConditionalBuildingBuilt => "if [buildingFilter] is constructed", [Conditional];
    ConditionalBuildingNotBuilt => "if [buildingFilter] is not constructed", [Conditional];
    ConditionalBuildingBuiltAll => "if [buildingFilter] is constructed in all [cityFilter] cities", [Conditional];
    ConditionalBuildingBuiltAmount => "if [buildingFilter] is constructed in at least [positiveAmount] of [cityFilter] cities", [Conditional];
    ConditionalBuildingBuiltByAnybody => "if [buildingFilter] is constructed by anybody", [Conditional];
    ConditionalBuildingNotBuiltByAnybody => "if [buildingFilter] is not constructed by anybody", [Conditional];
    ConditionalWithResource => "with [resource]", [Conditional];
    ConditionalWithoutResource => "without [resource]", [Conditional];
    ConditionalWhenAboveAmountStatResource => "when above [amount] [stat/resource]", [Conditional];
    ConditionalWhenBelowAmountStatResource => "when below [amount] [stat/resource]", [Conditional];
    ConditionalWhenBetweenStatResource => "when between [amount] and [amount] [stat/resource]", [Conditional];
    ConditionalWhenAboveAmountStatResourceSpeed => "when above [amount] [stat/resource] (modified by game speed)", [Conditional];
    ConditionalWhenBelowAmountStatResourceSpeed => "when below [amount] [stat/resource] (modified by game speed)", [Conditional];
    ConditionalWhenBetweenStatResourceSpeed => "when between [amount] and [amount] [stat/resource] (modified by game speed)", [Conditional];

    // -- Conditionals: cities -----------------------------------------------
    ConditionalInThisCity => "in this city", [Conditional];
    ConditionalCityFilter => "in [cityFilter] cities", [Conditional];
    ConditionalCityConnected => "in cities connected to the capital", [Conditional];
    ConditionalCityMajorReligion => "in cities with a major religion", [Conditional];
    ConditionalCityEnhancedReligion => "in cities with an enhanced religion", [Conditional];
    ConditionalCityThisReligion => "in cities following our religion", [Conditional];
    ConditionalCityReligion => "in cities with a [religionFilter] religion", [Conditional];
    ConditionalCityNotReligion => "in cities not following a [religionFilter] religion", [Conditional];
    ConditionalCityWithBuilding => "in cities with a [buildingFilter]", [Conditional];
    ConditionalCityWithoutBuilding => "in cities without a [buildingFilter]", [Conditional];
    ConditionalPopulationFilter => "in cities with at least [positiveAmount] [populationFilter]", [Conditional];
    ConditionalExactPopulationFilter => "in cities with [positiveAmount] [populationFilter]", [Conditional];
    ConditionalBetweenPopulationFilter => "in cities with between [amount] and [amount] [populationFilter]", [Conditional];
    ConditionalBelowPopulationFilter => "in cities with less than [amount] [populationFilter]", [Conditional];
    ConditionalWLTKD => "during We Love The King Day", [Conditional];
    ConditionalWhenGarrisoned => "with a garrison", [Conditional];

    // -- Conditionals: units and combat -------------------------------------
    ConditionalVsCity => "vs cities", [Conditional];
    ConditionalVsUnits => "vs [mapUnitFilter] units", [Conditional];
    ConditionalVsCombatant => "vs [combatantFilter]", [Conditional];
    ConditionalOurUnit => "for [mapUnitFilter] units", [Conditional];
    ConditionalOurUnitOnUnit => "when [mapUnitFilter]", [Conditional];
    ConditionalUnitWithPromotion => "for units with [promotion]", [Conditional];
    ConditionalUnitWithoutPromotion => "for units without [promotion]", [Conditional];
    ConditionalAttacking => "when attacking", [Conditional];
    ConditionalDefending => "when defending", [Conditional];
    ConditionalFightingInTiles => "when fighting in [tileFilter] tiles", [Conditional];
    ConditionalForeignContinent => "on foreign continents", [Conditional];
    ConditionalAdjacentUnit => "when adjacent to a [mapUnitFilter] unit", [Conditional];
    ConditionalStackedWithUnit => "when stacked with a [mapUnitFilter] unit", [Conditional];
    ConditionalAboveHP => "when above [positiveAmount] HP", [Conditional];
    ConditionalBelowHP => "when below [positiveAmount] HP", [Conditional];
    ConditionalHasNotUsedOtherActions => "if it hasn't used other actions yet", [Conditional];
    ConditionalVsLargerCiv => "when fighting units from a Civilization with more Cities than you", [Conditional];

    // -- Conditionals: tiles and regions ------------------------------------
    ConditionalInTiles => "in [tileFilter] tiles", [Conditional];
    ConditionalInTilesNot => "in tiles without [tileFilter]", [Conditional];
    ConditionalAdjacentTo => "in tiles adjacent to [tileFilter] tiles", [Conditional];
    ConditionalNotAdjacentTo => "in tiles not adjacent to [tileFilter] tiles", [Conditional];
    ConditionalNearTiles => "within [positiveAmount] tiles of a [tileFilter] tile", [Conditional];
    ConditionalNeighborTiles => "with [nonNegativeAmount] to [nonNegativeAmount] neighboring [tileFilter] tiles", [Conditional];
    ConditionalOnWaterMaps => "on water maps", [Conditional];
    ConditionalInRegionOfType => "in [regionType] Regions", [Conditional];
    ConditionalInRegionExceptOfType => "in all except [regionType] Regions", [Conditional];

    // -- Conditionals: first to unlock --------------------------------------
    ConditionalFirstCivToResearch => "if no other Civilization has researched this", [Conditional];
    ConditionalFirstCivToAdopt => "if no other Civilization has adopted this", [Conditional];

    // -- Conditionals: countable comparisons --------------------------------
    ConditionalCountableEqualTo => "when number of [countable] is equal to [countable]", [Conditional];
    ConditionalCountableDifferentThan => "when number of [countable] is different than [countable]", [Conditional];
    ConditionalCountableMoreThan => "when number of [countable] is more than [countable]", [Conditional];
    ConditionalCountableLessThan => "when number of [countable] is less than [countable]", [Conditional];
    ConditionalCountableBetween => "when number of [countable] is between [countable] and [countable]", [Conditional];

    // -- Trigger conditions -------------------------------------------------
    TriggerUponResearch => "upon discovering [techFilter] technology", [TriggerCondition];
    TriggerUponAdoptingPolicyOrBelief => "upon adopting [policy/belief]", [TriggerCondition];
    TriggerUponEnteringGoldenAge => "upon entering a Golden Age", [TriggerCondition];
    TriggerUponEnteringEra => "upon entering the [era]", [TriggerCondition];
    TriggerUponFoundingCity => "upon founding a city", [TriggerCondition];
    TriggerUponConstructingBuilding => "upon constructing [buildingFilter]", [TriggerCondition];
    TriggerUponBuildingImprovement => "upon building a [improvementFilter] improvement", [TriggerCondition];
    TriggerUponGainingUnit => "upon gaining a [baseUnitFilter] unit", [TriggerCondition];
    TriggerUponDeclaringWar => "upon declaring war with a major Civilization", [TriggerCondition];
    TriggerUponDefeatingUnit => "upon defeating a [mapUnitFilter] unit", [UnitTriggerCondition];
    TriggerUponDamagingUnit => "upon damaging a [mapUnitFilter] unit", [UnitTriggerCondition];
    TriggerUponDefeat => "upon being defeated", [UnitTriggerCondition];
    TriggerUponPromotion => "upon being promoted", [UnitTriggerCondition];
    TriggerUponPromotionGain => "upon gaining the [promotion] promotion", [UnitTriggerCondition];
    TriggerUponLosingHealth => "upon losing at least [positiveAmount] HP in a single attack", [UnitTriggerCondition];
    TriggerUponEndingTurnInTile => "upon ending a turn in a [tileFilter] tile", [UnitTriggerCondition];
    TriggerUponEnteringTile => "upon entering a [tileFilter] tile", [UnitTriggerCondition];

    // -- Unit action modifiers ----------------------------------------------
    UnitActionConsumeUnit => "by consuming this unit", [UnitActionModifier];
    UnitActionMovementCost => "for [amount] movement", [UnitActionModifier];
    UnitActionOnce => "once", [UnitActionModifier];
    UnitActionLimitedTimes => "[positiveAmount] times", [UnitActionModifier];
    UnitActionStatsCost => "costs [stats] stats", [UnitActionModifier];
    UnitActionStockpileCost => "costs [amount] [stockpiledResource]", [UnitActionModifier];

    // -- Meta modifiers -----------------------------------------------------
    ConditionalTimedUnique => "for [nonNegativeAmount] turns", [MetaModifier];
    ModifierHiddenFromUsers => "hidden from users", [MetaModifier];
    ForEveryCountable => "for every [countable]", [MetaModifier];
    ForEveryAmountCountable => "for every [positiveAmount] [countable]", [MetaModifier];
    ForEveryAdjacentTile => "for every adjacent [tileFilter]", [MetaModifier];
    ModifiedByGameSpeed => "(modified by game speed)", [MetaModifier];
    ModifiedByGameProgress => "(modified by game progress up to [relativeAmount]%)", [MetaModifier];
}

// -- Registry ---------------------------------------------------------------

struct RegistryEntry {
    placeholder: String,
    slots: Vec<Vec<UniqueParameterType>>,
}

/// Process-wide index from placeholder text to template.
///
/// Built once on first use and never mutated afterwards.
struct UniqueTypeRegistry {
    entries: Vec<RegistryEntry>,
    by_placeholder: HashMap<String, UniqueType>,
}

#[derive(Default)]
struct RegistryBuilder {
    entries: Vec<RegistryEntry>,
    by_placeholder: HashMap<String, UniqueType>,
}

impl RegistryBuilder {
    /// Register a template. Slots are derived from its placeholder names.
    /// Registration order must match declaration order.
    fn register(mut self, unique_type: UniqueType) -> Self {
        let text = unique_type.text();
        let slots = crate::parse::params(text)
            .iter()
            .map(|name| UniqueParameterType::for_placeholder(name))
            .collect();
        let placeholder = placeholder_text(text);
        if let Some(existing) = self.by_placeholder.get(&placeholder) {
            tracing::warn!(
                %placeholder,
                kept = existing.name(),
                shadowed = unique_type.name(),
                "duplicate unique template"
            );
        } else {
            self.by_placeholder.insert(placeholder.clone(), unique_type);
        }
        self.entries.push(RegistryEntry { placeholder, slots });
        self
    }

    fn build(self) -> UniqueTypeRegistry {
        tracing::debug!(templates = self.entries.len(), "built unique type registry");
        UniqueTypeRegistry {
            entries: self.entries,
            by_placeholder: self.by_placeholder,
        }
    }
}

static REGISTRY: LazyLock<UniqueTypeRegistry> = LazyLock::new(|| {
    UniqueType::ALL
        .iter()
        .fold(RegistryBuilder::default(), |builder, &t| builder.register(t))
        .build()
});

impl UniqueType {
    fn entry(self) -> &'static RegistryEntry {
        &REGISTRY.entries[self as usize]
    }

    /// Find the template whose placeholder text is exactly `placeholder`.
    #[must_use]
    pub fn from_placeholder(placeholder: &str) -> Option<UniqueType> {
        REGISTRY.by_placeholder.get(placeholder).copied()
    }

    /// Look up a template by its variant name, e.g. `"ConditionalWar"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<UniqueType> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// The template with every placeholder replaced by `[]`.
    #[must_use]
    pub fn placeholder_text(self) -> &'static str {
        &self.entry().placeholder
    }

    /// Accepted validators for each parameter slot, in order.
    #[must_use]
    pub fn parameter_type_map(self) -> &'static [Vec<UniqueParameterType>] {
        &self.entry().slots
    }

    #[must_use]
    pub fn param_count(self) -> usize {
        self.placeholder_text().matches(PARAM_MARKER).count()
    }

    #[inline]
    #[must_use]
    pub fn has_flag(self, flag: UniqueFlag) -> bool {
        self.flags().contains(&flag)
    }

    /// Whether a directive of this type may be attached to `target`.
    #[must_use]
    pub fn can_accept_unique_target(self, target: UniqueTarget) -> bool {
        self.targets()
            .iter()
            .any(|&declared| target.can_accept_unique_target(declared))
    }

    /// The modifier behaviour of this type, taken from its first target
    /// that is a modifier of any kind.
    #[must_use]
    pub fn modifier_type(self) -> ModifierType {
        self.targets()
            .iter()
            .map(|t| t.modifier_type())
            .find(|m| *m != ModifierType::None)
            .unwrap_or(ModifierType::None)
    }

    /// Metadata-only modifiers never restrict their parent.
    #[must_use]
    pub fn is_effect_only(self) -> bool {
        self.modifier_type() == ModifierType::Other
    }

    #[must_use]
    pub fn is_conditional(self) -> bool {
        self.modifier_type() == ModifierType::Conditional
    }

    #[must_use]
    pub fn is_trigger_condition(self) -> bool {
        self.targets().iter().any(|t| {
            t.can_accept_unique_target(UniqueTarget::TriggerCondition)
        })
    }
}

impl fmt::Display for UniqueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
