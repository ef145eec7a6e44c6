use std::fmt;

/// How a directive carrying a given target behaves when attached with `<...>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierType {
    /// Not a modifier; a standalone directive.
    None,
    /// A predicate that gates its parent.
    Conditional,
    /// Metadata or trigger/action modifiers that never gate their parent.
    Other,
}

/// The kind of game object a directive template may attach to.
///
/// Targets form a tree through [`UniqueTarget::inherits_from`]: a directive
/// declared for a broad target is accepted by every narrower target below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UniqueTarget {
    Triggerable,
    UnitTriggerable,
    Global,
    Nation,
    Era,
    Tech,
    Policy,
    FounderBelief,
    FollowerBelief,
    Building,
    Wonder,
    Unit,
    UnitType,
    Promotion,
    Terrain,
    Improvement,
    Resource,
    Ruins,
    Speed,
    Difficulty,
    CityState,
    ModOptions,
    Event,
    EventChoice,
    Conditional,
    TriggerCondition,
    UnitTriggerCondition,
    UnitActionModifier,
    MetaModifier,
}

impl UniqueTarget {
    pub const ALL: &'static [UniqueTarget] = &[
        Self::Triggerable,
        Self::UnitTriggerable,
        Self::Global,
        Self::Nation,
        Self::Era,
        Self::Tech,
        Self::Policy,
        Self::FounderBelief,
        Self::FollowerBelief,
        Self::Building,
        Self::Wonder,
        Self::Unit,
        Self::UnitType,
        Self::Promotion,
        Self::Terrain,
        Self::Improvement,
        Self::Resource,
        Self::Ruins,
        Self::Speed,
        Self::Difficulty,
        Self::CityState,
        Self::ModOptions,
        Self::Event,
        Self::EventChoice,
        Self::Conditional,
        Self::TriggerCondition,
        Self::UnitTriggerCondition,
        Self::UnitActionModifier,
        Self::MetaModifier,
    ];

    /// Targets whose directives may be displayed in the civilopedia.
    pub const DISPLAYABLE: &'static [UniqueTarget] = &[
        Self::Nation,
        Self::Era,
        Self::Tech,
        Self::Policy,
        Self::FounderBelief,
        Self::FollowerBelief,
        Self::Building,
        Self::Unit,
        Self::UnitType,
        Self::Improvement,
        Self::Resource,
        Self::Terrain,
        Self::Promotion,
        Self::Event,
        Self::EventChoice,
    ];

    /// The broader target this one specializes, if any.
    #[must_use]
    pub const fn inherits_from(self) -> Option<UniqueTarget> {
        match self {
            Self::UnitTriggerable | Self::Global => Some(Self::Triggerable),
            Self::Nation
            | Self::Era
            | Self::Tech
            | Self::Policy
            | Self::FounderBelief
            | Self::FollowerBelief
            | Self::Building
            | Self::Resource
            | Self::CityState
            | Self::TriggerCondition => Some(Self::Global),
            Self::Wonder => Some(Self::Building),
            Self::Unit | Self::Ruins => Some(Self::UnitTriggerable),
            Self::UnitType | Self::Promotion => Some(Self::Unit),
            Self::UnitTriggerCondition => Some(Self::TriggerCondition),
            _ => None,
        }
    }

    #[must_use]
    pub const fn modifier_type(self) -> ModifierType {
        match self {
            Self::Conditional => ModifierType::Conditional,
            Self::TriggerCondition
            | Self::UnitTriggerCondition
            | Self::UnitActionModifier
            | Self::MetaModifier => ModifierType::Other,
            _ => ModifierType::None,
        }
    }

    /// Whether a directive declared for `declared` may be placed on `self`.
    ///
    /// True when `declared` is `self` or any ancestor of `self`.
    #[must_use]
    pub fn can_accept_unique_target(self, declared: UniqueTarget) -> bool {
        let mut current = Some(self);
        while let Some(target) = current {
            if target == declared {
                return true;
            }
            current = target.inherits_from();
        }
        false
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Triggerable => "Triggerable",
            Self::UnitTriggerable => "UnitTriggerable",
            Self::Global => "Global",
            Self::Nation => "Nation",
            Self::Era => "Era",
            Self::Tech => "Tech",
            Self::Policy => "Policy",
            Self::FounderBelief => "FounderBelief",
            Self::FollowerBelief => "FollowerBelief",
            Self::Building => "Building",
            Self::Wonder => "Wonder",
            Self::Unit => "Unit",
            Self::UnitType => "UnitType",
            Self::Promotion => "Promotion",
            Self::Terrain => "Terrain",
            Self::Improvement => "Improvement",
            Self::Resource => "Resource",
            Self::Ruins => "Ruins",
            Self::Speed => "Speed",
            Self::Difficulty => "Difficulty",
            Self::CityState => "CityState",
            Self::ModOptions => "ModOptions",
            Self::Event => "Event",
            Self::EventChoice => "EventChoice",
            Self::Conditional => "Conditional",
            Self::TriggerCondition => "TriggerCondition",
            Self::UnitTriggerCondition => "UnitTriggerCondition",
            Self::UnitActionModifier => "UnitActionModifier",
            Self::MetaModifier => "MetaModifier",
        }
    }

    /// Look up a target by its [`name`](Self::name).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

impl fmt::Display for UniqueTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
