mod error;
mod game_context;
mod parameter_type;
mod ruleset;
mod stats;
mod temporary;
mod unique;
mod unique_map;
mod unique_target;
mod unique_type;

pub use error::{ComplianceError, RulesetError};
pub use game_context::GameContext;
pub use parameter_type::{REGION_TYPES, Severity, UniqueParameterType};
pub use ruleset::{
    BuildingDef, BuildingKind, PolicyDef, ResourceDef, Ruleset, RulesetBuilder, TechDef,
    TerrainDef, TerrainKind, UnitDef,
};
pub use stats::{Stat, Stats};
pub use temporary::{TemporaryUnique, TemporaryUniques};
pub use unique::Unique;
pub use unique_map::{MatchOptions, UniqueKey, UniqueMap};
pub use unique_target::{ModifierType, UniqueTarget};
pub use unique_type::{UniqueFlag, UniqueType};
