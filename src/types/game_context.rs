use std::cell::OnceCell;
use std::fmt;

use crate::game::{City, Civilization, CombatAction, Combatant, GameInfo, MapUnit, Region, Tile};

use super::stats::Stat;

/// A snapshot of what is relevant to one evaluation.
///
/// All explicit fields are optional. The `relevant_*` accessors fill gaps
/// from what is known (a unit implies its tile and civilization, a tile
/// implies the city owning it, ...) and memoize the result for the lifetime
/// of this snapshot.
///
/// Set fields with the builder methods before evaluating; every setter
/// clears derived values.
///
/// # Example
///
/// ```
/// use uniques::GameContext;
///
/// let ctx = GameContext::empty();
/// assert!(ctx.relevant_civ().is_none());
/// assert!(GameContext::ignore_conditionals().ignores_conditionals());
/// ```
#[derive(Default)]
pub struct GameContext<'g> {
    civ: Option<&'g dyn Civilization>,
    city: Option<&'g dyn City>,
    unit: Option<&'g dyn MapUnit>,
    tile: Option<&'g dyn Tile>,
    our_combatant: Option<&'g dyn Combatant>,
    their_combatant: Option<&'g dyn Combatant>,
    attacked_tile: Option<&'g dyn Tile>,
    combat_action: Option<CombatAction>,
    region: Option<&'g Region>,
    game_info: Option<&'g dyn GameInfo>,
    ignore_conditionals: bool,
    ignore_multiplication: bool,

    relevant_unit: OnceCell<Option<&'g dyn MapUnit>>,
    relevant_tile: OnceCell<Option<&'g dyn Tile>>,
    relevant_city: OnceCell<Option<&'g dyn City>>,
    relevant_civ: OnceCell<Option<&'g dyn Civilization>>,
}

fn same_civ(a: &dyn Civilization, b: &dyn Civilization) -> bool {
    a.civ_name() == b.civ_name()
}

impl<'g> GameContext<'g> {
    /// A snapshot with nothing set. Conditionals are evaluated normally
    /// and most will fail for lack of state.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A snapshot under which every conditional is satisfied.
    #[must_use]
    pub fn ignore_conditionals() -> Self {
        Self {
            ignore_conditionals: true,
            ..Self::default()
        }
    }

    /// A snapshot for collecting directives without conditionals or
    /// multiplication, each directive yielded exactly once.
    #[must_use]
    pub fn ignore_multiplication_for_caching() -> Self {
        Self {
            ignore_conditionals: true,
            ignore_multiplication: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn for_civ(civ: &'g dyn Civilization) -> Self {
        Self::default().civ(civ)
    }

    /// The city, its civilization and its center tile.
    #[must_use]
    pub fn for_city(city: &'g dyn City) -> Self {
        let ctx = Self::default().civ(city.civ()).city(city);
        match city.center_tile() {
            Some(tile) => ctx.tile(tile),
            None => ctx,
        }
    }

    /// The unit, its civilization and its tile if placed.
    #[must_use]
    pub fn for_unit(unit: &'g dyn MapUnit) -> Self {
        let ctx = Self::default().civ(unit.civ()).unit(unit);
        match unit.tile() {
            Some(tile) => ctx.tile(tile),
            None => ctx,
        }
    }

    /// A combat exchange seen from `ours`. Our combatant's tile, and its
    /// unit or city, are set as well.
    #[must_use]
    pub fn for_combat(
        ours: &'g dyn Combatant,
        theirs: Option<&'g dyn Combatant>,
        attacked_tile: Option<&'g dyn Tile>,
        action: CombatAction,
    ) -> Self {
        let mut ctx = Self::default()
            .civ(ours.civ())
            .our_combatant(ours)
            .tile(ours.tile());
        if let Some(city) = ours.as_city() {
            ctx = ctx.city(city);
        }
        if let Some(unit) = ours.as_unit() {
            ctx = ctx.unit(unit);
        }
        ctx.their_combatant = theirs;
        ctx.attacked_tile = attacked_tile;
        ctx.combat_action = Some(action);
        ctx
    }

    // -- Builder ------------------------------------------------------------

    fn reset_derived(&mut self) {
        self.relevant_unit.take();
        self.relevant_tile.take();
        self.relevant_city.take();
        self.relevant_civ.take();
    }

    #[must_use]
    pub fn civ(mut self, civ: &'g dyn Civilization) -> Self {
        self.civ = Some(civ);
        self.reset_derived();
        self
    }

    #[must_use]
    pub fn city(mut self, city: &'g dyn City) -> Self {
        self.city = Some(city);
        self.reset_derived();
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: &'g dyn MapUnit) -> Self {
        self.unit = Some(unit);
        self.reset_derived();
        self
    }

    #[must_use]
    pub fn tile(mut self, tile: &'g dyn Tile) -> Self {
        self.tile = Some(tile);
        self.reset_derived();
        self
    }

    #[must_use]
    pub fn our_combatant(mut self, combatant: &'g dyn Combatant) -> Self {
        self.our_combatant = Some(combatant);
        self.reset_derived();
        self
    }

    #[must_use]
    pub fn their_combatant(mut self, combatant: &'g dyn Combatant) -> Self {
        self.their_combatant = Some(combatant);
        self
    }

    #[must_use]
    pub fn attacked_tile(mut self, tile: &'g dyn Tile) -> Self {
        self.attacked_tile = Some(tile);
        self.reset_derived();
        self
    }

    #[must_use]
    pub fn combat_action(mut self, action: CombatAction) -> Self {
        self.combat_action = Some(action);
        self
    }

    #[must_use]
    pub fn region(mut self, region: &'g Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Use `game_info` instead of the one reachable from the civilization.
    #[must_use]
    pub fn game_info(mut self, game_info: &'g dyn GameInfo) -> Self {
        self.game_info = Some(game_info);
        self
    }

    // -- Explicit fields ----------------------------------------------------

    #[inline]
    #[must_use]
    pub fn ignores_conditionals(&self) -> bool {
        self.ignore_conditionals
    }

    #[inline]
    #[must_use]
    pub fn ignores_multiplication(&self) -> bool {
        self.ignore_multiplication
    }

    #[must_use]
    pub fn explicit_city(&self) -> Option<&'g dyn City> {
        self.city
    }

    #[must_use]
    pub fn explicit_tile(&self) -> Option<&'g dyn Tile> {
        self.tile
    }

    #[must_use]
    pub fn our_combatant_ref(&self) -> Option<&'g dyn Combatant> {
        self.our_combatant
    }

    #[must_use]
    pub fn their_combatant_ref(&self) -> Option<&'g dyn Combatant> {
        self.their_combatant
    }

    #[must_use]
    pub fn attacked_tile_ref(&self) -> Option<&'g dyn Tile> {
        self.attacked_tile
    }

    #[must_use]
    pub fn combat_action_kind(&self) -> Option<CombatAction> {
        self.combat_action
    }

    #[must_use]
    pub fn region_ref(&self) -> Option<&'g Region> {
        self.region
    }

    // -- Derived fields -----------------------------------------------------

    /// Our combatant's unit, else the explicit unit.
    pub fn relevant_unit(&self) -> Option<&'g dyn MapUnit> {
        *self.relevant_unit.get_or_init(|| {
            self.our_combatant
                .and_then(|c| c.as_unit())
                .or(self.unit)
        })
    }

    /// Attacked tile, else explicit tile, else the relevant unit's tile if
    /// placed, else the explicit city's center tile.
    pub fn relevant_tile(&self) -> Option<&'g dyn Tile> {
        *self.relevant_tile.get_or_init(|| {
            self.attacked_tile
                .or(self.tile)
                .or_else(|| self.relevant_unit().and_then(|u| u.tile()))
                .or_else(|| self.city.and_then(|c| c.center_tile()))
        })
    }

    /// Explicit city, else the city owning the tile (or the unit's tile)
    /// when that city belongs to the acting civilization or the unit's.
    ///
    /// An attacked foreign city is deliberately not relevant.
    pub fn relevant_city(&self) -> Option<&'g dyn City> {
        *self.relevant_city.get_or_init(|| {
            if self.city.is_some() {
                return self.city;
            }
            let tile = self
                .tile
                .or_else(|| self.relevant_unit().and_then(|u| u.tile()))?;
            let city = tile.owning_city()?;
            let owned_by_civ = self.civ.is_some_and(|civ| same_civ(civ, city.civ()));
            let owned_by_unit_civ = self
                .relevant_unit()
                .is_some_and(|u| same_civ(u.civ(), city.civ()));
            (owned_by_civ || owned_by_unit_civ).then_some(city)
        })
    }

    /// Explicit civilization, else the relevant city's, else the relevant unit's.
    pub fn relevant_civ(&self) -> Option<&'g dyn Civilization> {
        *self.relevant_civ.get_or_init(|| {
            self.civ
                .or_else(|| self.relevant_city().map(|c| c.civ()))
                .or_else(|| self.relevant_unit().map(|u| u.civ()))
        })
    }

    /// Explicit game, else the relevant civilization's.
    pub fn relevant_game_info(&self) -> Option<&'g dyn GameInfo> {
        self.game_info
            .or_else(|| self.relevant_civ().map(|c| c.game_info()))
    }

    /// Resource available to the relevant city, else the relevant
    /// civilization, else 0.
    pub fn resource_amount(&self, resource: &str) -> i32 {
        if let Some(city) = self.relevant_city() {
            return city.resource_amount(resource);
        }
        self.relevant_civ()
            .map_or(0, |civ| civ.resource_amount(resource))
    }

    /// Stockpiled stat of the relevant city, else of the relevant
    /// civilization for civ-wide stats, else 0.
    pub fn stat_amount(&self, stat: Stat) -> i32 {
        if let Some(city) = self.relevant_city() {
            return city.stat_reserve(stat);
        }
        match self.relevant_civ() {
            Some(civ) if stat.is_civ_wide() => civ.stat_reserve(stat),
            _ => 0,
        }
    }

    /// A hash of the snapshot's identifying fields, stable across runs,
    /// platforms and compiler versions.
    ///
    /// Seeds chance conditionals, so identical game state always rolls
    /// the same outcome.
    pub fn stable_hash(&self) -> u64 {
        let mut hasher = blake3::Hasher::new();
        let mut field = |tag: u8, bytes: &[u8]| {
            hasher.update(&[tag]);
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        };
        let pos = |t: &dyn Tile| {
            let (x, y) = t.position();
            let mut out = [0u8; 8];
            out[..4].copy_from_slice(&x.to_le_bytes());
            out[4..].copy_from_slice(&y.to_le_bytes());
            out
        };

        if let Some(civ) = self.relevant_civ() {
            field(1, civ.civ_name().as_bytes());
        }
        if let Some(city) = self.relevant_city() {
            field(2, city.id().as_bytes());
        }
        if let Some(unit) = self.relevant_unit() {
            field(3, &unit.id().to_le_bytes());
        }
        if let Some(tile) = self.relevant_tile() {
            field(4, &pos(tile));
        }
        if let Some(ours) = self.our_combatant {
            field(5, ours.name().as_bytes());
            field(6, &pos(ours.tile()));
        }
        if let Some(theirs) = self.their_combatant {
            field(7, theirs.name().as_bytes());
            field(8, &pos(theirs.tile()));
        }
        if let Some(action) = self.combat_action {
            field(9, &[action as u8]);
        }
        if let Some(region) = self.region {
            field(10, region.kind.as_bytes());
            field(11, &region.continent_id.to_le_bytes());
        }
        field(12, &[u8::from(self.ignore_conditionals)]);

        let digest = hasher.finalize();
        let mut first = [0u8; 8];
        first.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(first)
    }
}

impl fmt::Debug for GameContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameContext")
            .field("civ", &self.civ.map(|c| c.civ_name()))
            .field("city", &self.city.map(|c| c.id()))
            .field("unit", &self.unit.map(|u| u.id()))
            .field("tile", &self.tile.map(|t| t.position()))
            .field("our_combatant", &self.our_combatant.map(|c| c.name()))
            .field("their_combatant", &self.their_combatant.map(|c| c.name()))
            .field("attacked_tile", &self.attacked_tile.map(|t| t.position()))
            .field("combat_action", &self.combat_action)
            .field("region", &self.region)
            .field("ignore_conditionals", &self.ignore_conditionals)
            .field("ignore_multiplication", &self.ignore_multiplication)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_nothing_relevant() {
        let ctx = GameContext::empty();
        assert!(ctx.relevant_civ().is_none());
        assert!(ctx.relevant_city().is_none());
        assert!(ctx.relevant_tile().is_none());
        assert!(ctx.relevant_unit().is_none());
        assert!(ctx.relevant_game_info().is_none());
        assert!(!ctx.ignores_conditionals());
    }

    #[test]
    fn sentinels() {
        assert!(GameContext::ignore_conditionals().ignores_conditionals());
        assert!(!GameContext::ignore_conditionals().ignores_multiplication());
        let caching = GameContext::ignore_multiplication_for_caching();
        assert!(caching.ignores_conditionals());
        assert!(caching.ignores_multiplication());
    }

    #[test]
    fn amounts_default_to_zero() {
        let ctx = GameContext::empty();
        assert_eq!(ctx.resource_amount("Iron"), 0);
        assert_eq!(ctx.stat_amount(Stat::Gold), 0);
    }

    #[test]
    fn stable_hash_is_deterministic() {
        let region = Region {
            kind: "Tundra".to_owned(),
            continent_id: 3,
        };
        let a = GameContext::empty().region(&region);
        let b = GameContext::empty().region(&region);
        assert_eq!(a.stable_hash(), b.stable_hash());
        assert_ne!(a.stable_hash(), GameContext::empty().stable_hash());
        assert_ne!(
            GameContext::empty().stable_hash(),
            GameContext::ignore_conditionals().stable_hash()
        );
    }

    #[test]
    fn debug_lists_fields() {
        let text = format!("{:?}", GameContext::empty().combat_action(CombatAction::Attack));
        assert!(text.contains("Attack"));
    }
}
