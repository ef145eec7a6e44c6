use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::conditionals;
use crate::countables;
use crate::parse;

use super::game_context::GameContext;
use super::stats::Stats;
use super::unique_target::UniqueTarget;
use super::unique_type::{UniqueFlag, UniqueType};

/// One parsed directive and its attached conditionals.
///
/// Immutable after construction. Identity is by reference: two directives
/// parsed from the same text are different directives. Share one through
/// [`Arc`] when several containers must refer to the same instance.
///
/// # Example
///
/// ```
/// use uniques::{Unique, UniqueType};
///
/// let unique = Unique::new("[+1 Gold] [in all cities] <when at war>");
/// assert_eq!(unique.unique_type(), Some(UniqueType::StatsPerCity));
/// assert_eq!(unique.params(), ["+1 Gold", "in all cities"]);
/// assert_eq!(unique.conditionals().len(), 1);
/// ```
pub struct Unique {
    text: String,
    placeholder_text: String,
    params: Vec<String>,
    unique_type: Option<UniqueType>,
    conditionals: Vec<Unique>,
    source_object_type: Option<UniqueTarget>,
    source_object_name: Option<String>,
    is_modifier: bool,
    stats: OnceLock<Stats>,
}

impl Unique {
    /// Parse `text`. Never fails; unrecognized templates get no type.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::build(text.into(), None, None, 0)
    }

    /// Parse `text` as carried by the named game object.
    #[must_use]
    pub fn with_source(
        text: impl Into<String>,
        source_object_type: UniqueTarget,
        source_object_name: impl Into<String>,
    ) -> Self {
        Self::build(
            text.into(),
            Some(source_object_type),
            Some(source_object_name.into()),
            0,
        )
    }

    fn build(
        text: String,
        source_object_type: Option<UniqueTarget>,
        source_object_name: Option<String>,
        level: usize,
    ) -> Self {
        let placeholder_text = parse::placeholder_text(&text);
        let params = parse::params(&text);
        let unique_type = UniqueType::from_placeholder(&placeholder_text);
        // Conditionals nested past the limit stay part of their parent's text.
        let conditionals = if level < parse::MAX_NESTING {
            parse::conditional_texts(&text)
                .into_iter()
                .map(|inner| {
                    Self::build(
                        inner.to_owned(),
                        source_object_type,
                        source_object_name.clone(),
                        level + 1,
                    )
                })
                .collect()
        } else {
            Vec::new()
        };
        Self {
            text,
            placeholder_text,
            params,
            unique_type,
            conditionals,
            source_object_type,
            source_object_name,
            is_modifier: level > 0,
            stats: OnceLock::new(),
        }
    }

    /// Parse a directive list: one per line, blank lines and lines starting
    /// with `#` skipped.
    #[must_use]
    pub fn parse_list(text: &str) -> Vec<Unique> {
        let uniques: Vec<Unique> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(Unique::new)
            .collect();
        let unknown = uniques.iter().filter(|u| u.unique_type.is_none()).count();
        if unknown > 0 {
            tracing::warn!(unknown, total = uniques.len(), "directive list has unrecognized templates");
        }
        uniques
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn placeholder_text(&self) -> &str {
        &self.placeholder_text
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Parameter at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the directive has no parameter at `index`. A typed
    /// directive always has exactly as many parameters as its template.
    #[must_use]
    pub fn param(&self, index: usize) -> &str {
        assert!(
            index < self.params.len(),
            "parameter {index} out of range for {:?}",
            self.text
        );
        &self.params[index]
    }

    #[inline]
    #[must_use]
    pub fn unique_type(&self) -> Option<UniqueType> {
        self.unique_type
    }

    #[inline]
    #[must_use]
    pub fn is_of_type(&self, unique_type: UniqueType) -> bool {
        self.unique_type == Some(unique_type)
    }

    #[inline]
    #[must_use]
    pub fn conditionals(&self) -> &[Unique] {
        &self.conditionals
    }

    #[must_use]
    pub fn source_object_type(&self) -> Option<UniqueTarget> {
        self.source_object_type
    }

    #[must_use]
    pub fn source_object_name(&self) -> Option<&str> {
        self.source_object_name.as_deref()
    }

    /// Whether this directive was parsed from a `<...>` clause.
    #[must_use]
    pub fn is_modifier(&self) -> bool {
        self.is_modifier
    }

    /// The stats literal among the parameters, or empty stats.
    pub fn stats(&self) -> &Stats {
        self.stats.get_or_init(|| {
            self.params
                .iter()
                .find_map(|p| Stats::parse(p))
                .unwrap_or_default()
        })
    }

    // -- Derived flags ------------------------------------------------------

    #[must_use]
    pub fn has_flag(&self, flag: UniqueFlag) -> bool {
        self.unique_type.is_some_and(|t| t.has_flag(flag))
    }

    /// Conditionals of the given type, in order.
    pub fn modifiers_of_type(&self, unique_type: UniqueType) -> impl Iterator<Item = &Unique> {
        self.conditionals
            .iter()
            .filter(move |c| c.is_of_type(unique_type))
    }

    #[must_use]
    pub fn has_modifier(&self, unique_type: UniqueType) -> bool {
        self.modifiers_of_type(unique_type).next().is_some()
    }

    #[must_use]
    pub fn is_hidden_to_users(&self) -> bool {
        self.has_flag(UniqueFlag::HiddenToUsers)
            || self.has_modifier(UniqueType::ModifierHiddenFromUsers)
    }

    /// Carries a "for [n] turns" marker: it activates as a temporary effect
    /// rather than applying permanently.
    #[must_use]
    pub fn is_timed_triggerable(&self) -> bool {
        self.has_modifier(UniqueType::ConditionalTimedUnique)
    }

    /// Has a one-time effect when triggered.
    #[must_use]
    pub fn is_triggerable(&self) -> bool {
        self.unique_type.is_some_and(|t| {
            t.targets().iter().any(|target| {
                matches!(target, UniqueTarget::Triggerable | UniqueTarget::UnitTriggerable)
            })
        }) || self.is_timed_triggerable()
    }

    #[must_use]
    pub fn has_trigger_conditional(&self) -> bool {
        self.conditionals
            .iter()
            .any(|c| c.unique_type.is_some_and(UniqueType::is_trigger_condition))
    }

    #[must_use]
    pub fn is_modified_by_game_speed(&self) -> bool {
        self.has_modifier(UniqueType::ModifiedByGameSpeed)
    }

    /// Whether this directive applies to a single city only, as opposed
    /// to the whole civilization.
    #[must_use]
    pub fn is_local_effect(&self) -> bool {
        self.params.iter().any(|p| p == "in this city")
            || self.has_modifier(UniqueType::ConditionalInThisCity)
    }

    /// A hash of the text, stable across runs. Seeds chance conditionals.
    #[must_use]
    pub fn stable_hash(&self) -> u64 {
        let digest = blake3::hash(self.text.as_bytes());
        let mut first = [0u8; 8];
        first.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(first)
    }

    // -- Evaluation ---------------------------------------------------------

    /// Whether every conditional applies under `ctx`.
    ///
    /// Always true under [`GameContext::ignore_conditionals`]; vacuously
    /// true with no conditionals.
    #[must_use]
    pub fn satisfied_by(&self, ctx: &GameContext<'_>) -> bool {
        if ctx.ignores_conditionals() {
            return true;
        }
        self.conditionals
            .iter()
            .all(|c| conditionals::conditional_applies(Some(self), c, ctx))
    }

    /// How many times this directive counts under `ctx`.
    ///
    /// The product of every multiplier modifier, clamped at zero. An
    /// unresolvable countable contributes zero.
    #[must_use]
    pub fn multiplier(&self, ctx: &GameContext<'_>) -> usize {
        if ctx.ignores_multiplication() {
            return 1;
        }
        let mut amount: i64 = 1;
        for modifier in &self.conditionals {
            let factor = match modifier.unique_type {
                Some(UniqueType::ForEveryCountable) => {
                    countables::resolve(modifier.param(0), ctx).unwrap_or(0)
                }
                Some(UniqueType::ForEveryAmountCountable) => {
                    let per_every = modifier.param(0).parse::<i32>().unwrap_or(0);
                    if per_every <= 0 {
                        0
                    } else {
                        countables::resolve(modifier.param(1), ctx).unwrap_or(0) / per_every
                    }
                }
                Some(UniqueType::ForEveryAdjacentTile) => {
                    let filter = modifier.param(0);
                    ctx.relevant_tile().map_or(0, |tile| {
                        let civ = ctx.relevant_civ();
                        let count = tile
                            .neighbors()
                            .iter()
                            .filter(|n| n.matches_filter(filter, civ))
                            .count();
                        i32::try_from(count).unwrap_or(i32::MAX)
                    })
                }
                _ => continue,
            };
            amount = amount.saturating_mul(i64::from(factor));
        }
        usize::try_from(amount.max(0)).unwrap_or(usize::MAX)
    }

    /// This directive repeated [`multiplier`](Self::multiplier) times.
    pub fn expand(self: &Arc<Self>, ctx: &GameContext<'_>) -> impl Iterator<Item = Arc<Unique>> + use<> {
        std::iter::repeat_n(Arc::clone(self), self.multiplier(ctx))
    }
}

impl fmt::Debug for Unique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unique")
            .field("text", &self.text)
            .field("type", &self.unique_type)
            .field("params", &self.params)
            .field("conditionals", &self.conditionals.len())
            .finish()
    }
}

impl fmt::Display for Unique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Unique {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Unique {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Unique::new(text))
    }
}
