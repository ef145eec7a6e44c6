use std::sync::Arc;

use super::game_context::GameContext;
use super::unique::Unique;
use super::unique_type::UniqueType;

/// An effect active for a limited number of turns.
///
/// Built from an activation template carrying a "for [n] turns" marker;
/// the stored directive is the template with that marker removed, so its
/// remaining conditionals still gate it.
#[derive(Debug, Clone)]
pub struct TemporaryUnique {
    unique: Arc<Unique>,
    turns_left: i32,
}

impl TemporaryUnique {
    /// Activate `template` for the duration its timed marker names.
    ///
    /// Returns `None` if it has no such marker or the duration is not a
    /// number.
    #[must_use]
    pub fn activate(template: &Unique) -> Option<Self> {
        let marker = template
            .modifiers_of_type(UniqueType::ConditionalTimedUnique)
            .next()?;
        let turns = marker.param(0).parse::<i32>().ok()?;
        Some(Self::with_turns(template, turns))
    }

    /// Activate `template` for exactly `turns` turns. A negative count
    /// never expires. Zero lasts until the next end of turn: it counts as
    /// already expiring, not as a permanent effect, even though the first
    /// decrement would otherwise turn it negative.
    #[must_use]
    pub fn with_turns(template: &Unique, turns: i32) -> Self {
        let mut text = template.text().to_owned();
        if let Some(marker) = template
            .modifiers_of_type(UniqueType::ConditionalTimedUnique)
            .next()
        {
            text = text.replacen(&format!("<{}>", marker.text()), "", 1);
        }
        let text = text.trim();
        let unique = match (template.source_object_type(), template.source_object_name()) {
            (Some(kind), Some(name)) => Unique::with_source(text, kind, name),
            _ => Unique::new(text),
        };
        Self {
            unique: Arc::new(unique),
            turns_left: turns,
        }
    }

    #[must_use]
    pub fn unique(&self) -> &Arc<Unique> {
        &self.unique
    }

    #[must_use]
    pub fn turns_left(&self) -> i32 {
        self.turns_left
    }
}

/// The temporary effects held by one owner.
#[derive(Debug, Clone, Default)]
pub struct TemporaryUniques {
    entries: Vec<TemporaryUnique>,
}

impl TemporaryUniques {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, temporary: TemporaryUnique) {
        self.entries.push(temporary);
    }

    /// Count one turn down and drop what ran out. Only positive counts
    /// are decremented, so a zero-turn effect is dropped here rather than
    /// becoming permanent.
    pub fn end_turn(&mut self) {
        for entry in &mut self.entries {
            if entry.turns_left > 0 {
                entry.turns_left -= 1;
            }
        }
        let before = self.entries.len();
        self.entries.retain(|entry| entry.turns_left != 0);
        let expired = before - self.entries.len();
        if expired > 0 {
            tracing::debug!(expired, remaining = self.entries.len(), "temporary uniques expired");
        }
    }

    /// Active effects of `unique_type` whose conditionals hold in `ctx`,
    /// repeated by their multipliers.
    pub fn matching<'a>(
        &'a self,
        unique_type: UniqueType,
        ctx: &'a GameContext<'_>,
    ) -> impl Iterator<Item = Arc<Unique>> + 'a {
        self.entries
            .iter()
            .map(TemporaryUnique::unique)
            .filter(move |u| u.is_of_type(unique_type) && u.satisfied_by(ctx))
            .flat_map(move |u| u.expand(ctx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemporaryUnique> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<TemporaryUnique> for TemporaryUniques {
    fn extend<I: IntoIterator<Item = TemporaryUnique>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
