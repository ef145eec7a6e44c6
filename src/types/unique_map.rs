use std::collections::HashMap;
use std::sync::Arc;

use super::game_context::GameContext;
use super::unique::Unique;
use super::unique_type::UniqueType;

/// How to look up a bucket in a [`UniqueMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueKey<'a> {
    /// Placeholder text, e.g. `"[] from every []"`.
    Tag(&'a str),
    Type(UniqueType),
}

impl<'a> From<&'a str> for UniqueKey<'a> {
    fn from(tag: &'a str) -> Self {
        UniqueKey::Tag(tag)
    }
}

impl From<UniqueType> for UniqueKey<'static> {
    fn from(unique_type: UniqueType) -> Self {
        UniqueKey::Type(unique_type)
    }
}

/// Per-query switches for [`UniqueMap::matching_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    include_timed: bool,
}

impl MatchOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also yield directives carrying a "for [n] turns" marker. Those are
    /// activation templates for temporary effects and are skipped by
    /// default.
    #[must_use]
    pub fn include_timed(mut self, include: bool) -> Self {
        self.include_timed = include;
        self
    }
}

/// Directives owned by one game object, indexed by placeholder text and by
/// type.
///
/// Both indices resolve to the same bucket: the type index holds the
/// bucket handle of its template's tag, never a copy. Buckets keep
/// insertion order and are never deallocated, so handles stay valid after
/// removals.
///
/// # Example
///
/// ```
/// use uniques::{GameContext, UniqueMap, UniqueType};
///
/// let map = UniqueMap::from_text("[+1 Gold] [in all cities]\n[+2 Food] [in capital] <when at war>");
/// let ctx = GameContext::ignore_conditionals();
/// assert_eq!(map.matching(UniqueType::StatsPerCity, &ctx).count(), 2);
/// assert_eq!(map.matching("[] []", &GameContext::empty()).count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct UniqueMap {
    buckets: Vec<Vec<Arc<Unique>>>,
    by_tag: HashMap<String, usize>,
    by_type: HashMap<UniqueType, usize>,
}

impl UniqueMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a directive list (one per line, `#` comments) into a map.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Unique::parse_list(text).into_iter().collect()
    }

    /// Load a directive list from a file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::UniquesError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let map = Self::from_text(&text);
        tracing::debug!(path = %path.display(), uniques = map.len(), "loaded unique list");
        Ok(map)
    }

    /// Append `unique` to its template's bucket.
    pub fn insert(&mut self, unique: impl Into<Arc<Unique>>) {
        let unique = unique.into();
        let index = match self.by_tag.get(unique.placeholder_text()) {
            Some(&index) => index,
            None => {
                let index = self.buckets.len();
                self.buckets.push(Vec::new());
                self.by_tag.insert(unique.placeholder_text().to_owned(), index);
                if let Some(unique_type) = unique.unique_type() {
                    self.by_type.insert(unique_type, index);
                }
                tracing::debug!(tag = unique.placeholder_text(), bucket = index, "new unique bucket");
                index
            }
        };
        self.buckets[index].push(unique);
    }

    /// Remove `unique` by identity. Returns whether it was present.
    pub fn remove(&mut self, unique: &Arc<Unique>) -> bool {
        let Some(&index) = self.by_tag.get(unique.placeholder_text()) else {
            return false;
        };
        let bucket = &mut self.buckets[index];
        match bucket.iter().position(|u| Arc::ptr_eq(u, unique)) {
            Some(position) => {
                bucket.remove(position);
                true
            }
            None => false,
        }
    }

    /// The stored bucket for `key`, unfiltered, in insertion order.
    #[must_use]
    pub fn bucket<'k>(&self, key: impl Into<UniqueKey<'k>>) -> &[Arc<Unique>] {
        let index = match key.into() {
            UniqueKey::Tag(tag) => self.by_tag.get(tag),
            UniqueKey::Type(unique_type) => self.by_type.get(&unique_type),
        };
        index.map_or(&[], |&i| self.buckets[i].as_slice())
    }

    /// Directives under `key` whose conditionals hold in `ctx`, each
    /// repeated by its multiplier. Timed activation templates are skipped.
    pub fn matching<'a, 'k>(
        &'a self,
        key: impl Into<UniqueKey<'k>>,
        ctx: &'a GameContext<'_>,
    ) -> impl Iterator<Item = Arc<Unique>> + 'a {
        self.matching_with(key, ctx, MatchOptions::default())
    }

    pub fn matching_with<'a, 'k>(
        &'a self,
        key: impl Into<UniqueKey<'k>>,
        ctx: &'a GameContext<'_>,
        options: MatchOptions,
    ) -> impl Iterator<Item = Arc<Unique>> + 'a {
        self.bucket(key)
            .iter()
            .filter(move |u| options.include_timed || !u.is_timed_triggerable())
            .filter(move |u| u.satisfied_by(ctx))
            .flat_map(move |u| u.expand(ctx))
    }

    #[must_use]
    pub fn has_matching<'k>(&self, key: impl Into<UniqueKey<'k>>, ctx: &GameContext<'_>) -> bool {
        self.matching(key, ctx).next().is_some()
    }

    /// Directives carrying a `trigger` condition accepted by
    /// `trigger_filter`, whose other conditionals hold in `ctx`, repeated
    /// by their multipliers.
    pub fn triggered_uniques<'a>(
        &'a self,
        trigger: UniqueType,
        ctx: &'a GameContext<'_>,
        trigger_filter: impl Fn(&Unique) -> bool + 'a,
    ) -> impl Iterator<Item = Arc<Unique>> + 'a {
        self.all()
            .filter(move |u| u.modifiers_of_type(trigger).any(|m| trigger_filter(m)))
            .filter(move |u| u.satisfied_by(ctx))
            .flat_map(move |u| u.expand(ctx))
    }

    /// Every stored directive, bucket by bucket.
    pub fn all(&self) -> impl Iterator<Item = &Arc<Unique>> {
        self.buckets.iter().flatten()
    }

    /// Whether any directive with placeholder text `tag` is stored.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        !self.bucket(tag).is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

impl Extend<Arc<Unique>> for UniqueMap {
    fn extend<I: IntoIterator<Item = Arc<Unique>>>(&mut self, iter: I) {
        for unique in iter {
            self.insert(unique);
        }
    }
}

impl Extend<Unique> for UniqueMap {
    fn extend<I: IntoIterator<Item = Unique>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(Arc::new));
    }
}

impl FromIterator<Unique> for UniqueMap {
    fn from_iter<I: IntoIterator<Item = Unique>>(iter: I) -> Self {
        let mut map = UniqueMap::new();
        map.extend(iter);
        map
    }
}

impl FromIterator<Arc<Unique>> for UniqueMap {
    fn from_iter<I: IntoIterator<Item = Arc<Unique>>>(iter: I) -> Self {
        let mut map = UniqueMap::new();
        map.extend(iter);
        map
    }
}
