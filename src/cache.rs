use std::collections::HashMap;
use std::sync::Arc;

use crate::game::{City, Civilization, UniqueOwner};
use crate::types::{GameContext, Unique, UniqueType};

type CacheKey = (&'static str, String, UniqueType);

/// Memoizes owner scans for the span of one multi-query operation.
///
/// What is cached is the unfiltered candidate list from
/// [`UniqueOwner::unique_candidates`], keyed by owner and type. Conditional
/// filtering and multiplication are redone on every call, since they depend
/// on the context. Create one per operation (e.g. "recompute yields for all
/// tiles this turn") and drop it afterwards; it does not notice later
/// changes to the owners. Not meant to be shared between threads.
///
/// # Example
///
/// ```ignore
/// let mut cache = LocalUniqueCache::new();
/// for tile in city.tiles() {
///     let ctx = GameContext::for_city(city).tile(tile);
///     let bonuses: Vec<_> = cache
///         .for_city_get_matching_uniques(city, UniqueType::StatsFromTiles, &ctx)
///         .collect();
/// }
/// ```
#[derive(Debug)]
pub struct LocalUniqueCache {
    cache: HashMap<CacheKey, Arc<[Arc<Unique>]>>,
    enabled: bool,
}

impl Default for LocalUniqueCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalUniqueCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enabled: true,
        }
    }

    /// A cache that never stores anything, for one-shot queries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            cache: HashMap::new(),
            enabled: false,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of memoized scans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        tracing::debug!(entries = self.cache.len(), "clearing unique cache");
        self.cache.clear();
    }

    fn candidates(&mut self, owner: &dyn UniqueOwner, unique_type: UniqueType) -> Arc<[Arc<Unique>]> {
        if !self.enabled {
            return owner.unique_candidates(unique_type).into();
        }
        let key = (owner.owner_kind(), owner.owner_id(), unique_type);
        if let Some(hit) = self.cache.get(&key) {
            tracing::trace!(kind = key.0, id = %key.1, %unique_type, "unique cache hit");
            return Arc::clone(hit);
        }
        tracing::trace!(kind = key.0, id = %key.1, %unique_type, "unique cache miss");
        let scanned: Arc<[Arc<Unique>]> = owner.unique_candidates(unique_type).into();
        self.cache.insert(key, Arc::clone(&scanned));
        scanned
    }

    /// Directives of `unique_type` carried by `owner` that apply in `ctx`,
    /// each repeated by its multiplier. Timed directives are skipped, as in
    /// [`UniqueMap::matching`](crate::UniqueMap::matching); they only take
    /// effect once activated as temporary uniques.
    pub fn get<'a, 'g>(
        &mut self,
        owner: &dyn UniqueOwner,
        unique_type: UniqueType,
        ctx: &'a GameContext<'g>,
    ) -> impl Iterator<Item = Arc<Unique>> + use<'a, 'g> {
        Candidates {
            items: self.candidates(owner, unique_type),
            next: 0,
        }
        .filter(|u| !u.is_timed_triggerable())
        .filter(move |u| u.satisfied_by(ctx))
        .flat_map(move |u| u.expand(ctx))
    }

    pub fn for_civ_get_matching_uniques<'a, 'g>(
        &mut self,
        civ: &dyn Civilization,
        unique_type: UniqueType,
        ctx: &'a GameContext<'g>,
    ) -> impl Iterator<Item = Arc<Unique>> + use<'a, 'g> {
        self.get(civ, unique_type, ctx)
    }

    /// The city's own directives followed by its civilization's. The civ
    /// scan is cached separately, so cities of one civ share it.
    pub fn for_city_get_matching_uniques<'a, 'g>(
        &mut self,
        city: &dyn City,
        unique_type: UniqueType,
        ctx: &'a GameContext<'g>,
    ) -> impl Iterator<Item = Arc<Unique>> + use<'a, 'g> {
        let local = self.get(city, unique_type, ctx);
        let civ = self.for_civ_get_matching_uniques(city.civ(), unique_type, ctx);
        local.chain(civ)
    }
}

/// Owning cursor over a cached scan.
struct Candidates {
    items: Arc<[Arc<Unique>]>,
    next: usize,
}

impl Iterator for Candidates {
    type Item = Arc<Unique>;

    fn next(&mut self) -> Option<Arc<Unique>> {
        let item = self.items.get(self.next).cloned()?;
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.items.len().saturating_sub(self.next);
        (left, Some(left))
    }
}
