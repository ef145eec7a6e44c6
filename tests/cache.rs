mod common;

use std::sync::atomic::Ordering;

use common::{MockCity, MockCiv, with_uniques, world_with};
use uniques::{GameContext, LocalUniqueCache, UniqueType};

fn scans_of_civ(civ: &MockCiv) -> usize {
    civ.scans.load(Ordering::Relaxed)
}

fn scans_of_city(city: &MockCity) -> usize {
    city.scans.load(Ordering::Relaxed)
}

fn setup() -> common::World {
    world_with(|s| {
        s.rome.uniques = with_uniques(
            "[+1 Gold]\n\
             [+2 Gold] <when at war>\n\
             [+1 Gold] <for every [Cities]>\n\
             [+1 Culture] <when not at war>\n\
             [+1 Food] [in capital]",
        );
        s.roma.uniques = with_uniques("[+3 Production]\n[+1 Science] <in [Coastal] cities>");
        s.antium.uniques = with_uniques("[+1 Faith]");
    })
}

#[test]
fn civ_scan_happens_once_per_type() {
    let w = setup();
    let ctx = w.rome_ctx();
    let mut cache = LocalUniqueCache::new();

    let first = cache
        .for_civ_get_matching_uniques(w.rome, UniqueType::Stats, &ctx)
        .count();
    let second = cache
        .for_civ_get_matching_uniques(w.rome, UniqueType::Stats, &ctx)
        .count();
    assert_eq!(first, 4);
    assert_eq!(second, 4);
    assert_eq!(scans_of_civ(w.rome), 1);
    assert_eq!(cache.len(), 1);

    let per_city = cache
        .for_civ_get_matching_uniques(w.rome, UniqueType::StatsPerCity, &ctx)
        .count();
    assert_eq!(per_city, 1);
    assert_eq!(scans_of_civ(w.rome), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn filtering_is_redone_for_each_context() {
    let w = setup();
    let mut cache = LocalUniqueCache::new();

    let at_war = w.rome_ctx();
    let ignoring = GameContext::ignore_multiplication_for_caching();
    assert_eq!(
        cache
            .for_civ_get_matching_uniques(w.rome, UniqueType::Stats, &at_war)
            .count(),
        4
    );
    assert_eq!(
        cache
            .for_civ_get_matching_uniques(w.rome, UniqueType::Stats, &ignoring)
            .count(),
        4
    );
    assert_eq!(scans_of_civ(w.rome), 1);
}

#[test]
fn city_results_come_before_civ_results() {
    let w = setup();
    let mut cache = LocalUniqueCache::new();

    let roma = w.roma_ctx();
    let texts: Vec<String> = cache
        .for_city_get_matching_uniques(w.roma, UniqueType::Stats, &roma)
        .map(|u| u.text().to_owned())
        .collect();
    assert_eq!(texts.len(), 5);
    assert_eq!(texts[0], "[+3 Production]");
    assert_eq!(texts[1], "[+1 Gold]");

    let antium = GameContext::for_city(w.antium);
    let count = cache
        .for_city_get_matching_uniques(w.antium, UniqueType::Stats, &antium)
        .count();
    assert_eq!(count, 5);

    // Both cities shared one civ scan.
    assert_eq!(scans_of_civ(w.rome), 1);
    assert_eq!(scans_of_city(w.roma), 1);
    assert_eq!(scans_of_city(w.antium), 1);
    assert_eq!(cache.len(), 3);
}

#[test]
fn city_conditionals_see_the_city() {
    let w = setup();
    let mut cache = LocalUniqueCache::new();
    // Roma is not coastal; the directive is carried by Roma but evaluated
    // against Antium's context.
    let antium = GameContext::for_city(w.antium);
    let science = cache
        .get(w.roma, UniqueType::Stats, &antium)
        .filter(|u| u.text().contains("Science"))
        .count();
    assert_eq!(science, 1);
    let roma = w.roma_ctx();
    let science = cache
        .get(w.roma, UniqueType::Stats, &roma)
        .filter(|u| u.text().contains("Science"))
        .count();
    assert_eq!(science, 0);
    assert_eq!(scans_of_city(w.roma), 1);
}

#[test]
fn disabled_cache_always_scans() {
    let w = setup();
    let ctx = w.rome_ctx();
    let mut cache = LocalUniqueCache::disabled();
    assert!(!cache.is_enabled());
    for _ in 0..3 {
        let _ = cache
            .for_civ_get_matching_uniques(w.rome, UniqueType::Stats, &ctx)
            .count();
    }
    assert_eq!(scans_of_civ(w.rome), 3);
    assert!(cache.is_empty());
}

#[test]
fn clearing_forces_a_rescan() {
    let w = setup();
    let ctx = w.rome_ctx();
    let mut cache = LocalUniqueCache::default();
    let _ = cache.get(w.rome, UniqueType::Stats, &ctx).count();
    cache.clear();
    assert!(cache.is_empty());
    let _ = cache.get(w.rome, UniqueType::Stats, &ctx).count();
    assert_eq!(scans_of_civ(w.rome), 2);
}

#[test]
fn timed_directives_wait_for_activation() {
    let w = world_with(|s| {
        s.rome.uniques = with_uniques("[+1 Gold]\n[+5 Gold] <for [3] turns>");
    });
    let ctx = w.rome_ctx();
    let mut cache = LocalUniqueCache::new();
    let found: Vec<_> = cache.get(w.rome, UniqueType::Stats, &ctx).collect();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].text(), "[+1 Gold]");
}
