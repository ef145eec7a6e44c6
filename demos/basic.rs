use tracing_subscriber::EnvFilter;
use uniques::validate::check_uniques;
use uniques::{Expression, GameContext, Ruleset, Stat, Unique, UniqueMap, UniqueTarget, UniqueType};

const TRADITION: &str = "\
# Tradition opener
[+3 Culture] [in capital]
[+1 Gold] <when number of [Cities] is less than [3]>
[+2 Food] <for every [2]>
[+1 Production] <with [100]% chance>
[+5 Science] <after discovering [Time Travel]>
Gain [50] [Faith] <upon adopting [Tradition]>
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let map = UniqueMap::from_text(TRADITION);
    println!("{} uniques loaded", map.len());

    // No game state: only conditionals that need none can hold.
    let ctx = GameContext::empty();
    for unique in map.matching(UniqueType::Stats, &ctx) {
        println!("  active: {unique}");
    }
    let food: f32 = map
        .matching(UniqueType::Stats, &ctx)
        .map(|u| u.stats()[Stat::Food])
        .sum();
    println!("Food from matching uniques: {food}");

    let preview = GameContext::ignore_conditionals();
    println!(
        "Ignoring conditionals: {} stat uniques",
        map.matching(UniqueType::Stats, &preview).count()
    );

    match Expression::parse("(2 + 3) * -4 ^ 2 % 7") {
        Ok(expr) => println!("{expr:?} = {:?}", expr.evaluate(&ctx)),
        Err(err) => println!("expression error: {err}"),
    }

    let ruleset = Ruleset::builder()
        .era("Ancient era")
        .tech("Writing", "Ancient era")
        .policy_branch("Tradition")
        .resource("Faith")
        .build();
    let list = Unique::parse_list(TRADITION);
    let findings = check_uniques(&list, UniqueTarget::Policy, &ruleset);
    if findings.is_empty() {
        println!("No ruleset problems.");
    }
    for finding in &findings {
        println!("  {finding}");
    }
}
