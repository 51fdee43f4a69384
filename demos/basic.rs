use linkroute::{As4Attribute, MessageAttributes, RoutingRulePattern, RoutingRuleSetBuilder};

fn main() {
    // Define rules
    let rules = RoutingRuleSetBuilder::new()
        .rule("epo_backend", |r| r.when("equals(ServiceName, 'EPO')"))
        .rule("test_backend", |r| {
            r.when("&(equals(Action, 'ConTest_Form'), startswith(ServiceType, 'urn:e-codex:'))")
        })
        .build()
        .expect("failed to build rule set");

    println!("{rules}");

    // Route a message
    let msg = MessageAttributes::new()
        .set(As4Attribute::Action, "ConTest_Form")
        .set(As4Attribute::ServiceType, "urn:e-codex:services:");

    match rules.select(&msg) {
        Some(rule) => println!("Route to: {}", rule.link_name()),
        None => println!("No rule matched."),
    }

    // A broken pattern keeps its errors instead of failing
    let broken = RoutingRulePattern::new("equals(ServiceName 'EPO')").expect("pattern is not blank");
    for error in broken.parse_errors() {
        println!("{error}");
        println!("{}", error.render(broken.pattern()));
    }
}
