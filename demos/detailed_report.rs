use linkroute::{As4Attribute, MessageAttributes, RoutingRuleSetBuilder};

fn main() {
    let rules = RoutingRuleSetBuilder::new()
        .rule("court_backend", |r| {
            r.when("equals(FromPartyRole, 'court')").id("court").priority(20)
        })
        .rule("epo_backend", |r| {
            r.when("equals(ServiceName, 'EPO')").id("epo").priority(10)
        })
        .rule("e_backend", |r| r.when("startswith(ServiceName, 'E')").id("e"))
        .build()
        .expect("failed to build rule set");

    let msg = MessageAttributes::new()
        .set(As4Attribute::ServiceName, "ESM")
        .set(As4Attribute::FromPartyRole, "lawyer");

    let report = rules.select_detailed(&msg);
    println!("{report}");

    for id in report.evaluated() {
        println!("  evaluated: {id}");
    }
    println!("Link: {:?}", report.link_name());
    println!("Took: {:?}", report.duration());
}
