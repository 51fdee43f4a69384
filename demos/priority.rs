use linkroute::{
    As4Attribute, MessageAttributes, RoutingRuleSetBuilder, HIGH_PRIORITY, LOW_PRIORITY,
};

fn main() {
    // Higher priority numbers are checked first, except that HIGH_PRIORITY
    // (-2000) always goes first and LOW_PRIORITY (2000) always goes last.
    // Equal priorities keep their definition order.
    let rules = RoutingRuleSetBuilder::new()
        .rule("archive", |r| {
            r.when("startswith(ServiceName, 'E')").priority(LOW_PRIORITY)
        })
        .rule("epo_backend", |r| r.when("equals(ServiceName, 'EPO')"))
        .rule("urgent_backend", |r| {
            r.when("&(equals(ServiceName, 'EPO'), equals(FromPartyRole, 'court'))")
                .priority(HIGH_PRIORITY)
        })
        .build()
        .expect("failed to build rule set");

    println!("Evaluation order:");
    for (id, priority) in rules.priority_order() {
        println!("  {id}: {priority}");
    }

    let messages = [
        MessageAttributes::new()
            .set(As4Attribute::ServiceName, "EPO")
            .set(As4Attribute::FromPartyRole, "court"),
        MessageAttributes::new().set(As4Attribute::ServiceName, "EPO"),
        MessageAttributes::new().set(As4Attribute::ServiceName, "ESM"),
        MessageAttributes::new().set(As4Attribute::ServiceName, "Other"),
    ];

    for msg in &messages {
        let link = rules.select(msg).map_or("<default>", |r| r.link_name());
        println!("{:?} -> {link}", msg.get(As4Attribute::ServiceName));
    }
}
