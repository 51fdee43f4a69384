use std::sync::Arc;
use std::thread;

use linkroute::{
    As4Attribute, BusinessDomainId, MessageAttributes, RoutingRule, RoutingRulePattern,
    RoutingRulesManager,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let manager = Arc::new(RoutingRulesManager::new());
    let lane = BusinessDomainId::from("lane1");
    manager
        .register_domain(lane.clone(), "DEFAULT_BACKEND")
        .expect("non-blank default backend");
    manager
        .add_rule(
            &lane,
            RoutingRule::new(
                "epo_backend",
                RoutingRulePattern::parse_valid("equals(ServiceName, 'EPO')")
                    .expect("valid pattern"),
            ),
        )
        .expect("registered domain");

    let services = ["EPO", "ESM", "EPO", "Other"];
    let handles: Vec<_> = services
        .iter()
        .enumerate()
        .map(|(i, &service)| {
            let manager = Arc::clone(&manager);
            let lane = lane.clone();
            let msg = MessageAttributes::new().set(As4Attribute::ServiceName, service);
            thread::spawn(move || {
                let link = manager.lookup_link(&lane, &msg);
                println!("Thread {i} ({service}): {link:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().expect("thread panicked");
    }
}
