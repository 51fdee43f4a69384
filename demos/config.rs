use linkroute::config::RoutingConfig;
use linkroute::{As4Attribute, BusinessDomainId, MessageAttributes};

const CONFIG: &str = r#"
domains:
  lane1:
    default-backend-name: DEFAULT_BACKEND
    backend-rules:
      epo:
        link-name: epo_backend
        match-clause: "equals(ServiceName, 'EPO')"
        priority: 10
      contest:
        link-name: test_backend
        match-clause: "startswith(Action, 'ConTest')"
      broken:
        link-name: broken_backend
        match-clause: "equals(Action 'x')"
"#;

fn main() -> Result<(), linkroute::LinkrouteError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // A path argument loads that file instead of the built-in document
    let config = match std::env::args().nth(1) {
        Some(path) => RoutingConfig::load(path)?,
        None => RoutingConfig::from_yaml(CONFIG)?,
    };

    let (manager, rejected) = config.build_manager()?;
    for rule in &rejected {
        println!("rejected {}: {}", rule.id, rule.error);
    }

    let lane = BusinessDomainId::from("lane1");
    for action in ["ConTest_Form", "Submit"] {
        let msg = MessageAttributes::new().set(As4Attribute::Action, action);
        println!("{action} -> {:?}", manager.lookup_link(&lane, &msg));
    }
    Ok(())
}
