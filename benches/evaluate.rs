use criterion::{black_box, criterion_group, criterion_main, Criterion};
use linkroute::{As4Attribute, MessageAttributes, RoutingRulePattern, RoutingRuleSet, RoutingRuleSetBuilder};

/// Build a rule set with `n` rules where only the lowest-priority one
/// matches, so selection has to scan every rule.
fn build_ruleset(n: usize) -> (RoutingRuleSet, MessageAttributes) {
    let mut builder = RoutingRuleSetBuilder::new();
    for i in 0..n {
        let pattern = format!(
            "&(equals(ServiceName, 'service_{i}'), startswith(FromPartyId, 'urn:party:'))"
        );
        let priority = i32::try_from(n - i).unwrap_or(i32::MAX);
        builder = builder.rule(&format!("link_{i}"), move |r| {
            r.when(&pattern).priority(priority)
        });
    }
    builder = builder.rule("fallback", |r| {
        r.when("startswith(FromPartyId, 'urn:')").priority(-1)
    });

    let msg = MessageAttributes::new()
        .set(As4Attribute::ServiceName, "unrouted")
        .set(As4Attribute::FromPartyId, "urn:party:42");
    (builder.build().unwrap(), msg)
}

fn nested_pattern(depth: usize) -> String {
    let mut text = String::from("equals(Action, 'submit')");
    for i in 0..depth {
        text = format!("|(not({text}), startswith(ServiceType, 'urn:{i}'))");
    }
    text
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");

    for &n in &[5, 20, 50] {
        let (ruleset, msg) = build_ruleset(n);
        group.bench_function(&format!("{n}_rules"), |b| {
            b.iter(|| ruleset.select(black_box(&msg)));
        });
        group.bench_function(&format!("{n}_rules_detailed"), |b| {
            b.iter(|| ruleset.select_detailed(black_box(&msg)));
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for &depth in &[1, 8, 32] {
        let text = nested_pattern(depth);
        group.bench_function(&format!("depth_{depth}"), |b| {
            b.iter(|| RoutingRulePattern::new(black_box(&text)).unwrap());
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for &n in &[5, 20, 50] {
        group.bench_function(&format!("{n}_rules"), |b| {
            b.iter(|| black_box(build_ruleset(n)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select, bench_parse, bench_build);
criterion_main!(benches);
