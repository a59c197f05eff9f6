//! Component-pull modes: elements opt in through the lifecycle adapter

mod common;

use common::*;
use shade_dom::ShadowRootInit;
use shade_sync::StyleMode;

const MARKED: &str = r#"
    <html shadow-style-mode="component-pull-marked">
        <head>
            <style id="a">a {}</style>
            <style id="b" shadow-import>b {}</style>
        </head>
        <body><x-card id="card"></x-card></body>
    </html>
"#;

#[test]
fn test_marked_pull_scenario() {
    let (mut doc, sync) = setup(MARKED);
    assert_eq!(sync.mode(), Some(StyleMode::COMPONENT_PULL_MARKED));
    define(&mut doc, &sync, "x-card", Card);

    let card = by_id(&doc, "card");
    assert!(sync.is_tracked(card));
    assert_eq!(injected(&doc, &sync, card), vec!["b {}"]);

    let a = by_id(&doc, "a");
    doc.set_attribute(a, "shadow-import", "").unwrap();
    doc.perform_microtask_checkpoint();
    assert_eq!(injected(&doc, &sync, card), vec!["a {}", "b {}"]);

    doc.remove_attribute(a, "shadow-import").unwrap();
    doc.perform_microtask_checkpoint();
    assert_eq!(injected(&doc, &sync, card), vec!["b {}"]);
}

#[test]
fn test_pull_all_sources() {
    let (mut doc, sync) = setup(&MARKED.replace("component-pull-marked", "component-pull"));
    define(&mut doc, &sync, "x-card", Card);

    let card = by_id(&doc, "card");
    assert_eq!(injected(&doc, &sync, card), vec!["a {}", "b {}"]);
}

#[test]
fn test_injected_after_own_content_anchors() {
    let (mut doc, sync) = setup(MARKED);
    let card = by_id(&doc, "card");
    let root = doc.attach_shadow(card, ShadowRootInit::open()).unwrap();
    let own = doc.create_element("p");
    doc.append_child(root, own).unwrap();

    define(&mut doc, &sync, "x-card", Card);
    let children: Vec<_> = doc.tree().children(root).collect();
    // start anchor, clone of b, end anchor, then the component's own content
    assert_eq!(children.len(), 4);
    assert_eq!(children[3], own);
    assert_eq!(doc.tree().text_content(children[1]), "b {}");
}

#[test]
fn test_watcher_keeps_every_element_in_step() {
    let (mut doc, sync) = setup(&MARKED.replace("component-pull-marked", "component-pull"));
    define(&mut doc, &sync, "x-card", Card);
    let first = by_id(&doc, "card");
    let second = doc.create_element("x-card");
    let body = doc.body();
    doc.append_child(body, second).unwrap();

    let c = add_style(&mut doc, "c {}");
    let b = by_id(&doc, "b");
    doc.destroy(b).unwrap();
    let text = doc.tree().first_child(c).unwrap();
    doc.set_text(text, "c { color: red }").unwrap();
    doc.perform_microtask_checkpoint();

    let expected = vec!["a {}".to_string(), "c { color: red }".to_string()];
    assert_eq!(sync.snapshot().len(), 2);
    assert_eq!(injected(&doc, &sync, first), expected);
    assert_eq!(injected(&doc, &sync, second), expected);
}

#[test]
fn test_deferred_connect_waits_for_shadow_root() {
    let (mut doc, sync) = setup(MARKED);
    define(&mut doc, &sync, "x-card", LateCard);
    let card = by_id(&doc, "card");

    assert!(sync.is_tracked(card));
    assert!(doc.shadow_root(card).is_none());

    doc.perform_microtask_checkpoint();
    assert_eq!(injected(&doc, &sync, card), vec!["b {}"]);
}

#[test]
fn test_disconnect_in_same_turn_as_deferred_connect() {
    let (mut doc, sync) = setup(MARKED);
    define(&mut doc, &sync, "x-late", LateCard);

    let body = doc.body();
    let host = doc.create_element("x-late");
    doc.append_child(body, host).unwrap();
    doc.remove(host).unwrap();
    assert!(!sync.is_tracked(host));

    doc.perform_microtask_checkpoint();
    let root = doc.shadow_root(host).expect("late shadow root");
    assert!(sync.managed_nodes(&doc, host).is_empty());
    assert_eq!(doc.tree().children(root).count(), 2);
}

#[test]
fn test_connect_disconnect_reconnect_in_one_turn() {
    let (mut doc, sync) = setup(MARKED);
    define(&mut doc, &sync, "x-late", LateCard);

    let body = doc.body();
    let host = doc.create_element("x-late");
    doc.append_child(body, host).unwrap();
    doc.remove(host).unwrap();
    doc.append_child(body, host).unwrap();
    assert!(sync.is_tracked(host));

    doc.perform_microtask_checkpoint();
    assert_eq!(injected(&doc, &sync, host), vec!["b {}"]);
}

#[test]
fn test_later_disconnect_waits_for_second_deferred_sync() {
    let (mut doc, sync) = setup(MARKED);
    define(&mut doc, &sync, "x-late", LateCard);

    let body = doc.body();
    let host = doc.create_element("x-late");
    doc.append_child(body, host).unwrap();
    doc.remove(host).unwrap();
    // Runs after the first deferred sync, while the second is still queued
    doc.queue_microtask(move |doc| {
        doc.remove(host).unwrap();
    });
    doc.append_child(body, host).unwrap();
    doc.attach_shadow(host, ShadowRootInit::open()).unwrap();

    doc.perform_microtask_checkpoint();
    assert!(!sync.is_tracked(host));
    assert!(injected(&doc, &sync, host).is_empty());
    let root = doc.shadow_root(host).unwrap();
    assert_eq!(doc.tree().children(root).count(), 2);
}

#[test]
fn test_disconnect_clears_immediately() {
    let (mut doc, sync) = setup(MARKED);
    define(&mut doc, &sync, "x-card", Card);
    let card = by_id(&doc, "card");
    assert_eq!(injected(&doc, &sync, card).len(), 1);

    doc.remove(card).unwrap();
    assert!(!sync.is_tracked(card));
    assert!(sync.managed_nodes(&doc, card).is_empty());

    // No longer updated
    let a = by_id(&doc, "a");
    doc.set_attribute(a, "shadow-import", "").unwrap();
    doc.perform_microtask_checkpoint();
    assert!(sync.managed_nodes(&doc, card).is_empty());
}

#[test]
fn test_reconnect_resumes() {
    let (mut doc, sync) = setup(MARKED);
    define(&mut doc, &sync, "x-card", Card);
    let card = by_id(&doc, "card");
    let body = doc.body();

    doc.remove(card).unwrap();
    doc.append_child(body, card).unwrap();
    assert!(sync.is_tracked(card));
    assert_eq!(injected(&doc, &sync, card), vec!["b {}"]);
}

#[test]
fn test_failing_hook_still_tracked() {
    let (mut doc, sync) = setup(MARKED);
    define(&mut doc, &sync, "x-card", Broken);

    let card = by_id(&doc, "card");
    assert!(sync.is_tracked(card));
    assert_eq!(injected(&doc, &sync, card), vec!["b {}"]);
}

#[test]
fn test_element_without_shadow_root_is_skipped() {
    let (mut doc, sync) = setup(MARKED);
    define(&mut doc, &sync, "x-card", Bare);
    let card = by_id(&doc, "card");
    doc.perform_microtask_checkpoint();

    // Mutations keep working while the element has nothing to inject into
    add_style(&mut doc, "c {}");
    doc.perform_microtask_checkpoint();
    assert!(sync.is_tracked(card));
    assert!(doc.shadow_root(card).is_none());
}

#[test]
fn test_pull_ignores_foreign_shadow_roots() {
    let (mut doc, sync) = setup(MARKED);
    let div = doc.create_element("div");
    let root = doc.attach_shadow(div, ShadowRootInit::open()).unwrap();
    doc.perform_microtask_checkpoint();

    assert!(!sync.is_tracked(div));
    assert_eq!(doc.tree().children(root).count(), 0);
}
