use super::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn name_route(pattern: &str, name: &'static str) -> RouteNode<&'static str> {
    route(pattern, move |_, _| name).unwrap()
}

fn resolved(node: &RouteNode<&'static str>, path: &str) -> Option<&'static str> {
    resolve(node, path, &(), &Vars::new()).map(|r| r.result)
}

#[test]
fn test_route_requires_full_consumption() {
    let node = name_route("/foo", "foo");
    assert_eq!(resolved(&node, "/foo"), Some("foo"));
    assert_eq!(resolved(&node, "/foo/bar"), None);
    assert_eq!(resolved(&node, "/foobar"), None);
}

#[test]
fn test_route_variable_rejects_extra_segment() {
    let node = name_route("/foo/:bar", "bar");
    let found = resolve(&node, "/foo/baz", &(), &Vars::new()).unwrap();
    assert_eq!(found.vars, [("bar", "baz")].into_iter().collect::<Vars>());
    assert_eq!(resolved(&node, "/foo/baz/qux"), None);
}

#[test]
fn test_route_with_alternating_wildcard_matches_from_start() {
    let options = crate::pattern::MatcherOptions::builder()
        .wildcard("a+|b+")
        .build()
        .unwrap();
    let node: RouteNode<&'static str> = route_with("x*y", &options, |_, _| "xy").unwrap();
    assert_eq!(resolved(&node, "xaay"), Some("xy"));
    assert_eq!(resolved(&node, "zzzby"), None);
}

#[test]
fn test_optional_trailing_separator_in_pattern() {
    let node = name_route("/foo{/,}", "foo");
    assert_eq!(resolved(&node, "/foo"), Some("foo"));
    assert_eq!(resolved(&node, "/foo/"), Some("foo"));
    assert_eq!(resolved(&node, "/foo//"), None);
}

#[test]
fn test_first_match_wins() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let tree = index(vec![
        name_route("/same", "first"),
        route("/same", move |_, _| {
            counted.fetch_add(1, Ordering::SeqCst);
            "second"
        })
        .unwrap(),
    ]);
    assert_eq!(resolved(&tree, "/same"), Some("first"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_container_consumes_prefix() {
    let tree = partial_route(
        "/users/:id",
        vec![name_route("", "show"), name_route("/posts", "posts")],
    )
    .unwrap();
    let found = resolve(&tree, "/users/7/posts", &(), &Vars::new()).unwrap();
    assert_eq!(found.result, "posts");
    assert_eq!(found.vars.get("id"), Some("7"));
    assert_eq!(resolved(&tree, "/users/7"), Some("show"));
    assert_eq!(resolved(&tree, "/accounts/7"), None);
}

#[test]
fn test_siblings_see_container_input_vars() {
    let tree: RouteNode<Vars> = index(vec![
        partial_route(
            "/:a",
            vec![route("/never", |vars: &Vars, _: &()| vars.clone()).unwrap()],
        )
        .unwrap(),
        route("/:b", |vars: &Vars, _: &()| vars.clone()).unwrap(),
    ]);
    let found = resolve(&tree, "/x", &(), &Vars::new()).unwrap();
    assert_eq!(found.result.get("b"), Some("x"));
    assert!(!found.result.contains("a"));
}

#[test]
fn test_initial_vars_are_extended_not_mutated() {
    let tree = name_route("/:id", "item");
    let initial: Vars = [("tenant", "acme")].into_iter().collect();
    let found = resolve(&tree, "/9", &(), &initial).unwrap();
    assert_eq!(found.vars.get("tenant"), Some("acme"));
    assert_eq!(found.vars.get("id"), Some("9"));
    assert_eq!(initial.len(), 1);
}

#[test]
fn test_when_does_not_fall_through() {
    let tree = index(vec![when(
        |_, _| true,
        None,
        Some(name_route("/foo", "else")),
    )]);
    assert_eq!(resolved(&tree, "/foo"), None);

    let tree = when(|_, _| false, None, Some(name_route("/foo", "else")));
    assert_eq!(resolved(&tree, "/foo"), Some("else"));
}

#[test]
fn test_when_sees_vars_and_context() {
    let tree: RouteNode<&'static str, usize> = partial_route(
        "/:lang",
        vec![when(
            |vars: &Vars, limit: &usize| vars.get("lang").is_some_and(|l| l.len() <= *limit),
            Some(route("/home", |_, _| "home").unwrap()),
            None,
        )],
    )
    .unwrap();
    assert!(resolve(&tree, "/en/home", &2, &Vars::new()).is_some());
    assert!(resolve(&tree, "/eng/home", &2, &Vars::new()).is_none());
}

#[test]
fn test_meta_is_transparent() {
    let tree = meta(json!({ "title": "Home" }), name_route("/", "home"));
    assert_eq!(resolved(&tree, "/"), Some("home"));
    assert_eq!(tree.meta_values(), [&json!({ "title": "Home" })]);
}

#[test]
fn test_patterns_are_listed_depth_first() {
    let tree = index(vec![
        partial_route("/a", vec![name_route("/b", "b")]).unwrap(),
        when(|_, _| true, Some(name_route("/c", "c")), Some(name_route("/d", "d"))),
        meta(json!(null), name_route("/e", "e")),
    ]);
    assert_eq!(tree.patterns(), ["/a", "/b", "/c", "/d", "/e"]);
}

#[test]
fn test_invalid_pattern_fails_construction() {
    let err = route::<(), ()>("/{foo", |_, _| ()).unwrap_err();
    assert_eq!(
        err,
        crate::pattern::PatternError::UnterminatedAlternation { offset: 5 }
    );
}

#[test]
fn test_router_is_shared_across_threads() {
    let router = Router::new(index(vec![
        route("/items/:id", |vars: &Vars, _: &()| {
            vars.get("id").unwrap_or_default().to_string()
        })
        .unwrap(),
    ]));

    std::thread::scope(|scope| {
        for i in 0..4 {
            let router = &router;
            scope.spawn(move || {
                for j in 0..50 {
                    let id = format!("{i}-{j}");
                    let found = router.resolve(&format!("/items/{id}"), &()).unwrap();
                    assert_eq!(found.result, id);
                }
            });
        }
    });
}

#[test]
fn test_vars_equality_ignores_order() {
    let a: Vars = [("x", "1"), ("y", "2")].into_iter().collect();
    let b: Vars = [("y", "2"), ("x", "1")].into_iter().collect();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        json!({ "x": "1", "y": "2" })
    );
}

#[test]
fn test_vars_extended_overrides() {
    let base: Vars = [("x", "1")].into_iter().collect();
    let more: Vars = [("x", "2"), ("y", "3")].into_iter().collect();
    let merged = base.extended(&more);
    assert_eq!(merged.get("x"), Some("2"));
    assert_eq!(merged.get("y"), Some("3"));
    assert_eq!(base.get("x"), Some("1"));
}
