use serde_json::json;
use tinyrouter::router::{index, meta, partial_route, route, when, RouteNode, Router};
use tinyrouter::Vars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

type Zoo = RouteNode<&'static str, Verb>;

fn on(verb: Verb, pattern: &str, handler: &'static str) -> Zoo {
    when(
        move |_, method: &Verb| *method == verb,
        Some(route(pattern, move |_, _| handler).expect("valid pattern")),
        None,
    )
}

fn zoo_router() -> Router<&'static str, Verb> {
    Router::new(index(vec![
        on(Verb::Get, "/", "root_handler"),
        on(Verb::Get, "/zoo/animals", "get_animals"),
        on(Verb::Post, "/zoo/animals", "create_animal"),
        on(Verb::Get, "/zoo/animals/:id", "get_animal"),
        on(Verb::Put, "/zoo/animals/:id", "update_animal"),
        on(Verb::Patch, "/zoo/animals/:id", "patch_animal"),
        on(Verb::Delete, "/zoo/animals/:id", "delete_animal"),
        on(Verb::Head, "/zoo/health", "health_check"),
        on(Verb::Options, "/zoo/health", "supported_ops"),
    ]))
}

fn assert_route_match(router: &Router<&'static str, Verb>, verb: Verb, path: &str, expected: &str) {
    match router.resolve(path, &verb) {
        Some(resolution) => {
            println!("✅ {:?} {} → {}", verb, path, resolution.result);
            assert_eq!(
                resolution.result, expected,
                "Handler mismatch for {:?} {}: expected '{}', got '{}'",
                verb, path, expected, resolution.result
            );
        }
        None => {
            println!("❌ {:?} {} → no match", verb, path);
            assert_eq!(expected, "<none>", "Expected route to match for {:?} {}", verb, path);
        }
    }
}

#[test]
fn test_router_get_animals() {
    let router = zoo_router();
    assert_route_match(&router, Verb::Get, "/zoo/animals", "get_animals");
}

#[test]
fn test_router_post_animals() {
    let router = zoo_router();
    assert_route_match(&router, Verb::Post, "/zoo/animals", "create_animal");
}

#[test]
fn test_router_get_animal_by_id() {
    let router = zoo_router();
    assert_route_match(&router, Verb::Get, "/zoo/animals/123", "get_animal");

    let resolution = router.resolve("/zoo/animals/123", &Verb::Get).unwrap();
    assert_eq!(resolution.vars.get("id"), Some("123"));
}

#[test]
fn test_router_put_patch_delete_animal() {
    let router = zoo_router();
    assert_route_match(&router, Verb::Put, "/zoo/animals/123", "update_animal");
    assert_route_match(&router, Verb::Patch, "/zoo/animals/123", "patch_animal");
    assert_route_match(&router, Verb::Delete, "/zoo/animals/123", "delete_animal");
}

#[test]
fn test_router_head_and_options_health() {
    let router = zoo_router();
    assert_route_match(&router, Verb::Head, "/zoo/health", "health_check");
    assert_route_match(&router, Verb::Options, "/zoo/health", "supported_ops");
}

#[test]
fn test_router_verb_without_route() {
    let router = zoo_router();
    assert_route_match(&router, Verb::Delete, "/zoo/animals", "<none>");
    assert_route_match(&router, Verb::Get, "/zoo/health", "<none>");
}

#[test]
fn test_router_unknown_path() {
    let router = zoo_router();
    assert_route_match(&router, Verb::Get, "/unknown", "<none>");
    assert_route_match(&router, Verb::Get, "/zoo/animals/123/toys", "<none>");
}

#[test]
fn test_router_root_path() {
    let router = zoo_router();
    assert_route_match(&router, Verb::Get, "/", "root_handler");
}

#[test]
fn test_router_is_case_insensitive_by_default() {
    let router = zoo_router();
    assert_route_match(&router, Verb::Get, "/ZOO/Animals", "get_animals");
}

#[test]
fn test_nested_containers_accumulate_vars() {
    let toys: Zoo = partial_route(
        "/toys/:toy_id",
        vec![
            route("{/,}", |_, _| "animal_toy").unwrap(),
            route("/parts/:part", |_, _| "toy_part").unwrap(),
        ],
    )
    .unwrap();
    let animal: Zoo = partial_route(
        r"/animals/:id(\d+)",
        vec![route("{/,}", |_, _| "get_animal").unwrap(), toys],
    )
    .unwrap();
    let router = Router::new(partial_route("/zoo", vec![animal]).unwrap());

    let resolution = router.resolve("/zoo/animals/7/toys/ball/parts/bell", &Verb::Get).unwrap();
    assert_eq!(resolution.result, "toy_part");
    let expected: Vars = [("id", "7"), ("toy_id", "ball"), ("part", "bell")]
        .into_iter()
        .collect();
    assert_eq!(resolution.vars, expected);

    assert_route_match(&router, Verb::Get, "/zoo/animals/7/", "get_animal");
    assert_route_match(&router, Verb::Get, "/zoo/animals/7/toys/ball", "animal_toy");
    assert_route_match(&router, Verb::Get, "/zoo/animals/seven", "<none>");
}

#[test]
fn test_guard_reads_vars_bound_by_container() {
    let router: Router<&'static str, Verb> = Router::new(
        partial_route(
            "/:lang{en,de}",
            vec![when(
                |vars, _| vars.get("lang") == Some("de"),
                Some(route("/hilfe", |_, _| "hilfe").unwrap()),
                Some(route("/help", |_, _| "help").unwrap()),
            )],
        )
        .unwrap(),
    );

    assert_route_match(&router, Verb::Get, "/de/hilfe", "hilfe");
    assert_route_match(&router, Verb::Get, "/en/help", "help");
    assert_route_match(&router, Verb::Get, "/de/help", "<none>");
    assert_route_match(&router, Verb::Get, "/fr/help", "<none>");
}

#[test]
fn test_meta_is_transparent_and_collectable() {
    let tree: Zoo = index(vec![
        meta(
            json!({ "auth": "admin" }),
            partial_route("/admin", vec![route("/stats", |_, _| "stats").unwrap()]).unwrap(),
        ),
        meta(json!({ "auth": "none" }), route("/public", |_, _| "public").unwrap()),
    ]);

    assert_eq!(tree.patterns(), ["/admin", "/stats", "/public"]);
    assert_eq!(
        tree.meta_values(),
        [&json!({ "auth": "admin" }), &json!({ "auth": "none" })]
    );

    let router = Router::new(tree);
    assert_route_match(&router, Verb::Get, "/admin/stats", "stats");
    assert_route_match(&router, Verb::Get, "/public", "public");
    assert_eq!(router.patterns(), ["/admin", "/stats", "/public"]);
}

#[test]
fn test_resolve_with_initial_vars() {
    let router: Router<String, Verb> = Router::new(
        route("/:page", |vars, _| {
            format!("{}:{}", vars.get("tenant").unwrap_or("-"), vars.get("page").unwrap_or("-"))
        })
        .unwrap(),
    );
    let initial: Vars = [("tenant", "acme")].into_iter().collect();

    let resolution = router.resolve_with("/about", &Verb::Get, &initial).unwrap();
    assert_eq!(resolution.result, "acme:about");
    assert_eq!(initial.len(), 1);
    assert_eq!(router.resolve("/about", &Verb::Get).unwrap().result, "-:about");
}
