use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tinyrouter::pattern::{compile_pattern, parse, MatcherOptions};
use tinyrouter::router::{index, partial_route, route, Router};

const ZOO_PATTERNS: &[(&str, &str)] = &[
    ("/", "root_handler"),
    ("/zoo/animals", "get_animals"),
    ("/zoo/animals/:id", "get_animal"),
    ("/zoo/animals/:id/toys/:toy_id", "animal_toy"),
    (
        "/zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id",
        "habitat_section",
    ),
    (
        "/inventory/:warehouse_id/feeds/:feed_id/items/:item_id/batches/:batch_id",
        "post_item_batch",
    ),
    ("/complex/:a/:b/:c/:d/:e/:f/:g/:h/:i", "complex_many_params"),
    ("/zoo/health", "health_check"),
];

fn zoo_router() -> Router<&'static str> {
    let routes = ZOO_PATTERNS
        .iter()
        .map(|&(pattern, handler)| route(pattern, move |_, _| handler).expect("valid pattern"))
        .collect();
    Router::new(index(routes))
}

fn nested_router() -> Router<&'static str> {
    let animal = partial_route(
        "/animals/:id",
        vec![
            route("{/,}", |_, _| "get_animal").expect("valid pattern"),
            route("/toys/:toy_id", |_, _| "animal_toy").expect("valid pattern"),
        ],
    )
    .expect("valid pattern");
    let zoo = partial_route(
        "/zoo",
        vec![route("/animals", |_, _| "get_animals").expect("valid pattern"), animal],
    )
    .expect("valid pattern");
    Router::new(index(vec![route("/", |_, _| "root_handler").expect("valid pattern"), zoo]))
}

fn bench_route_throughput(c: &mut Criterion) {
    let router = zoo_router();
    c.bench_function("route_match", |b| {
        let test_paths = [
            "/zoo/animals/123",
            "/zoo/animals/123/toys/456",
            "/zoo/cats/animals/123/habitats/88/sections/5",
            "/inventory/1/feeds/2/items/3/batches/4",
            "/complex/1/2/3/4/5/6/7/8/9",
        ];
        b.iter(|| {
            for path in test_paths.iter() {
                let res = router.resolve(path, &());
                black_box(&res);
            }
        })
    });

    let router = nested_router();
    c.bench_function("nested_route_match", |b| {
        let test_paths = ["/zoo/animals", "/zoo/animals/123/", "/zoo/animals/123/toys/456"];
        b.iter(|| {
            for path in test_paths.iter() {
                let res = router.resolve(path, &());
                black_box(&res);
            }
        })
    });
}

fn bench_pattern_compile(c: &mut Criterion) {
    let options = MatcherOptions::default();
    let pattern = r"/zoo/{:category,all}/animals/:id(\d+)/{toys/:toy_id,habitats/**}";
    c.bench_function("pattern_parse", |b| {
        b.iter(|| black_box(parse(black_box(pattern))))
    });
    c.bench_function("pattern_compile", |b| {
        b.iter(|| black_box(compile_pattern(black_box(pattern), &options)))
    });
}

criterion_group!(benches, bench_route_throughput, bench_pattern_compile);
criterion_main!(benches);
