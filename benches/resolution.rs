//! Benchmarks for provider resolution across the three scopes and for
//! registration-time cycle validation over dependency chains.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use ignis_core::container::{Container, ProviderDescriptor, RequestScope};

#[derive(Debug)]
struct Config {
    url: String,
}

#[derive(Debug)]
struct Pool {
    config: Arc<Config>,
}

#[derive(Debug)]
struct Repository {
    pool: Arc<Pool>,
}

#[derive(Debug)]
struct Session {
    tag: u64,
}

fn build_container() -> Container {
    let mut container = Container::new();
    container
        .register(
            ProviderDescriptor::singleton::<Config>()
                .with_factory(|_| {
                    Ok(Config {
                        url: "postgres://localhost/bench".to_string(),
                    })
                })
                .build()
                .unwrap(),
        )
        .unwrap();
    container
        .register(
            ProviderDescriptor::singleton::<Pool>()
                .depends_on::<Config>()
                .with_factory(|cx| {
                    Ok(Pool {
                        config: cx.get::<Config>()?,
                    })
                })
                .build()
                .unwrap(),
        )
        .unwrap();
    container
        .register(
            ProviderDescriptor::transient::<Repository>()
                .depends_on::<Pool>()
                .with_factory(|cx| {
                    Ok(Repository {
                        pool: cx.get::<Pool>()?,
                    })
                })
                .build()
                .unwrap(),
        )
        .unwrap();
    container
        .register(
            ProviderDescriptor::request_scoped::<Session>()
                .with_factory(|_| Ok(Session { tag: 42 }))
                .build()
                .unwrap(),
        )
        .unwrap();
    container
}

fn benchmark_resolution(c: &mut Criterion) {
    let container = build_container();

    // Warm the singleton slots so the steady-state read path is measured
    let _ = container.resolve::<Pool>().unwrap();

    let mut group = c.benchmark_group("resolution");

    group.bench_function("singleton_cached", |b| {
        b.iter(|| black_box(container.resolve::<Pool>().unwrap()))
    });

    group.bench_function("transient_with_singleton_dependency", |b| {
        b.iter(|| black_box(container.resolve::<Repository>().unwrap()))
    });

    group.bench_function("request_scoped_fresh_scope", |b| {
        b.iter(|| {
            let scope = RequestScope::new();
            black_box(container.resolve_scoped::<Session>(&scope).unwrap())
        })
    });

    group.bench_function("request_scoped_cached", |b| {
        let scope = RequestScope::new();
        let _ = container.resolve_scoped::<Session>(&scope).unwrap();
        b.iter(|| black_box(container.resolve_scoped::<Session>(&scope).unwrap()))
    });

    group.finish();
}

fn benchmark_concurrent_singleton(c: &mut Criterion) {
    let container = Arc::new(build_container());
    let _ = container.resolve::<Pool>().unwrap();

    c.bench_function("singleton_8_threads", |b| {
        b.iter(|| {
            std::thread::scope(|s| {
                for _ in 0..8 {
                    let container = &container;
                    s.spawn(move || black_box(container.resolve::<Pool>().unwrap()));
                }
            })
        })
    });
}

fn benchmark_registration_validation(c: &mut Criterion) {
    // Registration cost includes the depth-first cycle walk over the
    // declared dependency chain Config <- Pool <- Repository
    c.bench_function("register_four_providers", |b| {
        b.iter(|| black_box(build_container().service_count()))
    });
}

criterion_group!(
    benches,
    benchmark_resolution,
    benchmark_concurrent_singleton,
    benchmark_registration_validation
);
criterion_main!(benches);
