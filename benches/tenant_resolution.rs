//! Benchmarks for tenant option resolution and tenant-scoped lookups.
//!
//! Resolution runs once per request, so it should stay far below the cost
//! of the lookup it precedes. Run with `cargo bench --bench tenant_resolution`.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tenant_identity_store::document::InMemoryConnector;
use tenant_identity_store::multi_tenant::template;
use tenant_identity_store::{
    MultiTenancyHandling, MultiTenancyOptions, StoreOptions, StoreProvider, StoreProviderOptions,
    TenancyStrategy, User, UserEmailStore, UserStore, UserStoreProvider,
};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

const HANDLINGS: [MultiTenancyHandling; 4] = [
    MultiTenancyHandling::None,
    MultiTenancyHandling::TenantField,
    MultiTenancyHandling::TenantDatabase,
    MultiTenancyHandling::TenantCollection,
];

fn bench_resolve(c: &mut Criterion) {
    let base = StoreOptions::new("memory://bench", "identity");
    let mut group = c.benchmark_group("resolve");

    for handling in HANDLINGS {
        let strategy = MultiTenancyOptions::new(handling);
        group.bench_with_input(
            BenchmarkId::from_parameter(handling),
            &strategy,
            |b, strategy| b.iter(|| strategy.resolve(black_box(&base), black_box("tenant-42"))),
        );
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    c.bench_function("render_default_database_format", |b| {
        b.iter(|| {
            template::render(
                black_box("{tenant}_{database}"),
                &[(template::TENANT, "tenant-42"), (template::DATABASE, "identity")],
            )
        })
    });
}

fn bench_tenant_lookup(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let options = StoreProviderOptions::new(StoreOptions::new("memory://bench", "identity"))
        .with_multi_tenancy(MultiTenancyOptions::new(MultiTenancyHandling::TenantField));
    let provider = UserStoreProvider::new(options, InMemoryConnector::new()).expect("provider");
    let cancel = CancellationToken::new();

    runtime.block_on(async {
        for tenant in 0..10 {
            let store = provider.get_store(&format!("tenant-{}", tenant)).expect("store");
            for i in 0..100 {
                let mut user = User::new(format!("user{}", i));
                user.normalized_email = Some(format!("USER{}@EXAMPLE.COM", i));
                store.create(&mut user, &cancel).await.expect("create");
            }
        }
    });

    c.bench_function("get_store_and_find_by_email", |b| {
        b.to_async(&runtime).iter(|| async {
            let store = provider.get_store("tenant-7").expect("store");
            store
                .find_by_email(black_box("USER99@EXAMPLE.COM"), &cancel)
                .await
                .expect("lookup")
        })
    });
}

criterion_group!(benches, bench_resolve, bench_render, bench_tenant_lookup);
criterion_main!(benches);
