use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use async_trait::async_trait;
use rocketshoes_cart::models::{
    Cart, CartLineItem, CartSnapshot, LookupResult, Product, ProductId, StockRecord,
    UpdateProductAmount,
};
use rocketshoes_cart::repositories::{InMemoryStore, ProductCatalog, StockService};
use rocketshoes_cart::services::{BufferedNotifier, CartStore, DEFAULT_CART_KEY};

/// Store API stand-in that answers instantly with plenty of stock
struct MockStoreApi;

#[async_trait]
impl StockService for MockStoreApi {
    async fn get_stock(&self, product_id: ProductId) -> LookupResult<StockRecord> {
        Ok(StockRecord::new(product_id, u32::MAX))
    }
}

#[async_trait]
impl ProductCatalog for MockStoreApi {
    async fn get_product(&self, product_id: ProductId) -> LookupResult<Product> {
        Ok(Product {
            id: product_id,
            title: format!("Benchmark Shoe {}", product_id),
            image: format!("shoe-{}.jpg", product_id),
            price: Decimal::new(17990, 2),
        })
    }
}

fn cart_of(size: usize) -> Cart {
    (0..size as ProductId).fold(Cart::new(), |cart, id| {
        cart.with_appended(CartLineItem {
            id,
            title: format!("Benchmark Shoe {}", id),
            image: format!("shoe-{}.jpg", id),
            price: Decimal::new(17990, 2),
            amount: 2,
        })
    })
}

fn store_with(size: usize) -> CartStore {
    let raw = CartSnapshot::capture(&cart_of(size))
        .encode()
        .expect("Failed to encode snapshot");
    let api = Arc::new(MockStoreApi);
    CartStore::load(
        api.clone(),
        api,
        Arc::new(InMemoryStore::with_value(DEFAULT_CART_KEY, &raw)),
        Arc::new(BufferedNotifier::new(8)),
        DEFAULT_CART_KEY,
    )
    .expect("Failed to load cart store")
}

fn bench_cart_mutations(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("cart_mutations");
    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));

    for size in [1usize, 10, 50].iter() {
        let store = store_with(*size);

        group.bench_with_input(BenchmarkId::new("add_existing", size), size, |b, _| {
            b.iter(|| {
                rt.block_on(async {
                    let cart = store.add_product(black_box(0)).await.unwrap();
                    black_box(cart)
                })
            })
        });

        group.bench_with_input(BenchmarkId::new("update_amount", size), size, |b, _| {
            b.iter(|| {
                rt.block_on(async {
                    let cart = store
                        .update_product_amount(UpdateProductAmount {
                            product_id: black_box(0),
                            amount: 3,
                        })
                        .await
                        .unwrap();
                    black_box(cart)
                })
            })
        });
    }

    group.finish();
}

fn bench_snapshot_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_codec");

    for size in [1usize, 10, 50].iter() {
        let cart = cart_of(*size);
        let raw = CartSnapshot::capture(&cart).encode().unwrap();

        group.bench_with_input(BenchmarkId::new("encode", size), &cart, |b, cart| {
            b.iter(|| black_box(CartSnapshot::capture(cart).encode().unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("decode", size), &raw, |b, raw| {
            b.iter(|| black_box(CartSnapshot::decode(raw).unwrap()))
        });
    }

    group.finish();
}

fn bench_cart_summary(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let store = store_with(50);

    c.bench_function("cart_summary_50_items", |b| {
        b.iter(|| rt.block_on(async { black_box(store.summary().await) }))
    });
}

criterion_group!(
    benches,
    bench_cart_mutations,
    bench_snapshot_codec,
    bench_cart_summary
);
criterion_main!(benches);
