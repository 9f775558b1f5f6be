use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{seq::SliceRandom, thread_rng, Rng};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use travel_scout::cache::ResultCache;
use travel_scout::offer::{Offer, OfferKind};
use travel_scout::query::SearchQuery;

fn result_set(size: usize) -> Vec<Offer> {
    (0..size)
        .map(|i| Offer {
            price: Some(1000.0 + i as f64),
            ..Offer::new(OfferKind::Hotel, format!("Hotel {i}"), "bench")
        })
        .collect()
}

// Concurrent read/write load on the result cache with realistic query keys.
pub fn cache_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("result_cache");

    let destinations = ["Sylhet", "Chittagong", "Cox's Bazar", "Khulna", "Rajshahi"];
    let queries: Vec<SearchQuery> = destinations
        .iter()
        .flat_map(|to| {
            (1..29).map(move |day| {
                SearchQuery::new("Dhaka", to, &format!("2025-06-{day:02}"), None).unwrap()
            })
        })
        .collect();

    // Benchmark with different result-set sizes per entry
    for offers_per_entry in [1usize, 10, 50].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(offers_per_entry),
            offers_per_entry,
            |b, &offers_per_entry| {
                b.iter(|| {
                    let cache = Arc::new(ResultCache::new(Duration::from_secs(300)));
                    let data = result_set(offers_per_entry);

                    // Spawn multiple threads to simulate concurrent access
                    let mut handles = vec![];
                    for _ in 0..4 {
                        let cache = Arc::clone(&cache);
                        let queries = queries.clone();
                        let data = data.clone();

                        let handle = thread::spawn(move || {
                            let mut rng = thread_rng();

                            // Perform a mix of reads and writes
                            for _ in 0..250 {
                                let query = queries.choose(&mut rng).unwrap();

                                if rng.gen_bool(0.3) {
                                    // 30% writes
                                    cache.set("hotels", query, data.clone());
                                } else {
                                    // 70% reads
                                    let _ = cache.get("hotels", query);
                                }
                            }
                        });

                        handles.push(handle);
                    }

                    // Wait for all threads to complete
                    for handle in handles {
                        handle.join().unwrap();
                    }

                    // Return stats for verification
                    black_box(cache.stats())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, cache_benchmark);
criterion_main!(benches);
