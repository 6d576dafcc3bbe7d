//! # Medley Performance Benchmarks
//!
//! Benchmarks for the hot paths of playlist generation: the strategy
//! scorers, the single-strategy builders, the sequence optimizer, and the
//! full end-to-end engine call.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run a specific group
//! cargo bench scoring
//! cargo bench builders
//! cargo bench optimizer
//! ```

use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use medley::builder::{build_history, build_mood, build_similarity};
use medley::engine::{CatalogProvider, GenerateRequest, PlaylistEngine, ProfileProvider};
use medley::model::{
    Algorithm, ArtistRef, AudioFeatures, FeatureDimension, PlayStats, Track, UserProfile,
};
use medley::optimizer::{optimize_sequence, transition_score};
use medley::rules::GenerationRules;
use medley::scoring::{discovery_score, history_score, similarity_score, SimilarityContext};
use std::hint::black_box;

/// Deterministic synthetic catalog with varied features, popularity and
/// listening stats. No randomness, so runs compare across revisions.
fn synthetic_catalog(count: usize) -> Vec<Track> {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let phase = (i % 100) as f64 / 100.0;
            Track {
                id: format!("t{i}"),
                title: format!("Track {i}"),
                artist: ArtistRef {
                    id: Some(format!("a{}", i % (count / 4).max(1))),
                    name: format!("Artist {}", i % (count / 4).max(1)),
                    genres: vec![
                        ["indie", "rock", "electronic", "jazz"][i % 4].to_string(),
                    ],
                },
                duration_ms: 180_000 + (i as u64 % 60) * 1_000,
                audio_features: Some(AudioFeatures {
                    tempo: Some(80.0 + 80.0 * phase),
                    ..AudioFeatures::from_pairs([
                        (FeatureDimension::Energy, phase),
                        (FeatureDimension::Valence, 1.0 - phase),
                        (FeatureDimension::Danceability, (phase * 2.0) % 1.0),
                    ])
                }),
                popularity: Some(phase),
                stats: PlayStats {
                    play_count: (i % 20) as u32,
                    skip_ratio: phase * 0.4,
                    avg_completion_rate: 1.0 - phase * 0.3,
                    last_played_at: Some(base - Duration::days((i % 60) as i64)),
                },
            }
        })
        .collect()
}

fn benchmark_profile(catalog: &[Track]) -> UserProfile {
    UserProfile {
        top_tracks: catalog.iter().take(5).cloned().collect(),
        preferred_genres: ["indie".to_string(), "rock".to_string()]
            .into_iter()
            .collect(),
        ..UserProfile::default()
    }
}

struct BenchProfile(UserProfile);

impl ProfileProvider for BenchProfile {
    fn user_profile(&self, _user_id: &str) -> anyhow::Result<UserProfile> {
        Ok(self.0.clone())
    }
}

struct BenchCatalog(Vec<Track>);

impl CatalogProvider for BenchCatalog {
    fn available_tracks(&self, _user_id: &str) -> anyhow::Result<Vec<Track>> {
        Ok(self.0.clone())
    }
}

fn benchmark_scoring(c: &mut Criterion) {
    let catalog = synthetic_catalog(1_000);
    let profile = benchmark_profile(&catalog);
    let seeds: Vec<Track> = catalog.iter().take(5).cloned().collect();
    let ctx = SimilarityContext::new(&seeds, &profile);
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

    let mut group = c.benchmark_group("scoring");

    group.bench_function("similarity_1k", |b| {
        b.iter(|| {
            for t in &catalog {
                black_box(similarity_score(black_box(t), &ctx));
            }
        })
    });

    group.bench_function("discovery_1k", |b| {
        b.iter(|| {
            for t in &catalog {
                black_box(discovery_score(black_box(t), &profile, now));
            }
        })
    });

    group.bench_function("history_1k", |b| {
        b.iter(|| {
            for t in &catalog {
                black_box(history_score(black_box(t), now));
            }
        })
    });

    group.bench_function("transition_pairs_1k", |b| {
        b.iter(|| {
            for pair in catalog.windows(2) {
                black_box(transition_score(&pair[0], &pair[1]));
            }
        })
    });

    group.finish();
}

fn benchmark_builders(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
    let rules = GenerationRules {
        min_similarity: 0.3,
        ..GenerationRules::default()
    };
    let mood = AudioFeatures::from_pairs([
        (FeatureDimension::Energy, 0.6),
        (FeatureDimension::Valence, 0.5),
    ]);

    let mut group = c.benchmark_group("builders");

    for size in [500, 2_000, 5_000] {
        let catalog = synthetic_catalog(size);
        let profile = benchmark_profile(&catalog);
        let seeds: Vec<Track> = catalog.iter().take(5).cloned().collect();

        group.bench_with_input(
            BenchmarkId::new("similarity", size),
            &catalog,
            |b, catalog| {
                b.iter(|| black_box(build_similarity(catalog, &profile, &seeds, &rules, 30)))
            },
        );

        group.bench_with_input(BenchmarkId::new("mood", size), &catalog, |b, catalog| {
            b.iter(|| black_box(build_mood(catalog, &mood, &rules, 30)))
        });

        group.bench_with_input(BenchmarkId::new("history", size), &catalog, |b, catalog| {
            b.iter(|| black_box(build_history(catalog, &rules, 30, now)))
        });
    }

    group.finish();
}

fn benchmark_optimizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimizer");

    for size in [30, 100, 300] {
        let selection = synthetic_catalog(size);
        group.bench_with_input(
            BenchmarkId::new("greedy_sequence", size),
            &selection,
            |b, selection| b.iter(|| black_box(optimize_sequence(selection.clone()))),
        );
    }

    group.finish();
}

fn benchmark_full_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.sample_size(20);

    for size in [1_000, 5_000] {
        let catalog = synthetic_catalog(size);
        let profile = benchmark_profile(&catalog);
        let engine = PlaylistEngine::new(BenchProfile(profile), BenchCatalog(catalog));

        for algorithm in [Algorithm::Similarity, Algorithm::Hybrid] {
            let request = GenerateRequest {
                algorithm,
                target_size: 30,
                ..GenerateRequest::for_user("bench")
            };
            group.bench_with_input(
                BenchmarkId::new(algorithm.label(), size),
                &request,
                |b, request| {
                    b.iter(|| black_box(engine.generate(black_box(request)).unwrap()))
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_scoring,
    benchmark_builders,
    benchmark_optimizer,
    benchmark_full_generation
);
criterion_main!(benches);
