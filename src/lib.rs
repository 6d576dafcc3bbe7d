//! Offline playlist generation and ranking.
//!
//! Core modules:
//! - [`engine`] - Playlist assembly, strategy dispatch and provider traits
//! - [`builder`] - Single-strategy track selection
//! - [`blend`] - Hybrid bucket split and round-robin interleaving
//! - [`optimizer`] - Greedy transition-based sequencing
//! - [`scoring`] - Strategy scorers (similarity, mood, discovery, history)
//! - [`features`] - Audio feature comparison primitives
//!
//! ### Supporting Modules
//!
//! - [`model`] - Tracks, profiles, playlists and the strategy enum
//! - [`rules`] - Generation rules and per-request overrides
//! - [`providers`] - JSON-file catalog and profile sources
//! - [`config`] - Configuration and data directory management
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use medley::engine::{GenerateRequest, PlaylistEngine};
//! use medley::model::Algorithm;
//! use medley::providers::{JsonCatalogProvider, JsonProfileProvider};
//! use std::path::Path;
//!
//! let catalog = JsonCatalogProvider::from_path(Path::new("catalog.json"))?;
//! let profile = JsonProfileProvider::from_path(Path::new("profile.json"))?;
//!
//! let mut request = GenerateRequest::for_user("local");
//! request.algorithm = Algorithm::Mood;
//! request.target_size = 20;
//!
//! let engine = PlaylistEngine::new(profile, catalog);
//! let playlist = engine.generate(&request)?;
//! println!("'{}' with {} tracks", playlist.name, playlist.metadata.track_count);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Strategy Details
//!
//! Every strategy scores candidates against the seeds and the listener
//! profile, ranks them, and walks the ranking under the generation rules
//! (artist caps, skip filtering). The hybrid strategy splits the target
//! size into fixed shares per strategy and interleaves the partial results
//! round-robin, so the blend stays audible throughout the playlist rather
//! than front-loading one source. A final greedy pass reorders the
//! selection by pairwise transition quality.

pub mod blend;
pub mod builder;
pub mod cli;
pub mod completion;
pub mod config;
pub mod engine;
pub mod features;
pub mod model;
pub mod optimizer;
pub mod providers;
pub mod rules;
pub mod scoring;
