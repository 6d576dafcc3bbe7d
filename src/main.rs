//! # Medley - Playlist Generation & Ranking
//!
//! Medley scores, blends and sequences tracks from an exported catalog into
//! a playlist, entirely offline. The engine lives in the library crate;
//! this binary wires file-backed providers into it and prints the result.
//!
//! ## Architecture
//!
//! - `cli`: Command-line interface definitions
//! - `engine`: Playlist assembly, dispatch and provider traits
//! - `builder`/`blend`/`optimizer`: selection, interleaving, sequencing
//! - `scoring`/`features`: strategy scorers and the feature comparator
//! - `providers`: JSON-file catalog and profile sources
//! - `config`: data directory management
//!
//! ## Usage
//!
//! ```bash
//! # Generate a hybrid playlist from the default catalog location
//! medley generate
//!
//! # Mood playlist against an explicit catalog export
//! medley generate --catalog tracks.json --algorithm mood --valence 0.8
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{info, warn};
use medley::cli;
use medley::completion;
use medley::config;
use medley::engine::{GenerateRequest, PlaylistEngine};
use medley::model::{Algorithm, AudioFeatures, FeatureDimension};
use medley::providers::{JsonCatalogProvider, JsonProfileProvider};
use medley::rules::RuleOverrides;

/// Main entry point.
///
/// Initializes logging (controlled via `RUST_LOG`), parses arguments, and
/// routes to the subcommand. Errors propagate with `anyhow` context and are
/// displayed to the user.
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Generate {
            catalog,
            profile,
            user,
            algorithm,
            size,
            seed_tracks,
            seed_artists,
            seed_genres,
            valence,
            energy,
            danceability,
            acousticness,
            tempo,
            min_similarity,
            max_repeat_artist,
            avoid_skipped,
            output,
            pretty,
        } => {
            let catalog_path = match catalog {
                Some(path) => path,
                None => config::default_catalog_path()?,
            };
            let catalog_provider = JsonCatalogProvider::from_path(&catalog_path)
                .with_context(|| format!("Cannot load catalog from {}", catalog_path.display()))?;

            let profile_path = match profile {
                Some(path) => path,
                None => config::default_profile_path()?,
            };
            let profile_provider = match JsonProfileProvider::from_path(&profile_path) {
                Ok(provider) => provider,
                Err(err) => {
                    warn!(
                        "Profile unavailable ({err:#}); generating against an empty profile"
                    );
                    JsonProfileProvider::default()
                }
            };

            let mood_target = mood_from_flags(valence, energy, danceability, acousticness, tempo);
            let request = GenerateRequest {
                user_id: user,
                algorithm: Algorithm::parse_lenient(&algorithm),
                seed_track_ids: seed_tracks,
                seed_artists,
                seed_genres,
                mood_target,
                rules: RuleOverrides {
                    min_similarity,
                    max_repeat_artist,
                    avoid_skipped_tracks: if avoid_skipped { Some(true) } else { None },
                    ..RuleOverrides::default()
                },
                target_size: size,
            };

            info!(
                "Generating '{}' playlist of up to {} tracks",
                request.algorithm, request.target_size
            );
            let engine = PlaylistEngine::new(profile_provider, catalog_provider);
            let playlist = engine.generate(&request)?;

            let rendered = if pretty {
                serde_json::to_string_pretty(&playlist)?
            } else {
                serde_json::to_string(&playlist)?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write playlist to {}", path.display()))?;
                    println!(
                        "Wrote '{}' ({} tracks) to {}",
                        playlist.name,
                        playlist.metadata.track_count,
                        path.display()
                    );
                }
                None => println!("{rendered}"),
            }
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        }
    }

    Ok(())
}

/// Assemble a mood target from individual CLI flags; `None` when no mood
/// flag was given, so the engine can fall back to the profile average.
fn mood_from_flags(
    valence: Option<f64>,
    energy: Option<f64>,
    danceability: Option<f64>,
    acousticness: Option<f64>,
    tempo: Option<f64>,
) -> Option<AudioFeatures> {
    let pairs: Vec<(FeatureDimension, f64)> = [
        (FeatureDimension::Valence, valence),
        (FeatureDimension::Energy, energy),
        (FeatureDimension::Danceability, danceability),
        (FeatureDimension::Acousticness, acousticness),
    ]
    .into_iter()
    .filter_map(|(dim, value)| value.map(|v| (dim, v)))
    .collect();

    if pairs.is_empty() && tempo.is_none() {
        return None;
    }

    let mut target = AudioFeatures::from_pairs(pairs);
    target.tempo = tempo;
    Some(target)
}
