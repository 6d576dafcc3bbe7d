//! Command-line interface definitions.
//!
//! Uses Clap derive macros for type-safe parsing and automatic help text.
//! The CLI is a thin shell: it loads the catalog/profile documents, builds
//! a [`crate::engine::GenerateRequest`] from the flags, and prints the
//! resulting playlist as JSON.
//!
//! ## Examples
//!
//! ```bash
//! medley generate --catalog tracks.json --profile me.json
//! medley generate --algorithm mood --valence 0.8 --energy 0.7 --size 20
//! medley generate --seed-track t42 --seed-track t99 --algorithm similarity
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser)]
#[command(name = "medley")]
#[command(about = "Medley: playlist generation & ranking - scores, blends and sequences tracks offline")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Generate a playlist from a catalog and listener profile
    ///
    /// Reads the candidate catalog (a JSON track array) and the listener
    /// profile document, runs the selected strategy, and prints the
    /// playlist as JSON. A missing or unreadable profile degrades to an
    /// empty one; a missing catalog is a hard error.
    Generate {
        /// Path to the catalog document. Defaults to the data-dir catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Path to the profile document. Defaults to the data-dir profile.
        #[arg(long)]
        profile: Option<PathBuf>,

        /// User id passed through to the providers
        #[arg(long, default_value = "local")]
        user: String,

        /// Strategy: similarity, mood, genre, tempo, discovery, history or
        /// hybrid. Unknown values fall back to hybrid.
        #[arg(long, short, default_value = "hybrid")]
        algorithm: String,

        /// Number of tracks to aim for
        #[arg(long, short, default_value = "30")]
        size: usize,

        /// Seed track id (repeatable)
        #[arg(long = "seed-track")]
        seed_tracks: Vec<String>,

        /// Seed artist name (repeatable, used for naming)
        #[arg(long = "seed-artist")]
        seed_artists: Vec<String>,

        /// Seed genre label (repeatable)
        #[arg(long = "seed-genre")]
        seed_genres: Vec<String>,

        /// Target mood valence in [0,1]
        #[arg(long)]
        valence: Option<f64>,

        /// Target mood energy in [0,1]
        #[arg(long)]
        energy: Option<f64>,

        /// Target mood danceability in [0,1]
        #[arg(long)]
        danceability: Option<f64>,

        /// Target mood acousticness in [0,1]
        #[arg(long)]
        acousticness: Option<f64>,

        /// Target tempo in BPM (tempo strategy reference)
        #[arg(long)]
        tempo: Option<f64>,

        /// Minimum similarity score a candidate must exceed
        #[arg(long)]
        min_similarity: Option<f64>,

        /// Maximum tracks per artist
        #[arg(long)]
        max_repeat_artist: Option<usize>,

        /// Exclude tracks with a skip ratio above 0.5
        #[arg(long)]
        avoid_skipped: bool,

        /// Write the playlist JSON here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
