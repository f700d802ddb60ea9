use std::path::{Path, PathBuf};

use clap::Parser;

use crate::chain;
use crate::ranking;
use crate::types::Track;

#[derive(Parser)]
#[command(name = "mixsmith")]
enum Cli {
    /// Rank compatible next tracks for one track in a JSON library
    Suggest(SuggestArgs),
    /// Build a greedy mix chain from a JSON library
    Chain(ChainArgs),
}

#[derive(clap::Args)]
struct SuggestArgs {
    /// Path to a JSON array of track records
    #[arg(long)]
    library: PathBuf,
    /// Reference track ID
    #[arg(long)]
    track: String,
    /// Max results
    #[arg(long, default_value = "10")]
    limit: usize,
}

#[derive(clap::Args)]
struct ChainArgs {
    /// Path to a JSON array of track records
    #[arg(long)]
    library: PathBuf,
    /// Track ID to move to the front of the pool (seeds the chain)
    #[arg(long)]
    start: Option<String>,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse() {
        Cli::Suggest(args) => run_suggest(args),
        Cli::Chain(args) => run_chain(args),
    }
}

fn load_library(path: &Path) -> Result<Vec<Track>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let tracks: Vec<Track> = serde_json::from_str(&raw)
        .map_err(|e| format!("{} is not a JSON track array: {e}", path.display()))?;
    Ok(tracks)
}

/// Move the track with `id` to the front of the pool, preserving the
/// relative order of everything else.
fn promote_start(tracks: &mut Vec<Track>, id: &str) -> Result<(), String> {
    let Some(position) = tracks.iter().position(|t| t.id == id) else {
        return Err(format!("track '{id}' not found in library"));
    };
    let start = tracks.remove(position);
    tracks.insert(0, start);
    Ok(())
}

fn run_suggest(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tracks = load_library(&args.library)?;
    let reference = tracks
        .iter()
        .find(|t| t.id == args.track)
        .ok_or_else(|| format!("track '{}' not found in library", args.track))?
        .clone();

    let ranked = ranking::rank_candidates(&reference, &tracks, args.limit);
    eprintln!(
        "[mixsmith] ranked {} of {} pool tracks for '{}'",
        ranked.len(),
        tracks.len(),
        reference.id
    );
    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}

fn run_chain(args: ChainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracks = load_library(&args.library)?;
    if let Some(ref start) = args.start {
        promote_start(&mut tracks, start)?;
    }

    let mix_chain = chain::build_chain(&tracks);
    eprintln!(
        "[mixsmith] chained {} of {} tracks (mean score {:.1})",
        mix_chain.len(),
        tracks.len(),
        mix_chain.mean_score()
    );
    println!("{}", serde_json::to_string_pretty(&mix_chain)?);
    Ok(())
}
