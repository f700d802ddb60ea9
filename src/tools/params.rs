use schemars::JsonSchema;
use serde::Deserialize;

use crate::types::Track;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScoreCompatibilityParams {
    #[schemars(description = "Source track")]
    pub from: Track,
    #[schemars(description = "Destination track")]
    pub to: Track,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SuggestNextTracksParams {
    #[schemars(description = "Track to find follow-ups for")]
    pub reference: Track,
    #[schemars(description = "Candidate pool to filter and rank")]
    pub pool: Vec<Track>,
    #[schemars(description = "Max results (default 10, capped at 10)")]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BuildMixChainParams {
    #[schemars(
        description = "Track pool in seeding order: the first sequenceable track opens the chain"
    )]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompatibleKeysParams {
    #[schemars(description = "Key in Camelot ('8A') or traditional ('C#m', 'Bb') notation")]
    pub key: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BeatGridParams {
    #[schemars(description = "Track duration in milliseconds")]
    pub duration_ms: f64,
    #[schemars(description = "Track tempo in BPM")]
    pub bpm: f64,
    #[schemars(description = "Max grid lines to return (default 2000)")]
    pub max_beats: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SnapToBeatParams {
    #[schemars(description = "Timeline position in milliseconds")]
    pub position_ms: f64,
    #[schemars(description = "Track tempo in BPM")]
    pub bpm: f64,
    #[schemars(description = "When false, the position is returned unchanged (default true)")]
    pub snap_enabled: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PoolStatsParams {
    #[schemars(description = "Tracks to summarize")]
    pub tracks: Vec<Track>,
}
