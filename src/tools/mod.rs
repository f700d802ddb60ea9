use std::collections::HashMap;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

mod params;

use params::*;

use crate::beatgrid;
use crate::camelot;
use crate::chain;
use crate::compat;
use crate::ranking;
use crate::types::Track;

fn internal(msg: String) -> McpError {
    McpError::internal_error(msg, None)
}

/// Cap on beat_grid output size. Grids are for rendering a visible
/// timeline, not for enumerating hour-long recordings beat by beat.
const MAX_GRID_BEATS: usize = 2000;

fn round_score(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Reject a track that cannot anchor a score, naming it.
fn require_tempo(track: &Track) -> Result<(), McpError> {
    if track.tempo().is_none() {
        return Err(McpError::invalid_params(
            format!("Track '{}' has no usable BPM", track.id),
            None,
        ));
    }
    Ok(())
}

/// MCP server exposing the compatibility and sequencing engine. All track
/// data arrives inline in tool parameters; the server holds no state.
#[derive(Clone)]
pub struct MixsmithServer {
    tool_router: ToolRouter<Self>,
}

impl Default for MixsmithServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl MixsmithServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Score harmonic/tempo/energy compatibility between two tracks. Returns a 0-100 score with per-factor reasons (BPM delta first, Camelot key relation second)."
    )]
    async fn score_compatibility(
        &self,
        params: Parameters<ScoreCompatibilityParams>,
    ) -> Result<CallToolResult, McpError> {
        let ScoreCompatibilityParams { from, to } = params.0;
        require_tempo(&from)?;
        require_tempo(&to)?;
        let result = compat::score_pair(&from, &to).ok_or_else(|| {
            internal("Scorer rejected a pair that passed the BPM gate".to_string())
        })?;

        let payload = serde_json::json!({
            "from": from,
            "to": to,
            "compatibility": result,
        });
        let json =
            serde_json::to_string_pretty(&payload).map_err(|e| internal(format!("{e}")))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        description = "Filter a candidate pool to tracks mixable with a reference track and rank them best-first. Admits direct, half-time, and double-time tempo matches with identical or Camelot-adjacent keys."
    )]
    async fn suggest_next_tracks(
        &self,
        params: Parameters<SuggestNextTracksParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let limit = p.limit.unwrap_or(ranking::MAX_CANDIDATES as u32) as usize;

        let skipped = p
            .pool
            .iter()
            .filter(|t| t.id != p.reference.id && !t.is_sequenceable())
            .count();
        let candidates = ranking::rank_candidates(&p.reference, &p.pool, limit);

        let mut payload = serde_json::json!({
            "reference": &p.reference,
            "pool_size": p.pool.len(),
            "candidates": candidates,
        });
        if skipped > 0 {
            payload["skipped"] = serde_json::json!(skipped);
        }
        if !p.reference.is_sequenceable() {
            payload["note"] =
                serde_json::json!("reference track has no usable bpm/key; nothing can be ranked");
        }
        let json =
            serde_json::to_string_pretty(&payload).map_err(|e| internal(format!("{e}")))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        description = "Greedily build an ordered mix chain from a track pool. List order controls the seed; each step appends the first remaining compatible track. Returns the chain with per-transition scores."
    )]
    async fn build_mix_chain(
        &self,
        params: Parameters<BuildMixChainParams>,
    ) -> Result<CallToolResult, McpError> {
        let tracks = params.0.tracks;
        let skipped = tracks.iter().filter(|t| !t.is_sequenceable()).count();
        let mix_chain = chain::build_chain(&tracks);

        let mut payload = serde_json::json!({
            "pool_size": tracks.len(),
            "chain_length": mix_chain.len(),
            "mean_score": round_score(mix_chain.mean_score()),
            "tracks": mix_chain.tracks,
            "transitions": mix_chain.transitions,
        });
        if skipped > 0 {
            payload["skipped"] = serde_json::json!(skipped);
        }
        let json =
            serde_json::to_string_pretty(&payload).map_err(|e| internal(format!("{e}")))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        description = "List the Camelot wheel coordinates that mix cleanly with a key: itself, one step down, one step up, and the relative major/minor."
    )]
    async fn compatible_keys(
        &self,
        params: Parameters<CompatibleKeysParams>,
    ) -> Result<CallToolResult, McpError> {
        let raw = params.0.key;
        let key = camelot::parse_key(&raw).ok_or_else(|| {
            McpError::invalid_params(
                format!("'{raw}' is not a recognizable Camelot or traditional key"),
                None,
            )
        })?;
        let compatible: Vec<String> = camelot::compatible_keys(key)
            .iter()
            .map(|k| k.to_string())
            .collect();

        let payload = serde_json::json!({
            "input": raw,
            "normalized": key.to_string(),
            "compatible_keys": compatible,
        });
        let json =
            serde_json::to_string_pretty(&payload).map_err(|e| internal(format!("{e}")))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        description = "Compute beat-grid timestamps for a duration and BPM, for timeline rendering and cue snapping. An unusable BPM or duration yields an empty grid."
    )]
    async fn beat_grid(
        &self,
        params: Parameters<BeatGridParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let cap = p.max_beats.map(|m| m as usize).unwrap_or(MAX_GRID_BEATS);
        let grid = beatgrid::BeatGrid::new(p.duration_ms, p.bpm);
        let total = grid.len();
        let timestamps: Vec<f64> = grid.timestamps().take(cap).collect();

        let payload = serde_json::json!({
            "bpm": p.bpm,
            "duration_ms": p.duration_ms,
            "beat_interval_ms": beatgrid::beat_interval_ms(p.bpm),
            "count": total,
            "truncated": total > timestamps.len(),
            "timestamps": timestamps,
        });
        let json =
            serde_json::to_string_pretty(&payload).map_err(|e| internal(format!("{e}")))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        description = "Snap a timeline position to the nearest beat for the given BPM. A no-op when snapping is disabled or the BPM is unusable."
    )]
    async fn snap_to_beat(
        &self,
        params: Parameters<SnapToBeatParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let snap_enabled = p.snap_enabled.unwrap_or(true);
        let snapped = beatgrid::snap_to_nearest_beat(p.position_ms, p.bpm, snap_enabled);

        let payload = serde_json::json!({
            "position_ms": p.position_ms,
            "snapped_ms": snapped,
            "beat_interval_ms": beatgrid::beat_interval_ms(p.bpm),
            "snap_enabled": snap_enabled,
        });
        let json =
            serde_json::to_string_pretty(&payload).map_err(|e| internal(format!("{e}")))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        description = "Summarize a track pool: counts of usable bpm/key data, BPM range, and Camelot key distribution."
    )]
    async fn pool_stats(
        &self,
        params: Parameters<PoolStatsParams>,
    ) -> Result<CallToolResult, McpError> {
        let tracks = params.0.tracks;
        let with_bpm = tracks.iter().filter(|t| t.tempo().is_some()).count();
        let with_key = tracks.iter().filter(|t| t.camelot_key().is_some()).count();
        let sequenceable = tracks.iter().filter(|t| t.is_sequenceable()).count();

        let tempos: Vec<f64> = tracks.iter().filter_map(Track::tempo).collect();
        let avg_bpm = if tempos.is_empty() {
            None
        } else {
            Some(round_score(tempos.iter().sum::<f64>() / tempos.len() as f64))
        };
        let min_bpm = tempos.iter().copied().fold(None, |acc: Option<f64>, bpm| {
            Some(acc.map_or(bpm, |a| a.min(bpm)))
        });
        let max_bpm = tempos.iter().copied().fold(None, |acc: Option<f64>, bpm| {
            Some(acc.map_or(bpm, |a| a.max(bpm)))
        });

        let mut key_counts: HashMap<String, usize> = HashMap::new();
        for track in &tracks {
            if let Some(key) = track.camelot_key() {
                *key_counts.entry(key.to_string()).or_insert(0) += 1;
            }
        }
        let mut key_distribution: Vec<(String, usize)> = key_counts.into_iter().collect();
        key_distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let key_distribution: Vec<serde_json::Value> = key_distribution
            .into_iter()
            .map(|(name, count)| serde_json::json!({ "key": name, "count": count }))
            .collect();

        let payload = serde_json::json!({
            "total_tracks": tracks.len(),
            "with_bpm": with_bpm,
            "with_key": with_key,
            "sequenceable": sequenceable,
            "avg_bpm": avg_bpm,
            "min_bpm": min_bpm,
            "max_bpm": max_bpm,
            "key_distribution": key_distribution,
        });
        let json =
            serde_json::to_string_pretty(&payload).map_err(|e| internal(format!("{e}")))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for MixsmithServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Track compatibility and set sequencing engine. Score harmonic/tempo/energy \
                 compatibility between tracks, rank follow-up candidates, build greedy mix \
                 chains, and compute beat grids — all from caller-supplied track metadata."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
