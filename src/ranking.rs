use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::Serialize;

use crate::camelot::{self, KeyRelation};
use crate::compat::{self, CompatibilityResult, TempoRelation};
use crate::types::Track;

/// Direct-tempo tolerance window in BPM.
pub const BPM_TOLERANCE: f64 = 6.0;
/// Tolerance for half/double-time interpretations, measured at the
/// doubled tempo.
pub const HALF_DOUBLE_TOLERANCE: f64 = 3.0;
/// Upper bound on ranked results.
pub const MAX_CANDIDATES: usize = 10;

/// A pool track that cleared the compatibility gate, with its score.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RankedCandidate {
    pub track: Track,
    pub result: CompatibilityResult,
    /// Effective BPM delta of the best tempo interpretation.
    pub bpm_delta: f64,
    pub tempo: TempoRelation,
}

/// Tempo gate: direct delta within the tolerance window, or a half/double
/// interpretation within its tighter window.
pub fn tempo_within_tolerance(a: f64, b: f64) -> bool {
    let direct = (a - b).abs();
    let half_double = (2.0 * a - b).abs().min((a - 2.0 * b).abs());
    direct <= BPM_TOLERANCE || half_double <= HALF_DOUBLE_TOLERANCE
}

/// Boolean compatibility predicate shared by the ranker and the chain
/// builder: both tracks carry usable tempo and key data, the tempo delta
/// fits its window, and the keys are identical or Camelot-adjacent.
pub fn is_compatible(a: &Track, b: &Track) -> bool {
    let (Some(bpm_a), Some(bpm_b)) = (a.tempo(), b.tempo()) else {
        return false;
    };
    let (Some(key_a), Some(key_b)) = (a.camelot_key(), b.camelot_key()) else {
        return false;
    };
    if camelot::relation(key_a, key_b) == KeyRelation::Unrelated {
        return false;
    }
    tempo_within_tolerance(bpm_a, bpm_b)
}

/// Filter `pool` to tracks compatible with `reference` and rank them
/// best-first.
///
/// The reference itself (by id) and tracks missing tempo or key data are
/// excluded. Ordering is deterministic: score descending, then smaller
/// effective BPM delta, then original pool order. A reference without
/// usable tempo/key data yields an empty result — compatibility cannot be
/// established without anchor data.
pub fn rank_candidates(reference: &Track, pool: &[Track], limit: usize) -> Vec<RankedCandidate> {
    if !reference.is_sequenceable() {
        return Vec::new();
    }

    let mut ranked: Vec<(usize, RankedCandidate)> = Vec::new();
    for (position, candidate) in pool.iter().enumerate() {
        if candidate.id == reference.id || !candidate.is_sequenceable() {
            continue;
        }
        if !is_compatible(reference, candidate) {
            continue;
        }
        let (Some(result), Some(bpm_a), Some(bpm_b)) = (
            compat::score_pair(reference, candidate),
            reference.tempo(),
            candidate.tempo(),
        ) else {
            continue;
        };
        let tempo = compat::best_tempo_match(bpm_a, bpm_b);
        ranked.push((
            position,
            RankedCandidate {
                track: candidate.clone(),
                result,
                bpm_delta: tempo.delta,
                tempo: tempo.relation,
            },
        ));
    }

    ranked.sort_by(|(position_a, a), (position_b, b)| {
        b.result
            .score
            .cmp(&a.result.score)
            .then_with(|| {
                a.bpm_delta
                    .partial_cmp(&b.bpm_delta)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| position_a.cmp(position_b))
    });

    ranked.truncate(limit.min(MAX_CANDIDATES));
    ranked.into_iter().map(|(_, candidate)| candidate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, bpm: Option<f64>, key: Option<&str>, energy: Option<u8>) -> Track {
        Track {
            id: id.to_string(),
            title: id.to_string(),
            artist: "Test".to_string(),
            bpm,
            key: key.map(String::from),
            energy_level: energy,
        }
    }

    #[test]
    fn empty_pool_yields_empty_result() {
        let reference = track("r", Some(128.0), Some("8A"), Some(7));
        assert!(rank_candidates(&reference, &[], MAX_CANDIDATES).is_empty());
    }

    #[test]
    fn reference_without_anchor_data_yields_empty_result() {
        let pool = vec![track("a", Some(128.0), Some("8A"), Some(7))];
        let no_bpm = track("r", None, Some("8A"), Some(7));
        assert!(rank_candidates(&no_bpm, &pool, MAX_CANDIDATES).is_empty());
        let no_key = track("r", Some(128.0), None, Some(7));
        assert!(rank_candidates(&no_key, &pool, MAX_CANDIDATES).is_empty());
    }

    #[test]
    fn excludes_self_and_tracks_missing_data() {
        let reference = track("r", Some(128.0), Some("8A"), Some(7));
        let pool = vec![
            reference.clone(),
            track("unanalyzed", None, Some("8A"), Some(7)),
            track("keyless", Some(128.0), None, Some(7)),
            track("ok", Some(128.0), Some("8A"), Some(7)),
        ];
        let ranked = rank_candidates(&reference, &pool, MAX_CANDIDATES);
        let ids: Vec<&str> = ranked.iter().map(|c| c.track.id.as_str()).collect();
        assert_eq!(ids, ["ok"]);
    }

    #[test]
    fn bpm_tolerance_boundary_at_six() {
        let reference = track("r", Some(128.0), Some("8A"), Some(7));
        let pool = vec![
            track("in", Some(134.0), Some("8A"), Some(7)),
            track("out", Some(135.0), Some("8A"), Some(7)),
        ];
        let ranked = rank_candidates(&reference, &pool, MAX_CANDIDATES);
        let ids: Vec<&str> = ranked.iter().map(|c| c.track.id.as_str()).collect();
        assert_eq!(ids, ["in"]);
    }

    #[test]
    fn half_and_double_time_candidates_are_admitted() {
        let reference = track("r", Some(140.0), Some("8A"), Some(7));
        let pool = vec![
            track("half", Some(70.0), Some("8A"), Some(5)),
            track("near-half", Some(71.0), Some("9A"), Some(5)),
            track("too-far", Some(75.0), Some("8A"), Some(5)),
        ];
        let ranked = rank_candidates(&reference, &pool, MAX_CANDIDATES);
        let ids: Vec<&str> = ranked.iter().map(|c| c.track.id.as_str()).collect();
        assert_eq!(ids, ["half", "near-half"]);
        assert_eq!(ranked[0].tempo, TempoRelation::HalfTime);
    }

    #[test]
    fn unrelated_keys_are_filtered_out() {
        let reference = track("r", Some(128.0), Some("8A"), Some(7));
        let pool = vec![
            track("clash", Some(128.0), Some("3B"), Some(7)),
            track("relative", Some(128.0), Some("8B"), Some(7)),
        ];
        let ranked = rank_candidates(&reference, &pool, MAX_CANDIDATES);
        let ids: Vec<&str> = ranked.iter().map(|c| c.track.id.as_str()).collect();
        assert_eq!(ids, ["relative"]);
    }

    #[test]
    fn distant_track_is_excluded_entirely() {
        // Track C from the reference scenario: BPM delta 33, unrelated key.
        let reference = track("a", Some(128.0), Some("8A"), Some(7));
        let pool = vec![track("c", Some(95.0), Some("3B"), Some(2))];
        assert!(rank_candidates(&reference, &pool, MAX_CANDIDATES).is_empty());
    }

    #[test]
    fn sorts_by_score_then_delta_then_pool_order() {
        let reference = track("r", Some(128.0), Some("8A"), Some(7));
        let pool = vec![
            track("far", Some(133.0), Some("9A"), Some(7)),
            track("tie-1", Some(130.0), Some("9A"), Some(7)),
            track("tie-2", Some(130.0), Some("7A"), Some(7)),
            track("best", Some(128.0), Some("8A"), Some(7)),
        ];
        let ranked = rank_candidates(&reference, &pool, MAX_CANDIDATES);
        let ids: Vec<&str> = ranked.iter().map(|c| c.track.id.as_str()).collect();
        assert_eq!(ids, ["best", "tie-1", "tie-2", "far"]);
    }

    #[test]
    fn result_is_capped() {
        let reference = track("r", Some(128.0), Some("8A"), Some(7));
        let pool: Vec<Track> = (0..20)
            .map(|i| track(&format!("c{i}"), Some(128.0), Some("8A"), Some(7)))
            .collect();
        assert_eq!(rank_candidates(&reference, &pool, MAX_CANDIDATES).len(), MAX_CANDIDATES);
        assert_eq!(rank_candidates(&reference, &pool, 3).len(), 3);
        // The cap also bounds oversized limits.
        assert_eq!(rank_candidates(&reference, &pool, 50).len(), MAX_CANDIDATES);
    }
}
