use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camelot::{self, KeyRelation};
use crate::types::Track;

// Scoring policy. These are the single source of truth for the engine's
// tuning; the algorithm code below never hardcodes a threshold.

/// Sub-score points lost per BPM of tempo delta.
pub const BPM_SENSITIVITY: f64 = 4.0;
/// Sub-score points lost per step of energy-level delta.
pub const ENERGY_SENSITIVITY: f64 = 8.0;

/// Factor weights for the composite score. Must sum to 1.
pub const WEIGHT_BPM: f64 = 0.35;
pub const WEIGHT_KEY: f64 = 0.35;
pub const WEIGHT_ENERGY: f64 = 0.30;

/// Key sub-scores by Camelot relation.
pub const KEY_SCORE_IDENTICAL: f64 = 100.0;
pub const KEY_SCORE_ADJACENT: f64 = 85.0;
pub const KEY_SCORE_UNRELATED: f64 = 40.0;
/// Neutral cap when either key is unknown or unparseable: an unknown key
/// is neither a perfect match nor a clash.
pub const KEY_SCORE_UNKNOWN: f64 = 40.0;
/// Neutral energy sub-score when either energy level is unknown.
pub const ENERGY_SCORE_UNKNOWN: f64 = 50.0;

/// Which scoring factor a reason entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Bpm,
    Key,
    Energy,
}

/// Tempo interpretation chosen for a pair: matched as-is, or with one
/// side perceived at half or double its nominal tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TempoRelation {
    Direct,
    HalfTime,
    DoubleTime,
}

/// One contribution to a compatibility score, for UI explainability.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Reason {
    pub factor: Factor,
    pub label: String,
    /// Factor-specific detail: the raw BPM delta for `Bpm`, the sub-score
    /// for `Key` and `Energy`.
    pub value: f64,
}

/// Deterministic 0-100 compatibility verdict for a pair of tracks.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompatibilityResult {
    pub score: u8,
    /// Ordered: BPM delta first, key relation second, then energy.
    pub reasons: Vec<Reason>,
}

/// Best tempo interpretation between two BPMs.
#[derive(Debug, Clone, Copy)]
pub struct TempoMatch {
    pub relation: TempoRelation,
    /// Delta in the interpretation's frame. Half/double-time deltas are
    /// measured at the doubled tempo, which keeps them symmetric under
    /// argument swap.
    pub delta: f64,
}

/// Pick the tempo interpretation with the smallest delta. Direct wins ties.
pub fn best_tempo_match(a: f64, b: f64) -> TempoMatch {
    let mut best = TempoMatch {
        relation: TempoRelation::Direct,
        delta: (a - b).abs(),
    };
    let double_time = TempoMatch {
        relation: TempoRelation::DoubleTime,
        delta: (2.0 * a - b).abs(),
    };
    let half_time = TempoMatch {
        relation: TempoRelation::HalfTime,
        delta: (a - 2.0 * b).abs(),
    };
    for candidate in [double_time, half_time] {
        if candidate.delta < best.delta {
            best = candidate;
        }
    }
    best
}

/// Score two tracks against each other.
///
/// Returns `None` when either track lacks a positive BPM — a missing tempo
/// is skipped explicitly, never guessed. Unknown keys and energy levels
/// degrade to neutral sub-scores instead.
pub fn score_pair(a: &Track, b: &Track) -> Option<CompatibilityResult> {
    let bpm_a = a.tempo()?;
    let bpm_b = b.tempo()?;

    let raw_delta = (bpm_a - bpm_b).abs();
    let tempo = best_tempo_match(bpm_a, bpm_b);
    let bpm_score = (100.0 - tempo.delta * BPM_SENSITIVITY).max(0.0);
    let bpm_label = match tempo.relation {
        TempoRelation::Direct => format!("Tempo delta {:.1} BPM", tempo.delta),
        TempoRelation::HalfTime => {
            format!("Half-time match (delta {:.1} BPM at doubled tempo)", tempo.delta)
        }
        TempoRelation::DoubleTime => {
            format!("Double-time match (delta {:.1} BPM at doubled tempo)", tempo.delta)
        }
    };

    let (key_score, key_label) = match (a.camelot_key(), b.camelot_key()) {
        (Some(key_a), Some(key_b)) => match camelot::relation(key_a, key_b) {
            KeyRelation::Identical => (KEY_SCORE_IDENTICAL, format!("Identical key ({key_a})")),
            KeyRelation::Adjacent => (
                KEY_SCORE_ADJACENT,
                format!("Camelot adjacent ({key_a} and {key_b})"),
            ),
            KeyRelation::Unrelated => (
                KEY_SCORE_UNRELATED,
                format!("Unrelated keys ({key_a} vs {key_b})"),
            ),
        },
        _ => (KEY_SCORE_UNKNOWN, "Key unknown".to_string()),
    };

    let (energy_score, energy_label) = match (a.energy_level, b.energy_level) {
        (Some(energy_a), Some(energy_b)) => {
            let delta = f64::from(i16::from(energy_a) - i16::from(energy_b)).abs();
            (
                (100.0 - delta * ENERGY_SENSITIVITY).max(0.0),
                format!("Energy delta {delta:.0}"),
            )
        }
        _ => (ENERGY_SCORE_UNKNOWN, "Energy level unknown".to_string()),
    };

    let composite = WEIGHT_BPM * bpm_score + WEIGHT_KEY * key_score + WEIGHT_ENERGY * energy_score;
    let score = composite.round().clamp(0.0, 100.0) as u8;

    Some(CompatibilityResult {
        score,
        reasons: vec![
            Reason {
                factor: Factor::Bpm,
                label: bpm_label,
                value: raw_delta,
            },
            Reason {
                factor: Factor::Key,
                label: key_label,
                value: key_score,
            },
            Reason {
                factor: Factor::Energy,
                label: energy_label,
                value: energy_score,
            },
        ],
    })
}
