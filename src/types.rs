use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camelot::{self, CamelotKey};

/// A track record as supplied by the caller. The engine never stores or
/// mutates tracks; bpm/key/energy come from whatever upstream analysis the
/// caller ran, and any of them may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Track {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    /// Beats per minute. Absent for unanalyzed tracks.
    pub bpm: Option<f64>,
    /// Musical key in Camelot ("8A") or traditional ("C#m", "Bb") notation.
    pub key: Option<String>,
    /// Subjective intensity, 1-10.
    pub energy_level: Option<u8>,
}

impl Track {
    /// BPM if present and positive.
    pub fn tempo(&self) -> Option<f64> {
        self.bpm.filter(|bpm| *bpm > 0.0)
    }

    /// Camelot coordinate if the key string is present and parses.
    pub fn camelot_key(&self) -> Option<CamelotKey> {
        self.key.as_deref().and_then(camelot::parse_key)
    }

    /// True when the track carries enough data to take part in
    /// compatibility filtering: a positive BPM and a parseable key.
    /// Tracks failing this gate are skipped, never defaulted.
    pub fn is_sequenceable(&self) -> bool {
        self.tempo().is_some() && self.camelot_key().is_some()
    }
}
