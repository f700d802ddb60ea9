use schemars::JsonSchema;
use serde::Serialize;

use crate::compat::{self, CompatibilityResult};
use crate::ranking;
use crate::types::Track;

/// One link in a mix chain, indexed into the chain's track list.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Transition {
    pub from_index: usize,
    pub to_index: usize,
    pub result: CompatibilityResult,
}

/// An ordered mix sequence. Built fresh per request; every consecutive
/// pair satisfies the compatibility predicate used to build it.
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct MixChain {
    pub tracks: Vec<Track>,
    pub transitions: Vec<Transition>,
}

impl MixChain {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Mean transition score, 0.0 for chains shorter than two tracks.
    pub fn mean_score(&self) -> f64 {
        if self.transitions.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .transitions
            .iter()
            .map(|t| f64::from(t.result.score))
            .sum();
        total / self.transitions.len() as f64
    }
}

/// Greedily build a mix chain from `tracks`.
///
/// Tracks without usable tempo/key data are dropped up front; the seed is
/// the first remaining track, so callers control seeding by list order.
/// Each step appends the first remaining track (in original list order)
/// compatible with the chain's last track, and stops when none qualifies.
/// Greedy with no backtracking — a dead end truncates the chain rather
/// than searching for a better path. O(n²) over the pool.
pub fn build_chain(tracks: &[Track]) -> MixChain {
    let sequenceable: Vec<&Track> = tracks.iter().filter(|t| t.is_sequenceable()).collect();
    let Some((seed, rest)) = sequenceable.split_first() else {
        return MixChain::default();
    };

    let mut chain: Vec<Track> = vec![(*seed).clone()];
    let mut transitions: Vec<Transition> = Vec::new();
    let mut remaining: Vec<&Track> = rest.to_vec();

    loop {
        let pick = {
            let Some(last) = chain.last() else { break };
            remaining
                .iter()
                .position(|candidate| ranking::is_compatible(last, candidate))
        };
        let Some(pick) = pick else { break };
        let next = remaining.remove(pick);

        if let Some(last) = chain.last()
            && let Some(result) = compat::score_pair(last, next)
        {
            transitions.push(Transition {
                from_index: chain.len() - 1,
                to_index: chain.len(),
                result,
            });
        }
        chain.push(next.clone());
    }

    MixChain {
        tracks: chain,
        transitions,
    }
}
