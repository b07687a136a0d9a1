//! Level summaries
//!
//! Sessions report a `LevelSummary` when a level is cleared. The host decides
//! how (and whether) to store it; `ScoreBoard` keeps the best run per level
//! in memory.

use serde::{Deserialize, Serialize};

/// Result of one cleared level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub level: u32,
    pub elapsed_ms: u64,
    /// Kills per player (one entry solo, two in duo)
    pub kills: Vec<u32>,
}

impl LevelSummary {
    pub fn total_kills(&self) -> u32 {
        self.kills.iter().sum()
    }

    /// More kills wins; ties go to the faster run
    fn beats(&self, other: &LevelSummary) -> bool {
        let (mine, theirs) = (self.total_kills(), other.total_kills());
        mine > theirs || (mine == theirs && self.elapsed_ms < other.elapsed_ms)
    }
}

/// Best summary per level
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreBoard {
    /// Sorted by level
    pub entries: Vec<LevelSummary>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Record a summary; returns true if it is the new best for its level
    pub fn record(&mut self, summary: LevelSummary) -> bool {
        match self.entries.binary_search_by_key(&summary.level, |e| e.level) {
            Ok(i) => {
                if summary.beats(&self.entries[i]) {
                    log::info!("New best for level {}: {} kills", summary.level, summary.total_kills());
                    self.entries[i] = summary;
                    true
                } else {
                    false
                }
            }
            Err(i) => {
                self.entries.insert(i, summary);
                true
            }
        }
    }

    pub fn best(&self, level: u32) -> Option<&LevelSummary> {
        self.entries.iter().find(|e| e.level == level)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest level with a recorded summary
    pub fn highest_level(&self) -> Option<u32> {
        self.entries.last().map(|e| e.level)
    }
}
