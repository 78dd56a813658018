//! Build summaries.

use serde::Serialize;

/// Outcome of building one zoom level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelReport {
    pub zoom: u32,
    /// Points partitioned at this level
    pub points: usize,
    /// Distinct tiles the points fell into
    pub groups: usize,
    pub image_tiles: usize,
    pub data_tiles: usize,
    /// Tiles that could not be rendered or written
    pub failed: usize,
}

/// Outcome of a full pyramid build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub levels: Vec<LevelReport>,
    pub image_tiles: usize,
    pub data_tiles: usize,
    pub failed: usize,
}

impl BuildReport {
    pub(crate) fn push(&mut self, level: LevelReport) {
        self.image_tiles += level.image_tiles;
        self.data_tiles += level.data_tiles;
        self.failed += level.failed;
        self.levels.push(level);
    }

    pub fn level(&self, zoom: u32) -> Option<&LevelReport> {
        self.levels.iter().find(|l| l.zoom == zoom)
    }

    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}
