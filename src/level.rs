//! Level layout descriptors
//!
//! A layout is an ordered list of grid cells with a block kind each. The
//! simulation treats it as initial block data only; `validate` is for
//! whoever loads layouts from outside the crate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{GRID_COLUMNS, GRID_ROWS};
use crate::sim::BlockKind;

/// Layout problems found while loading level data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("cell ({row}, {column}) is outside the block grid")]
    OutOfGrid { row: u32, column: u32 },
    #[error("cell ({row}, {column}) is used more than once")]
    DuplicateCell { row: u32, column: u32 },
    #[error("count-breaker at ({row}, {column}) needs at least one hit")]
    MissingHits { row: u32, column: u32 },
}

/// One block of a layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub row: u32,
    pub column: u32,
    pub kind: BlockKind,
    /// Hits to destroy; only read for count-breakers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hits: Option<u32>,
}

impl LayoutEntry {
    pub fn new(row: u32, column: u32, kind: BlockKind) -> Self {
        Self {
            row,
            column,
            kind,
            hits: None,
        }
    }

    pub fn count_breaker(row: u32, column: u32, hits: u32) -> Self {
        Self {
            row,
            column,
            kind: BlockKind::CountBreaker,
            hits: Some(hits),
        }
    }
}

/// Initial block population for one level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub entries: Vec<LayoutEntry>,
}

impl LevelLayout {
    pub fn from_entries(entries: Vec<LayoutEntry>) -> Self {
        Self { entries }
    }

    /// Fill the first `rows` rows of every column with one kind
    pub fn uniform(rows: u32, kind: BlockKind) -> Self {
        let rows = rows.min(GRID_ROWS);
        let entries = (0..GRID_COLUMNS)
            .flat_map(|column| (0..rows).map(move |row| (row, column)))
            .map(|(row, column)| match kind {
                BlockKind::CountBreaker => LayoutEntry::count_breaker(row, column, 1),
                _ => LayoutEntry::new(row, column, kind),
            })
            .collect();
        Self { entries }
    }

    /// Lowest occupied row, if any
    pub fn max_row(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.row).max()
    }

    /// Check every entry fits the grid, cells are unique and count-breakers
    /// carry a hit count
    pub fn validate(&self) -> Result<(), LevelError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            let (row, column) = (entry.row, entry.column);
            if row >= GRID_ROWS || column >= GRID_COLUMNS {
                return Err(LevelError::OutOfGrid { row, column });
            }
            if !seen.insert((row, column)) {
                return Err(LevelError::DuplicateCell { row, column });
            }
            if entry.kind == BlockKind::CountBreaker && entry.hits.unwrap_or(0) == 0 {
                return Err(LevelError::MissingHits { row, column });
            }
        }
        Ok(())
    }
}
