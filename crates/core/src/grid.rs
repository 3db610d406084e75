use serde::{Deserialize, Serialize};

use crate::{CoreError, GridRect};

/// A ragged two-dimensional boolean field, row-major with the origin at the
/// top-left. Cells past the end of a row, or rows past the end of the grid,
/// read as `false`.
///
/// Grid operations only ever grow the backing rows; the sole way to shrink a
/// grid is [`FogGrid::clear`]. Serializes as a bare array of arrays so ragged
/// row lengths survive a round trip unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FogGrid {
    rows: Vec<Vec<bool>>,
}

impl FogGrid {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<bool>> {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    /// Length of the longest row.
    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    pub fn count_true(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.iter().filter(|&&cell| cell).count())
            .sum()
    }

    /// True when every set cell of `other` is also set here.
    pub fn contains_all(&self, other: &FogGrid) -> bool {
        other.rows.iter().enumerate().all(|(r, row)| {
            row.iter()
                .enumerate()
                .all(|(c, &cell)| !cell || self.get(r, c))
        })
    }

    /// Grow so that there are at least `min_rows` rows and each of the first
    /// `min_rows` rows holds at least `min_cols` cells. New cells are `false`.
    /// Never truncates. Returns whether anything was allocated.
    pub fn ensure_size(&mut self, min_rows: usize, min_cols: usize) -> bool {
        let mut grew = false;
        if self.rows.len() < min_rows {
            self.rows.resize_with(min_rows, Vec::new);
            grew = true;
        }
        for row in self.rows.iter_mut().take(min_rows) {
            if row.len() < min_cols {
                row.resize(min_cols, false);
                grew = true;
            }
        }
        grew
    }

    /// Cell-wise OR of `other` into `self`. The result covers the union of both
    /// extents, row by row. Returns whether the stored grid changed in content
    /// or shape.
    pub fn merge_or(&mut self, other: &FogGrid) -> bool {
        let mut changed = false;
        if self.rows.len() < other.rows.len() {
            self.rows.resize_with(other.rows.len(), Vec::new);
            changed = true;
        }
        for (row, incoming) in self.rows.iter_mut().zip(&other.rows) {
            if row.len() < incoming.len() {
                row.resize(incoming.len(), false);
                changed = true;
            }
            for (cell, &seen) in row.iter_mut().zip(incoming) {
                if seen && !*cell {
                    *cell = true;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Set every cell in `rect` to `true`, growing the grid to cover
    /// `rect.bottom()` rows and `rect.right()` columns. An empty rectangle is a
    /// no-op and allocates nothing.
    pub fn fill_rect(&mut self, rect: &GridRect) -> bool {
        if rect.is_empty() {
            return false;
        }
        let mut changed = self.ensure_size(rect.bottom(), rect.right());
        for row in &mut self.rows[rect.y..rect.bottom()] {
            for cell in &mut row[rect.x..rect.right()] {
                if !*cell {
                    *cell = true;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Set every cell in `rect` that lies within the current bounds to
    /// `false`. Never grows the grid.
    pub fn clear_rect(&mut self, rect: &GridRect) -> bool {
        let mut changed = false;
        let bottom = rect.bottom().min(self.rows.len());
        for row in self.rows.iter_mut().take(bottom).skip(rect.y) {
            let right = rect.right().min(row.len());
            if rect.x >= right {
                continue;
            }
            for cell in &mut row[rect.x..right] {
                if *cell {
                    *cell = false;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Drop every row.
    pub fn clear(&mut self) -> bool {
        let changed = !self.rows.is_empty();
        self.rows.clear();
        changed
    }

    pub fn to_msgpack(&self) -> Result<Vec<u8>, CoreError> {
        rmp_serde::to_vec(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, CoreError> {
        rmp_serde::from_slice(bytes).map_err(|e| CoreError::Serialization(e.to_string()))
    }
}

impl From<Vec<Vec<bool>>> for FogGrid {
    fn from(rows: Vec<Vec<bool>>) -> Self {
        Self::from_rows(rows)
    }
}
