use serde::Serialize;

use crate::CoreError;

/// Axis-aligned rectangle in grid-cell units covering the half-open range
/// `[x, x + width) × [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GridRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl GridRect {
    /// Validate signed coordinates from the API boundary.
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Result<Self, CoreError> {
        let rect = Self {
            x: non_negative("x", x)?,
            y: non_negative("y", y)?,
            width: non_negative("width", width)?,
            height: non_negative("height", height)?,
        };
        if rect.x.checked_add(rect.width).is_none() || rect.y.checked_add(rect.height).is_none()
        {
            return Err(CoreError::InvalidArgument(format!(
                "rectangle {rect:?} overflows grid coordinates"
            )));
        }
        Ok(rect)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.y..self.bottom()).contains(&row) && (self.x..self.right()).contains(&col)
    }
}

fn non_negative(label: &str, value: i64) -> Result<usize, CoreError> {
    usize::try_from(value)
        .map_err(|_| CoreError::InvalidArgument(format!("{label} must be non-negative, got {value}")))
}
