use fogbound_core::FogGrid;

/// Build a grid from ASCII rows: `#` is a set cell, anything else is clear.
/// Rows keep their own length, so ragged grids are easy to write.
pub fn grid_from_rows(rows: &[&str]) -> FogGrid {
    FogGrid::from_rows(
        rows.iter()
            .map(|row| row.chars().map(|c| c == '#').collect())
            .collect(),
    )
}

/// Inverse of [`grid_from_rows`], handy in assertion messages.
pub fn render_grid(grid: &FogGrid) -> Vec<String> {
    grid.rows()
        .iter()
        .map(|row| row.iter().map(|&cell| if cell { '#' } else { '.' }).collect())
        .collect()
}
