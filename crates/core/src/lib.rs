pub mod clock;
pub mod error;
pub mod grid;
pub mod ids;
pub mod rect;
pub mod record;

pub use clock::Timestamp;
pub use error::CoreError;
pub use grid::FogGrid;
pub use ids::*;
pub use rect::GridRect;
pub use record::{DEFAULT_GRID_CELL_SIZE, FogRecord};
