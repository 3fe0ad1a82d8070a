//! Grid and snapping settings

use serde::{Deserialize, Serialize};

/// Grid display and snap configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub show_grid: bool,
    /// Spacing between grid lines; also the snap increment
    pub grid_size: f32,
    pub snap_to_grid: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_size: 1.0,
            snap_to_grid: false,
        }
    }
}
