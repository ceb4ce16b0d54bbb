use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};
use crate::render::Palette;
use crate::strategy::Step;

/// All tunable parameters for a maze run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Pixels between neighbouring cell centres. 2 leaves exactly one pixel for the wall.
    pub spacing: usize,
    /// Largest grid accepted. The connection matrix is quadratic in this.
    pub max_cells: usize,
    pub palette: Palette,
    pub pacing: Pacing,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            spacing: 2,
            max_cells: 64 * 64,
            palette: Palette::default(),
            pacing: Pacing::default(),
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<()> {
        if self.spacing == 0 {
            return Err(MazeError::InvalidParams("spacing must be at least 1"));
        }
        Ok(())
    }

    /// Rows and columns of the grid laid over a `w` x `h` surface.
    pub fn grid_dims(&self, w: usize, h: usize) -> Result<(usize, usize)> {
        self.validate()?;
        let (rows, cols) = (w.div_ceil(self.spacing), h.div_ceil(self.spacing));
        match rows.checked_mul(cols) {
            Some(n) if n <= self.max_cells => Ok((rows, cols)),
            requested => Err(MazeError::TooManyCells {
                requested: requested.unwrap_or(usize::MAX),
                max: self.max_cells,
            }),
        }
    }
}

/// Suggested pause after each kind of step, in microseconds.
/// Walks go by fast, hunts linger so the jump is visible.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    pub walk_us: u64,
    pub hunt_us: u64,
    pub advance_us: u64,
    pub backtrack_us: u64,
    pub retrace_us: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            walk_us: 1,
            hunt_us: 250_000,
            advance_us: 20_000,
            backtrack_us: 20_000,
            retrace_us: 10_000,
        }
    }
}

impl Pacing {
    pub fn delay(&self, step: Step) -> Duration {
        let us = match step {
            Step::Walked => self.walk_us,
            Step::Hunted => self.hunt_us,
            Step::Advanced => self.advance_us,
            Step::Backtracked => self.backtrack_us,
            Step::Retraced => self.retrace_us,
        };
        Duration::from_micros(us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn walk_paces_faster_than_hunt() {
        let p = Pacing::default();
        assert!(p.delay(Step::Walked) < p.delay(Step::Hunted));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let params: Params = serde_json::from_str(r#"{"spacing": 3}"#).unwrap();
        assert_eq!(params.spacing, 3);
        assert_eq!(params.pacing, Pacing::default());
        assert_eq!(params.palette, Palette::default());
    }

    #[test]
    fn zero_spacing_rejected() {
        let params = Params {
            spacing: 0,
            ..Params::default()
        };
        assert!(matches!(params.validate(), Err(MazeError::InvalidParams(_))));
    }

    #[test]
    fn cell_cap_applies_to_grid_dims() {
        let params = Params::default();
        assert_eq!(params.grid_dims(128, 128), Ok((64, 64)));
        assert_eq!(
            params.grid_dims(130, 128),
            Err(MazeError::TooManyCells {
                requested: 65 * 64,
                max: 64 * 64,
            })
        );
        assert_eq!(
            params.grid_dims(usize::MAX, usize::MAX),
            Err(MazeError::TooManyCells {
                requested: usize::MAX,
                max: 64 * 64,
            })
        );
    }
}
