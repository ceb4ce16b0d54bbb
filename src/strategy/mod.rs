pub mod depth_first_search;
pub mod hunt_and_kill;

pub use depth_first_search::DepthFirstSearch;
pub use hunt_and_kill::HuntAndKill;

use crate::cell::Cell;
use crate::error::Result;
use crate::grid::Grid;
use crate::rng::Rng;

/// What a single strategy step did. `Maze` turns this into a pacing delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Generation carved into an unvisited neighbour.
    Walked,
    /// Generation found a fresh cell by scanning and joined it to the maze.
    Hunted,
    /// Solving moved forward onto an unvisited cell.
    Advanced,
    /// Solving retreated out of a dead end.
    Backtracked,
    /// Solving walked back along the found path, marking it complete.
    Retraced,
}

/// A pluggable algorithm driving a `Grid` one transition at a time.
///
/// Strategies never hold the grid; it is lent to them for each call.
pub trait Strategy: Sized {
    fn init(grid: &mut Grid<Cell>, rng: &mut Rng) -> Result<Self>;
    fn step(&mut self, grid: &mut Grid<Cell>, rng: &mut Rng) -> Result<Step>;
}
