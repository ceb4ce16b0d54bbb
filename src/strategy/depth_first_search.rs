use log::{debug, trace};

use crate::cell::Cell;
use crate::error::{MazeError, Result};
use crate::grid::{CellId, ConnectionState, Grid};
use crate::rng::Rng;
use crate::strategy::{Step, Strategy};

/// Depth-first search from a random start to a random goal.
///
/// Forward moves mark edges `PathActive`; leaving a dead end marks the edge
/// `PathDead`. Once the goal is reached the stack is unwound back to the
/// start, turning every edge on it `PathComplete`.
#[derive(Clone, Debug)]
pub struct DepthFirstSearch {
    path: Vec<CellId>,
    start: CellId,
    current: CellId,
    goal: CellId,
    goal_found: bool,
}

impl DepthFirstSearch {
    pub fn start(&self) -> CellId {
        self.start
    }

    pub fn goal(&self) -> CellId {
        self.goal
    }

    pub fn current(&self) -> CellId {
        self.current
    }

    pub fn goal_found(&self) -> bool {
        self.goal_found
    }

    /// Cells on the stack, start first.
    pub fn path(&self) -> &[CellId] {
        &self.path
    }

    fn connected_unvisited(&self, grid: &Grid<Cell>) -> Result<Vec<CellId>> {
        let mut out = Vec::new();
        for n in grid.get_cell_ids_matching(self.current, ConnectionState::Connected)? {
            if !grid.get_cell(n)?.visited {
                out.push(n);
            }
        }
        Ok(out)
    }

    fn advance(&mut self, grid: &mut Grid<Cell>, next: CellId) -> Result<()> {
        grid.modify_connection(self.current, next, ConnectionState::PathActive)?;
        let mut cell = grid.get_cell(next)?;
        cell.visited = true;
        grid.set_cell(next, cell)?;
        trace!("advance {} -> {}", self.current, next);
        self.current = next;
        self.path.push(next);
        if next == self.goal {
            debug!("goal {} found, path length {}", next, self.path.len());
            self.goal_found = true;
        }
        Ok(())
    }

    fn backtrack(&mut self, grid: &mut Grid<Cell>, resolved: ConnectionState) -> Result<()> {
        if self.path.len() <= 1 {
            return Err(MazeError::BacktrackExhausted);
        }
        let &previous = self
            .path
            .get(self.path.len() - 2)
            .ok_or(MazeError::BacktrackExhausted)?;
        grid.modify_connection(previous, self.current, resolved)?;
        self.path.pop();
        trace!("backtrack {} -> {} ({:?})", self.current, previous, resolved);
        self.current = previous;
        Ok(())
    }

    fn search(&mut self, grid: &mut Grid<Cell>) -> Result<Step> {
        if self.goal_found {
            self.backtrack(grid, ConnectionState::PathComplete)?;
            return Ok(Step::Retraced);
        }
        // Lowest id first keeps the walk reproducible.
        if let Some(&next) = self.connected_unvisited(grid)?.first() {
            self.advance(grid, next)?;
            return Ok(Step::Advanced);
        }
        self.backtrack(grid, ConnectionState::PathDead)?;
        Ok(Step::Backtracked)
    }
}

impl Strategy for DepthFirstSearch {
    fn init(grid: &mut Grid<Cell>, rng: &mut Rng) -> Result<Self> {
        let n = grid.num_cells();
        if n < 2 {
            return Err(MazeError::TooFewCells {
                needed: 2,
                available: n,
            });
        }
        let start = rng.range_usize(n);
        // Draw from the n - 1 other cells so start and goal always differ.
        let mut goal = rng.range_usize(n - 1);
        if goal >= start {
            goal += 1;
        }

        let mut cell = grid.get_cell(start)?;
        cell.visited = true;
        grid.set_cell(start, cell)?;
        let mut cell = grid.get_cell(goal)?;
        cell.target = true;
        grid.set_cell(goal, cell)?;

        debug!("solving from {} to {}", start, goal);
        Ok(Self {
            path: vec![start],
            start,
            current: start,
            goal,
            goal_found: false,
        })
    }

    fn step(&mut self, grid: &mut Grid<Cell>, _rng: &mut Rng) -> Result<Step> {
        match self.search(grid) {
            Err(MazeError::BacktrackExhausted) if self.goal_found => Err(MazeError::AlreadySolved),
            other => other,
        }
    }
}
