use log::trace;

use crate::cell::Cell;
use crate::error::{MazeError, Result};
use crate::grid::{CellId, ConnectionState, Grid};
use crate::rng::Rng;
use crate::strategy::{Step, Strategy};

/// Hunt-and-Kill maze generation.
///
/// Walks randomly into unvisited neighbours until boxed in, then hunts
/// (ascending id) for the first unvisited cell bordering the visited
/// region and joins it. Done when the hunt comes back empty.
#[derive(Clone, Debug)]
pub struct HuntAndKill {
    current: CellId,
}

impl HuntAndKill {
    pub fn current(&self) -> CellId {
        self.current
    }

    fn connectable_with_visited(
        grid: &Grid<Cell>,
        id: CellId,
        visited: bool,
    ) -> Result<Vec<CellId>> {
        let mut out = Vec::new();
        for n in grid.get_cell_ids_matching(id, ConnectionState::Connectable)? {
            if grid.get_cell(n)?.visited == visited {
                out.push(n);
            }
        }
        Ok(out)
    }

    pub fn walk(&mut self, grid: &mut Grid<Cell>, rng: &mut Rng) -> Result<()> {
        let mut cell = grid.get_cell(self.current)?;
        if cell.emphasized {
            cell.emphasized = false;
            grid.set_cell(self.current, cell)?;
        }

        let candidates = Self::connectable_with_visited(grid, self.current, false)?;
        let &next = rng.choose(&candidates).ok_or(MazeError::WalkNotPossible)?;
        grid.modify_connection(self.current, next, ConnectionState::Connected)?;

        let mut cell = grid.get_cell(next)?;
        cell.visited = true;
        grid.set_cell(next, cell)?;
        trace!("walk {} -> {}", self.current, next);
        self.current = next;
        Ok(())
    }

    pub fn hunt(&mut self, grid: &mut Grid<Cell>, rng: &mut Rng) -> Result<()> {
        for id in 0..grid.num_cells() {
            if grid.get_cell(id)?.visited {
                continue;
            }
            let anchors = Self::connectable_with_visited(grid, id, true)?;
            let Some(&anchor) = rng.choose(&anchors) else {
                continue;
            };
            grid.modify_connection(id, anchor, ConnectionState::Connected)?;
            let mut cell = grid.get_cell(id)?;
            cell.visited = true;
            cell.emphasized = true;
            grid.set_cell(id, cell)?;
            trace!("hunt found {} next to {}", id, anchor);
            self.current = id;
            return Ok(());
        }
        Err(MazeError::GenerationComplete)
    }
}

impl Strategy for HuntAndKill {
    fn init(grid: &mut Grid<Cell>, rng: &mut Rng) -> Result<Self> {
        if grid.num_cells() == 0 {
            return Err(MazeError::TooFewCells {
                needed: 1,
                available: 0,
            });
        }
        let start = rng.range_usize(grid.num_cells());
        grid.set_cell(start, Cell::visited())?;
        Ok(Self { current: start })
    }

    fn step(&mut self, grid: &mut Grid<Cell>, rng: &mut Rng) -> Result<Step> {
        match self.walk(grid, rng) {
            Ok(()) => Ok(Step::Walked),
            Err(MazeError::WalkNotPossible) => self.hunt(grid, rng).map(|()| Step::Hunted),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};
    use test_log::test;

    fn generate(rows: usize, cols: usize, seed: u64) -> (Grid<Cell>, Vec<Step>) {
        let mut grid = Grid::new(rows, cols);
        let mut rng = Rng::new(seed);
        let mut strat = HuntAndKill::init(&mut grid, &mut rng).unwrap();
        let mut steps = Vec::new();
        loop {
            match strat.step(&mut grid, &mut rng) {
                Ok(step) => steps.push(step),
                Err(MazeError::GenerationComplete) => break,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        (grid, steps)
    }

    #[test]
    fn init_marks_start_visited() {
        let mut grid = Grid::new(8, 8);
        let mut rng = Rng::new(3);
        let strat = HuntAndKill::init(&mut grid, &mut rng).unwrap();
        assert!(strat.current() < 64);
        assert!(grid.get_cell(strat.current()).unwrap().visited);
    }

    #[test]
    fn walking_eventually_gets_stuck() {
        let mut grid = Grid::new(8, 8);
        let mut rng = Rng::new(11);
        let mut strat = HuntAndKill::init(&mut grid, &mut rng).unwrap();
        let mut path = vec![strat.current()];
        loop {
            match strat.walk(&mut grid, &mut rng) {
                Ok(()) => path.push(strat.current()),
                Err(MazeError::WalkNotPossible) => break,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        let unique: HashSet<_> = path.iter().collect();
        assert_eq!(unique.len(), path.len());
        for id in &path {
            assert!(grid.get_cell(*id).unwrap().visited);
        }
        // Every step of the walk is a carved passage.
        for w in path.windows(2) {
            assert_eq!(
                grid.query_connection(w[0], w[1]).unwrap(),
                ConnectionState::Connected
            );
        }
    }

    #[test]
    fn hunt_emphasizes_and_walk_clears() {
        // 0 - 1 - 2 with only the middle cell visited.
        let mut grid = Grid::<Cell>::new(1, 3);
        grid.set_cell(1, Cell::visited()).unwrap();
        let mut rng = Rng::new(5);
        let mut strat = HuntAndKill { current: 1 };

        strat.hunt(&mut grid, &mut rng).unwrap();
        assert_eq!(strat.current(), 0);
        let hunted = grid.get_cell(0).unwrap();
        assert!(hunted.visited && hunted.emphasized);
        assert_eq!(
            grid.get_cell_ids_matching(0, ConnectionState::Connected).unwrap(),
            vec![1]
        );

        assert_eq!(
            strat.walk(&mut grid, &mut rng),
            Err(MazeError::WalkNotPossible)
        );
        assert!(!grid.get_cell(0).unwrap().emphasized);

        strat.hunt(&mut grid, &mut rng).unwrap();
        assert_eq!(strat.current(), 2);
        assert_eq!(
            grid.query_connection(1, 2).unwrap(),
            ConnectionState::Connected
        );
        assert_eq!(
            strat.hunt(&mut grid, &mut rng),
            Err(MazeError::GenerationComplete)
        );
    }

    #[test]
    fn hunt_picks_lowest_unvisited_cell_next_to_the_visited_region() {
        for seed in 0..50 {
            let mut grid = Grid::<Cell>::new(6, 6);
            let mut rng = Rng::new(seed);
            let mut strat = HuntAndKill::init(&mut grid, &mut rng).unwrap();
            loop {
                while strat.walk(&mut grid, &mut rng).is_ok() {}
                let expected = (0..grid.num_cells()).find(|&id| {
                    !grid.get_cell(id).unwrap().visited
                        && !HuntAndKill::connectable_with_visited(&grid, id, true)
                            .unwrap()
                            .is_empty()
                });
                match (expected, strat.hunt(&mut grid, &mut rng)) {
                    (Some(id), Ok(())) => assert_eq!(strat.current(), id, "seed {}", seed),
                    (None, Err(MazeError::GenerationComplete)) => break,
                    (expected, got) => panic!("seed {}: expected {:?}, got {:?}", seed, expected, got),
                }
            }
        }
    }

    #[test]
    fn produces_a_spanning_tree() {
        for (rows, cols, seed) in [(1, 1, 1), (1, 7, 2), (5, 5, 3), (6, 9, 4), (16, 16, 5)] {
            let (grid, steps) = generate(rows, cols, seed);
            let n = rows * cols;
            assert!((0..n).all(|id| grid.get_cell(id).unwrap().visited));

            let edges: Vec<_> = grid
                .connections()
                .filter(|&(_, _, s)| s == ConnectionState::Connected)
                .collect();
            assert_eq!(edges.len(), n - 1);
            assert_eq!(steps.len(), n - 1);

            // n - 1 edges and connected means acyclic.
            let mut seen = vec![false; n];
            let mut queue = VecDeque::from([0]);
            seen[0] = true;
            while let Some(id) = queue.pop_front() {
                for next in grid.get_cell_ids_matching(id, ConnectionState::Connected).unwrap() {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let (a, _) = generate(10, 10, 77);
        let (b, _) = generate(10, 10, 77);
        let ea: Vec<_> = a.connections().collect();
        let eb: Vec<_> = b.connections().collect();
        assert_eq!(ea, eb);
    }

    #[test]
    fn stays_complete() {
        let (mut grid, _) = generate(3, 3, 9);
        let mut rng = Rng::new(0);
        let mut strat = HuntAndKill { current: 0 };
        assert_eq!(
            strat.step(&mut grid, &mut rng),
            Err(MazeError::GenerationComplete)
        );
    }

    #[test]
    fn empty_grid_is_rejected() {
        let mut grid = Grid::<Cell>::new(0, 4);
        let mut rng = Rng::new(0);
        assert!(matches!(
            HuntAndKill::init(&mut grid, &mut rng),
            Err(MazeError::TooFewCells { .. })
        ));
    }
}
