use std::collections::BTreeSet;
use std::time::Duration;

use log::debug;

use crate::cell::Cell;
use crate::config::Params;
use crate::error::{MazeError, Result};
use crate::grid::{CellId, Grid};
use crate::render::{PixelMap, Rgb};
use crate::rng::{Rng, SALT_GENERATE, SALT_SOLVE};
use crate::strategy::{DepthFirstSearch, HuntAndKill, Strategy};
use crate::surface::Surface;

pub type Coord = (usize, usize);

/// Pixel position of a cell: `(row * spacing, col * spacing)`.
pub fn cell_coord<T: Clone + Default>(grid: &Grid<T>, spacing: usize, id: CellId) -> Result<Coord> {
    let (row, col) = grid.row_col_from_id(id)?;
    Ok((row * spacing, col * spacing))
}

/// Slope of the line through two points, `None` when the line is vertical (x constant).
fn slope(a: Coord, b: Coord) -> Option<i64> {
    let dx = b.0 as i64 - a.0 as i64;
    if dx == 0 {
        return None;
    }
    Some((b.1 as i64 - a.1 as i64) / dx)
}

/// Pixels strictly between two cells. Neighbours share a row or a column,
/// so the line is either flat (slope 0) or vertical (no slope).
pub fn between<T: Clone + Default>(
    grid: &Grid<T>,
    spacing: usize,
    a: CellId,
    b: CellId,
) -> Result<Vec<Coord>> {
    let pa = cell_coord(grid, spacing, a)?;
    let pb = cell_coord(grid, spacing, b)?;
    let pixels = match slope(pa, pb) {
        Some(m) => {
            let offset = pa.1 as i64 - m * pa.0 as i64;
            (pa.0.min(pb.0) + 1..pa.0.max(pb.0))
                .map(|x| (x, (m * x as i64 + offset) as usize))
                .collect()
        }
        None => (pa.1.min(pb.1) + 1..pa.1.max(pb.1))
            .map(|y| (pa.0, y))
            .collect(),
    };
    Ok(pixels)
}

/// Runs a generation strategy and then a solving strategy over one grid,
/// projecting every change onto a surface.
///
/// The pixel buffer `map` is what the maze should look like; `shown` is what
/// the surface was last told. Only coordinates whose color differs between
/// the two are ever written.
pub struct Maze<S, G = HuntAndKill, V = DepthFirstSearch> {
    grid: Grid<Cell>,
    surface: S,
    params: Params,
    generator: G,
    solver: Option<V>,
    generate_rng: Rng,
    solve_rng: Rng,
    map: PixelMap,
    shown: PixelMap,
    pending: BTreeSet<Coord>,
    full_refresh: bool,
    generated: bool,
    solved: bool,
}

impl<S: Surface> Maze<S> {
    pub fn new(surface: S, seed: u64) -> Result<Self> {
        Self::with_params(surface, seed, Params::default())
    }
}

impl<S: Surface, G: Strategy, V: Strategy> Maze<S, G, V> {
    pub fn with_params(surface: S, seed: u64, params: Params) -> Result<Self> {
        let (w, h) = (surface.width(), surface.height());
        let (rows, cols) = params.grid_dims(w, h)?;
        let mut grid = Grid::new(rows, cols);
        let mut generate_rng = Rng::salted(seed, SALT_GENERATE);
        let generator = G::init(&mut grid, &mut generate_rng)?;
        debug!(
            "maze {}x{} cells on {}x{} pixels, seed {}",
            grid.rows(),
            grid.cols(),
            w,
            h,
            seed
        );

        let map = PixelMap::new(w, h, params.palette.wall);
        let mut maze = Self {
            grid,
            surface,
            params,
            generator,
            solver: None,
            generate_rng,
            solve_rng: Rng::salted(seed, SALT_SOLVE),
            shown: map.clone(),
            map,
            pending: BTreeSet::new(),
            full_refresh: false,
            generated: false,
            solved: false,
        };
        maze.generate_pixel_map()?;
        maze.draw_map();
        Ok(maze)
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn solver(&self) -> Option<&V> {
        self.solver.as_ref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn pixel_map(&self) -> &PixelMap {
        &self.map
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Advance generation by one step and return how long the caller should
    /// wait before the next one.
    pub fn generate_step(&mut self) -> Result<Duration> {
        if self.generated {
            return Err(MazeError::GenerationComplete);
        }
        match self.generator.step(&mut self.grid, &mut self.generate_rng) {
            Ok(step) => Ok(self.params.pacing.delay(step)),
            Err(MazeError::GenerationComplete) => {
                debug!("generation complete");
                self.generated = true;
                Ok(Duration::ZERO)
            }
            Err(e) => Err(e),
        }
    }

    pub fn solve_step(&mut self) -> Result<Duration> {
        if !self.generated {
            return Err(MazeError::GenerationIncomplete);
        }
        if self.solved {
            return Err(MazeError::AlreadySolved);
        }
        let solver = self.solver.as_mut().ok_or(MazeError::NotSolving)?;
        match solver.step(&mut self.grid, &mut self.solve_rng) {
            Ok(step) => Ok(self.params.pacing.delay(step)),
            Err(MazeError::AlreadySolved) => {
                debug!("maze solved");
                self.solved = true;
                Ok(Duration::ZERO)
            }
            Err(e) => Err(e),
        }
    }

    /// Reset per-cell flags, start the solver on the finished maze and repaint.
    pub fn swap_to_solving_mode(&mut self) -> Result<()> {
        if !self.generated {
            return Err(MazeError::GenerationIncomplete);
        }
        if self.solver.is_some() {
            return Err(MazeError::AlreadySolving);
        }
        for id in 0..self.grid.num_cells() {
            self.grid.set_cell(id, Cell::default())?;
        }
        self.solver = Some(V::init(&mut self.grid, &mut self.solve_rng)?);
        self.solved = false;
        debug!("swapped to solving mode");
        self.generate_pixel_map()?;
        self.flush();
        Ok(())
    }

    /// Recompute the whole pixel buffer from the grid. Pending dirty sets are
    /// dropped since the full pass covers them; the next `update_pixel_map`
    /// pushes whatever differs from the surface.
    pub fn generate_pixel_map(&mut self) -> Result<&PixelMap> {
        self.grid.drain_dirty_cells();
        self.grid.drain_dirty_connections();

        let spacing = self.params.spacing;
        let palette = self.params.palette;
        self.map.fill(palette.wall);
        for (a, b, state) in self.grid.connections() {
            let color = palette.connection(state);
            for (x, y) in between(&self.grid, spacing, a, b)? {
                self.map.set(x, y, color);
            }
        }
        for (id, color) in palette.cells(&self.grid)?.into_iter().enumerate() {
            let (x, y) = cell_coord(&self.grid, spacing, id)?;
            self.map.set(x, y, color);
        }
        self.full_refresh = true;
        Ok(&self.map)
    }

    /// Drain the grid's dirty sets, recompute only the affected pixels and push
    /// the ones that changed. Returns how many pixels were written.
    pub fn update_pixel_map(&mut self) -> Result<usize> {
        let spacing = self.params.spacing;
        let palette = self.params.palette;

        for (a, b) in self.grid.drain_dirty_connections() {
            let color = palette.connection(self.grid.query_connection(a, b)?);
            for (x, y) in between(&self.grid, spacing, a, b)? {
                self.map.set(x, y, color);
                self.pending.insert((x, y));
            }
        }
        // Cells last so their color wins over anything painted above.
        for id in self.grid.drain_dirty_cells() {
            let (x, y) = cell_coord(&self.grid, spacing, id)?;
            self.map.set(x, y, palette.cell(&self.grid, id)?);
            self.pending.insert((x, y));
        }
        Ok(self.flush())
    }

    /// Push every pixel of the buffer, changed or not.
    pub fn draw_map(&mut self) {
        for y in 0..self.map.h {
            for x in 0..self.map.w {
                self.put(x, y, self.map.get(x, y));
            }
        }
        self.pending.clear();
        self.full_refresh = false;
    }

    fn flush(&mut self) -> usize {
        let coords: Vec<Coord> = if self.full_refresh {
            (0..self.map.h)
                .flat_map(|y| (0..self.map.w).map(move |x| (x, y)))
                .collect()
        } else {
            std::mem::take(&mut self.pending).into_iter().collect()
        };
        let mut written = 0;
        for (x, y) in coords {
            let color = self.map.get(x, y);
            if self.shown.get(x, y) != color {
                self.put(x, y, color);
                written += 1;
            }
        }
        self.pending.clear();
        self.full_refresh = false;
        written
    }

    fn put(&mut self, x: usize, y: usize, [r, g, b]: Rgb) {
        self.surface.set_pixel(x, y, r, g, b);
        self.shown.set(x, y, [r, g, b]);
    }
}
