use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::Result;
use crate::grid::{CellId, ConnectionState, Grid};

pub type Rgb = [u8; 3];

// Color palette
pub const BLACK: Rgb = [0, 0, 0];
pub const WHITE: Rgb = [255, 255, 255];
pub const GREEN: Rgb = [0, 255, 0];
pub const RED: Rgb = [255, 0, 0];
pub const YELLOW: Rgb = [255, 255, 0];
pub const BLUE: Rgb = [0, 0, 255];
pub const MAGENTA: Rgb = [255, 0, 255];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub wall: Rgb,
    pub unconnected: Rgb,
    pub connected: Rgb,
    pub emphasized: Rgb,
    pub target: Rgb,
    pub path_active: Rgb,
    pub path_complete: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            wall: BLACK,
            unconnected: WHITE,
            connected: GREEN,
            emphasized: RED,
            target: YELLOW,
            path_active: BLUE,
            path_complete: MAGENTA,
        }
    }
}

impl Palette {
    pub fn connection(&self, state: ConnectionState) -> Rgb {
        match state {
            ConnectionState::Connected => self.connected,
            ConnectionState::PathActive => self.path_active,
            ConnectionState::PathComplete => self.path_complete,
            ConnectionState::PathDead
            | ConnectionState::Connectable
            | ConnectionState::NotConnectable => self.wall,
        }
    }

    pub fn cell(&self, grid: &Grid<Cell>, id: CellId) -> Result<Rgb> {
        let cell = grid.get_cell(id)?;
        if cell.emphasized {
            return Ok(self.emphasized);
        }
        if cell.target {
            return Ok(self.target);
        }
        if grid.has_connection_in(id, ConnectionState::Connected)? {
            return Ok(self.connected);
        }
        if grid.has_connection_in(id, ConnectionState::PathComplete)? {
            return Ok(self.path_complete);
        }
        if grid.has_connection_in(id, ConnectionState::PathActive)? {
            return Ok(self.path_active);
        }
        Ok(self.unconnected)
    }

    /// Colors for every cell, computed in parallel.
    pub fn cells(&self, grid: &Grid<Cell>) -> Result<Vec<Rgb>> {
        (0..grid.num_cells())
            .into_par_iter()
            .map(|id| self.cell(grid, id))
            .collect()
    }
}

/// Row-major flat pixel buffer addressed by `(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelMap {
    pub data: Vec<Rgb>,
    pub w: usize,
    pub h: usize,
}

impl PixelMap {
    pub fn new(w: usize, h: usize, fill: Rgb) -> Self {
        Self {
            data: vec![fill; w * h],
            w,
            h,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: Rgb) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    pub fn fill(&mut self, v: Rgb) {
        self.data.fill(v);
    }

    /// Opaque RGBA bytes, one row at a time in parallel.
    pub fn to_rgba(&self) -> Vec<u8> {
        let w = self.w;
        let mut rgba = vec![0u8; w * self.h * 4];
        if w == 0 {
            return rgba;
        }
        rgba.par_chunks_mut(w * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for x in 0..w {
                    let [r, g, b] = self.data[y * w + x];
                    row[x * 4..x * 4 + 4].copy_from_slice(&[r, g, b, 255]);
                }
            });
        rgba
    }
}
