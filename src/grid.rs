use crate::error::{MazeError, Result};

pub type CellId = usize;

/// State of the connection between an unordered pair of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    NotConnectable,
    Connectable,
    Connected,
    PathActive,
    PathDead,
    PathComplete,
}

impl ConnectionState {
    pub const ALL: [ConnectionState; 6] = [
        ConnectionState::NotConnectable,
        ConnectionState::Connectable,
        ConnectionState::Connected,
        ConnectionState::PathActive,
        ConnectionState::PathDead,
        ConnectionState::PathComplete,
    ];

    /// Legal-transition table. A wall opens into a passage during generation,
    /// a passage becomes a candidate during solving and then resolves for good.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Connectable, Connected)
                | (Connected, Connectable)
                | (Connected, PathActive)
                | (PathActive, PathDead)
                | (PathActive, PathComplete)
        )
    }
}

/// Rectangular grid of cells with a symmetric N x N connection-state matrix.
/// Ids are row-major: `id = row * cols + col`.
/// Adjacency (4-neighbour) is fixed at construction.
#[derive(Clone, Debug)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
    /// Flat row-major `num_cells x num_cells` matrix.
    states: Vec<ConnectionState>,
    dirty_cells: Vec<CellId>,
    dirty_connections: Vec<(CellId, CellId)>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        let n = rows * cols;
        let mut states = vec![ConnectionState::NotConnectable; n * n];
        for id in 0..n {
            let (row, col) = (id / cols, id % cols);
            // Only look right and up; the mirrored entry covers left and down.
            if col + 1 < cols {
                let right = id + 1;
                states[id * n + right] = ConnectionState::Connectable;
                states[right * n + id] = ConnectionState::Connectable;
            }
            if row + 1 < rows {
                let up = id + cols;
                states[id * n + up] = ConnectionState::Connectable;
                states[up * n + id] = ConnectionState::Connectable;
            }
        }
        Self {
            rows,
            cols,
            cells: vec![T::default(); n],
            states,
            dirty_cells: Vec::new(),
            dirty_connections: Vec::new(),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn check(&self, id: CellId) -> Result<()> {
        if id < self.num_cells() {
            Ok(())
        } else {
            Err(MazeError::OutOfRange {
                id,
                num_cells: self.num_cells(),
            })
        }
    }

    #[inline]
    fn at(&self, a: CellId, b: CellId) -> usize {
        a * self.num_cells() + b
    }

    pub fn id_from_row_col(&self, row: usize, col: usize) -> Result<CellId> {
        if row >= self.rows || col >= self.cols {
            return Err(MazeError::RowColOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    pub fn row_col_from_id(&self, id: CellId) -> Result<(usize, usize)> {
        self.check(id)?;
        Ok((id / self.cols, id % self.cols))
    }

    pub fn query_connection(&self, a: CellId, b: CellId) -> Result<ConnectionState> {
        self.check(a)?;
        self.check(b)?;
        Ok(self.states[self.at(a, b)])
    }

    /// Apply `next` to both `(a, b)` and `(b, a)`. Illegal requests leave the grid untouched.
    pub fn modify_connection(&mut self, a: CellId, b: CellId, next: ConnectionState) -> Result<()> {
        let current = self.query_connection(a, b)?;
        if !current.can_transition_to(next) {
            return Err(MazeError::InvalidTransition {
                a,
                b,
                from: current,
                to: next,
            });
        }
        let (ab, ba) = (self.at(a, b), self.at(b, a));
        self.states[ab] = next;
        self.states[ba] = next;
        self.dirty_connections.push((a, b));
        self.dirty_connections.push((b, a));
        self.dirty_cells.push(a);
        self.dirty_cells.push(b);
        Ok(())
    }

    pub fn get_cell(&self, id: CellId) -> Result<T> {
        self.check(id)?;
        Ok(self.cells[id].clone())
    }

    pub fn set_cell(&mut self, id: CellId, cell: T) -> Result<()> {
        self.check(id)?;
        self.cells[id] = cell;
        self.dirty_cells.push(id);
        Ok(())
    }

    /// Every id whose state with `id` equals `state`, ascending.
    pub fn get_cell_ids_matching(&self, id: CellId, state: ConnectionState) -> Result<Vec<CellId>> {
        self.check(id)?;
        let n = self.num_cells();
        let row = &self.states[id * n..(id + 1) * n];
        Ok(row
            .iter()
            .enumerate()
            .filter(|&(_, s)| *s == state)
            .map(|(i, _)| i)
            .collect())
    }

    /// Does `id` have at least one connection in `state`? Same scan as
    /// `get_cell_ids_matching` without the allocation.
    pub fn has_connection_in(&self, id: CellId, state: ConnectionState) -> Result<bool> {
        self.check(id)?;
        let n = self.num_cells();
        Ok(self.states[id * n..(id + 1) * n].contains(&state))
    }

    /// Every connectable pair `(a, b)` with `a < b`, and its current state.
    pub fn connections(&self) -> impl Iterator<Item = (CellId, CellId, ConnectionState)> + '_ {
        let n = self.num_cells();
        (0..n).flat_map(move |a| {
            (a + 1..n).filter_map(move |b| {
                let s = self.states[a * n + b];
                (s != ConnectionState::NotConnectable).then_some((a, b, s))
            })
        })
    }

    pub fn drain_dirty_cells(&mut self) -> Vec<CellId> {
        std::mem::take(&mut self.dirty_cells)
    }

    pub fn drain_dirty_connections(&mut self) -> Vec<(CellId, CellId)> {
        std::mem::take(&mut self.dirty_connections)
    }
}
