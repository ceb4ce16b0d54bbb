use std::fmt;

use crate::grid::{CellId, ConnectionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    OutOfRange {
        id: CellId,
        num_cells: usize,
    },
    RowColOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    InvalidTransition {
        a: CellId,
        b: CellId,
        from: ConnectionState,
        to: ConnectionState,
    },
    WalkNotPossible,
    BacktrackExhausted,
    GenerationComplete,
    GenerationIncomplete,
    NotSolving,
    AlreadySolving,
    AlreadySolved,
    TooFewCells {
        needed: usize,
        available: usize,
    },
    TooManyCells {
        requested: usize,
        max: usize,
    },
    InvalidParams(&'static str),
}

impl MazeError {
    /// Terminal, expected end-of-algorithm signals. Drivers stop stepping on these.
    pub fn is_completion(&self) -> bool {
        matches!(self, Self::GenerationComplete | Self::AlreadySolved)
    }
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { id, num_cells } => {
                write!(f, "cell id {} out of range (grid has {} cells)", id, num_cells)
            }
            Self::RowColOutOfRange { row, col, rows, cols } => write!(
                f,
                "cell ({}, {}) out of range (grid is {}x{})",
                row, col, rows, cols
            ),
            Self::InvalidTransition { a, b, from, to } => write!(
                f,
                "connection {}-{} cannot move from {:?} to {:?}",
                a, b, from, to
            ),
            Self::WalkNotPossible => {
                write!(f, "cannot walk further, every connectable neighbor is visited")
            }
            Self::BacktrackExhausted => write!(f, "cannot backtrack further, path is empty"),
            Self::GenerationComplete => write!(f, "generation complete"),
            Self::GenerationIncomplete => write!(f, "generation has not completed"),
            Self::NotSolving => write!(f, "maze has not been swapped to solving mode"),
            Self::AlreadySolving => write!(f, "maze is already in solving mode"),
            Self::AlreadySolved => write!(f, "maze already solved"),
            Self::TooFewCells { needed, available } => write!(
                f,
                "need at least {} cells, grid has {}",
                needed, available
            ),
            Self::TooManyCells { requested, max } => write!(
                f,
                "{} cells requested, at most {} allowed",
                requested, max
            ),
            Self::InvalidParams(msg) => write!(f, "invalid parameters: {}", msg),
        }
    }
}

impl std::error::Error for MazeError {}

pub type Result<T> = std::result::Result<T, MazeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn completion_signals() {
        assert!(MazeError::GenerationComplete.is_completion());
        assert!(MazeError::AlreadySolved.is_completion());
        assert!(!MazeError::BacktrackExhausted.is_completion());
        assert!(!MazeError::OutOfRange { id: 3, num_cells: 2 }.is_completion());
    }

    #[test]
    fn messages_name_the_cells() {
        let e = MazeError::InvalidTransition {
            a: 0,
            b: 11,
            from: ConnectionState::NotConnectable,
            to: ConnectionState::Connected,
        };
        assert_eq!(
            e.to_string(),
            "connection 0-11 cannot move from NotConnectable to Connected"
        );
    }
}
