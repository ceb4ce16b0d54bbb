/// Per-cell payload. Grid stores it by value and never looks inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Reached by the running strategy.
    pub visited: bool,
    /// Highlighted until the next walk step (set when a hunt lands here).
    pub emphasized: bool,
    /// Goal of the solving strategy.
    pub target: bool,
}

impl Cell {
    pub fn visited() -> Self {
        Self {
            visited: true,
            ..Self::default()
        }
    }
}
