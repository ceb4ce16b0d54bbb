pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod maze;
pub mod render;
pub mod rng;
pub mod strategy;
pub mod surface;

use std::time::{Duration, Instant};

use log::info;

use config::Params;
use error::Result;
use maze::Maze;
use surface::ImageSurface;

/// Snapshots of one complete run.
pub struct Run {
    pub w: usize,
    pub h: usize,
    /// The finished maze, before solving.
    pub maze_rgba: Vec<u8>,
    /// The maze with its solution drawn in.
    pub solution_rgba: Vec<u8>,
    pub generation_steps: usize,
    pub solving_steps: usize,
    /// Sum of every delay the maze asked for; how long a paced display would take.
    pub paced: Duration,
}

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Generate and solve a maze on a `w` x `h` pixel image, stepping each phase
/// to completion the way a display driver would.
pub fn run(seed: u64, w: usize, h: usize, params: &Params) -> Result<(Run, Vec<Timing>)> {
    let mut timings = Vec::new();
    let total_start = Instant::now();
    let mut paced = Duration::ZERO;

    // 1. Build the grid and paint the empty maze
    let t = Instant::now();
    let mut maze: Maze<ImageSurface> =
        Maze::with_params(ImageSurface::new(w, h)?, seed, params.clone())?;
    timings.push(Timing {
        name: "setup",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 2. Hunt-and-kill until every cell is joined
    let t = Instant::now();
    let mut generation_steps = 0;
    while !maze.is_generated() {
        paced += maze.generate_step()?;
        maze.update_pixel_map()?;
        generation_steps += 1;
    }
    let maze_rgba = maze.surface().to_rgba();
    timings.push(Timing {
        name: "generate",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 3. Depth-first search from a random start to a random goal
    let t = Instant::now();
    maze.swap_to_solving_mode()?;
    let mut solving_steps = 0;
    while !maze.is_solved() {
        paced += maze.solve_step()?;
        maze.update_pixel_map()?;
        solving_steps += 1;
    }
    let solution_rgba = maze.surface().to_rgba();
    timings.push(Timing {
        name: "solve",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });
    info!(
        "seed {}: {} generation steps, {} solving steps",
        seed, generation_steps, solving_steps
    );

    let run = Run {
        w,
        h,
        maze_rgba,
        solution_rgba,
        generation_steps,
        solving_steps,
        paced,
    };
    Ok((run, timings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn run_produces_both_snapshots() {
        let (run, timings) = run(42, 32, 24, &Params::default()).unwrap();
        assert_eq!(run.maze_rgba.len(), 32 * 24 * 4);
        assert_eq!(run.solution_rgba.len(), 32 * 24 * 4);
        assert_ne!(run.maze_rgba, run.solution_rgba);
        // 16 x 12 cells: one carving step per edge plus the completing step.
        assert_eq!(run.generation_steps, 16 * 12);
        assert!(run.solving_steps > 0);
        assert!(run.paced > Duration::ZERO);
        assert_eq!(timings.last().map(|t| t.name), Some("TOTAL"));
    }

    #[test]
    fn same_seed_same_pictures() {
        let (a, _) = run(7, 20, 20, &Params::default()).unwrap();
        let (b, _) = run(7, 20, 20, &Params::default()).unwrap();
        assert_eq!(a.maze_rgba, b.maze_rgba);
        assert_eq!(a.solution_rgba, b.solution_rgba);
    }
}
