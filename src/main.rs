use std::path::PathBuf;

use anyhow::Context;
use log::{debug, info};
use mazegen::config::Params;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let seed: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let width: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(64);
    let height: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(64);
    let out_dir: PathBuf = args
        .get(4)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));

    std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;

    let params = Params::default();
    debug!("params: {}", serde_json::to_string(&params)?);

    info!(
        "Generating {}x{} maze with seed={}, spacing={}",
        width, height, seed, params.spacing
    );

    let (run, timings) = mazegen::run(seed, width, height, &params)?;

    info!("Timings:");
    for t in &timings {
        info!("  {:20} {:8.1} ms", t.name, t.ms);
    }
    info!(
        "{} generation steps, {} solving steps, {:.1} s when paced",
        run.generation_steps,
        run.solving_steps,
        run.paced.as_secs_f64()
    );

    let save = |name: &str, rgba: &[u8]| -> anyhow::Result<()> {
        let path = out_dir.join(name);
        image::save_buffer(&path, rgba, run.w as u32, run.h as u32, image::ColorType::Rgba8)
            .with_context(|| format!("failed to save {}", path.display()))?;
        info!("Saved {}", path.display());
        Ok(())
    };

    save("maze.png", &run.maze_rgba)?;
    save("solution.png", &run.solution_rgba)?;

    Ok(())
}
