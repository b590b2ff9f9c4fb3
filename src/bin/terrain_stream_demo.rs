use std::time::{Duration, Instant};

use anyhow::Context;
use cgmath::Point2;
use endless_terrain::{ChunkCoord, ChunkDisplay, Color32, TerrainConfig, TerrainError, TerrainMesh, TerrainSession};

/// Counts what a renderer would have received
#[derive(Default)]
struct CountingDisplay {
    meshes: usize,
    vertices: usize,
    triangles: usize,
    visible: usize,
    failed: usize,
}

impl ChunkDisplay for CountingDisplay {
    fn mesh_ready(&mut self, _coord: ChunkCoord, _origin: Point2<f32>, mesh: &TerrainMesh, _colors: &[Color32]) {
        self.meshes += 1;
        self.vertices += mesh.vertex_count();
        self.triangles += mesh.triangle_count();
    }

    fn visibility_changed(&mut self, _coord: ChunkCoord, visible: bool) {
        if visible {
            self.visible += 1;
        } else {
            self.visible = self.visible.saturating_sub(1);
        }
    }

    fn chunk_failed(&mut self, coord: ChunkCoord, error: &TerrainError) {
        log::error!("chunk {} failed: {}", coord, error);
        self.failed += 1;
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => TerrainConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => TerrainConfig::default(),
    };

    println!("Endless Terrain - Headless Streaming Demo");
    println!("=========================================");
    println!(
        "Chunk size {}, view distance {}, seed {}",
        config.chunk_size(),
        config.streaming.view_distance,
        config.noise.seed
    );

    let mut session = TerrainSession::new(config, CountingDisplay::default())?;

    let start = Instant::now();
    let settled = session.pregenerate(Point2::new(0.0, 0.0), Duration::from_secs(60));
    println!(
        "\nPregenerated around the origin in {:.1}ms (settled: {})",
        start.elapsed().as_secs_f64() * 1000.0,
        settled
    );

    // Walk east along x, one chunk per step
    let step = session.config().chunk_size();
    for i in 1..=8 {
        let viewer = Point2::new(i as f32 * step, 0.0);
        let report = session.tick(viewer);
        session.pipeline().wait_until_idle(Duration::from_secs(10));
        println!(
            "Step {}: viewer ({:.0}, {:.0}) created {} shown {} hidden {} visible {}",
            i, viewer.x, viewer.y, report.chunks_created, report.chunks_shown, report.chunks_hidden, report.visible
        );
    }
    let final_viewer = Point2::new(8.0 * step, 0.0);
    session.pregenerate(final_viewer, Duration::from_secs(60));

    let stats = session.stats();
    let display = session.display();
    println!("\nSummary");
    println!("-------");
    println!("Ticks:            {}", stats.ticks);
    println!("Chunks:           {} ({} ready, {} failed)", stats.streamer.chunk_count, stats.streamer.ready, stats.streamer.failed);
    println!("Visible:          {}", display.visible);
    println!("Meshes displayed: {} ({} vertices, {} triangles)", display.meshes, display.vertices, display.triangles);
    println!(
        "Height jobs:      {} ({:.2}ms avg)",
        stats.pipeline.workers.height.tasks_completed, stats.pipeline.workers.height.average_task_time_ms
    );
    println!(
        "Mesh jobs:        {} ({:.2}ms avg)",
        stats.pipeline.workers.mesh.tasks_completed, stats.pipeline.workers.mesh.average_task_time_ms
    );

    if display.failed > 0 {
        anyhow::bail!("{} chunks failed to generate", display.failed);
    }
    Ok(())
}
