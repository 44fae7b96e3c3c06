//! # Streaming Demo
//!
//! Drives the terrain core without a renderer: an observer wanders across
//! a Perlin heightmap world while the streamer, lifecycle manager, and
//! cache do their work. Run with `RUST_LOG=debug` for per-tick detail.

use cgmath::Point3;
use log::info;

use voxel_terrain::chunk::MeshHandle;
use voxel_terrain::config::{StreamingTopology, TerrainConfig};
use voxel_terrain::coords::ChunkCoord;
use voxel_terrain::meshing::MeshBuffers;
use voxel_terrain::world::generator::PerlinHeightmapGenerator;
use voxel_terrain::world::{ChunkManager, MeshConsumer, TerrainStreamer};

/// Stands in for a renderer: counts meshes and their geometry instead of
/// uploading them.
#[derive(Default)]
struct StatsConsumer {
    next_handle: u64,
    uploads: u64,
    releases: u64,
    quads: u64,
}

impl MeshConsumer for StatsConsumer {
    fn upload(&mut self, _coord: ChunkCoord, buffers: &MeshBuffers) -> MeshHandle {
        self.uploads += 1;
        self.quads += buffers.quad_count() as u64;
        self.next_handle += 1;
        MeshHandle(self.next_handle)
    }

    fn release(&mut self, _coord: ChunkCoord, _handle: MeshHandle) {
        self.releases += 1;
    }
}

fn main() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    let config = TerrainConfig {
        load_radius: 4,
        unload_radius: 6,
        topology: StreamingTopology::Flat { y: 0 },
        update_interval_millis: 0,
        ..TerrainConfig::default()
    };

    let generator = PerlinHeightmapGenerator::new(42);
    let mut manager = ChunkManager::new(config.clone(), generator).unwrap();
    let mut streamer = TerrainStreamer::new(&config).unwrap();
    let mut consumer = StatsConsumer::default();

    let mut rng = fastrand::Rng::with_seed(7);
    let mut observer = Point3::new(0.0f32, 8.0, 0.0);
    let step = config.chunk_size as f32 * config.voxel_size * 0.5;

    info!("streaming demo: 200 ticks of observer drift");
    for tick in 0..200u32 {
        observer.x += (rng.f32() - 0.3) * step;
        observer.z += (rng.f32() - 0.5) * step;
        streamer.set_observer(observer);

        streamer.update(&mut manager, &mut consumer, false);
        manager.process_generation_queue();
        manager.process_meshing_queue(&mut consumer);

        if tick % 20 == 0 {
            info!(
                "tick {tick}: observer chunk {:?}, {} active, {} pending gen, {} pending mesh",
                streamer.observer_chunk(),
                manager.active_count(),
                manager.queued_generation(),
                manager.queued_meshing(),
            );
        }
    }

    // Drain whatever the per-tick budgets left behind.
    while manager.queued_generation() > 0 || manager.queued_meshing() > 0 {
        manager.process_generation_queue();
        manager.process_meshing_queue(&mut consumer);
    }

    info!(
        "done: {} chunks generated, {} meshes uploaded ({} quads), {} released",
        manager.generated_total(),
        consumer.uploads,
        consumer.quads,
        consumer.releases,
    );
    if let Some(stats) = manager.cache_stats() {
        info!(
            "cache: {} entries, {} hits / {} misses ({:.1}% hit rate), {} evictions",
            manager.cached_count(),
            stats.hits,
            stats.misses,
            stats.hit_rate() * 100.0,
            stats.evictions,
        );
    }
}
