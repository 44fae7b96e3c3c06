#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

//! # Voxel Terrain
//!
//! The computational core of a voxel engine: chunked voxel storage, greedy
//! meshing, budgeted chunk lifecycle management, LRU caching of unloaded
//! chunks, and radius-based terrain streaming around a moving observer.
//!
//! ## Key Modules
//!
//! * `coords` - Pure coordinate math between world, voxel, and chunk space
//! * `voxel` - Voxel types, faces, and appearance
//! * `chunk` - The dense cubic chunk and its lifecycle state machine
//! * `meshing` - The greedy mesher and its output buffers
//! * `cache` - A generic O(1) LRU cache with eviction notification
//! * `world` - The chunk lifecycle manager, terrain streamer, and
//!   generator implementations
//! * `config` - The validated configuration surface
//!
//! ## Architecture
//!
//! The core is single-threaded and cooperative: the caller drives it from
//! a periodic tick, and per-tick budgets (a chunk count for generation, a
//! wall-clock budget for meshing) bound the work done per call. Rendering,
//! input, and persistence stay outside, behind the
//! [`ChunkGenerator`](world::ChunkGenerator) and
//! [`MeshConsumer`](world::MeshConsumer) traits.
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::Point3;
//! use voxel_terrain::config::TerrainConfig;
//! use voxel_terrain::world::generator::PerlinHeightmapGenerator;
//! use voxel_terrain::world::{ChunkManager, TerrainStreamer};
//! # use voxel_terrain::world::MeshConsumer;
//! # use voxel_terrain::meshing::MeshBuffers;
//! # use voxel_terrain::chunk::MeshHandle;
//! # use voxel_terrain::coords::ChunkCoord;
//! # struct MyRenderer;
//! # impl MeshConsumer for MyRenderer {
//! #     fn upload(&mut self, _: ChunkCoord, _: &MeshBuffers) -> MeshHandle { MeshHandle(0) }
//! #     fn release(&mut self, _: ChunkCoord, _: MeshHandle) {}
//! # }
//!
//! let config = TerrainConfig::default();
//! let mut manager =
//!     ChunkManager::new(config.clone(), PerlinHeightmapGenerator::new(42)).unwrap();
//! let mut streamer = TerrainStreamer::new(&config).unwrap();
//! let mut renderer = MyRenderer;
//!
//! // Per tick:
//! streamer.set_observer(Point3::new(0.0, 0.0, 0.0));
//! streamer.update(&mut manager, &mut renderer, false);
//! manager.process_generation_queue();
//! manager.process_meshing_queue(&mut renderer);
//! ```

pub mod cache;
pub mod chunk;
pub mod config;
pub mod coords;
pub mod error;
pub mod meshing;
pub mod voxel;
pub mod world;

pub use cache::{CacheStats, LruCache, SharedLruCache};
pub use chunk::{Chunk, ChunkState, MeshHandle};
pub use config::{StreamingTopology, TerrainConfig};
pub use coords::ChunkCoord;
pub use error::{ConfigError, GenerationError};
pub use meshing::{mesh_chunk, MeshBuffers, Quad, Vertex};
pub use voxel::{Face, VoxelType};
pub use world::{ChunkGenerator, ChunkManager, MeshConsumer, TerrainStreamer};
