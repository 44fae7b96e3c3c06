//! # World Module
//!
//! The chunk lifecycle manager: the central coordinator for chunk loading,
//! generation, meshing, and unloading.
//!
//! ## Architecture
//!
//! `ChunkManager` owns the active chunk map, the pending-generation and
//! pending-meshing queues, and the LRU cache of unloaded chunks. Work is
//! processed cooperatively from a periodic tick driven by the caller, with
//! explicit budgets bounding each call: a chunk count for generation and a
//! wall-clock budget for meshing. Nothing here blocks or runs in the
//! background.
//!
//! ## Collaborators
//!
//! Voxel content comes from a [`ChunkGenerator`]; finished meshes go to a
//! [`MeshConsumer`], which owns the rendered representation and hands back
//! an opaque [`MeshHandle`]. Both live outside this crate's scope.
//!
//! ## Chunk flow
//!
//! ```text
//! request_load -> generation queue -> generator -> meshing queue
//!              -> mesher -> consumer.upload -> active (meshed)
//! request_unload -> cache (or discard)  ->  cache hit on re-entry
//! ```

use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;

use log::{debug, trace, warn};
use web_time::Instant;

use crate::cache::{CacheStats, LruCache};
use crate::chunk::{Chunk, ChunkState, MeshHandle};
use crate::config::TerrainConfig;
use crate::coords::ChunkCoord;
use crate::error::ConfigError;
use crate::meshing::{self, MeshBuffers};

pub mod generator;
pub mod streamer;

pub use generator::ChunkGenerator;
pub use streamer::TerrainStreamer;

/// Receives finished chunk meshes and owns their rendered representation.
///
/// The terrain core calls `upload` with freshly meshed buffers and stores
/// the returned handle on the chunk; `release` is called exactly once per
/// handle when the mesh is replaced or its chunk is destroyed.
pub trait MeshConsumer {
    /// Takes ownership of a chunk's mesh data; the buffers are only valid
    /// for the duration of the call.
    fn upload(&mut self, coord: ChunkCoord, buffers: &MeshBuffers) -> MeshHandle;

    /// Releases a previously issued handle.
    fn release(&mut self, coord: ChunkCoord, handle: MeshHandle);
}

/// Owns the set of live chunks and drives them through their lifecycle.
pub struct ChunkManager<G: ChunkGenerator> {
    config: TerrainConfig,
    generator: G,
    chunks: HashMap<ChunkCoord, Chunk>,
    generation_queue: VecDeque<ChunkCoord>,
    meshing_queue: VecDeque<ChunkCoord>,
    cache: Option<LruCache<ChunkCoord, Chunk>>,
    scratch: MeshBuffers,
    generated_total: u64,
    meshed_total: u64,
}

impl<G: ChunkGenerator> ChunkManager<G> {
    /// Creates a manager from a validated configuration and a generator.
    ///
    /// # Returns
    /// The manager, or the first configuration constraint the given
    /// config violates.
    pub fn new(config: TerrainConfig, generator: G) -> Result<Self, ConfigError> {
        config.validate()?;
        let cache = if config.caching_enabled {
            // validate() guarantees a nonzero capacity when caching is on.
            let capacity = NonZeroUsize::new(config.cache_capacity)
                .ok_or(ConfigError::InvalidCacheCapacity)?;
            Some(LruCache::new(capacity))
        } else {
            None
        };
        Ok(ChunkManager {
            config,
            generator,
            chunks: HashMap::new(),
            generation_queue: VecDeque::new(),
            meshing_queue: VecDeque::new(),
            cache,
            scratch: MeshBuffers::new(),
            generated_total: 0,
            meshed_total: 0,
        })
    }

    /// Requests that a chunk be loaded.
    ///
    /// Idempotent: a coordinate that is already active (in any state,
    /// including pending) is a no-op. A cached chunk is reactivated
    /// directly, skipping generation and meshing entirely; otherwise an
    /// empty chunk is created and queued for generation.
    pub fn request_load(&mut self, coord: ChunkCoord) {
        if self.chunks.contains_key(&coord) {
            return;
        }

        if let Some(cache) = self.cache.as_mut() {
            if let Some(chunk) = cache.take(&coord) {
                trace!("reactivating cached chunk {coord:?}");
                if chunk.state().needs_meshing() {
                    self.meshing_queue.push_back(coord);
                }
                self.chunks.insert(coord, chunk);
                return;
            }
        }

        debug!("queueing chunk {coord:?} for generation");
        self.chunks
            .insert(coord, Chunk::new(coord, self.config.chunk_size));
        self.generation_queue.push_back(coord);
    }

    /// Requests that a chunk be unloaded.
    ///
    /// With caching enabled the chunk (voxels and mesh handle included)
    /// moves into the LRU cache for possible reuse; a chunk evicted by the
    /// insertion is destroyed and its mesh handle released through the
    /// consumer. With caching disabled the chunk is released and
    /// discarded immediately. Ungenerated chunks are simply dropped.
    pub fn request_unload<C: MeshConsumer>(&mut self, coord: ChunkCoord, consumer: &mut C) {
        let Some(mut chunk) = self.chunks.remove(&coord) else {
            return;
        };

        if !chunk.state().is_generated() {
            // Nothing worth keeping; the stale generation-queue entry is
            // skipped when it surfaces.
            trace!("dropping ungenerated chunk {coord:?}");
            return;
        }

        match self.cache.as_mut() {
            Some(cache) => {
                debug!("caching unloaded chunk {coord:?}");
                if let Some(mut evicted) = cache.put(coord, chunk) {
                    let evicted_coord = evicted.coord();
                    debug!("cache evicted chunk {evicted_coord:?}");
                    if let Some(handle) = evicted.take_mesh_handle() {
                        consumer.release(evicted_coord, handle);
                    }
                }
            }
            None => {
                debug!("discarding unloaded chunk {coord:?}");
                if let Some(handle) = chunk.take_mesh_handle() {
                    consumer.release(coord, handle);
                }
            }
        }
    }

    /// Drains the pending-generation queue, up to the configured maximum
    /// chunks per call.
    ///
    /// A generator failure affects only its own chunk: the failure is
    /// logged, the chunk is removed (so a later load request retries it),
    /// and processing continues with the remaining entries.
    ///
    /// # Returns
    /// The number of queue entries processed (successes and failures).
    pub fn process_generation_queue(&mut self) -> usize {
        let budget = self.config.max_generated_per_tick;
        let expected_len = self.config.voxels_per_chunk();
        let mut processed = 0;

        while processed < budget {
            let Some(coord) = self.generation_queue.pop_front() else {
                break;
            };
            // Skip entries whose chunk was unloaded or already generated.
            let pending = self
                .chunks
                .get(&coord)
                .is_some_and(|chunk| chunk.state() == ChunkState::PendingGeneration);
            if !pending {
                continue;
            }
            processed += 1;

            match self.generator.generate(coord, self.config.chunk_size) {
                Ok(voxels) if voxels.len() == expected_len => {
                    let chunk = self.chunks.get_mut(&coord).unwrap();
                    chunk.set_voxels(voxels);
                    self.meshing_queue.push_back(coord);
                    self.generated_total += 1;
                    trace!("generated chunk {coord:?}");
                }
                Ok(voxels) => {
                    warn!(
                        "generator returned {} voxels for chunk {coord:?}, expected {expected_len}; chunk unloaded",
                        voxels.len()
                    );
                    self.chunks.remove(&coord);
                }
                Err(err) => {
                    warn!("{err}; chunk unloaded");
                    self.chunks.remove(&coord);
                }
            }
        }
        processed
    }

    /// Drains the pending-meshing queue until it is empty or the
    /// configured time budget is exhausted.
    ///
    /// The budget is advisory backpressure: it stops new chunks from being
    /// started, but a chunk already being meshed always finishes.
    ///
    /// # Returns
    /// The number of chunks meshed.
    pub fn process_meshing_queue<C: MeshConsumer>(&mut self, consumer: &mut C) -> usize {
        let budget = self.config.meshing_budget();
        let start = Instant::now();
        let mut meshed = 0;

        while let Some(coord) = self.meshing_queue.pop_front() {
            // Skip entries whose chunk was unloaded or already re-meshed.
            let Some(chunk) = self.chunks.get_mut(&coord) else {
                continue;
            };
            if !chunk.state().needs_meshing() {
                continue;
            }

            meshing::mesh_chunk(chunk, &mut self.scratch);
            if let Some(old) = chunk.take_mesh_handle() {
                consumer.release(coord, old);
            }
            let handle = consumer.upload(coord, &self.scratch);
            chunk.set_mesh_handle(handle);
            chunk.set_state(ChunkState::Meshed);
            meshed += 1;
            self.meshed_total += 1;

            if start.elapsed() >= budget {
                break;
            }
        }
        if meshed > 0 {
            debug!("meshed {meshed} chunks in {:?}", start.elapsed());
        }
        meshed
    }

    /// Re-enqueues an active, meshed chunk for meshing without touching
    /// its voxel data.
    ///
    /// # Returns
    /// Whether the chunk was marked (false if it is absent, ungenerated,
    /// or already pending a mesh).
    pub fn mark_dirty(&mut self, coord: ChunkCoord) -> bool {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        if chunk.state() != ChunkState::Meshed {
            return false;
        }
        chunk.set_state(ChunkState::Dirty);
        self.meshing_queue.push_back(coord);
        true
    }

    /// Writes a single voxel in an active, generated chunk and marks the
    /// chunk for re-meshing.
    ///
    /// # Returns
    /// Whether the write happened.
    pub fn set_voxel(
        &mut self,
        coord: ChunkCoord,
        local: (usize, usize, usize),
        voxel: crate::voxel::VoxelType,
    ) -> bool {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        if !chunk.state().is_generated() {
            return false;
        }
        let was_meshed = chunk.state() == ChunkState::Meshed;
        chunk.set_voxel(local.0, local.1, local.2, voxel);
        if was_meshed {
            self.meshing_queue.push_back(coord);
        }
        true
    }

    /// Whether a chunk is active (in any state, including pending).
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// The active chunk at a coordinate, if any.
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Number of active chunks.
    pub fn active_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates the coordinates of every active chunk.
    pub fn active_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Number of chunks waiting for generation.
    pub fn queued_generation(&self) -> usize {
        self.generation_queue.len()
    }

    /// Number of chunks waiting for meshing.
    pub fn queued_meshing(&self) -> usize {
        self.meshing_queue.len()
    }

    /// Number of chunks currently held by the cache.
    pub fn cached_count(&self) -> usize {
        self.cache.as_ref().map_or(0, LruCache::len)
    }

    /// The cache's running statistics, if caching is enabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(LruCache::stats)
    }

    /// Total chunks generated since construction.
    pub fn generated_total(&self) -> u64 {
        self.generated_total
    }

    /// Total chunk meshes produced since construction.
    pub fn meshed_total(&self) -> u64 {
        self.meshed_total
    }

    /// The manager's configuration.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }
}
