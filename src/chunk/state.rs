//! Chunk lifecycle state machine.

/// Lifecycle state of a chunk's data and mesh.
///
/// A single enumerated state replaces the scattered generated/meshed/dirty
/// booleans a chunk would otherwise carry, so that "meshed but not
/// generated" is unrepresentable. Two further conceptual states live
/// outside this enum: *unloaded* (absent from the lifecycle manager) and
/// *cached* (held by the LRU cache).
///
/// Legal transitions:
///
/// ```text
/// PendingGeneration -> PendingMeshing -> Meshed <-> Dirty
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Created but not yet generated; voxel data is all air and the chunk
    /// sits in the generation queue.
    PendingGeneration,

    /// Voxel data is populated; waiting for its first mesh.
    PendingMeshing,

    /// Voxel data and mesh are both up to date.
    Meshed,

    /// Voxel data changed after meshing; waiting for a re-mesh.
    Dirty,
}

impl ChunkState {
    /// Whether the chunk's voxel data has been generated.
    pub fn is_generated(self) -> bool {
        !matches!(self, ChunkState::PendingGeneration)
    }

    /// Whether the chunk currently needs a (re-)mesh.
    pub fn needs_meshing(self) -> bool {
        matches!(self, ChunkState::PendingMeshing | ChunkState::Dirty)
    }

    /// Whether the chunk has an up-to-date mesh.
    pub fn is_meshed(self) -> bool {
        matches!(self, ChunkState::Meshed)
    }

    /// Whether moving from this state to `next` is a legal transition.
    /// Staying in the same state is always legal.
    pub fn can_transition_to(self, next: ChunkState) -> bool {
        use ChunkState::*;
        matches!(
            (self, next),
            (PendingGeneration, PendingMeshing)
                | (PendingMeshing, Meshed)
                | (Meshed, Dirty)
                | (Dirty, Meshed)
        ) || self == next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_generation_is_not_generated() {
        assert!(!ChunkState::PendingGeneration.is_generated());
        assert!(ChunkState::PendingMeshing.is_generated());
        assert!(ChunkState::Meshed.is_generated());
        assert!(ChunkState::Dirty.is_generated());
    }

    #[test]
    fn needs_meshing() {
        assert!(ChunkState::PendingMeshing.needs_meshing());
        assert!(ChunkState::Dirty.needs_meshing());
        assert!(!ChunkState::Meshed.needs_meshing());
        assert!(!ChunkState::PendingGeneration.needs_meshing());
    }

    #[test]
    fn legal_transitions() {
        use ChunkState::*;
        assert!(PendingGeneration.can_transition_to(PendingMeshing));
        assert!(PendingMeshing.can_transition_to(Meshed));
        assert!(Meshed.can_transition_to(Dirty));
        assert!(Dirty.can_transition_to(Meshed));
    }

    #[test]
    fn illegal_transitions() {
        use ChunkState::*;
        // Meshing an ungenerated chunk is unrepresentable.
        assert!(!PendingGeneration.can_transition_to(Meshed));
        assert!(!PendingGeneration.can_transition_to(Dirty));
        // A mesh never goes backwards to ungenerated.
        assert!(!Meshed.can_transition_to(PendingGeneration));
        assert!(!Dirty.can_transition_to(PendingGeneration));
        // Dirty chunks re-mesh directly.
        assert!(!Meshed.can_transition_to(PendingMeshing));
    }

    #[test]
    fn identity_transition_is_legal() {
        for state in [
            ChunkState::PendingGeneration,
            ChunkState::PendingMeshing,
            ChunkState::Meshed,
            ChunkState::Dirty,
        ] {
            assert!(state.can_transition_to(state));
        }
    }
}
