//! # Face Module
//!
//! This module defines the six faces of an axis-aligned voxel cube and the
//! axis/direction decomposition the mesher sweeps over.

/// Represents the six possible faces of a voxel cube.
///
/// Each face pairs a principal axis (0 = X, 1 = Y, 2 = Z) with a
/// direction along that axis.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Face {
    /// The left face (facing negative X).
    Left,

    /// The right face (facing positive X).
    Right,

    /// The bottom face (facing negative Y).
    Bottom,

    /// The top face (facing positive Y).
    Top,

    /// The back face (facing negative Z).
    Back,

    /// The front face (facing positive Z).
    Front,
}

impl Face {
    /// Returns all six faces in axis order, negative direction first.
    pub fn all() -> [Face; 6] {
        [
            Face::Left,
            Face::Right,
            Face::Bottom,
            Face::Top,
            Face::Back,
            Face::Front,
        ]
    }

    /// The principal axis of this face: 0 for X, 1 for Y, 2 for Z.
    pub fn axis(self) -> usize {
        match self {
            Face::Left | Face::Right => 0,
            Face::Bottom | Face::Top => 1,
            Face::Back | Face::Front => 2,
        }
    }

    /// Whether this face points along the positive direction of its axis.
    pub fn is_positive(self) -> bool {
        matches!(self, Face::Right | Face::Top | Face::Front)
    }

    /// The signed step (`+1` or `-1`) from a voxel to the neighbor this
    /// face looks at.
    pub fn step(self) -> i32 {
        if self.is_positive() {
            1
        } else {
            -1
        }
    }

    /// The outward unit normal of this face.
    pub fn normal(self) -> [f32; 3] {
        match self {
            Face::Left => [-1.0, 0.0, 0.0],
            Face::Right => [1.0, 0.0, 0.0],
            Face::Bottom => [0.0, -1.0, 0.0],
            Face::Top => [0.0, 1.0, 0.0],
            Face::Back => [0.0, 0.0, -1.0],
            Face::Front => [0.0, 0.0, 1.0],
        }
    }

    /// The face on the opposite side of the cube.
    pub fn opposite(self) -> Face {
        match self {
            Face::Left => Face::Right,
            Face::Right => Face::Left,
            Face::Bottom => Face::Top,
            Face::Top => Face::Bottom,
            Face::Back => Face::Front,
            Face::Front => Face::Back,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_cover_all_three() {
        let mut per_axis = [0; 3];
        for face in Face::all() {
            per_axis[face.axis()] += 1;
        }
        assert_eq!(per_axis, [2, 2, 2]);
    }

    #[test]
    fn normal_matches_axis_and_direction() {
        for face in Face::all() {
            let normal = face.normal();
            assert_eq!(normal[face.axis()], face.step() as f32);
            for (axis, component) in normal.iter().enumerate() {
                if axis != face.axis() {
                    assert_eq!(*component, 0.0);
                }
            }
        }
    }

    #[test]
    fn opposite_is_involution() {
        for face in Face::all() {
            assert_ne!(face.opposite(), face);
            assert_eq!(face.opposite().opposite(), face);
            assert_eq!(face.opposite().axis(), face.axis());
        }
    }
}
