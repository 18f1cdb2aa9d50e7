//! Baked quad records — pre-packed 4-vertex blocks with a facing.

use glam::IVec3;

/// One of the six axis-aligned facings a baked quad can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Face {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Face {
    /// Unit direction vector of this facing (Y-up, north = -Z).
    pub const fn direction(self) -> IVec3 {
        match self {
            Face::Down => IVec3::NEG_Y,
            Face::Up => IVec3::Y,
            Face::North => IVec3::NEG_Z,
            Face::South => IVec3::Z,
            Face::West => IVec3::NEG_X,
            Face::East => IVec3::X,
        }
    }
}

/// A pre-baked quad: exactly 4 consecutive vertex records, already packed
/// in some vertex format's layout, plus the face the quad points toward.
///
/// The record data is opaque words; it only has meaning against a matching
/// [`VertexFormat`](crate::format::VertexFormat). The builder validates
/// the length against its active stride before bulk-copying and rejects
/// mismatched blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BakedQuad {
    vertex_data: Vec<u32>,
    face: Face,
}

impl BakedQuad {
    pub fn new(vertex_data: Vec<u32>, face: Face) -> Self {
        BakedQuad { vertex_data, face }
    }

    /// The packed 4-vertex record block, as words.
    pub fn vertex_data(&self) -> &[u32] {
        &self.vertex_data
    }

    pub fn face(&self) -> Face {
        self.face
    }
}
