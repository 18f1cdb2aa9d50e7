//! # Draw — The Rendering Collaborator Seam
//!
//! This crate never issues draw calls itself. A finished buffer leaves
//! through [`DrawTarget::submit_draw`], which receives the clipped byte
//! range, the topology, the vertex count, and the format — everything a
//! backend needs to bind a layout and draw. Texture enable/disable is the
//! one piece of fixed-function state the builder orchestrates (a draw with
//! a UV-less format must not sample); everything else (blending, lighting,
//! texture binding) stays with the caller.

use crate::format::VertexFormat;

/// Primitive topology for a batch of vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveMode {
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    /// 4 consecutive vertices per primitive. The only topology the
    /// quad-level operations (tint, lightmap, offset, depth sort) apply to.
    Quads,
}

impl PrimitiveMode {
    /// Whether vertices in this mode form 4-record quad groups.
    pub fn is_quads(self) -> bool {
        self == PrimitiveMode::Quads
    }
}

/// Receives finished geometry for submission.
///
/// Implementations wrap whatever the actual rendering backend is; tests use
/// a recording implementation. `vertices` holds exactly
/// `vertex_count * format.stride()` bytes, packed per `format`.
pub trait DrawTarget {
    fn submit_draw(
        &mut self,
        vertices: &[u8],
        mode: PrimitiveMode,
        vertex_count: usize,
        format: &VertexFormat,
    );

    /// Fixed-function texture toggle around untextured draws. Backends
    /// without that concept keep the default no-op.
    fn set_texture_enabled(&mut self, _enabled: bool) {}
}
