//! # Kvad — Immediate-Mode Vertex Buffer Builder
//!
//! A CPU-side geometry accumulator for immediate-style rendering: callers
//! push vertices and quads into a growable binary buffer, optionally sort
//! quads back-to-front for alpha blending, and hand the finished byte range
//! to a rendering collaborator.
//!
//! The core pieces, leaf to root:
//!
//! - [`format::VertexFormat`] — declares the per-vertex channel layout
//!   (position, color, UV, normal, lightmap) with byte offsets and a stride.
//! - [`buffer::RecordBuffer`] — a contiguous, growable byte region divided
//!   into fixed-stride vertex records, with typed accessors.
//! - [`builder::VertexBuilder`] — the channel-packing API; accumulates
//!   vertices and pre-baked quads, tints them, injects lightmaps, offsets
//!   whole quads spatially.
//! - [`sort`] — reorders quad records farthest-to-nearest relative to a
//!   camera point (painter's algorithm), in place or into a fresh array.
//!
//! Everything is single-threaded and synchronous. Rendering itself is out of
//! scope: finished geometry leaves through the [`draw::DrawTarget`] seam.

pub mod buffer;
pub mod builder;
pub mod color;
pub mod draw;
pub mod format;
pub mod quad;
pub mod sort;

#[cfg(feature = "wgpu")]
pub mod gpu;

pub use builder::{BuilderState, VertexBuilder};
pub use draw::{DrawTarget, PrimitiveMode};
pub use format::{VertexChannel, VertexFormat};
pub use quad::{BakedQuad, Face};
