//! wgpu-facing format translation (`wgpu` feature).
//!
//! A collaborator that submits finished buffers through wgpu needs a
//! `wgpu::VertexBufferLayout` matching the records it receives. This
//! module derives one from a [`VertexFormat`]: channels become attributes
//! in declaration order with sequential shader locations.

use crate::format::{VertexChannel, VertexFormat};

/// Owned attribute list for one vertex format, from which a borrowed
/// `wgpu::VertexBufferLayout` can be produced.
pub struct VertexLayout {
    attributes: Vec<wgpu::VertexAttribute>,
    stride: wgpu::BufferAddress,
}

impl VertexLayout {
    pub fn new(format: &VertexFormat) -> Self {
        let attributes = format
            .channels()
            .iter()
            .enumerate()
            .map(|(location, &channel)| wgpu::VertexAttribute {
                offset: format.offset_of(channel).unwrap_or(0) as wgpu::BufferAddress,
                shader_location: location as u32,
                format: attribute_format(channel),
            })
            .collect();

        VertexLayout {
            attributes,
            stride: format.stride() as wgpu::BufferAddress,
        }
    }

    pub fn attributes(&self) -> &[wgpu::VertexAttribute] {
        &self.attributes
    }

    /// The layout to hand to a render pipeline descriptor.
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// The wgpu attribute format consuming each channel's bytes.
///
/// Color maps to `Unorm8x4` so shaders see `[0, 1]` floats; the normal's
/// packed signed bytes arrive as `Snorm8x4` with an unused `w`.
fn attribute_format(channel: VertexChannel) -> wgpu::VertexFormat {
    match channel {
        VertexChannel::Position => wgpu::VertexFormat::Float32x3,
        VertexChannel::Color => wgpu::VertexFormat::Unorm8x4,
        VertexChannel::Uv => wgpu::VertexFormat::Float32x2,
        VertexChannel::Normal => wgpu::VertexFormat::Snorm8x4,
        VertexChannel::LightMap => wgpu::VertexFormat::Uint16x2,
    }
}
