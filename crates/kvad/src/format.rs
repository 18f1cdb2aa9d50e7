//! # Format — Per-Vertex Channel Layout
//!
//! A [`VertexFormat`] describes how one vertex record is laid out in memory:
//! which channels it carries, at what byte offset each one sits, and the
//! total stride. It is immutable after construction — every write the
//! builder performs is computed from these offsets, so reordering channels
//! under a live buffer would corrupt everything already written.
//!
//! ```text
//! VertexFormat::block() (28 bytes)
//! ┌──────────────┬──────────┬──────────────┬──────────┐
//! │ position     │ color    │ uv           │ lightmap │
//! │ 3 × f32      │ 4 × u8   │ 2 × f32      │ 2 × u16  │
//! │ 12 bytes     │ 4 bytes  │ 8 bytes      │ 4 bytes  │
//! │ offset 0     │ offset 12│ offset 16    │ offset 24│
//! └──────────────┴──────────┴──────────────┴──────────┘
//! ```
//!
//! Every channel's size is a multiple of 4 bytes, so offsets and strides are
//! always word-aligned — the record buffer's 32-bit bulk copy and sort paths
//! rely on that.

/// A named sub-field of a vertex record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexChannel {
    /// 3 × f32 world-space position.
    Position,
    /// 4 × u8 color, byte order per [`crate::color`].
    Color,
    /// 2 × f32 texture coordinates.
    Uv,
    /// Three signed bytes packed into one word ([`crate::color::pack_normal`]).
    Normal,
    /// Two u16 light coordinates packed into one word.
    LightMap,
}

impl VertexChannel {
    /// Size of this channel within a vertex record, in bytes.
    pub const fn size_bytes(self) -> usize {
        match self {
            VertexChannel::Position => 12,
            VertexChannel::Color => 4,
            VertexChannel::Uv => 8,
            VertexChannel::Normal => 4,
            VertexChannel::LightMap => 4,
        }
    }
}

/// Immutable descriptor of a vertex record layout.
///
/// Built from an ordered channel list; each channel receives the next free
/// byte offset. Channels the format lacks report `None` from their offset
/// accessor, and callers must not invoke channel-specific writes on such a
/// format (the builder fails closed if they do).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexFormat {
    channels: Vec<VertexChannel>,
    position: Option<usize>,
    color: Option<usize>,
    uv: Option<usize>,
    normal: Option<usize>,
    light_map: Option<usize>,
    stride: usize,
}

impl VertexFormat {
    /// Builds a format from an ordered channel list. Duplicate channels are
    /// ignored after their first occurrence.
    pub fn new(channels: &[VertexChannel]) -> Self {
        debug_assert!(!channels.is_empty(), "empty vertex format");

        let mut format = VertexFormat {
            channels: Vec::with_capacity(channels.len()),
            position: None,
            color: None,
            uv: None,
            normal: None,
            light_map: None,
            stride: 0,
        };

        for &channel in channels {
            let slot = match channel {
                VertexChannel::Position => &mut format.position,
                VertexChannel::Color => &mut format.color,
                VertexChannel::Uv => &mut format.uv,
                VertexChannel::Normal => &mut format.normal,
                VertexChannel::LightMap => &mut format.light_map,
            };

            if slot.is_some() {
                debug_assert!(false, "duplicate {channel:?} channel in vertex format");
                continue;
            }

            *slot = Some(format.stride);
            format.stride += channel.size_bytes();
            format.channels.push(channel);
        }

        debug_assert!(format.stride % 4 == 0, "stride must be word-aligned");
        format
    }

    /// Position only. 12-byte stride.
    pub fn position() -> Self {
        Self::new(&[VertexChannel::Position])
    }

    /// Position + color. 16-byte stride.
    pub fn position_color() -> Self {
        Self::new(&[VertexChannel::Position, VertexChannel::Color])
    }

    /// Position + texture UV. 20-byte stride.
    pub fn position_uv() -> Self {
        Self::new(&[VertexChannel::Position, VertexChannel::Uv])
    }

    /// Position + texture UV + color. 24-byte stride.
    pub fn position_uv_color() -> Self {
        Self::new(&[
            VertexChannel::Position,
            VertexChannel::Uv,
            VertexChannel::Color,
        ])
    }

    /// The world-block layout: position + color + UV + lightmap. 28-byte
    /// stride.
    pub fn block() -> Self {
        Self::new(&[
            VertexChannel::Position,
            VertexChannel::Color,
            VertexChannel::Uv,
            VertexChannel::LightMap,
        ])
    }

    /// The baked-item layout: position + color + UV + normal. 28-byte
    /// stride.
    pub fn item() -> Self {
        Self::new(&[
            VertexChannel::Position,
            VertexChannel::Color,
            VertexChannel::Uv,
            VertexChannel::Normal,
        ])
    }

    /// Channels in declaration order.
    pub fn channels(&self) -> &[VertexChannel] {
        &self.channels
    }

    /// Total bytes per vertex record. Always a multiple of 4.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Byte offset of a channel within one record, or `None` if absent.
    pub fn offset_of(&self, channel: VertexChannel) -> Option<usize> {
        match channel {
            VertexChannel::Position => self.position,
            VertexChannel::Color => self.color,
            VertexChannel::Uv => self.uv,
            VertexChannel::Normal => self.normal,
            VertexChannel::LightMap => self.light_map,
        }
    }

    pub fn position_offset(&self) -> Option<usize> {
        self.position
    }

    pub fn color_offset(&self) -> Option<usize> {
        self.color
    }

    pub fn uv_offset(&self) -> Option<usize> {
        self.uv
    }

    pub fn normal_offset(&self) -> Option<usize> {
        self.normal
    }

    pub fn light_map_offset(&self) -> Option<usize> {
        self.light_map
    }

    /// Whether draws with this format sample a texture (i.e. a UV channel
    /// is present).
    pub fn has_texture(&self) -> bool {
        self.uv.is_some()
    }
}
