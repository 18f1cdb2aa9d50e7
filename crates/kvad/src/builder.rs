//! # Builder — Channel-Packing Vertex Accumulation
//!
//! The [`VertexBuilder`] is the write-side API of the crate: callers push
//! vertices one channel write at a time (`pos`, `pos_color`, ...), or bulk
//! copy pre-baked 4-vertex quad blocks with tinting, lightmap injection,
//! and spatial offsetting. Every write lands in the builder's
//! [`RecordBuffer`] at `vertex_count * stride + channel_offset`, and the
//! buffer grows transparently whenever the next vertex wouldn't fit.
//!
//! ## Lifecycle
//!
//! ```text
//! start ──> push vertices / quads ──> [sort_quads] ──> finish ──> draw ──> reset
//!   ^                                                                        │
//!   └────────────────────── reuse (allocation kept) ─────────────────────────┘
//! ```
//!
//! `finish` clips the buffer's visible window to the written extent;
//! `draw` hands that window to a [`DrawTarget`] and resets the vertex
//! count without deallocating, so a long-lived builder reuses its buffer
//! across frames. A builder is single-writer: interleaving unrelated draws
//! on one builder without finishing between them scrambles the batch.
//!
//! ## Failure model
//!
//! Everything fails closed. In an immediate-mode renderer a dropped quad is
//! strictly better than a crash mid-frame, so: writing a channel the format
//! lacks asserts in debug builds and silently skips in release; bulk copies
//! whose record length doesn't match the active stride are rejected
//! (logged, no-op) instead of corrupting neighboring records; color
//! components out of 0-255 truncate to their low byte rather than clamp.

use glam::Vec3;

use crate::buffer::RecordBuffer;
use crate::color;
use crate::draw::{DrawTarget, PrimitiveMode};
use crate::format::{VertexChannel, VertexFormat};
use crate::quad::BakedQuad;
use crate::sort;

/// Default buffer capacity for a fresh builder, matching the growth chunk.
pub const DEFAULT_CAPACITY: usize = crate::buffer::GROWTH_CHUNK;

/// Accumulates vertex records into a growable buffer, one vertex or one
/// baked quad at a time.
pub struct VertexBuilder {
    buffer: RecordBuffer,
    format: VertexFormat,
    mode: PrimitiveMode,
    /// Bytes per vertex record; cached from `format`.
    stride: usize,
    vertex_count: usize,
    started: bool,
    /// Work area for one quad's records (stride words). Reused across
    /// block-quad calls to avoid a per-quad allocation.
    quad_scratch: Vec<u32>,
}

impl VertexBuilder {
    /// A builder with a freshly allocated default-capacity buffer, already
    /// started in the given mode and format.
    pub fn new(mode: PrimitiveMode, format: VertexFormat) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, mode, format)
    }

    /// Like [`Self::new`] with an explicit initial capacity in bytes.
    /// Useful for tests and for callers that know their batch size.
    pub fn with_capacity(capacity: usize, mode: PrimitiveMode, format: VertexFormat) -> Self {
        Self::from_buffer(RecordBuffer::new(capacity), mode, format)
    }

    /// Wraps a caller-constructed buffer. The buffer is adopted as-is and
    /// the builder is started. Single-writer discipline is the caller's
    /// responsibility when the buffer outlives the builder.
    pub fn from_buffer(buffer: RecordBuffer, mode: PrimitiveMode, format: VertexFormat) -> Self {
        let mut builder = VertexBuilder {
            buffer,
            stride: format.stride(),
            format,
            mode,
            vertex_count: 0,
            started: false,
            quad_scratch: Vec::new(),
        };
        builder.start();
        builder
    }

    /// Hands the underlying buffer back, e.g. to reuse its allocation in
    /// another builder.
    pub fn into_buffer(self) -> RecordBuffer {
        self.buffer
    }

    // ── factories for the common mode/format pairs ──────────────────────

    pub fn colored_lines() -> Self {
        Self::new(PrimitiveMode::Lines, VertexFormat::position_color())
    }

    pub fn colored_line_strip() -> Self {
        Self::new(PrimitiveMode::LineStrip, VertexFormat::position_color())
    }

    pub fn colored_line_loop() -> Self {
        Self::new(PrimitiveMode::LineLoop, VertexFormat::position_color())
    }

    pub fn colored_quads() -> Self {
        Self::new(PrimitiveMode::Quads, VertexFormat::position_color())
    }

    pub fn colored_triangles() -> Self {
        Self::new(PrimitiveMode::Triangles, VertexFormat::position_color())
    }

    pub fn colored_triangle_strip() -> Self {
        Self::new(PrimitiveMode::TriangleStrip, VertexFormat::position_color())
    }

    pub fn textured_quads() -> Self {
        Self::new(PrimitiveMode::Quads, VertexFormat::position_uv())
    }

    pub fn tinted_textured_quads() -> Self {
        Self::new(PrimitiveMode::Quads, VertexFormat::position_uv_color())
    }

    // ── per-vertex writes ───────────────────────────────────────────────

    /// Writes the position channel and completes the vertex.
    pub fn pos(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.put_pos(x, y, z);
        self.end_vertex();
        self
    }

    /// Position + color. Color components are truncated to their low 8
    /// bits, not clamped.
    pub fn pos_color(&mut self, x: f32, y: f32, z: f32, r: u32, g: u32, b: u32, a: u32) -> &mut Self {
        self.put_pos(x, y, z);
        self.put_color(r, g, b, a);
        self.end_vertex();
        self
    }

    /// Position + color from a logical `0xAARRGGBB` value.
    pub fn pos_color_argb(&mut self, x: f32, y: f32, z: f32, argb: u32) -> &mut Self {
        let [a, r, g, b] = color::split_argb(argb);
        self.pos_color(x, y, z, r as u32, g as u32, b as u32, a as u32)
    }

    /// Position + texture coordinates.
    pub fn pos_uv(&mut self, x: f32, y: f32, z: f32, u: f32, v: f32) -> &mut Self {
        self.put_pos(x, y, z);
        self.put_uv(u, v);
        self.end_vertex();
        self
    }

    /// Position + texture coordinates + color.
    pub fn pos_uv_color(
        &mut self,
        x: f32,
        y: f32,
        z: f32,
        u: f32,
        v: f32,
        r: u32,
        g: u32,
        b: u32,
        a: u32,
    ) -> &mut Self {
        self.put_pos(x, y, z);
        self.put_uv(u, v);
        self.put_color(r, g, b, a);
        self.end_vertex();
        self
    }

    /// Position + texture coordinates + `0xAARRGGBB` color.
    pub fn pos_uv_color_argb(&mut self, x: f32, y: f32, z: f32, u: f32, v: f32, argb: u32) -> &mut Self {
        let [a, r, g, b] = color::split_argb(argb);
        self.pos_uv_color(x, y, z, u, v, r as u32, g as u32, b as u32, a as u32)
    }

    // ── baked quad writes ───────────────────────────────────────────────

    /// Bulk-copies a baked quad's 4 records, then overwrites the color
    /// channel of all 4 vertices with `argb` and the normal channel (when
    /// the format has one) with the quad's face direction.
    pub fn put_baked_quad(&mut self, quad: &BakedQuad, argb: u32) -> &mut Self {
        self.put_baked_quad_inner(quad, argb);
        self
    }

    /// Like [`Self::put_baked_quad`] with `argb` first multiplied by a
    /// second tint, channel-wise with truncating `/255` semantics.
    pub fn put_baked_quad_tinted(&mut self, quad: &BakedQuad, argb: u32, multiplier: u32) -> &mut Self {
        self.put_baked_quad(quad, color::multiply_argb(argb, multiplier))
    }

    /// [`Self::put_baked_quad`], then shifts the whole quad by `(x, y, z)`:
    /// the offset is added to each vertex's stored position in place.
    pub fn put_baked_quad_at(&mut self, x: f32, y: f32, z: f32, quad: &BakedQuad, argb: u32) -> &mut Self {
        if self.put_baked_quad_inner(quad, argb) {
            self.add_to_last_quad_position(x, y, z);
        }
        self
    }

    /// Places pre-baked model geometry at a world offset: copies the quad
    /// into the scratch record buffer, multiplies its color channel by the
    /// per-channel float factors, injects one lightmap value per vertex,
    /// adds `(x, y, z)` to each stored position, and appends the result.
    pub fn put_block_quad(
        &mut self,
        x: f32,
        y: f32,
        z: f32,
        quad: &BakedQuad,
        ma: f32,
        mr: f32,
        mg: f32,
        mb: f32,
        light: [u32; 4],
    ) -> &mut Self {
        let data = quad.vertex_data();
        if data.len() != self.stride {
            log::warn!(
                "rejecting block quad: {} words, expected {} for stride {} B",
                data.len(),
                self.stride,
                self.stride
            );
            return self;
        }

        let vertex_words = self.stride / 4;
        let mut scratch = std::mem::take(&mut self.quad_scratch);
        scratch.clear();
        scratch.extend_from_slice(data);

        if let Some(offset) = self.format.color_offset() {
            let base = offset / 4;
            for vertex in 0..4 {
                let at = base + vertex * vertex_words;
                scratch[at] = color::multiply_packed(scratch[at], ma, mr, mg, mb);
            }
        }

        if let Some(offset) = self.format.light_map_offset() {
            let base = offset / 4;
            for vertex in 0..4 {
                scratch[base + vertex * vertex_words] = light[vertex];
            }
        }

        if let Some(offset) = self.format.position_offset() {
            let base = offset / 4;
            for vertex in 0..4 {
                let at = base + vertex * vertex_words;
                scratch[at] = (x + f32::from_bits(scratch[at])).to_bits();
                scratch[at + 1] = (y + f32::from_bits(scratch[at + 1])).to_bits();
                scratch[at + 2] = (z + f32::from_bits(scratch[at + 2])).to_bits();
            }
        }

        self.push_quad_records(&scratch);
        self.quad_scratch = scratch;
        self
    }

    // ── sorting ─────────────────────────────────────────────────────────

    /// Reorders the written quads back-to-front relative to `camera` for
    /// alpha compositing. Only meaningful in [`PrimitiveMode::Quads`].
    pub fn sort_quads(&mut self, camera: Vec3) {
        debug_assert!(self.mode.is_quads(), "sort_quads on {:?} topology", self.mode);

        let Some(position_offset) = self.format.position_offset() else {
            log::warn!("sort_quads on a format without a Position channel");
            return;
        };
        let len_words = self.vertex_count * self.stride / 4;
        let stride = self.stride;
        sort::sort_quads(
            &mut self.buffer.words_mut()[..len_words],
            stride,
            position_offset,
            camera,
        );
    }

    // ── lifecycle ───────────────────────────────────────────────────────

    /// Starts the builder with its current mode and format. Idempotent.
    pub fn start(&mut self) -> &mut Self {
        let (mode, format) = (self.mode, self.format.clone());
        self.start_with(mode, format)
    }

    /// Starts the builder, adopting a new topology and format. No-op when
    /// already started.
    pub fn start_with(&mut self, mode: PrimitiveMode, format: VertexFormat) -> &mut Self {
        if !self.started {
            self.started = true;
            self.mode = mode;
            self.stride = format.stride();
            self.format = format;
            self.buffer.clear();
            // One whole vertex must always fit before its channel writes.
            self.buffer.grow(0, self.stride);
            if self.quad_scratch.capacity() < self.stride {
                self.quad_scratch = Vec::with_capacity(self.stride);
            }
            self.reset();
        }
        self
    }

    /// Clips the buffer's visible window to the written extent. No-op when
    /// not started.
    pub fn finish(&mut self) {
        if self.started {
            self.buffer.clip(self.vertex_count * self.stride);
        }
        self.started = false;
    }

    /// Finishes and submits through `target`, toggling its texture state to
    /// match the format, then resets for reuse.
    pub fn draw(&mut self, target: &mut dyn DrawTarget) {
        if self.started {
            target.set_texture_enabled(self.format.has_texture());
            self.draw_no_mode_changes(target);
            target.set_texture_enabled(true);
        }
    }

    /// [`Self::draw`] without touching any collaborator state. The
    /// submission itself is skipped for an empty batch, but the builder is
    /// still finished and reset.
    pub fn draw_no_mode_changes(&mut self, target: &mut dyn DrawTarget) {
        if self.started {
            self.finish();

            if self.vertex_count > 0 {
                target.submit_draw(self.buffer.bytes(), self.mode, self.vertex_count, &self.format);
            }

            self.reset();
        }
    }

    /// Zeroes the vertex count without deallocating.
    pub fn reset(&mut self) {
        self.vertex_count = 0;
    }

    // ── state snapshot ──────────────────────────────────────────────────

    /// Snapshot of the written records and format, for deferred or cached
    /// draws.
    pub fn state(&self) -> BuilderState {
        let words = self.vertex_count * self.stride / 4;
        BuilderState {
            format: self.format.clone(),
            vertex_data: self.buffer.words()[..words].to_vec(),
        }
    }

    /// Restores a snapshot, adopting its format and replacing the written
    /// records.
    pub fn set_state(&mut self, state: BuilderState) {
        // One vertex of headroom past the snapshot, matching end_vertex,
        // so the next channel write never lands past capacity.
        self.buffer
            .grow(0, state.vertex_data.len() * 4 + state.format.stride());
        self.buffer.clear();
        self.buffer.put_words(0, &state.vertex_data);

        self.vertex_count = state.vertex_count();
        self.stride = state.format.stride();
        self.format = state.format;
    }

    // ── accessors ───────────────────────────────────────────────────────

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn mode(&self) -> PrimitiveMode {
        self.mode
    }

    pub fn format(&self) -> &VertexFormat {
        &self.format
    }

    /// The written byte range `[0, vertex_count * stride)`.
    pub fn vertex_bytes(&self) -> &[u8] {
        &self.buffer.bytes()[..self.vertex_count * self.stride]
    }

    /// The underlying buffer (clipped by `finish`, full otherwise).
    pub fn buffer(&self) -> &RecordBuffer {
        &self.buffer
    }

    // ── channel write internals ─────────────────────────────────────────

    /// Byte offset of `channel` in the current vertex, or `None` (after a
    /// debug assert) when the format lacks it.
    fn require_channel(&self, channel: VertexChannel) -> Option<usize> {
        let offset = self.format.offset_of(channel);
        debug_assert!(offset.is_some(), "vertex format lacks {channel:?} channel");
        Some(self.vertex_count * self.stride + offset?)
    }

    fn put_pos(&mut self, x: f32, y: f32, z: f32) {
        if let Some(at) = self.require_channel(VertexChannel::Position) {
            self.buffer.write_f32_at(at, x);
            self.buffer.write_f32_at(at + 4, y);
            self.buffer.write_f32_at(at + 8, z);
        }
    }

    fn put_color(&mut self, r: u32, g: u32, b: u32, a: u32) {
        if let Some(at) = self.require_channel(VertexChannel::Color) {
            self.buffer.write_u32_at(at, color::pack_color(r, g, b, a));
        }
    }

    fn put_uv(&mut self, u: f32, v: f32) {
        if let Some(at) = self.require_channel(VertexChannel::Uv) {
            self.buffer.write_f32_at(at, u);
            self.buffer.write_f32_at(at + 4, v);
        }
    }

    /// Completes the current vertex and keeps one vertex of headroom so the
    /// next one's channel writes can never overrun.
    fn end_vertex(&mut self) {
        self.vertex_count += 1;
        self.buffer.grow(self.vertex_count * self.stride, self.stride);
    }

    // ── quad internals ──────────────────────────────────────────────────

    fn put_baked_quad_inner(&mut self, quad: &BakedQuad, argb: u32) -> bool {
        if !self.push_quad_records(quad.vertex_data()) {
            return false;
        }

        // The normal is recomputed from the face rather than trusted from
        // the baked data; formats without a normal channel skip it.
        if let Some(offset) = self.format.normal_offset() {
            let d = quad.face().direction();
            self.put_u32_for_last_quad(offset, color::pack_normal(d.x, d.y, d.z));
        }

        if let Some(offset) = self.format.offset_of(VertexChannel::Color) {
            self.put_u32_for_last_quad(offset, color::pack_argb(argb));
        } else {
            debug_assert!(false, "vertex format lacks Color channel");
        }

        true
    }

    /// Appends one quad's worth of raw records. Rejects blocks whose
    /// length doesn't exactly match the active stride.
    fn push_quad_records(&mut self, data: &[u32]) -> bool {
        // stride bytes per vertex == stride words per 4-vertex quad.
        if data.len() != self.stride {
            log::warn!(
                "rejecting quad record block: {} words, expected {} for stride {} B",
                data.len(),
                self.stride,
                self.stride
            );
            return false;
        }

        let cursor = self.vertex_count * self.stride;
        self.buffer.grow(cursor, data.len() * 4 + self.stride);
        self.buffer.put_words(cursor, data);
        self.vertex_count += 4;
        true
    }

    /// Writes `value` into the channel at `offset` of each of the last 4
    /// vertices.
    fn put_u32_for_last_quad(&mut self, offset: usize, value: u32) {
        debug_assert!(self.vertex_count >= 4, "no quad written yet");
        let base = (self.vertex_count - 4) * self.stride + offset;
        for vertex in 0..4 {
            self.buffer.write_u32_at(base + vertex * self.stride, value);
        }
    }

    /// Adds `(x, y, z)` to the stored position of each of the last 4
    /// vertices, at the float bit level.
    fn add_to_last_quad_position(&mut self, x: f32, y: f32, z: f32) {
        debug_assert!(self.vertex_count >= 4, "no quad written yet");
        let Some(offset) = self.format.position_offset() else {
            return;
        };

        let base = (self.vertex_count - 4) * self.stride + offset;
        for vertex in 0..4 {
            let at = base + vertex * self.stride;
            let px = self.buffer.read_f32_at(at) + x;
            let py = self.buffer.read_f32_at(at + 4) + y;
            let pz = self.buffer.read_f32_at(at + 8) + z;
            self.buffer.write_f32_at(at, px);
            self.buffer.write_f32_at(at + 4, py);
            self.buffer.write_f32_at(at + 8, pz);
        }
    }
}

/// Snapshot of a builder's written records plus the format they're packed
/// in. Restorable into any builder via [`VertexBuilder::set_state`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuilderState {
    format: VertexFormat,
    vertex_data: Vec<u32>,
}

impl BuilderState {
    pub fn format(&self) -> &VertexFormat {
        &self.format
    }

    pub fn vertex_data(&self) -> &[u32] {
        &self.vertex_data
    }

    /// Number of whole vertex records in the snapshot.
    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len() * 4 / self.format.stride()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quad::Face;

    /// DrawTarget double that records every call it receives.
    #[derive(Default)]
    struct Recorder {
        draws: Vec<(Vec<u8>, PrimitiveMode, usize, VertexFormat)>,
        texture_toggles: Vec<bool>,
    }

    impl DrawTarget for Recorder {
        fn submit_draw(
            &mut self,
            vertices: &[u8],
            mode: PrimitiveMode,
            vertex_count: usize,
            format: &VertexFormat,
        ) {
            self.draws
                .push((vertices.to_vec(), mode, vertex_count, format.clone()));
        }

        fn set_texture_enabled(&mut self, enabled: bool) {
            self.texture_toggles.push(enabled);
        }
    }

    /// One baked quad in the `item()` layout (stride 28): all vertices at
    /// `(x, y, z)`, with recognizable filler in the other channels.
    fn item_quad(x: f32, y: f32, z: f32, face: Face) -> BakedQuad {
        let mut words = Vec::with_capacity(28);
        for vertex in 0..4u32 {
            words.extend_from_slice(&[
                x.to_bits(),
                y.to_bits(),
                z.to_bits(),
                0xDEAD_0000 | vertex, // color, expected to be overwritten
                0.25f32.to_bits(),
                0.75f32.to_bits(),
                0xBEEF_0000 | vertex, // normal, expected to be overwritten
            ]);
        }
        BakedQuad::new(words, face)
    }

    #[test]
    fn pos_color_packs_expected_bytes() {
        let mut builder = VertexBuilder::colored_quads();
        builder.pos_color(1.0, 2.0, 3.0, 255, 128, 64, 32);

        assert_eq!(builder.vertex_count(), 1);
        let bytes = builder.vertex_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &1.0f32.to_bits().to_ne_bytes());
        assert_eq!(&bytes[4..8], &2.0f32.to_bits().to_ne_bytes());
        assert_eq!(&bytes[8..12], &3.0f32.to_bits().to_ne_bytes());
        assert_eq!(
            u32::from_ne_bytes(bytes[12..16].try_into().unwrap()),
            crate::color::pack_color(255, 128, 64, 32)
        );
    }

    #[test]
    fn color_components_truncate_to_low_byte() {
        let mut a = VertexBuilder::colored_quads();
        let mut b = VertexBuilder::colored_quads();
        a.pos_color(0.0, 0.0, 0.0, 0x1FF, 0x300, 0x102, 0x1000);
        b.pos_color(0.0, 0.0, 0.0, 0xFF, 0x00, 0x02, 0x00);
        assert_eq!(a.vertex_bytes(), b.vertex_bytes());
    }

    #[test]
    fn growth_preserves_pushed_vertices() {
        // 64-byte initial capacity, 16-byte stride: grows repeatedly.
        let mut builder = VertexBuilder::with_capacity(
            64,
            PrimitiveMode::Quads,
            VertexFormat::position_color(),
        );
        for i in 0..100 {
            builder.pos_color(i as f32, 0.0, 0.0, i, i, i, 255);
        }

        assert_eq!(builder.vertex_count(), 100);
        let bytes = builder.vertex_bytes();
        for i in 0..100usize {
            let at = i * 16;
            let x = f32::from_bits(u32::from_ne_bytes(bytes[at..at + 4].try_into().unwrap()));
            assert_eq!(x, i as f32, "vertex {i} position");
            assert_eq!(
                u32::from_ne_bytes(bytes[at + 12..at + 16].try_into().unwrap()),
                crate::color::pack_color(i as u32, i as u32, i as u32, 255),
                "vertex {i} color"
            );
        }
    }

    #[test]
    fn draw_then_rebuild_is_byte_identical() {
        let push = |builder: &mut VertexBuilder| {
            for i in 0..8 {
                builder.pos_color(i as f32, 1.0, -1.0, 10 + i, 20, 30, 255);
            }
        };

        let mut builder = VertexBuilder::colored_quads();
        push(&mut builder);
        let first = builder.vertex_bytes().to_vec();

        let mut target = Recorder::default();
        builder.draw(&mut target);
        assert_eq!(builder.vertex_count(), 0);

        builder.start();
        push(&mut builder);
        assert_eq!(builder.vertex_bytes(), &first[..]);
        assert_eq!(target.draws[0].0, first);
    }

    #[test]
    fn draw_submits_clipped_range_and_resets() {
        let mut builder = VertexBuilder::colored_triangles();
        builder
            .pos_color(0.0, 0.0, 0.0, 255, 0, 0, 255)
            .pos_color(1.0, 0.0, 0.0, 0, 255, 0, 255)
            .pos_color(0.0, 1.0, 0.0, 0, 0, 255, 255);

        let mut target = Recorder::default();
        builder.draw(&mut target);

        let (bytes, mode, count, format) = &target.draws[0];
        assert_eq!(bytes.len(), 3 * 16);
        assert_eq!(*mode, PrimitiveMode::Triangles);
        assert_eq!(*count, 3);
        assert_eq!(*format, VertexFormat::position_color());

        // Untextured format: texture off for the draw, back on after.
        assert_eq!(target.texture_toggles, vec![false, true]);
        assert!(!builder.is_started());
    }

    #[test]
    fn empty_draw_submits_nothing() {
        let mut builder = VertexBuilder::colored_quads();
        let mut target = Recorder::default();
        builder.draw_no_mode_changes(&mut target);
        assert!(target.draws.is_empty());
        assert!(!builder.is_started());
    }

    #[test]
    fn textured_draw_keeps_texturing_enabled() {
        let mut builder = VertexBuilder::textured_quads();
        builder
            .pos_uv(0.0, 0.0, 0.0, 0.0, 0.0)
            .pos_uv(1.0, 0.0, 0.0, 1.0, 0.0)
            .pos_uv(1.0, 1.0, 0.0, 1.0, 1.0)
            .pos_uv(0.0, 1.0, 0.0, 0.0, 1.0);

        let mut target = Recorder::default();
        builder.draw(&mut target);
        assert_eq!(target.texture_toggles, vec![true, true]);
    }

    #[test]
    fn baked_quad_overwrites_color_and_normal() {
        let mut builder = VertexBuilder::new(PrimitiveMode::Quads, VertexFormat::item());
        builder.put_baked_quad(&item_quad(1.0, 2.0, 3.0, Face::Up), 0x80FF_4020);

        assert_eq!(builder.vertex_count(), 4);
        let format = VertexFormat::item();
        let buffer = builder.buffer();
        for vertex in 0..4 {
            let base = vertex * 28;
            assert_eq!(
                buffer.read_u32_at(base + format.color_offset().unwrap()),
                crate::color::pack_argb(0x80FF_4020),
                "vertex {vertex} color"
            );
            assert_eq!(
                buffer.read_u32_at(base + format.normal_offset().unwrap()),
                crate::color::pack_normal(0, 1, 0),
                "vertex {vertex} normal"
            );
            // Position and UV survive the bulk copy untouched.
            assert_eq!(buffer.read_f32_at(base), 1.0);
            assert_eq!(buffer.read_f32_at(base + 16), 0.25);
        }
    }

    #[test]
    fn baked_quad_tint_multiplies_before_packing() {
        let mut tinted = VertexBuilder::new(PrimitiveMode::Quads, VertexFormat::item());
        tinted.put_baked_quad_tinted(&item_quad(0.0, 0.0, 0.0, Face::Up), 0x8080_8080, 0x8080_8080);

        let mut direct = VertexBuilder::new(PrimitiveMode::Quads, VertexFormat::item());
        direct.put_baked_quad(&item_quad(0.0, 0.0, 0.0, Face::Up), 0x4040_4040);

        assert_eq!(tinted.vertex_bytes(), direct.vertex_bytes());
    }

    #[test]
    fn baked_quad_at_offsets_positions() {
        let mut builder = VertexBuilder::new(PrimitiveMode::Quads, VertexFormat::item());
        builder.put_baked_quad_at(10.0, -2.0, 0.5, &item_quad(1.0, 1.0, 1.0, Face::North), 0xFFFF_FFFF);

        let buffer = builder.buffer();
        for vertex in 0..4 {
            let base = vertex * 28;
            assert_eq!(buffer.read_f32_at(base), 11.0);
            assert_eq!(buffer.read_f32_at(base + 4), -1.0);
            assert_eq!(buffer.read_f32_at(base + 8), 1.5);
        }
    }

    #[test]
    fn mismatched_quad_block_is_rejected() {
        let mut builder = VertexBuilder::colored_quads(); // stride 16
        let quad = item_quad(0.0, 0.0, 0.0, Face::Up); // 28 words
        builder.put_baked_quad(&quad, 0xFFFF_FFFF);
        assert_eq!(builder.vertex_count(), 0);

        builder.put_baked_quad_at(1.0, 1.0, 1.0, &quad, 0xFFFF_FFFF);
        assert_eq!(builder.vertex_count(), 0);
    }

    #[test]
    fn block_quad_injects_lightmaps_and_offset() {
        // block() layout: pos 0, color 12, uv 16, lightmap 24 — stride 28.
        let mut words = Vec::with_capacity(28);
        for vertex in 0..4u32 {
            words.extend_from_slice(&[
                1.0f32.to_bits(),
                2.0f32.to_bits(),
                3.0f32.to_bits(),
                crate::color::pack_color(100, 200, 50, 255),
                0.0f32.to_bits(),
                1.0f32.to_bits(),
                0x1111_0000 | vertex, // lightmap, expected to be replaced
            ]);
        }
        let quad = BakedQuad::new(words, Face::Up);

        let mut builder = VertexBuilder::new(PrimitiveMode::Quads, VertexFormat::block());
        let light = [0xA0, 0xA1, 0xA2, 0xA3];
        builder.put_block_quad(5.0, 6.0, 7.0, &quad, 1.0, 0.5, 0.5, 0.5, light);

        assert_eq!(builder.vertex_count(), 4);
        let buffer = builder.buffer();
        for vertex in 0..4 {
            let base = vertex * 28;
            assert_eq!(buffer.read_f32_at(base), 6.0);
            assert_eq!(buffer.read_f32_at(base + 4), 8.0);
            assert_eq!(buffer.read_f32_at(base + 8), 10.0);
            assert_eq!(
                buffer.read_u32_at(base + 12),
                crate::color::pack_color(50, 100, 25, 255),
                "vertex {vertex} multiplied color"
            );
            assert_eq!(buffer.read_u32_at(base + 24), light[vertex]);
        }
    }

    #[test]
    fn block_quad_with_wrong_stride_is_rejected() {
        let mut builder = VertexBuilder::new(PrimitiveMode::Quads, VertexFormat::block());
        let quad = BakedQuad::new(vec![0; 16], Face::Up);
        builder.put_block_quad(0.0, 0.0, 0.0, &quad, 1.0, 1.0, 1.0, 1.0, [0; 4]);
        assert_eq!(builder.vertex_count(), 0);
    }

    #[test]
    fn state_round_trip_restores_records() {
        let mut builder = VertexBuilder::colored_quads();
        for i in 0..4 {
            builder.pos_color(i as f32, i as f32, 0.0, 200, 100, 50, 255);
        }
        let snapshot = builder.state();
        let original = builder.vertex_bytes().to_vec();
        assert_eq!(snapshot.vertex_count(), 4);

        // Scribble over the builder, then restore.
        let mut target = Recorder::default();
        builder.draw(&mut target);
        builder.start();
        builder.pos_color(99.0, 99.0, 99.0, 1, 2, 3, 4);

        builder.set_state(snapshot);
        assert_eq!(builder.vertex_count(), 4);
        assert_eq!(builder.vertex_bytes(), &original[..]);
    }

    #[test]
    fn set_state_leaves_headroom_for_further_vertices() {
        // Capacity exactly fits the two snapshotted records.
        let mut builder =
            VertexBuilder::with_capacity(32, PrimitiveMode::Quads, VertexFormat::position_color());
        builder.pos_color(1.0, 0.0, 0.0, 255, 0, 0, 255);
        builder.pos_color(2.0, 0.0, 0.0, 0, 255, 0, 255);
        let snapshot = builder.state();

        let mut restored =
            VertexBuilder::with_capacity(32, PrimitiveMode::Quads, VertexFormat::position_color());
        restored.set_state(snapshot);
        restored.pos_color(3.0, 0.0, 0.0, 0, 0, 255, 255);

        assert_eq!(restored.vertex_count(), 3);
        assert_eq!(restored.buffer().read_f32_at(2 * 16), 3.0);
    }

    #[test]
    fn sorted_builder_draws_back_to_front() {
        let mut builder = VertexBuilder::colored_quads();
        // Near quad first, far quad second.
        for _ in 0..4 {
            builder.pos_color(0.0, 0.0, 1.0, 1, 0, 0, 255);
        }
        for _ in 0..4 {
            builder.pos_color(0.0, 0.0, 50.0, 2, 0, 0, 255);
        }

        builder.sort_quads(Vec3::ZERO);

        // Far quad (z = 50) now leads.
        assert_eq!(builder.buffer().read_f32_at(8), 50.0);
        assert_eq!(builder.buffer().read_f32_at(4 * 16 + 8), 1.0);
    }

    #[test]
    fn sort_without_position_channel_is_a_no_op() {
        let format = VertexFormat::new(&[VertexChannel::Color, VertexChannel::Uv]);
        let mut builder = VertexBuilder::new(PrimitiveMode::Quads, format);
        let quad = BakedQuad::new((0..12).collect(), Face::Up);
        builder.put_baked_quad(&quad, 0xFF80_4020);
        let before = builder.vertex_bytes().to_vec();

        builder.sort_quads(Vec3::new(5.0, 5.0, 5.0));

        assert_eq!(builder.vertex_bytes(), &before[..]);
    }

    #[test]
    fn start_is_idempotent() {
        let mut builder = VertexBuilder::colored_quads();
        builder.pos_color(1.0, 2.0, 3.0, 255, 255, 255, 255);
        builder.start(); // already started: must not reset
        assert_eq!(builder.vertex_count(), 1);

        builder.finish();
        assert!(!builder.is_started());
        builder.start();
        assert_eq!(builder.vertex_count(), 0);
    }

    #[test]
    fn finish_clips_visible_window() {
        let mut builder = VertexBuilder::colored_quads();
        builder.pos_color(0.0, 0.0, 0.0, 255, 255, 255, 255);
        builder.finish();
        assert_eq!(builder.buffer().bytes().len(), 16);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "lacks Uv")]
    fn missing_channel_asserts_in_debug() {
        let mut builder = VertexBuilder::colored_quads();
        builder.pos_uv(0.0, 0.0, 0.0, 0.0, 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn state_serde_round_trip() {
        let mut builder = VertexBuilder::colored_quads();
        builder.pos_color(1.0, 2.0, 3.0, 9, 8, 7, 6);
        let state = builder.state();

        let json = serde_json::to_string(&state).unwrap();
        let back: BuilderState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
