//! Baked block placement — take one pre-baked quad, stamp it at several
//! world positions with per-placement tint and lightmap values.

use kvad::{BakedQuad, DrawTarget, Face, PrimitiveMode, VertexBuilder, VertexFormat};

struct PrintTarget;

impl DrawTarget for PrintTarget {
    fn submit_draw(
        &mut self,
        vertices: &[u8],
        mode: PrimitiveMode,
        vertex_count: usize,
        format: &VertexFormat,
    ) {
        println!(
            "submit: {} quads as {mode:?} ({} bytes, textured: {})",
            vertex_count / 4,
            vertices.len(),
            format.has_texture()
        );
    }
}

/// One unit top-face quad at the origin, baked in the block() layout.
fn baked_top_face() -> BakedQuad {
    let format = VertexFormat::block();
    let corners = [
        (0.0f32, 0.0f32),
        (1.0, 0.0),
        (1.0, 1.0),
        (0.0, 1.0),
    ];

    let mut words = Vec::with_capacity(format.stride());
    for (x, z) in corners {
        words.extend_from_slice(&[
            x.to_bits(),
            1.0f32.to_bits(),
            z.to_bits(),
            kvad::color::pack_color(255, 255, 255, 255),
            x.to_bits(), // reuse corner coordinates as UVs
            z.to_bits(),
            0,
        ]);
    }
    BakedQuad::new(words, Face::Up)
}

fn main() {
    env_logger::init();

    let quad = baked_top_face();
    let full_light = kvad::color::pack_light_map(15, 15);
    let mut builder = VertexBuilder::new(PrimitiveMode::Quads, VertexFormat::block());

    // A 4x4 grass-ish field: green tint fading with distance.
    for gx in 0..4 {
        for gz in 0..4 {
            let fade = 1.0 - 0.15 * (gx + gz) as f32 / 6.0;
            builder.put_block_quad(
                gx as f32,
                0.0,
                gz as f32,
                &quad,
                1.0,
                0.4 * fade,
                0.9 * fade,
                0.3 * fade,
                [full_light; 4],
            );
        }
    }

    println!("built {} vertices", builder.vertex_count());
    builder.draw(&mut PrintTarget);
}
