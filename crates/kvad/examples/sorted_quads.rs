//! Depth-sorted quads — push translucent panes nearest-first, sort them
//! back-to-front from the camera, and submit through a printing target.

use glam::Vec3;
use kvad::{DrawTarget, PrimitiveMode, VertexBuilder, VertexFormat};

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
            "submit: {vertex_count} vertices as {mode:?}, stride {} B, {} bytes total",
            format.stride(),
            vertices.len()
        );

        // First vertex of each quad, in submission (= compositing) order.
        let stride = format.stride();
        for quad in 0..vertex_count / 4 {
            let at = quad * 4 * stride;
            let z = f32::from_ne_bytes(vertices[at + 8..at + 12].try_into().unwrap());
            println!("  quad {quad}: z = {z}");
        }
    }
}

fn main() {
    env_logger::init();

    let camera = Vec3::new(0.0, 0.0, -5.0);
    let mut builder = VertexBuilder::colored_quads();

    // Three overlapping panes, deliberately pushed nearest-first — the
    // worst case for alpha blending without a sort.
    for (z, argb) in [(1.0, 0x8000_FF00u32), (4.0, 0x80FF_0000), (9.0, 0x800000FF)] {
        builder
            .pos_color_argb(-1.0, -1.0, z, argb)
            .pos_color_argb(1.0, -1.0, z, argb)
            .pos_color_argb(1.0, 1.0, z, argb)
            .pos_color_argb(-1.0, 1.0, z, argb);
    }

    builder.sort_quads(camera);
    builder.draw(&mut PrintTarget);
}
