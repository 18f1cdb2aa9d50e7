//! # Sort — Camera-Relative Quad Depth Ordering
//!
//! Transparent geometry drawn without a depth buffer must arrive
//! back-to-front: later (nearer) quads composite over earlier (farther)
//! ones — the painter's algorithm. This module reorders the quad records of
//! a finished buffer by descending squared distance from a reference point
//! (usually the camera).
//!
//! ## Why squared distance
//!
//! Ordering by `d²` is the same ordering as by `d`, and skipping the square
//! root saves one `sqrt` per quad per sort. The distance is measured to the
//! quad's centroid — the mean of its 4 vertices' position channels.
//!
//! ## In-place permutation via cycle decomposition
//!
//! Sorting indices is cheap; the expensive part is moving the records,
//! which are `4 × stride` bytes each. A naive "allocate a sorted copy"
//! doubles the memory traffic (that form exists too, as [`sorted_quads`],
//! for callers that want a pure function). The in-place form decomposes
//! the permutation into disjoint cycles and rotates each cycle through a
//! single quad-sized scratch record:
//!
//! ```text
//! order = [2, 0, 1]        (slot s must receive quad order[s])
//!
//! scratch <- quad 0        ┐
//! slot 0  <- quad 2        │ one cycle, one scratch,
//! slot 2  <- quad 1        │ n record moves total
//! slot 1  <- scratch       ┘
//! ```
//!
//! A visited mask guarantees every slot is written exactly once, so the
//! whole reorder is O(n) record moves instead of the O(n²) a repeated-swap
//! approach can degrade to.
//!
//! Both entry points take the position channel's byte offset explicitly so
//! formats that don't lead with position still sort correctly.

use glam::Vec3;

/// Reorders the complete quads in `words` farthest-to-nearest from
/// `camera`, in place.
///
/// `stride` is the vertex record size in bytes and `position_offset` the
/// byte offset of the position channel within a record; both must be
/// word-aligned. A trailing partial quad (fewer than 4 records) is left
/// untouched.
pub fn sort_quads(words: &mut [u32], stride: usize, position_offset: usize, camera: Vec3) {
    debug_assert!(stride > 0 && stride % 4 == 0, "stride must be word-aligned");
    debug_assert!(position_offset % 4 == 0, "position offset must be word-aligned");

    let quad_words = stride; // stride/4 words per vertex, 4 vertices
    let quad_count = words.len() / quad_words;
    if quad_count < 2 {
        return;
    }

    let order = quad_order(words, stride, position_offset, quad_count, camera);

    let mut scratch = vec![0u32; quad_words];
    let mut visited = vec![false; quad_count];

    for start in 0..quad_count {
        if visited[start] {
            continue;
        }
        if order[start] == start {
            visited[start] = true;
            continue;
        }

        // Rotate one cycle: each slot receives the quad the order says it
        // should hold, with the cycle's first record parked in scratch.
        scratch.copy_from_slice(&words[start * quad_words..(start + 1) * quad_words]);
        let mut slot = start;
        loop {
            let src = order[slot];
            visited[slot] = true;

            if src == start {
                words[slot * quad_words..(slot + 1) * quad_words].copy_from_slice(&scratch);
                break;
            }

            words.copy_within(src * quad_words..(src + 1) * quad_words, slot * quad_words);
            slot = src;
        }
    }
}

/// Copy-based form of [`sort_quads`]: returns a new record array with the
/// same back-to-front order, leaving the input untouched. Both forms
/// produce identical output for identical input.
pub fn sorted_quads(words: &[u32], stride: usize, position_offset: usize, camera: Vec3) -> Vec<u32> {
    debug_assert!(stride > 0 && stride % 4 == 0, "stride must be word-aligned");

    let quad_words = stride;
    let quad_count = words.len() / quad_words;
    let mut out = words.to_vec();
    if quad_count < 2 {
        return out;
    }

    let order = quad_order(words, stride, position_offset, quad_count, camera);

    for (slot, &src) in order.iter().enumerate() {
        out[slot * quad_words..(slot + 1) * quad_words]
            .copy_from_slice(&words[src * quad_words..(src + 1) * quad_words]);
    }

    out
}

/// Quad indices sorted by descending centroid distance² from `camera`:
/// `order[slot]` is the source quad that must end up in `slot`.
fn quad_order(
    words: &[u32],
    stride: usize,
    position_offset: usize,
    quad_count: usize,
    camera: Vec3,
) -> Vec<usize> {
    let distances: Vec<f32> = (0..quad_count)
        .map(|quad| quad_distance_sq(words, stride, position_offset, quad, camera))
        .collect();

    let mut order: Vec<usize> = (0..quad_count).collect();
    order.sort_unstable_by(|&a, &b| distances[b].total_cmp(&distances[a]));
    order
}

/// Squared distance from `camera` to the centroid of quad `quad`.
fn quad_distance_sq(
    words: &[u32],
    stride: usize,
    position_offset: usize,
    quad: usize,
    camera: Vec3,
) -> f32 {
    let vertex_words = stride / 4;
    let base = quad * vertex_words * 4 + position_offset / 4;

    let mut sum = Vec3::ZERO;
    for vertex in 0..4 {
        let at = base + vertex * vertex_words;
        sum += Vec3::new(
            f32::from_bits(words[at]),
            f32::from_bits(words[at + 1]),
            f32::from_bits(words[at + 2]),
        );
    }

    (sum * 0.25 - camera).length_squared()
}
