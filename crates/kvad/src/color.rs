//! # Color — Packed Channel Codecs
//!
//! Vertex records store color as 4 bytes inside one 32-bit word, normals as
//! three signed bytes inside one word, and lightmap coordinates as two
//! 16-bit halves. This module is the single place where those bit layouts
//! (and their endianness rules) live; the builder and the quad paths only
//! ever call through here.
//!
//! ## Byte order
//!
//! The GPU consumes color as raw bytes in memory, so the byte order within
//! the packed word depends on the target's endianness:
//!
//! ```text
//! memory:        byte 0   byte 1   byte 2   byte 3
//! little-endian:   R        G        B        A
//! big-endian:      A        B        G        R
//! ```
//!
//! What matters for correctness is self-consistency: [`unpack_color`] must
//! invert [`pack_color`] exactly on the same target. Both branch on
//! `cfg!(target_endian)` through `from_ne_bytes`/`to_ne_bytes`, which makes
//! the memory order explicit rather than implied by shift arithmetic.
//!
//! ## Truncating multiply
//!
//! [`multiply_argb`] computes `base * mult / 255` per channel in integer
//! arithmetic. The division truncates toward zero, not rounds: renderers
//! that baked their look around the original behavior would shift subtly
//! under rounding, so truncation is load-bearing here.

/// Packs four color components into a native-order word whose in-memory
/// byte order matches what the GPU expects.
///
/// Components are truncated to their low 8 bits; out-of-range values wrap
/// rather than clamp.
#[inline]
pub fn pack_color(r: u32, g: u32, b: u32, a: u32) -> u32 {
    let (r, g, b, a) = (r as u8, g as u8, b as u8, a as u8);

    if cfg!(target_endian = "little") {
        u32::from_ne_bytes([r, g, b, a])
    } else {
        u32::from_ne_bytes([a, b, g, r])
    }
}

/// Unpacks a native-order color word back into `[r, g, b, a]`.
///
/// Exact inverse of [`pack_color`] on the same target.
#[inline]
pub fn unpack_color(word: u32) -> [u8; 4] {
    let bytes = word.to_ne_bytes();

    if cfg!(target_endian = "little") {
        bytes
    } else {
        let [a, b, g, r] = bytes;
        [r, g, b, a]
    }
}

/// Converts a logical `0xAARRGGBB` color into the native packed word.
#[inline]
pub fn pack_argb(argb: u32) -> u32 {
    let [a, r, g, b] = split_argb(argb);
    pack_color(r as u32, g as u32, b as u32, a as u32)
}

/// Splits a logical `0xAARRGGBB` value into `[a, r, g, b]` bytes.
#[inline]
pub fn split_argb(argb: u32) -> [u8; 4] {
    [
        (argb >> 24) as u8,
        (argb >> 16) as u8,
        (argb >> 8) as u8,
        argb as u8,
    ]
}

/// Multiplies two `0xAARRGGBB` colors channel-wise: `out = base * mult / 255`
/// for each of A, R, G, B independently, truncating toward zero.
///
/// `multiply_argb(c, 0xFFFF_FFFF)` is the identity; `multiply_argb(c, 0)`
/// zeroes every channel.
pub fn multiply_argb(base: u32, mult: u32) -> u32 {
    let [ca, cr, cg, cb] = split_argb(base);
    let [ma, mr, mg, mb] = split_argb(mult);

    let a = ca as u32 * ma as u32 / 255;
    let r = cr as u32 * mr as u32 / 255;
    let g = cg as u32 * mg as u32 / 255;
    let b = cb as u32 * mb as u32 / 255;

    (a << 24) | (r << 16) | (g << 8) | b
}

/// Scales each channel of a *native packed* color word by a float factor,
/// truncating the result. Used by the block-quad path, where multipliers
/// arrive as per-channel floats in `[0, 1]`.
pub fn multiply_packed(word: u32, ma: f32, mr: f32, mg: f32, mb: f32) -> u32 {
    let [r, g, b, a] = unpack_color(word);

    let r = (r as f32 * mr) as u32 & 0xFF;
    let g = (g as f32 * mg) as u32 & 0xFF;
    let b = (b as f32 * mb) as u32 & 0xFF;
    let a = (a as f32 * ma) as u32 & 0xFF;

    pack_color(r, g, b, a)
}

/// Packs a unit-axis normal into one word: each component, expected in
/// `{-1, 0, 1}`, is scaled by 127, masked to a byte, and laid out as
/// `(z << 16) | (y << 8) | x`.
///
/// This is a cheap compressed representation for axis-aligned face normals,
/// not a general signed-normal codec — arbitrary directions lose precision
/// and sign information.
#[inline]
pub fn pack_normal(x: i32, y: i32, z: i32) -> u32 {
    let x = (x * 127) as u32 & 0xFF;
    let y = (y * 127) as u32 & 0xFF;
    let z = (z * 127) as u32 & 0xFF;

    (z << 16) | (y << 8) | x
}

/// Packs sky and block light coordinates into one word, sky in the high
/// half.
#[inline]
pub fn pack_light_map(sky: u16, block: u16) -> u32 {
    ((sky as u32) << 16) | block as u32
}
