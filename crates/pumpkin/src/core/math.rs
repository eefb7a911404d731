//! Small math helpers shared by game code and the engine.
//!
//! Boxes are `Vec4`s laid out as (min x, min y, max x, max y), the format
//! returned by `Visual::bounding_box`. Random helpers draw from a caller
//! owned `fastrand::Rng` so a seeded generator replays the same game.

use fastrand::Rng;
use glam::{Vec2, Vec4};

/// Opaque color from 0-255 components.
pub fn rgb(r: u8, g: u8, b: u8) -> Vec4 {
    rgba(r, g, b, 255)
}

/// Color from 0-255 components.
pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Vec4 {
    Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
}

pub fn box_width(bb: Vec4) -> f32 {
    bb.z - bb.x
}

pub fn box_height(bb: Vec4) -> f32 {
    bb.w - bb.y
}

/// Whether `p` lies inside the box, edges included.
pub fn point_in_box(p: Vec2, bb: Vec4) -> bool {
    p.x >= bb.x && p.x <= bb.z && p.y >= bb.y && p.y <= bb.w
}

/// Whether two boxes overlap.
pub fn boxes_overlap(a: Vec4, b: Vec4) -> bool {
    a.x <= b.z && b.x <= a.z && a.y <= b.w && b.y <= a.w
}

/// -1, 0 or 1. Unlike `f32::signum`, zero maps to zero.
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Unit vector for an angle in radians; 0 points right.
pub fn vec2_for_angle(radians: f32) -> Vec2 {
    Vec2::new(radians.cos(), radians.sin())
}

/// Angle of `v` in radians, in -π..=π; 0 points right.
pub fn vec2_to_angle(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// `v` shortened to `max` if it is longer.
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    v.clamp_length_max(max)
}

// -- Random --

/// Integer in `min..=max`.
pub fn random_int_between(rng: &mut Rng, min: i32, max: i32) -> i32 {
    rng.i32(min.min(max)..=max.max(min))
}

/// Float in `0.0..=1.0`.
pub fn random_float(rng: &mut Rng) -> f32 {
    rng.u32(..) as f32 / u32::MAX as f32
}

/// Float in `min..=max`.
pub fn random_float_between(rng: &mut Rng, min: f32, max: f32) -> f32 {
    min + random_float(rng) * (max - min)
}

/// Either 1.0 or -1.0.
pub fn random_sign(rng: &mut Rng) -> f32 {
    if rng.bool() {
        1.0
    } else {
        -1.0
    }
}
