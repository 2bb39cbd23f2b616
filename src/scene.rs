//! Geometry of the four corner rectangles.
//!
//! Each rectangle is 0.3 units wide, sits in one corner of the `[-1, 1]`
//! square and carries its own tint. Indices are laid out in groups of six so
//! that rectangle `i` owns `i * 6..(i + 1) * 6`.

use std::ops::Range;

use glam::Vec3;

use crate::{renderer::vertex::SceneVertex, transform::OBJECT_COUNT};

pub const VERTICES_PER_OBJECT: usize = 4;
pub const INDICES_PER_OBJECT: usize = 6;

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const PURPLE: [f32; 3] = [0.5, 0.0, 1.0];
const AMBER: [f32; 3] = [1.0, 0.8, 0.0];

pub const VERTICES: [SceneVertex; OBJECT_COUNT * VERTICES_PER_OBJECT] = [
    // top right
    SceneVertex::new([1.0, 1.0, 0.0], RED, [1.0, 1.0]),
    SceneVertex::new([0.7, 1.0, 0.0], RED, [0.0, 1.0]),
    SceneVertex::new([0.7, 0.7, 0.0], RED, [0.0, 0.0]),
    SceneVertex::new([1.0, 0.7, 0.0], RED, [1.0, 0.0]),
    // bottom right
    SceneVertex::new([1.0, -1.0, 0.0], GREEN, [1.0, 0.0]),
    SceneVertex::new([0.7, -1.0, 0.0], GREEN, [0.0, 0.0]),
    SceneVertex::new([0.7, -0.7, 0.0], GREEN, [0.0, 1.0]),
    SceneVertex::new([1.0, -0.7, 0.0], GREEN, [1.0, 1.0]),
    // bottom left
    SceneVertex::new([-1.0, -1.0, 0.0], PURPLE, [0.0, 0.0]),
    SceneVertex::new([-0.7, -1.0, 0.0], PURPLE, [1.0, 0.0]),
    SceneVertex::new([-0.7, -0.7, 0.0], PURPLE, [1.0, 1.0]),
    SceneVertex::new([-1.0, -0.7, 0.0], PURPLE, [0.0, 1.0]),
    // top left
    SceneVertex::new([-1.0, 1.0, 0.0], AMBER, [0.0, 1.0]),
    SceneVertex::new([-0.7, 1.0, 0.0], AMBER, [1.0, 1.0]),
    SceneVertex::new([-0.7, 0.7, 0.0], AMBER, [1.0, 0.0]),
    SceneVertex::new([-1.0, 0.7, 0.0], AMBER, [0.0, 0.0]),
];

pub const INDICES: [u32; OBJECT_COUNT * INDICES_PER_OBJECT] = [
    0, 1, 2, 2, 3, 0, //
    4, 5, 6, 6, 7, 4, //
    8, 9, 10, 10, 11, 8, //
    12, 13, 14, 14, 15, 12,
];

/// Rotation and scaling pivot of each rectangle: its geometric center.
pub const OBJECT_CENTERS: [Vec3; OBJECT_COUNT] = [
    Vec3::new(0.85, 0.85, 0.0),
    Vec3::new(0.85, -0.85, 0.0),
    Vec3::new(-0.85, -0.85, 0.0),
    Vec3::new(-0.85, 0.85, 0.0),
];

pub fn object_indices(index: usize) -> Range<u32> {
    let start = (index * INDICES_PER_OBJECT) as u32;
    start..start + INDICES_PER_OBJECT as u32
}
