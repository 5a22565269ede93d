//! Outline pass fragment shader (§4.9): a constant color, independent of
//! lighting or geometry.

use renderer_core::math::Vec3;

pub fn shade(color: Vec3) -> Vec3 {
    color
}
