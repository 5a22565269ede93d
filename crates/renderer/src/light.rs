//! Point lights (§3). No area lights, no shadow maps — see Non-goals.

use renderer_core::math::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity: intensity.max(0.0),
        }
    }
}
