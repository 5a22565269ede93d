//! Camera parameters and the composite camera matrix (§4.1, §3).

use crate::error::{RenderError, Result};
use crate::transform;
use renderer_core::math::{DVec3, Mat4};

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: DVec3,
    pub look_dir: DVec3,
    pub up_dir: DVec3,
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub width: u32,
    pub height: u32,
    /// Multiplier on the clip-space frustum bounds used by the
    /// view-frustum cull test (§9, resolving the `relax-view-culling-factor`
    /// open question).
    pub relax_view_culling_factor: f64,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: DVec3,
        look_dir: DVec3,
        up_dir: DVec3,
        fov_y_deg: f64,
        near: f64,
        far: f64,
        width: u32,
        height: u32,
        relax_view_culling_factor: f64,
    ) -> Result<Self> {
        if !(near > 0.0 && far > near) {
            return Err(RenderError::InvalidCamera {
                field: "near/far",
                constraint: "0 < near < far",
                value: near,
            });
        }
        if look_dir.length_squared() < 1e-12 {
            return Err(RenderError::InvalidCamera {
                field: "look_dir",
                constraint: "non-zero",
                value: 0.0,
            });
        }

        let look = look_dir.normalize();
        // Gram-Schmidt: make up orthogonal to look, then normalize.
        let up = (up_dir - look * up_dir.dot(look)).normalize();

        Ok(Self {
            position,
            look_dir: look,
            up_dir: up,
            fov_y_deg,
            near,
            far,
            width,
            height,
            relax_view_culling_factor,
        })
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn view_matrix(&self) -> renderer_core::math::DMat4 {
        transform::view_matrix(self.position, self.look_dir, self.up_dir)
    }

    pub fn projection_matrix(&self) -> renderer_core::math::DMat4 {
        transform::projection_matrix(self.fov_y_deg, self.aspect(), self.near, self.far)
    }

    pub fn viewport_matrix(&self) -> renderer_core::math::DMat4 {
        transform::viewport_matrix(self.width as f64, self.height as f64)
    }

    /// `viewport * projection * view`, narrowed to `f32` once (§4.1).
    /// Applied per-vertex to already model-transformed positions.
    pub fn camera_matrix(&self) -> Mat4 {
        let composite = self.viewport_matrix() * self.projection_matrix() * self.view_matrix();
        transform::narrow_to_f32(composite)
    }

    /// Position narrowed to `f32`, used by fragment shaders as the eye
    /// position for view vectors.
    pub fn position_f32(&self) -> renderer_core::math::Vec3 {
        renderer_core::math::Vec3::new(
            self.position.x as f32,
            self.position.y as f32,
            self.position.z as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthogonalizes_up_against_look() {
        let cam = Camera::new(
            DVec3::ZERO,
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(0.1, 1.0, 0.0),
            60.0,
            0.1,
            100.0,
            800,
            600,
            1.0,
        )
        .unwrap();
        assert!(cam.up_dir.dot(cam.look_dir).abs() < 1e-9);
        assert!((cam.up_dir.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_invalid_near_far() {
        let result = Camera::new(
            DVec3::ZERO,
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::Y,
            60.0,
            10.0,
            1.0,
            800,
            600,
            1.0,
        );
        assert!(result.is_err());
    }
}
