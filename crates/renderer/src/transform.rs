//! Model/normal/view/projection/viewport matrix builders (§4.1). The
//! camera chain is accumulated in `glam::DMat4`/`DVec3` and narrowed to
//! `f32` once the composite matrix is final, matching the double-precision
//! accumulation the teacher's transform code uses for its own camera math.

use renderer_core::math::{DMat3, DMat4, DVec3, DVec4, Mat3, Mat4};

/// `scale -> rotate (Z*Y*X Euler) -> translate`. Normals use the same
/// rotation composed with the inverse-transpose of the scale.
pub fn model_matrix(scale: DVec3, rotation_deg: DVec3, translation: DVec3) -> DMat4 {
    let rotation = rotation_matrix(rotation_deg);
    DMat4::from_translation(translation) * DMat4::from_mat3(rotation) * DMat4::from_scale(scale)
}

pub fn normal_matrix(scale: DVec3, rotation_deg: DVec3) -> DMat3 {
    let rotation = rotation_matrix(rotation_deg);
    let inv_scale = DMat3::from_diagonal(DVec3::new(1.0 / scale.x, 1.0 / scale.y, 1.0 / scale.z));
    rotation * inv_scale
}

fn rotation_matrix(rotation_deg: DVec3) -> DMat3 {
    let rx = rotation_deg.x.to_radians();
    let ry = rotation_deg.y.to_radians();
    let rz = rotation_deg.z.to_radians();
    DMat3::from_rotation_z(rz) * DMat3::from_rotation_y(ry) * DMat3::from_rotation_x(rx)
}

/// World-to-view. Rotation rows are `[left, up, look]` with
/// `left = up x look`; both `look_dir` and `up_dir` are assumed already
/// unit-length and orthogonal (see `Camera::new`).
pub fn view_matrix(position: DVec3, look_dir: DVec3, up_dir: DVec3) -> DMat4 {
    let look = look_dir;
    let left = up_dir.cross(look).normalize();
    let up = look.cross(left);

    let rotation = DMat3::from_cols(
        DVec3::new(left.x, up.x, look.x),
        DVec3::new(left.y, up.y, look.y),
        DVec3::new(left.z, up.z, look.z),
    );

    DMat4::from_mat3(rotation) * DMat4::from_translation(-position)
}

/// GL-style perspective: x,y -> [-1,1], z -> [-1,1], divisor `w = -z_view`.
pub fn projection_matrix(fov_y_deg: f64, aspect: f64, near: f64, far: f64) -> DMat4 {
    let fov_y = fov_y_deg.to_radians();
    let f = 1.0 / (fov_y / 2.0).tan();
    let nf = 1.0 / (near - far);

    DMat4::from_cols(
        DVec4::new(f / aspect, 0.0, 0.0, 0.0),
        DVec4::new(0.0, f, 0.0, 0.0),
        DVec4::new(0.0, 0.0, (far + near) * nf, -1.0),
        DVec4::new(0.0, 0.0, 2.0 * far * near * nf, 0.0),
    )
}

/// NDC-to-screen. x: [-1,1] -> [0,W]; y: [-1,1] -> [0,H] inverted (image
/// origin top-left); z: [-1,1] -> [0,1].
pub fn viewport_matrix(width: f64, height: f64) -> DMat4 {
    DMat4::from_cols(
        DVec4::new(width / 2.0, 0.0, 0.0, 0.0),
        DVec4::new(0.0, -height / 2.0, 0.0, 0.0),
        DVec4::new(0.0, 0.0, 0.5, 0.0),
        DVec4::new(width / 2.0, height / 2.0, 0.5, 1.0),
    )
}

/// Narrow a double-precision composite matrix to `f32` once, applied
/// per-vertex thereafter (§4.1).
pub fn narrow_to_f32(m: DMat4) -> Mat4 {
    let cols = m.to_cols_array();
    let mut narrowed = [0.0f32; 16];
    for (dst, src) in narrowed.iter_mut().zip(cols.iter()) {
        *dst = *src as f32;
    }
    Mat4::from_cols_array(&narrowed)
}

/// Narrow a double-precision normal matrix to `f32` once, applied per
/// `Object` (§4.1).
pub fn narrow_to_f32_mat3(m: DMat3) -> Mat3 {
    let cols = m.to_cols_array();
    let mut narrowed = [0.0f32; 9];
    for (dst, src) in narrowed.iter_mut().zip(cols.iter()) {
        *dst = *src as f32;
    }
    Mat3::from_cols_array(&narrowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn view_matrix_maps_camera_position_to_origin() {
        let pos = DVec3::new(0.0, 0.0, 5.0);
        let look = DVec3::new(0.0, 0.0, -1.0);
        let up = DVec3::new(0.0, 1.0, 0.0);
        let v = view_matrix(pos, look, up);
        let out = v * pos.extend(1.0);
        assert!(approx_eq(out.x, 0.0, 1e-9));
        assert!(approx_eq(out.y, 0.0, 1e-9));
        assert!(approx_eq(out.z, 0.0, 1e-9));
    }

    #[test]
    fn viewport_matrix_maps_ndc_corners_to_pixel_corners() {
        let m = viewport_matrix(800.0, 600.0);
        let top_left = m * DVec4::new(-1.0, 1.0, -1.0, 1.0);
        assert!(approx_eq(top_left.x, 0.0, 1e-9));
        assert!(approx_eq(top_left.y, 0.0, 1e-9));
        let bottom_right = m * DVec4::new(1.0, -1.0, 1.0, 1.0);
        assert!(approx_eq(bottom_right.x, 800.0, 1e-9));
        assert!(approx_eq(bottom_right.y, 600.0, 1e-9));
        assert!(approx_eq(bottom_right.z, 1.0, 1e-9));
    }

    #[test]
    fn projection_matrix_divisor_is_negative_view_z() {
        let m = projection_matrix(60.0, 1.0, 0.1, 100.0);
        let clip = m * DVec4::new(0.0, 0.0, -10.0, 1.0);
        assert!(approx_eq(clip.w, 10.0, 1e-9));
    }

    #[test]
    fn normal_matrix_is_identity_rotation_for_uniform_scale() {
        let n = normal_matrix(DVec3::splat(2.0), DVec3::ZERO);
        let v = DVec3::new(1.0, 0.0, 0.0);
        let out = n * v;
        assert!(approx_eq(out.x, 0.5, 1e-9));
    }

    #[test]
    fn narrowing_mat3_preserves_values_within_f32_precision() {
        let n = normal_matrix(DVec3::splat(2.0), DVec3::ZERO);
        let narrowed = narrow_to_f32_mat3(n);
        let v = narrowed * renderer_core::math::Vec3::X;
        assert!((v.x - 0.5).abs() < 1e-6);
    }
}
