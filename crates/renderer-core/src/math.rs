//! Thin math layer on top of `glam`.
//!
//! The camera transform chain (§4.1) is accumulated in double precision to
//! avoid near-plane precision loss, so this module re-exports both the
//! single- and double-precision `glam` types rather than wrapping them in
//! bespoke vector/matrix structs.

pub use glam::{DMat3, DMat4, DVec2, DVec3, DVec4, Mat3, Mat4, Vec2, Vec3, Vec4};

/// A small positive slack used throughout the rasterizer for inclusive edge
/// tests, culling boundaries, and divide-by-zero guards.
pub const EPSILON: f32 = 1e-5;

/// Barycentric weights of a 2D point against a 2D triangle, via the
/// closed-form linear formula (§4.5). Returns `(w1, w2, w3)`.
///
/// The formula is linear in `p`, which is what lets the rasterizer step it
/// by constant per-pixel/per-sample deltas instead of recomputing it.
pub fn barycentric_2d(p: Vec2, v1: Vec2, v2: Vec2, v3: Vec2) -> (f32, f32, f32) {
    let denom1 = (v2.y - v3.y) * v1.x - (v2.x - v3.x) * v1.y + v2.x * v3.y - v3.x * v2.y;
    let denom2 = (v3.y - v1.y) * v2.x - (v3.x - v1.x) * v2.y + v3.x * v1.y - v1.x * v3.y;

    let w1 = ((v2.y - v3.y) * p.x - (v2.x - v3.x) * p.y + v2.x * v3.y - v3.x * v2.y) / denom1;
    let w2 = ((v3.y - v1.y) * p.x - (v3.x - v1.x) * p.y + v3.x * v1.y - v1.x * v3.y) / denom2;
    let w3 = 1.0 - w1 - w2;
    (w1, w2, w3)
}

/// Per-pixel/per-sample increment of `barycentric_2d` along screen x, for a
/// given step `(dx, dy)`. Used to turn the closed form into an incremental
/// per-pixel addition (§4.4 step 4).
pub fn barycentric_2d_delta(v1: Vec2, v2: Vec2, v3: Vec2, step: Vec2) -> (f32, f32, f32) {
    let (w1_0, w2_0, w3_0) = barycentric_2d(Vec2::ZERO, v1, v2, v3);
    let (w1_1, w2_1, w3_1) = barycentric_2d(step, v1, v2, v3);
    (w1_1 - w1_0, w2_1 - w2_0, w3_1 - w3_0)
}

/// Perspective-correct barycentrics from screen-space barycentrics and the
/// per-vertex perspective divisors (§4.6).
pub fn perspective_correct(bary: (f32, f32, f32), w: (f32, f32, f32)) -> (f32, f32, f32) {
    let (w1, w2, w3) = bary;
    let a = w1 / w.0;
    let b = w2 / w.1;
    let c = w3 / w.2;
    let l = a + b + c;
    (a / l, b / l, c / l)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn barycentric_sums_to_one() {
        let v1 = Vec2::new(0.0, 0.0);
        let v2 = Vec2::new(10.0, 0.0);
        let v3 = Vec2::new(0.0, 10.0);
        let (w1, w2, w3) = barycentric_2d(Vec2::new(2.0, 3.0), v1, v2, v3);
        assert!(approx_eq(w1 + w2 + w3, 1.0, 1e-5));
    }

    #[test]
    fn barycentric_at_vertices_is_one_hot() {
        let v1 = Vec2::new(0.0, 0.0);
        let v2 = Vec2::new(10.0, 0.0);
        let v3 = Vec2::new(0.0, 10.0);
        let (w1, w2, w3) = barycentric_2d(v1, v1, v2, v3);
        assert!(approx_eq(w1, 1.0, 1e-4));
        assert!(approx_eq(w2, 0.0, 1e-4));
        assert!(approx_eq(w3, 0.0, 1e-4));
    }

    #[test]
    fn perspective_correct_is_identity_when_w_equal() {
        let bary = (0.2, 0.3, 0.5);
        let out = perspective_correct(bary, (1.0, 1.0, 1.0));
        assert!(approx_eq(out.0, 0.2, 1e-5));
        assert!(approx_eq(out.1, 0.3, 1e-5));
        assert!(approx_eq(out.2, 0.5, 1e-5));
    }
}
