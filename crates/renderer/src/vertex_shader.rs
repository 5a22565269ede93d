//! Applies the composite camera matrix to one vertex (§4.3). Runs after
//! the `Object`'s model/normal transform has already been applied to
//! `object_pos`/`normal`; normals are not re-transformed here.

use crate::geometry::Vertex;
use renderer_core::math::{Mat4, Vec4};

pub fn shade_vertex(camera_matrix: Mat4, vertex: &mut Vertex) {
    let homog = camera_matrix * Vec4::new(vertex.object_pos.x, vertex.object_pos.y, vertex.object_pos.z, 1.0);
    vertex.w = homog.w;
    if homog.w.abs() > renderer_core::math::EPSILON {
        vertex.screen_pos = homog.truncate() / homog.w;
    } else {
        vertex.screen_pos = homog.truncate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer_core::math::Vec3;

    #[test]
    fn identity_matrix_divides_by_w_one() {
        let mut v = Vertex::new(Vec3::new(2.0, 3.0, 4.0), Vec3::Y);
        shade_vertex(Mat4::IDENTITY, &mut v);
        assert_eq!(v.w, 1.0);
        assert_eq!(v.screen_pos, Vec3::new(2.0, 3.0, 4.0));
    }
}
