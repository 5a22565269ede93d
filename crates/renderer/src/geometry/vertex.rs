use renderer_core::math::Vec3;

/// One triangle corner, carried from object space through the vertex
/// shader into screen space (§3 Data Model).
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    /// Position after the `Object`'s model transform, before the camera
    /// matrix is applied.
    pub object_pos: Vec3,
    /// `(pixel.x, pixel.y, depth in [0,1])` after the vertex shader runs.
    pub screen_pos: Vec3,
    /// Perspective divisor, `w = view-space -z`.
    pub w: f32,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(object_pos: Vec3, normal: Vec3) -> Self {
        Self {
            object_pos,
            screen_pos: Vec3::ZERO,
            w: 1.0,
            normal,
        }
    }
}
