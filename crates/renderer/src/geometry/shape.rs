use crate::geometry::Triangle;

/// A list of triangles sharing one `Object`'s pools (§3). The original's
/// per-shape material grouping is carried by each `Triangle`'s own
/// material index rather than a shape-level material, since OBJ files can
/// change material mid-shape on face groups.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    pub triangles: Vec<Triangle>,
}
