//! `Object`: shared vertex/normal/texcoord pools, the material list, and
//! the model/normal transform (§3). Triangles index into these pools
//! rather than holding owning references.

use crate::geometry::{Shape, Vertex};
use crate::material::Material;
use crate::types::ShadingType;
use renderer_core::math::{Mat3, Mat4, Vec2, Vec3};
use std::sync::Arc;

pub struct Object {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub materials: Vec<Arc<Material>>,
    pub shapes: Vec<Shape>,
    pub model_matrix: Mat4,
    pub normal_matrix: Mat3,
    pub shading_type: ShadingType,
}

impl Object {
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        texcoords: Vec<Vec2>,
        materials: Vec<Arc<Material>>,
        shapes: Vec<Shape>,
        model_matrix: Mat4,
        normal_matrix: Mat3,
        shading_type: ShadingType,
    ) -> Self {
        Self {
            positions,
            normals,
            texcoords,
            materials,
            shapes,
            model_matrix,
            normal_matrix,
            shading_type,
        }
    }

    /// Applies the model/normal transform to the pools in place. Run once
    /// before vertex shading ("do_model_transform", §4.3).
    pub fn apply_model_transform(&mut self) {
        for p in &mut self.positions {
            *p = self.model_matrix.transform_point3(*p);
        }
        for n in &mut self.normals {
            *n = (self.normal_matrix * *n).normalize_or_zero();
        }
    }

    /// Builds the vertex for triangle corner `(position_idx, normal_idx)`.
    /// Falls back to the triangle's geometric face normal when no normal
    /// index is present (§3 Triangle invariants).
    pub fn vertex(&self, position_idx: u32, normal: Vec3) -> Vertex {
        Vertex::new(self.positions[position_idx as usize], normal)
    }

    pub fn texcoord(&self, idx: Option<u32>) -> Vec2 {
        match idx {
            Some(i) => self.texcoords[i as usize],
            None => Vec2::ZERO,
        }
    }

    pub fn material(&self, idx: usize) -> &Arc<Material> {
        &self.materials[idx]
    }
}
