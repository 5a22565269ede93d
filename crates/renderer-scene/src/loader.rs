//! OBJ/MTL mesh loading (`tobj`) and texture loading (`image`), wired into
//! `renderer::geometry::Object`/`renderer::material::Material` (§6).

use crate::config::{MaterialOverrideConfig, ObjectConfig};
use crate::error::{Result, SceneError};
use renderer::geometry::{Object, Shape, Triangle};
use renderer::material::Material;
use renderer::transform;
use renderer::types::ShadingType;
use renderer_core::math::{DVec3, Vec2, Vec3};
use renderer_core::mipmap::Mipmap;
use renderer_core::texture::Texture;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Loads one RGB texture by filename relative to `basepath` and builds its
/// mipmap chain. Per §7 *AssetLoadError*: a missing or unreadable texture
/// is logged and treated as absent rather than aborting the load.
fn load_color_map(basepath: &str, texname: &str, linear: bool) -> Option<Arc<Mipmap<Vec3>>> {
    let path = Path::new(basepath).join(texname);
    match image::open(&path) {
        Ok(img) => match Texture::<Vec3>::from_image(&img, linear) {
            Ok(tex) => Some(Arc::new(Mipmap::build(tex))),
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to decode texture, falling back to material constant");
                None
            }
        },
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to open texture file, falling back to material constant");
            None
        }
    }
}

fn load_scalar_map(basepath: &str, texname: &str) -> Option<Arc<Mipmap<f32>>> {
    let path = Path::new(basepath).join(texname);
    match image::open(&path) {
        Ok(img) => match Texture::<f32>::from_image(&img, true) {
            Ok(tex) => Some(Arc::new(Mipmap::build(tex))),
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to decode texture, falling back to material constant");
                None
            }
        },
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to open texture file, falling back to material constant");
            None
        }
    }
}

/// MTL extension fields (`Pr`, `Pm`, `Ps`) aren't part of tobj's typed
/// `Material` struct; they come through as raw key/value pairs.
fn unknown_param_f32(material: &tobj::Material, key: &str, default: f32) -> f32 {
    material
        .unknown_param
        .get(key)
        .and_then(|v| v.parse::<f32>().ok())
        .unwrap_or(default)
}

fn build_material(tobj_material: Option<&tobj::Material>, basepath: &str, overrides: &MaterialOverrideConfig) -> Material {
    let mut material = Material::default();

    if let Some(m) = tobj_material {
        if let Some(d) = m.diffuse {
            material.diffuse = Vec3::from_array(d);
        }
        if let Some(a) = m.ambient {
            material.ambient = Vec3::from_array(a);
        }
        if let Some(s) = m.specular {
            material.specular = Vec3::from_array(s);
        }
        if let Some(shininess) = m.shininess {
            material.shininess = shininess;
        }
        if let Some(ior) = m.optical_density {
            material.ior = ior;
        }
        if let Some(dissolve) = m.dissolve {
            material.dissolve = dissolve;
        }
        material.roughness = unknown_param_f32(m, "Pr", material.roughness);
        material.metallic = unknown_param_f32(m, "Pm", material.metallic);
        material.sheen = unknown_param_f32(m, "Ps", material.sheen);

        if let Some(texname) = &m.diffuse_texture {
            material.diffuse_map = load_color_map(basepath, texname, false);
        }
        if let Some(texname) = &m.ambient_texture {
            material.ambient_map = load_color_map(basepath, texname, false);
        }
        if let Some(texname) = &m.specular_texture {
            material.specular_map = load_color_map(basepath, texname, false);
        }
        if let Some(texname) = &m.normal_texture {
            material.normal_map = load_color_map(basepath, texname, true);
        }
        if let Some(texname) = &m.dissolve_texture {
            material.alpha_map = load_scalar_map(basepath, texname);
        }
    }

    if let Some(v) = overrides.ambient {
        material.ambient = Vec3::from_array(v);
    }
    if let Some(v) = overrides.diffuse {
        material.diffuse = Vec3::from_array(v);
    }
    if let Some(v) = overrides.specular {
        material.specular = Vec3::from_array(v);
    }
    if let Some(v) = overrides.shininess {
        material.shininess = v;
    }
    if let Some(v) = overrides.ior {
        material.ior = v;
    }
    if let Some(v) = overrides.roughness {
        material.roughness = v;
    }
    if let Some(v) = overrides.metallic {
        material.metallic = v;
    }
    if let Some(v) = overrides.sheen {
        material.sheen = v;
    }
    if let Some(texname) = &overrides.ambient_texname {
        material.ambient_map = load_color_map(basepath, texname, false);
    }
    if let Some(texname) = &overrides.diffuse_texname {
        material.diffuse_map = load_color_map(basepath, texname, false);
    }
    if let Some(texname) = &overrides.specular_texname {
        material.specular_map = load_color_map(basepath, texname, false);
    }
    if let Some(texname) = &overrides.alpha_texname {
        material.alpha_map = load_scalar_map(basepath, texname);
    }
    if let Some(texname) = &overrides.normal_texname {
        material.normal_map = load_color_map(basepath, texname, true);
    }

    material
}

/// Builds one `Triangle` per triangulated face. tobj gives parallel flat
/// index arrays (`indices`, `normal_indices`, `texcoord_indices`) rather
/// than one combined index per corner; a channel is carried as `None` when
/// the OBJ face omitted it entirely (§3 Triangle invariant).
fn build_shapes(mesh: &tobj::Mesh, material_index: usize) -> Shape {
    let face_count = mesh.indices.len() / 3;
    let has_normals = mesh.normal_indices.len() == mesh.indices.len();
    let has_texcoords = mesh.texcoord_indices.len() == mesh.indices.len();

    let mut triangles = Vec::with_capacity(face_count);
    for f in 0..face_count {
        let base = f * 3;
        let v = [mesh.indices[base], mesh.indices[base + 1], mesh.indices[base + 2]];
        let vn = if has_normals {
            [
                Some(mesh.normal_indices[base]),
                Some(mesh.normal_indices[base + 1]),
                Some(mesh.normal_indices[base + 2]),
            ]
        } else {
            [None, None, None]
        };
        let vt = if has_texcoords {
            [
                Some(mesh.texcoord_indices[base]),
                Some(mesh.texcoord_indices[base + 1]),
                Some(mesh.texcoord_indices[base + 2]),
            ]
        } else {
            [None, None, None]
        };
        triangles.push(Triangle { v, vn, vt, material: material_index });
    }
    Shape { triangles }
}

pub fn load_object(config: &ObjectConfig) -> Result<Object> {
    let full_path = Path::new(&config.basepath).join(&config.path);
    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
    };

    let (models, materials_result) =
        tobj::load_obj(&full_path, &load_options).map_err(|source| SceneError::ObjLoad {
            path: full_path.display().to_string(),
            source,
        })?;

    let tobj_materials = materials_result.unwrap_or_else(|err| {
        warn!(path = %full_path.display(), %err, "failed to load companion MTL, using default material");
        Vec::new()
    });

    let mut materials: Vec<Arc<Material>> = if tobj_materials.is_empty() {
        vec![Arc::new(build_material(None, &config.basepath, &config.material))]
    } else {
        tobj_materials
            .iter()
            .map(|m| Arc::new(build_material(Some(m), &config.basepath, &config.material)))
            .collect()
    };

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut texcoords = Vec::new();
    let mut shapes = Vec::with_capacity(models.len());

    for model in &models {
        let mesh = &model.mesh;

        // Each model's index arrays are local to its own position/normal/
        // texcoord arrays, so indices are rebased onto the shared pools as
        // they're appended.
        let v_base = positions.len() as u32;
        let n_base = normals.len() as u32;
        let t_base = texcoords.len() as u32;

        positions.extend(mesh.positions.chunks_exact(3).map(|p| Vec3::new(p[0], p[1], p[2])));
        normals.extend(mesh.normals.chunks_exact(3).map(|n| Vec3::new(n[0], n[1], n[2])));
        texcoords.extend(mesh.texcoords.chunks_exact(2).map(|t| Vec2::new(t[0], t[1])));

        let material_index = mesh.material_id.map(|id| id.min(materials.len().saturating_sub(1))).unwrap_or(0);
        let mut shape = build_shapes(mesh, material_index);
        for triangle in &mut shape.triangles {
            for v in &mut triangle.v {
                *v += v_base;
            }
            for vn in &mut triangle.vn {
                if let Some(i) = vn {
                    *i += n_base;
                }
            }
            for vt in &mut triangle.vt {
                if let Some(i) = vt {
                    *i += t_base;
                }
            }
        }
        shapes.push(shape);
    }

    if shapes.is_empty() || shapes.iter().all(|s| s.triangles.is_empty()) {
        return Err(SceneError::Render(renderer::RenderError::EmptyObject(config.path.clone())));
    }

    if materials.is_empty() {
        materials.push(Arc::new(Material::default()));
    }

    let scale = DVec3::from_array(config.scale);
    let rotation = DVec3::from_array(config.rotation);
    let translation = DVec3::from_array(config.pos);
    let model_matrix = transform::narrow_to_f32(transform::model_matrix(scale, rotation, translation));
    let normal_matrix = transform::narrow_to_f32_mat3(transform::normal_matrix(scale, rotation));

    Ok(Object::new(
        positions,
        normals,
        texcoords,
        materials,
        shapes,
        model_matrix,
        normal_matrix,
        config.shading_type,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_mesh_file_is_reported_as_obj_load_error() {
        let config = ObjectConfig {
            path: "does-not-exist.obj".to_string(),
            basepath: ".".to_string(),
            pos: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            shading_type: ShadingType::Default,
            material: MaterialOverrideConfig::default(),
        };
        let result = load_object(&config);
        assert!(matches!(result, Err(SceneError::ObjLoad { .. })));
    }
}
