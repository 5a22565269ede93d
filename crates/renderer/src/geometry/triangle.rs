//! The rasterizer (§4.4-4.6): the per-triangle routine that writes into
//! the G-buffer. This is the heart of the core per the budget in §2.

use crate::camera::Camera;
use crate::gbuffer::{Buffer, MSAA_LEVEL, SAMPLE_OFFSETS};
use crate::geometry::{Object, Vertex};
use crate::light::Light;
use crate::shaders::{ShadeInput, Shader};
use crate::types::CullMode;
use renderer_core::math::{barycentric_2d, barycentric_2d_delta, perspective_correct, Vec2, Vec3, EPSILON};

/// Screen-space offset (in pixels) used to sample the two LOD-derivative
/// anchors (§4.4 step 5).
const LOD_DELTA: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct Triangle {
    /// Indices into `Object::positions`.
    pub v: [u32; 3],
    /// Indices into `Object::normals`, when present.
    pub vn: [Option<u32>; 3],
    /// Indices into `Object::texcoords`, when present.
    pub vt: [Option<u32>; 3],
    /// Index into `Object::materials`.
    pub material: usize,
}

impl Triangle {
    pub fn face_normal(&self, object: &Object) -> Vec3 {
        let p0 = object.positions[self.v[0] as usize];
        let p1 = object.positions[self.v[1] as usize];
        let p2 = object.positions[self.v[2] as usize];
        (p1 - p0).cross(p2 - p0).normalize_or_zero()
    }

    /// Per-corner normal, falling back to the geometric face normal when
    /// any corner has no normal index (§3 Triangle invariant).
    pub fn corner_normals(&self, object: &Object) -> [Vec3; 3] {
        if self.vn.iter().all(|n| n.is_some()) {
            [
                object.normals[self.vn[0].unwrap() as usize],
                object.normals[self.vn[1].unwrap() as usize],
                object.normals[self.vn[2].unwrap() as usize],
            ]
        } else {
            let face = self.face_normal(object);
            [face, face, face]
        }
    }

    pub fn uvs(&self, object: &Object) -> [Vec2; 3] {
        [
            object.texcoord(self.vt[0]),
            object.texcoord(self.vt[1]),
            object.texcoord(self.vt[2]),
        ]
    }

    pub fn has_texcoords(&self) -> bool {
        self.vt.iter().all(|t| t.is_some())
    }

    /// Triangle-constant tangent direction (§4.4 step 6). NaN when the UV
    /// edges are degenerate (`f == 0`); the caller must guard.
    pub fn tangent_u(&self, object: &Object) -> Vec3 {
        let p0 = object.positions[self.v[0] as usize];
        let p1 = object.positions[self.v[1] as usize];
        let p2 = object.positions[self.v[2] as usize];
        let uvs = self.uvs(object);

        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let du1 = uvs[1].x - uvs[0].x;
        let dv1 = uvs[1].y - uvs[0].y;
        let du2 = uvs[2].x - uvs[0].x;
        let dv2 = uvs[2].y - uvs[0].y;

        let f = du1 * dv2 - du2 * dv1;
        ((e1 * dv2 - e2 * dv1) / f).normalize()
    }
}

fn should_cull(normals: [Vec3; 3], positions: [Vec3; 3], camera_pos: Vec3, cull: CullMode) -> bool {
    match cull {
        CullMode::None => false,
        CullMode::Back => (0..3).all(|i| normals[i].dot(camera_pos - positions[i]) <= 0.0),
        CullMode::Front => (0..3).all(|i| normals[i].dot(camera_pos - positions[i]) >= 0.0),
    }
}

fn should_frustum_cull(vertices: &[Vertex; 3], width: f32, height: f32, relax: f32) -> bool {
    if vertices.iter().any(|v| v.w < EPSILON) {
        return true;
    }
    let ndc: Vec<(f32, f32, f32)> = vertices
        .iter()
        .map(|v| {
            let x = 2.0 * v.screen_pos.x / width - 1.0;
            let y = 1.0 - 2.0 * v.screen_pos.y / height;
            let z = v.screen_pos.z * 2.0 - 1.0;
            (x, y, z)
        })
        .collect();

    let beyond = |pick: fn(&(f32, f32, f32)) -> f32, bound: f32, greater: bool| {
        ndc.iter().all(|p| if greater { pick(p) > bound } else { pick(p) < bound })
    };
    beyond(|p| p.0, -relax, false)
        || beyond(|p| p.0, relax, true)
        || beyond(|p| p.1, -relax, false)
        || beyond(|p| p.1, relax, true)
        || beyond(|p| p.2, -relax, false)
        || beyond(|p| p.2, relax, true)
}

/// Builds a TBN frame from the triangle-constant tangent and a shading
/// normal, and maps a tangent-space normal-map sample (already `[-1,1]`)
/// into world space (§4.4 step 7c).
fn apply_normal_map(tbn_u: Vec3, normal: Vec3, sample: Vec3) -> Vec3 {
    let t = (tbn_u - tbn_u.dot(normal) * normal).normalize_or_zero();
    let b = t.cross(normal);
    (t * sample.x + b * sample.y + normal * sample.z).normalize_or_zero()
}

#[allow(clippy::too_many_arguments)]
pub fn rasterize(
    triangle: &Triangle,
    object: &Object,
    shaded: &[Vertex; 3],
    camera: &Camera,
    shader: &Shader,
    cull: CullMode,
    lights: &[Light],
    buffer: &Buffer,
) {
    let normals = triangle.corner_normals(object);
    let positions = [shaded[0].object_pos, shaded[1].object_pos, shaded[2].object_pos];
    let camera_pos = camera.position_f32();

    if should_cull(normals, positions, camera_pos, cull) {
        return;
    }
    if should_frustum_cull(shaded, buffer.width as f32, buffer.height as f32, camera.relax_view_culling_factor as f32) {
        return;
    }

    let p = [
        Vec2::new(shaded[0].screen_pos.x, shaded[0].screen_pos.y),
        Vec2::new(shaded[1].screen_pos.x, shaded[1].screen_pos.y),
        Vec2::new(shaded[2].screen_pos.x, shaded[2].screen_pos.y),
    ];
    let z = [shaded[0].screen_pos.z, shaded[1].screen_pos.z, shaded[2].screen_pos.z];
    let w = (shaded[0].w, shaded[1].w, shaded[2].w);

    let min_x = p.iter().map(|v| v.x).fold(f32::INFINITY, f32::min).floor().max(0.0) as i64;
    let max_x = p.iter().map(|v| v.x).fold(f32::NEG_INFINITY, f32::max).ceil().min(buffer.width as f32) as i64;
    let min_y = p.iter().map(|v| v.y).fold(f32::INFINITY, f32::min).floor().max(0.0) as i64;
    let max_y = p.iter().map(|v| v.y).fold(f32::NEG_INFINITY, f32::max).ceil().min(buffer.height as f32) as i64;
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    let origin = Vec2::new(min_x as f32 + 0.5, min_y as f32 + 0.5);
    let base_bary = barycentric_2d(origin, p[0], p[1], p[2]);
    let dx = barycentric_2d_delta(p[0], p[1], p[2], Vec2::new(1.0, 0.0));
    let dy = barycentric_2d_delta(p[0], p[1], p[2], Vec2::new(0.0, 1.0));
    let sample_deltas: [(f32, f32, f32); MSAA_LEVEL] = SAMPLE_OFFSETS.map(|(ox, oy)| {
        let step = Vec2::new(ox - 0.5, oy - 0.5);
        barycentric_2d_delta(p[0], p[1], p[2], step)
    });
    let lod_dx = barycentric_2d_delta(p[0], p[1], p[2], Vec2::new(LOD_DELTA, 0.0));
    let lod_dy = barycentric_2d_delta(p[0], p[1], p[2], Vec2::new(0.0, LOD_DELTA));

    let material = object.material(triangle.material);
    let has_uv = triangle.has_texcoords();
    let uvs = triangle.uvs(object);
    let tbn_u = if material.normal_map.is_some() && has_uv {
        Some(triangle.tangent_u(object))
    } else {
        None
    };

    let add = |a: (f32, f32, f32), b: (f32, f32, f32)| (a.0 + b.0, a.1 + b.1, a.2 + b.2);

    let mut row_bary = base_bary;
    for y in min_y..max_y {
        let mut pixel_bary = row_bary;
        for x in min_x..max_x {
            rasterize_pixel(PixelCtx {
                x: x as u32,
                y: y as u32,
                pixel_bary,
                sample_deltas: &sample_deltas,
                lod_dx,
                lod_dy,
                z,
                w,
                positions: &positions,
                normals: &normals,
                uvs: &uvs,
                has_uv,
                tbn_u,
                material,
                shader,
                lights,
                camera_pos,
                buffer,
            });
            pixel_bary = add(pixel_bary, dx);
        }
        row_bary = add(row_bary, dy);
    }
}

struct PixelCtx<'a> {
    x: u32,
    y: u32,
    pixel_bary: (f32, f32, f32),
    sample_deltas: &'a [(f32, f32, f32); MSAA_LEVEL],
    lod_dx: (f32, f32, f32),
    lod_dy: (f32, f32, f32),
    z: [f32; 3],
    w: (f32, f32, f32),
    positions: &'a [Vec3; 3],
    normals: &'a [Vec3; 3],
    uvs: &'a [Vec2; 3],
    has_uv: bool,
    tbn_u: Option<Vec3>,
    material: &'a crate::material::Material,
    shader: &'a Shader,
    lights: &'a [Light],
    camera_pos: Vec3,
    buffer: &'a Buffer,
}

fn interpolate_vec3(bary: (f32, f32, f32), values: &[Vec3; 3]) -> Vec3 {
    values[0] * bary.0 + values[1] * bary.1 + values[2] * bary.2
}

fn interpolate_vec2(bary: (f32, f32, f32), values: &[Vec2; 3]) -> Vec2 {
    values[0] * bary.0 + values[1] * bary.1 + values[2] * bary.2
}

fn rasterize_pixel(ctx: PixelCtx) {
    ctx.buffer.with_pixel(ctx.x, ctx.y, |cell| {
        let mut covered_flag: u8 = 0;
        let mut covered_barys: Vec<(f32, f32, f32)> = Vec::with_capacity(MSAA_LEVEL);

        for (i, delta) in ctx.sample_deltas.iter().enumerate() {
            let sample_bary = (
                ctx.pixel_bary.0 + delta.0,
                ctx.pixel_bary.1 + delta.1,
                ctx.pixel_bary.2 + delta.2,
            );
            if sample_bary.0 < -EPSILON || sample_bary.1 < -EPSILON || sample_bary.2 < -EPSILON {
                continue;
            }
            let corrected = perspective_correct(sample_bary, ctx.w);

            if ctx.normals[0] != ctx.normals[1] || ctx.normals[1] != ctx.normals[2] {
                let interp_n = interpolate_vec3(corrected, ctx.normals).normalize_or_zero();
                let interp_p = interpolate_vec3(corrected, ctx.positions);
                if interp_n.dot(ctx.camera_pos - interp_p) <= 0.0 {
                    continue;
                }
            }

            if ctx.has_uv {
                let uv = interpolate_vec2(corrected, ctx.uvs);
                let alpha = ctx.material.alpha_at(uv);
                if alpha < EPSILON {
                    continue;
                }
            }

            let z_ss = ctx.z[0] * sample_bary.0 + ctx.z[1] * sample_bary.1 + ctx.z[2] * sample_bary.2;
            if z_ss > 0.0 && z_ss < cell.depth[i] {
                cell.depth[i] = z_ss;
                covered_flag |= 1 << i;
                covered_barys.push(sample_bary);
            }
        }

        if covered_flag == 0 {
            return;
        }

        let anchor = if covered_flag == 0b1111 {
            ctx.pixel_bary
        } else {
            let n = covered_barys.len() as f32;
            let sum = covered_barys.iter().fold((0.0, 0.0, 0.0), |acc, b| (acc.0 + b.0, acc.1 + b.1, acc.2 + b.2));
            (sum.0 / n, sum.1 / n, sum.2 / n)
        };

        let anchor_corrected = perspective_correct(anchor, ctx.w);
        let pos = interpolate_vec3(anchor_corrected, ctx.positions);
        let mut shading_normal = interpolate_vec3(anchor_corrected, ctx.normals).normalize_or_zero();

        let (uv, duv) = if ctx.has_uv {
            let anchor_lodx = (anchor.0 + ctx.lod_dx.0, anchor.1 + ctx.lod_dx.1, anchor.2 + ctx.lod_dx.2);
            let anchor_lody = (anchor.0 + ctx.lod_dy.0, anchor.1 + ctx.lod_dy.1, anchor.2 + ctx.lod_dy.2);
            let uv0 = interpolate_vec2(anchor_corrected, ctx.uvs);
            let uvx = interpolate_vec2(perspective_correct(anchor_lodx, ctx.w), ctx.uvs);
            let uvy = interpolate_vec2(perspective_correct(anchor_lody, ctx.w), ctx.uvs);
            let du_dx = (uvx.x - uv0.x) / LOD_DELTA;
            let du_dy = (uvy.x - uv0.x) / LOD_DELTA;
            let dv_dx = (uvx.y - uv0.y) / LOD_DELTA;
            let dv_dy = (uvy.y - uv0.y) / LOD_DELTA;
            let duv = Vec2::new((du_dx.abs() + du_dy.abs()) / 2.0, (dv_dx.abs() + dv_dy.abs()) / 2.0);
            (uv0, duv)
        } else {
            (Vec2::ZERO, Vec2::ONE)
        };

        if let (Some(tbn_u), Some(map)) = (ctx.tbn_u, &ctx.material.normal_map) {
            if tbn_u.is_finite() {
                let sample = map.sample(uv.x, uv.y, duv.x, duv.y, true) * 2.0 - Vec3::ONE;
                shading_normal = apply_normal_map(tbn_u, shading_normal, sample);
            }
        }

        let color = ctx.shader.shade(&ShadeInput {
            pos,
            normal: shading_normal,
            uv,
            duv,
            material: ctx.material,
            lights: ctx.lights,
            eye_pos: ctx.camera_pos,
        });

        for i in 0..MSAA_LEVEL {
            if covered_flag & (1 << i) != 0 {
                cell.frame[i] = color;
                cell.position[i] = pos;
                cell.normal[i] = shading_normal;
            }
        }
        cell.full_covered = covered_flag == 0b1111;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_cull_back_when_all_vertices_face_away() {
        let normals = [Vec3::new(0.0, 0.0, -1.0); 3];
        let positions = [Vec3::ZERO; 3];
        let camera_pos = Vec3::new(0.0, 0.0, 5.0);
        assert!(should_cull(normals, positions, camera_pos, CullMode::Back));
        assert!(!should_cull(normals, positions, camera_pos, CullMode::Front));
    }

    #[test]
    fn none_cull_never_rejects() {
        let normals = [Vec3::new(0.0, 0.0, -1.0); 3];
        let positions = [Vec3::ZERO; 3];
        assert!(!should_cull(normals, positions, Vec3::ZERO, CullMode::None));
    }

    #[test]
    fn tangent_is_nan_for_degenerate_uv_edges() {
        use crate::geometry::Object;
        use crate::types::ShadingType;
        use renderer_core::math::{Mat3, Mat4};

        // uv1 == uv0 makes both uv edges collinear in the v-axis, so
        // f = du1*dv2 - du2*dv1 == 0.
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = vec![Vec3::Z];
        let texcoords = vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
        let object = Object::new(
            positions,
            normals,
            texcoords,
            vec![],
            vec![],
            Mat4::IDENTITY,
            Mat3::IDENTITY,
            ShadingType::Default,
        );
        let triangle = Triangle {
            v: [0, 1, 2],
            vn: [None, None, None],
            vt: [Some(0), Some(1), Some(2)],
            material: 0,
        };
        assert!(!triangle.tangent_u(&object).is_finite());
    }
}
