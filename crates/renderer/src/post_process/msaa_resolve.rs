//! MSAA resolve (§4.8): narrows the G-buffer's per-sample arrays down to
//! single images once rasterization (and rim-light, which still reads the
//! MSAA arrays) has finished.

use crate::gbuffer::{resolve, Buffer};
use renderer_core::math::Vec3;

pub struct Resolved {
    pub frame: Vec<Vec3>,
    pub depth: Vec<f32>,
    pub position: Vec<Vec3>,
    pub normal: Vec<Vec3>,
}

pub fn resolve_buffer(buffer: &Buffer) -> Resolved {
    let full_covered = buffer.full_covered();
    Resolved {
        frame: resolve(&full_covered, &buffer.frame_samples()),
        depth: resolve(&full_covered, &buffer.depth_samples()),
        position: resolve(&full_covered, &buffer.position_samples()),
        normal: resolve(&full_covered, &buffer.normal_samples()),
    }
}
