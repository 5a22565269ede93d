//! Rim-light (§4.10): brightens samples adjacent to a large depth
//! discontinuity, simulating back lighting. Reads a snapshot of the MSAA
//! depth/frame buffers and writes the result back — safe post-barrier,
//! no locking needed during the compute (§5).

use crate::gbuffer::{Buffer, MSAA_LEVEL};
use renderer_core::math::EPSILON;

pub const RIM_INTENSITY: f32 = 1.5;
pub const RIM_NEIGHBOR_OFFSET: i64 = 10;
pub const RIM_DEPTH_THRESHOLD: f32 = 0.02;

fn linearize_depth(z_ss: f32, near: f32, far: f32) -> f32 {
    (near * far + near) / (near + far + (near - far) * z_ss)
}

pub fn apply(buffer: &Buffer, near: f32, far: f32) {
    let depth = buffer.depth_samples();
    let mut frame = buffer.frame_samples();
    let width = buffer.width as i64;
    let height = buffer.height as i64;

    for y in 0..height {
        for x in 0..width {
            let idx = buffer.index(x as u32, y as u32);
            for i in 0..MSAA_LEVEL {
                let z = depth[idx][i];
                if z >= 1.0 - EPSILON {
                    continue;
                }
                let z_lin = linearize_depth(z, near, far);

                let mut brighten = false;
                for dx in [-RIM_NEIGHBOR_OFFSET, RIM_NEIGHBOR_OFFSET] {
                    let nx = x + dx;
                    if nx < 0 || nx >= width {
                        continue;
                    }
                    let nidx = buffer.index(nx as u32, y as u32);
                    let nz = depth[nidx][i];
                    if nz >= 1.0 - EPSILON {
                        continue;
                    }
                    if linearize_depth(nz, near, far) - z_lin > RIM_DEPTH_THRESHOLD {
                        brighten = true;
                    }
                }

                if brighten {
                    frame[idx][i] *= RIM_INTENSITY;
                }
            }
        }
    }

    buffer.set_frame_samples(frame);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linearize_is_monotonic_in_screen_depth() {
        let near = 0.1;
        let far = 100.0;
        let a = linearize_depth(0.2, near, far);
        let b = linearize_depth(0.8, near, far);
        assert!(b > a);
    }
}
