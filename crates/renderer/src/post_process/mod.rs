//! Screen-space post-processing passes (§4.9-§4.12), run after the
//! rasterization barrier in a fixed order: rim-light operates on the MSAA
//! G-buffer directly, then MSAA resolve narrows it to single images, then
//! SSAO and bloom operate on the resolved frame.

pub mod bloom;
pub mod msaa_resolve;
pub mod rim_light;
pub mod ssao;
