//! Small shared enums threaded through `Object`/`Material`/the rasterizer.
//! `Deserialize` is derived here (rather than mirrored by a second enum in
//! `renderer-scene`) so the YAML loader can populate these directly.

use serde::Deserialize;

/// Triangle culling policy used by the rasterizer (§4.4 step 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Back,
    Front,
}

/// Which fragment shader an `Object` is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ShadingType {
    #[default]
    Default,
    Cel,
    Pbr,
}

/// Cel shader ramp variant (§9: replaces the original's material-name
/// string comparison with an explicit tag set by the scene loader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CelRampKind {
    #[default]
    Smooth,
    Face,
}
