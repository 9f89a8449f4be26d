//! Renderer-side logic that does not need a GPU: cameras, meshes, the
//! per-frame draw list and the WGSL sources the browser backend compiles.

pub mod camera;
pub mod mesh;
pub mod outline;
pub mod renderer;
pub mod shaders;

pub use camera::*;
pub use renderer::*;
