use bytemuck::{Pod, Zeroable};
use foundation::math::Vec3;
use scene::components::Shape3D;
use scene::world::World;

use crate::camera::{Camera3D, Mat4};

/// Dot products below this land in the shadow band.
pub const TOON_THRESHOLD: f32 = 0.7;
/// Irradiance of the shadow band; the lit band is 1.0.
pub const TOON_SHADOW: f32 = 0.7;

/// Two-band cel lighting. `n_dot_l` is remapped from [-1, 1] to [0, 1]
/// before thresholding.
pub fn toon_irradiance(n_dot_l: f32) -> f32 {
    let coord = n_dot_l * 0.5 + 0.5;
    if coord < TOON_THRESHOLD {
        TOON_SHADOW
    } else {
        1.0
    }
}

/// Per-land GPU instance.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BoxInstance {
    pub offset: [f32; 3],
    pub _pad0: f32,
    pub scale: [f32; 3],
    pub _pad1: f32,
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: Mat4,
    /// xyz: unit vector toward the light.
    pub light_dir: [f32; 4],
    /// rgb: light color × intensity.
    pub light_color: [f32; 4],
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameLight {
    pub to_light: Vec3,
    pub color: [f32; 3],
}

impl Default for FrameLight {
    fn default() -> Self {
        // Unlit scenes render black, like an empty light list.
        Self {
            to_light: Vec3::UP,
            color: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderFrame {
    /// Linear RGBA.
    pub clear_color: [f32; 4],
    pub light: FrameLight,
    pub instances: Vec<BoxInstance>,
}

impl RenderFrame {
    pub fn scene_uniform(&self, camera: &Camera3D) -> SceneUniform {
        let [x, y, z] = self.light.to_light.to_f32();
        let [r, g, b] = self.light.color;
        SceneUniform {
            view_proj: camera.view_proj(),
            light_dir: [x, y, z, 0.0],
            light_color: [r, g, b, 1.0],
        }
    }
}

/// Surface options chosen once at startup.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderSettings {
    pub antialias: bool,
}

impl RenderSettings {
    /// Multisampling only pays for itself on low-density displays.
    pub fn for_pixel_ratio(pixel_ratio: f64) -> Self {
        Self {
            antialias: pixel_ratio <= 1.0,
        }
    }

    pub fn sample_count(&self) -> u32 {
        if self.antialias { 4 } else { 1 }
    }
}

pub struct Renderer;

impl Renderer {
    /// Flattens the world into what one frame needs on the GPU.
    pub fn collect(world: &World) -> RenderFrame {
        let env = world.environment();
        let [r, g, b] = env.background.to_linear_f32();

        // Single directional light; extra lights are summed along the first one's direction.
        let mut light = FrameLight::default();
        for (i, l) in env.lights.iter().enumerate() {
            if i == 0 {
                light.to_light = l.to_light();
            }
            let c = l.color.to_linear_f32();
            for (acc, channel) in light.color.iter_mut().zip(c) {
                *acc += channel * l.intensity as f32;
            }
        }

        let instances = world
            .drawables_3d()
            .into_iter()
            .map(|(_, transform, drawable)| {
                let Shape3D::Box {
                    width,
                    height,
                    depth,
                } = drawable.shape;
                let [cr, cg, cb] = drawable.material.color().to_linear_f32();
                BoxInstance {
                    offset: transform.position.to_f32(),
                    _pad0: 0.0,
                    scale: [width as f32, height as f32, depth as f32],
                    _pad1: 0.0,
                    color: [cr, cg, cb, 1.0],
                }
            })
            .collect();

        RenderFrame {
            clear_color: [r, g, b, 1.0],
            light,
            instances,
        }
    }
}
