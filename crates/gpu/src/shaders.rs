//! WGSL sources for the land and outline passes.
//!
//! Both shaders share the `Scene` uniform at group 0 and consume the same
//! vertex layout: a unit box (locations 0-1) instanced per land (2-4).

pub const LAND_SHADER: &str = r#"
struct Scene {
    view_proj: mat4x4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> scene: Scene;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) offset: vec3<f32>,
    @location(3) scale: vec3<f32>,
    @location(4) color: vec4<f32>,
) -> VsOut {
    let world = offset + position * scale;
    return VsOut(scene.view_proj * vec4<f32>(world, 1.0), normal, color);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(fs_in.normal);
    let l = normalize(scene.light_dir.xyz);
    let coord = dot(n, l) * 0.5 + 0.5;
    let band = select(1.0, 0.7, coord < 0.7);
    return vec4<f32>(fs_in.color.rgb * scene.light_color.rgb * band, fs_in.color.a);
}
"#;

pub const OUTLINE_SHADER: &str = r#"
struct Scene {
    view_proj: mat4x4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
};

struct Outline {
    color: vec4<f32>,
    thickness: f32,
};

@group(0) @binding(0)
var<uniform> scene: Scene;

@group(1) @binding(0)
var<uniform> outline: Outline;

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) offset: vec3<f32>,
    @location(3) scale: vec3<f32>,
) -> @builtin(position) vec4<f32> {
    let pos = scene.view_proj * vec4<f32>(offset + position * scale, 1.0);
    let pos2 = scene.view_proj * vec4<f32>(offset + (position + normal) * scale, 1.0);
    let d = pos2.xyz - pos.xyz;
    if (dot(d, d) <= 1e-12) {
        return pos;
    }
    let push = normalize(d) * outline.thickness * pos.w;
    return vec4<f32>(pos.xyz + push, pos.w);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return outline.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaders_expose_expected_entry_points() {
        for src in [LAND_SHADER, OUTLINE_SHADER] {
            assert!(src.contains("fn vs_main("));
            assert!(src.contains("fn fs_main("));
            assert!(src.contains("@group(0) @binding(0)"));
        }
    }

    #[test]
    fn land_shader_bands_match_cpu_constants() {
        let threshold = format!("coord < {:.1}", crate::renderer::TOON_THRESHOLD);
        assert!(LAND_SHADER.contains(&threshold));
        let shadow = format!("select(1.0, {:.1}", crate::renderer::TOON_SHADOW);
        assert!(LAND_SHADER.contains(&shadow));
    }

    #[test]
    fn outline_pushes_toward_the_normal_offset() {
        assert!(OUTLINE_SHADER.contains("let d = pos2.xyz - pos.xyz;"));
    }
}
