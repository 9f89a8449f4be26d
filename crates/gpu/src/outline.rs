use bytemuck::{Pod, Zeroable};
use foundation::color::Color;

/// Inverted-hull outline drawn around every land unit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OutlineSettings {
    pub enabled: bool,
    /// Offset in clip space, scaled by `w` so it stays constant on screen.
    pub thickness: f32,
    pub color: Color,
    pub alpha: f32,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            thickness: 0.003,
            color: Color::BLACK,
            alpha: 1.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct OutlineUniform {
    pub color: [f32; 4],
    pub thickness: f32,
    pub _pad: [f32; 3],
}

impl OutlineSettings {
    pub fn uniform(&self) -> OutlineUniform {
        let [r, g, b] = self.color.to_linear_f32();
        OutlineUniform {
            color: [r, g, b, self.alpha],
            thickness: self.thickness,
            _pad: [0.0; 3],
        }
    }
}

/// CPU mirror of the outline vertex shader: pushes a clip-space position
/// toward where its normal-offset twin lands, so the hull grows outward.
pub fn extrude_clip(pos: [f32; 4], offset_pos: [f32; 4], thickness: f32) -> [f32; 4] {
    let d = [
        offset_pos[0] - pos[0],
        offset_pos[1] - pos[1],
        offset_pos[2] - pos[2],
    ];
    let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
    if len <= f32::EPSILON {
        return pos;
    }
    let k = thickness * pos[3] / len;
    [
        pos[0] + d[0] * k,
        pos[1] + d[1] * k,
        pos[2] + d[2] * k,
        pos[3],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera3D, mat4_transform_point};
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_thin_opaque_black() {
        let settings = OutlineSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.uniform().color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(settings.uniform().thickness, 0.003);
    }

    #[test]
    fn extrusion_follows_offset_direction_and_scales_with_w() {
        let near = extrude_clip([0.0, 0.0, 0.5, 1.0], [1.0, 0.0, 0.5, 1.0], 0.01);
        let far = extrude_clip([0.0, 0.0, 0.5, 4.0], [1.0, 0.0, 0.5, 4.0], 0.01);
        assert!((near[0] - 0.01).abs() < 1e-6);
        assert!((far[0] - 0.04).abs() < 1e-6);
        assert_eq!(near[3], 1.0);
        assert_eq!(far[3], 4.0);
    }

    fn ndc_distance(p: [f32; 4], center: [f32; 4]) -> f32 {
        let dx = p[0] / p[3] - center[0] / center[3];
        let dy = p[1] / p[3] - center[1] / center[3];
        (dx * dx + dy * dy).sqrt()
    }

    #[test]
    fn hull_vertices_move_away_from_the_box_center() {
        let camera = Camera3D::viewer_default(800.0, 600.0);
        let view_proj = camera.view_proj();
        let scale = [2.0, 1.0, 2.0];
        let center = mat4_transform_point(view_proj, Vec3::ZERO);
        let corners = [
            ([0.5, 0.5, 0.5], [1.0, 0.0, 0.0]),
            ([0.5, 0.5, 0.5], [0.0, 1.0, 0.0]),
            ([0.5, 0.5, 0.5], [0.0, 0.0, 1.0]),
            ([-0.5, 0.5, -0.5], [0.0, 0.0, -1.0]),
            ([-0.5, -0.5, -0.5], [0.0, -1.0, 0.0]),
        ];
        for (corner, normal) in corners {
            let local = Vec3::new(
                corner[0] * scale[0],
                corner[1] * scale[1],
                corner[2] * scale[2],
            );
            let pushed = Vec3::new(
                (corner[0] + normal[0]) * scale[0],
                (corner[1] + normal[1]) * scale[1],
                (corner[2] + normal[2]) * scale[2],
            );
            let pos = mat4_transform_point(view_proj, local);
            let pos2 = mat4_transform_point(view_proj, pushed);
            let out = extrude_clip(pos, pos2, OutlineSettings::default().thickness);
            let before = ndc_distance(pos, center);
            let after = ndc_distance(out, center);
            assert!(
                after > before,
                "corner {corner:?} normal {normal:?}: {before} -> {after}"
            );
        }
    }

    #[test]
    fn coincident_positions_are_left_in_place() {
        let p = [0.2, 0.3, 0.4, 1.0];
        assert_eq!(extrude_clip(p, p, 0.003), p);
    }
}
