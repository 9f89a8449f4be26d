use foundation::bounds::Aabb3;
use foundation::color::Color;
use foundation::math::Vec3;

use super::Transform;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape3D {
    /// Axis-aligned box centered on the entity position.
    Box { width: f64, height: f64, depth: f64 },
}

impl Shape3D {
    pub fn extents(&self) -> Vec3 {
        match *self {
            Shape3D::Box {
                width,
                height,
                depth,
            } => Vec3::new(width, height, depth),
        }
    }
}

/// Cel-shaded surface: a few flat lighting bands instead of a smooth ramp.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Material {
    Toon { color: Color },
}

impl Material {
    pub fn color(&self) -> Color {
        match self {
            Material::Toon { color } => *color,
        }
    }

    pub fn set_color(&mut self, new_color: Color) {
        match self {
            Material::Toon { color } => *color = new_color,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Drawable3D {
    pub shape: Shape3D,
    pub material: Material,
}

impl Drawable3D {
    pub fn toon_box(width: f64, height: f64, depth: f64, color: Color) -> Self {
        Self {
            shape: Shape3D::Box {
                width,
                height,
                depth,
            },
            material: Material::Toon { color },
        }
    }

    pub fn world_bounds(&self, transform: &Transform) -> Aabb3 {
        Aabb3::from_center_size(transform.apply(Vec3::ZERO), self.shape.extents())
    }
}

#[cfg(test)]
mod tests {
    use super::{Drawable3D, Transform};
    use foundation::color::Color;
    use foundation::math::Vec3;

    #[test]
    fn recolor_keeps_shape() {
        let mut drawable = Drawable3D::toon_box(2.0, 1.0, 2.0, Color::WHITE);
        drawable.material.set_color(Color::BLACK);
        assert_eq!(drawable.material.color(), Color::BLACK);
        assert_eq!(drawable.shape.extents(), Vec3::new(2.0, 1.0, 2.0));
    }

    #[test]
    fn world_bounds_follow_transform() {
        let drawable = Drawable3D::toon_box(2.0, 1.0, 2.0, Color::WHITE);
        let bounds = drawable.world_bounds(&Transform::translate(Vec3::new(4.0, 0.0, 0.0)));
        assert_eq!(bounds.min, [3.0, -0.5, -1.0]);
        assert_eq!(bounds.max, [5.0, 0.5, 1.0]);
    }
}
