use foundation::color::Color;
use foundation::math::Vec3;

/// Light shining from `position` toward the origin, like a sun.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f64,
    pub position: Vec3,
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f64) -> Self {
        Self {
            color,
            intensity,
            position: Vec3::UP,
        }
    }

    /// Unit vector pointing from the surface toward the light.
    pub fn to_light(&self) -> Vec3 {
        self.position.normalized().unwrap_or(Vec3::UP)
    }
}

/// Scene-wide rendering state: clear color and lights.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Environment {
    pub background: Color,
    pub lights: Vec<DirectionalLight>,
}

#[cfg(test)]
mod tests {
    use super::DirectionalLight;
    use foundation::color::Color;
    use foundation::math::Vec3;

    #[test]
    fn default_light_points_down_from_above() {
        let light = DirectionalLight::new(Color::WHITE, 1.0);
        assert_eq!(light.to_light(), Vec3::UP);
    }

    #[test]
    fn degenerate_position_falls_back_to_up() {
        let mut light = DirectionalLight::new(Color::WHITE, 1.0);
        light.position = Vec3::ZERO;
        assert_eq!(light.to_light(), Vec3::UP);
    }
}
