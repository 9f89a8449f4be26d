use foundation::math::Vec3;

/// World placement of an entity. Parcels never rotate or scale, so a
/// translation is all a transform carries.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Transform {
    pub position: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
    };

    pub fn translate(position: Vec3) -> Self {
        Self { position }
    }

    /// Maps a point from entity space to world space.
    pub fn apply(&self, local: Vec3) -> Vec3 {
        self.position + local
    }
}

impl From<[f64; 3]> for Transform {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::translate(Vec3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use foundation::math::Vec3;

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform::default(), Transform::IDENTITY);
        assert_eq!(Transform::IDENTITY.apply(Vec3::UP), Vec3::UP);
    }

    #[test]
    fn array_positions_become_translations() {
        let transform = Transform::from([4.2, 0.0, -2.1]);
        assert_eq!(transform.position, Vec3::new(4.2, 0.0, -2.1));
        assert_eq!(
            transform.apply(Vec3::new(1.0, 1.0, 1.0)),
            Vec3::new(4.2 + 1.0, 1.0, -2.1 + 1.0)
        );
    }
}
