use crate::math::Vec3;

/// Axis-aligned bounding box
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb3 {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Aabb3 { min, max }
    }

    /// Box centered on `center` with full extents `size`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let h = [size.x * 0.5, size.y * 0.5, size.z * 0.5];
        Aabb3 {
            min: [center.x - h[0], center.y - h[1], center.z - h[2]],
            max: [center.x + h[0], center.y + h[1], center.z + h[2]],
        }
    }

    /// Slab test. Returns the entry distance along `dir` clamped to `[t_min, t_max]`.
    ///
    /// `dir` does not need to be normalized; the result is in units of `dir`.
    pub fn ray_hit_t(&self, origin: Vec3, dir: Vec3, t_min: f64, t_max: f64) -> Option<f64> {
        let o = [origin.x, origin.y, origin.z];
        let d = [dir.x, dir.y, dir.z];
        let mut t0 = t_min;
        let mut t1 = t_max;

        for axis in 0..3 {
            if d[axis].abs() < 1e-12 {
                if o[axis] < self.min[axis] || o[axis] > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d[axis];
            let mut near = (self.min[axis] - o[axis]) * inv;
            let mut far = (self.max[axis] - o[axis]) * inv;
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }
            t0 = t0.max(near);
            t1 = t1.min(far);
            if t0 > t1 {
                return None;
            }
        }

        Some(t0)
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb3;
    use crate::math::Vec3;

    #[test]
    fn center_size_extents() {
        let b = Aabb3::from_center_size(Vec3::new(1.0, 0.0, -1.0), Vec3::new(2.0, 1.0, 4.0));
        assert_eq!(b.min, [0.0, -0.5, -3.0]);
        assert_eq!(b.max, [2.0, 0.5, 1.0]);
    }

    #[test]
    fn ray_hits_front_face() {
        let b = Aabb3::new([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]);
        let t = b
            .ray_hit_t(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0, 100.0)
            .unwrap();
        assert_eq!(t, 9.0);
    }

    #[test]
    fn ray_parallel_outside_misses() {
        let b = Aabb3::new([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]);
        let hit = b.ray_hit_t(Vec3::new(5.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0, 100.0);
        assert!(hit.is_none());
    }

    #[test]
    fn ray_pointing_away_misses() {
        let b = Aabb3::new([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]);
        let hit = b.ray_hit_t(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.0, 100.0);
        assert!(hit.is_none());
    }
}
