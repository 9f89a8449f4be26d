use foundation::math::Vec3;
use scene::picking::Ray;

pub type Mat4 = [[f32; 4]; 4];

/// Vertical field of view of the viewer camera, in degrees.
pub const DEFAULT_FOV_Y_DEG: f64 = 40.0;
pub const DEFAULT_NEAR: f64 = 1.0;
pub const DEFAULT_FAR: f64 = 2500.0;
pub const DEFAULT_EYE: Vec3 = Vec3 {
    x: 0.0,
    y: 30.0,
    z: -50.0,
};

/// Perspective camera looking from `position` at `target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera3D {
    pub fn look_at(position: Vec3, target: Vec3, fov_y_deg: f64, near: f64, far: f64) -> Self {
        Self {
            position,
            target,
            fov_y_deg,
            aspect: 1.0,
            near,
            far,
        }
    }

    /// The viewer's initial camera for a `width × height` viewport.
    pub fn viewer_default(width: f64, height: f64) -> Self {
        let mut camera = Self::look_at(
            DEFAULT_EYE,
            Vec3::ZERO,
            DEFAULT_FOV_Y_DEG,
            DEFAULT_NEAR,
            DEFAULT_FAR,
        );
        camera.set_viewport(width, height);
        camera
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.aspect = if height <= 0.0 {
            1.0
        } else {
            (width / height).max(1e-6)
        };
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = mat4_look_at_rh(self.position, self.target, Vec3::UP);
        let proj = mat4_perspective_rh_z0(
            self.fov_y_deg.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
        mat4_mul(proj, view)
    }

    /// Ray from the eye through pixel `(x_px, y_px)` of a `width × height` viewport.
    pub fn screen_ray(&self, x_px: f64, y_px: f64, width: f64, height: f64) -> Option<Ray> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let ndc_x = 2.0 * x_px / width - 1.0;
        let ndc_y = 1.0 - 2.0 * y_px / height;

        let forward = (self.target - self.position).normalized()?;
        let right = forward.cross(Vec3::UP).normalized()?;
        let up = right.cross(forward);

        let tan_half = (0.5 * self.fov_y_deg.to_radians()).tan();
        let dir = forward + right * (ndc_x * tan_half * self.aspect) + up * (ndc_y * tan_half);
        Some(Ray::new(self.position, dir.normalized()?))
    }
}

/// Orbit controls state: the camera sits on a sphere around `target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub distance: f64,
    pub target: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_eye_target(DEFAULT_EYE, Vec3::ZERO)
    }
}

const ORBIT_SPEED: f64 = 0.005;
const PITCH_LIMIT: f64 = 1.55;
const MIN_DISTANCE: f64 = 2.0;
const MAX_DISTANCE: f64 = 2000.0;

impl OrbitCamera {
    pub fn from_eye_target(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length();
        let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
        Self {
            yaw_rad: offset.z.atan2(offset.x),
            pitch_rad: offset.y.atan2(horizontal),
            distance,
            target,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let dir = Vec3::new(
            self.pitch_rad.cos() * self.yaw_rad.cos(),
            self.pitch_rad.sin(),
            self.pitch_rad.cos() * self.yaw_rad.sin(),
        );
        self.target + dir * self.distance
    }

    /// Intended usage: pointer delta in pixels.
    pub fn orbit(&mut self, delta_x_px: f64, delta_y_px: f64) {
        self.yaw_rad += delta_x_px * ORBIT_SPEED;
        self.pitch_rad =
            (self.pitch_rad + delta_y_px * ORBIT_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Intended usage: pointer delta in pixels.
    pub fn pan(&mut self, delta_x_px: f64, delta_y_px: f64) {
        let Some(forward) = (self.target - self.eye()).normalized() else {
            return;
        };
        let Some(right) = forward.cross(Vec3::UP).normalized() else {
            return;
        };
        let up = right.cross(forward);

        let scale = self.distance * 0.002;
        self.target = self.target + right * (-delta_x_px * scale) + up * (delta_y_px * scale);
    }

    /// Intended usage: wheel `deltaY`.
    pub fn zoom(&mut self, wheel_delta_y: f64) {
        let factor = (wheel_delta_y * 0.0015).exp();
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn apply_to(&self, camera: &mut Camera3D) {
        camera.position = self.eye();
        camera.target = self.target;
    }
}

pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    // Column-major matrix multiply: c = a * b
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

/// Column-major (WGSL) perspective matrix, RH, depth range [0, 1].
pub fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

/// Column-major (WGSL) view matrix.
pub fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalized().unwrap_or(Vec3::new(0.0, 0.0, -1.0));
    let s = f.cross(up).normalized().unwrap_or(Vec3::new(1.0, 0.0, 0.0));
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, -f.x as f32, 0.0],
        [s.y as f32, u.y as f32, -f.y as f32, 0.0],
        [s.z as f32, u.z as f32, -f.z as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

/// Multiplies a column-major matrix by a point (w = 1).
pub fn mat4_transform_point(m: Mat4, p: Vec3) -> [f32; 4] {
    let v = [p.x as f32, p.y as f32, p.z as f32, 1.0];
    let mut out = [0.0f32; 4];
    for (row, o) in out.iter_mut().enumerate() {
        *o = m[0][row] * v[0] + m[1][row] * v[1] + m[2][row] * v[2] + m[3][row] * v[3];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn default_orbit_reproduces_initial_eye() {
        let orbit = OrbitCamera::default();
        let eye = orbit.eye();
        assert!(close(eye.x, 0.0), "{eye:?}");
        assert!(close(eye.y, 30.0), "{eye:?}");
        assert!(close(eye.z, -50.0), "{eye:?}");
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera3D::viewer_default(1600.0, 900.0);
        let clip = mat4_transform_point(camera.view_proj(), Vec3::ZERO);
        let (x, y, z) = (clip[0] / clip[3], clip[1] / clip[3], clip[2] / clip[3]);
        assert!(x.abs() < 1e-5 && y.abs() < 1e-5, "ndc = {x}, {y}");
        assert!((0.0..=1.0).contains(&z), "depth = {z}");
    }

    #[test]
    fn points_beyond_far_plane_fall_outside_depth_range() {
        let camera = Camera3D::viewer_default(800.0, 600.0);
        let dir = (camera.target - camera.position).normalized().unwrap();
        let far_point = camera.position + dir * 3000.0;
        let clip = mat4_transform_point(camera.view_proj(), far_point);
        assert!(clip[2] / clip[3] > 1.0);
    }

    #[test]
    fn center_pixel_ray_points_at_target() {
        let camera = Camera3D::viewer_default(800.0, 600.0);
        let ray = camera.screen_ray(400.0, 300.0, 800.0, 600.0).unwrap();
        let expected = (camera.target - camera.position).normalized().unwrap();
        assert!(close(ray.dir.x, expected.x));
        assert!(close(ray.dir.y, expected.y));
        assert!(close(ray.dir.z, expected.z));
        assert_eq!(ray.origin, camera.position);
    }

    #[test]
    fn screen_ray_rejects_empty_viewport() {
        let camera = Camera3D::viewer_default(800.0, 600.0);
        assert!(camera.screen_ray(0.0, 0.0, 0.0, 600.0).is_none());
    }

    #[test]
    fn zero_height_viewport_uses_square_aspect() {
        let camera = Camera3D::viewer_default(800.0, 0.0);
        assert_eq!(camera.aspect, 1.0);
    }

    #[test]
    fn orbit_clamps_pitch_and_zoom_clamps_distance() {
        let mut orbit = OrbitCamera::default();
        orbit.orbit(0.0, 10_000.0);
        assert_eq!(orbit.pitch_rad, PITCH_LIMIT);
        orbit.zoom(1.0e6);
        assert_eq!(orbit.distance, MAX_DISTANCE);
        orbit.zoom(-1.0e6);
        assert_eq!(orbit.distance, MIN_DISTANCE);
    }

    #[test]
    fn pan_moves_target_but_keeps_distance() {
        let mut orbit = OrbitCamera::default();
        let before = orbit.distance;
        orbit.pan(100.0, 0.0);
        assert_ne!(orbit.target, Vec3::ZERO);
        assert!(close(orbit.target.y, 0.0));
        assert_eq!(orbit.distance, before);
    }
}
