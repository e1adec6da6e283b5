use glam::{Mat4, Vec3, Vec4Swizzles};

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f32 = 2.0;

const MIN_POLAR: f32 = 0.05;
const MAX_POLAR: f32 = std::f32::consts::FRAC_PI_2 - 0.05;
const MIN_RADIUS: f32 = 10.0;
const MAX_RADIUS: f32 = 200.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// A point after projection: cell coordinates plus view-space distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            fov_y: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Reconfigures the projection for a surface of `width` by `height`
    /// terminal cells.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        let height = (height.max(1) as f32) * CELL_ASPECT;
        self.aspect = width.max(1) as f32 / height;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Projects a world-space point onto a `width` by `height` cell grid.
    /// Returns `None` for points behind the near plane.
    pub fn project(&self, view_projection: &Mat4, point: Vec3, width: u16, height: u16) -> Option<Projected> {
        let clip = *view_projection * point.extend(1.0);
        if clip.w < self.near {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        Some(Projected {
            x: (ndc.x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc.y) * 0.5 * height as f32,
            depth: clip.w,
        })
    }
}

/// Orbit-style camera controls with optional damping.
///
/// Input accumulates into pending spherical deltas; [`OrbitControls::update`]
/// applies them to the camera. With damping enabled only a fraction of the
/// pending delta is consumed each update, so motion eases out.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub damping: f32,
    azimuth: f32,
    polar: f32,
    radius: f32,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_scale: f32,
}

impl OrbitControls {
    pub fn new(camera: &PerspectiveCamera, damping: f32) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.length().max(f32::EPSILON);
        Self {
            target: camera.target,
            damping: damping.clamp(0.0, 0.99),
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            radius,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_scale: 1.0,
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.pending_azimuth -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.pending_polar -= angle;
    }

    /// `scale < 1` moves the camera closer.
    pub fn dolly(&mut self, scale: f32) {
        self.pending_scale *= scale;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let factor = if self.damping > 0.0 { self.damping } else { 1.0 };

        self.azimuth += self.pending_azimuth * factor;
        self.polar = (self.polar + self.pending_polar * factor).clamp(MIN_POLAR, MAX_POLAR);
        self.radius = (self.radius * self.pending_scale.powf(factor)).clamp(MIN_RADIUS, MAX_RADIUS);

        if self.damping > 0.0 {
            self.pending_azimuth *= 1.0 - self.damping;
            self.pending_polar *= 1.0 - self.damping;
            self.pending_scale = self.pending_scale.powf(1.0 - self.damping);
        } else {
            self.pending_azimuth = 0.0;
            self.pending_polar = 0.0;
            self.pending_scale = 1.0;
        }

        let sin_polar = self.polar.sin();
        let offset = Vec3::new(
            self.radius * sin_polar * self.azimuth.sin(),
            self.radius * self.polar.cos(),
            self.radius * sin_polar * self.azimuth.cos(),
        );
        camera.position = self.target + offset;
        camera.look_at(self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm_camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        camera.position = Vec3::new(50.0, 30.0, 50.0);
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn test_target_projects_to_centre() {
        let camera = farm_camera();
        let vp = camera.view_projection();
        let p = camera.project(&vp, Vec3::ZERO, 80, 40).unwrap();
        assert!((p.x - 40.0).abs() < 1e-3);
        assert!((p.y - 20.0).abs() < 1e-3);
        assert!((p.depth - camera.position.length()).abs() < 1e-2);
    }

    #[test]
    fn test_points_behind_camera_are_rejected() {
        let camera = farm_camera();
        let vp = camera.view_projection();
        assert!(camera.project(&vp, Vec3::new(100.0, 60.0, 100.0), 80, 40).is_none());
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = farm_camera();
        let vp = camera.view_projection();
        let low = camera.project(&vp, Vec3::ZERO, 80, 40).unwrap();
        let high = camera.project(&vp, Vec3::new(0.0, 5.0, 0.0), 80, 40).unwrap();
        assert!(high.y < low.y);
    }

    #[test]
    fn test_viewport_accounts_for_cell_shape() {
        let mut camera = farm_camera();
        camera.set_viewport(160, 40);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_controls_without_input_keep_camera_in_place() {
        let mut camera = farm_camera();
        let before = camera.position;
        let mut controls = OrbitControls::new(&camera, 0.05);
        controls.update(&mut camera);
        assert!((camera.position - before).length() < 1e-3);
    }

    #[test]
    fn test_damped_rotation_eases_out() {
        let mut camera = farm_camera();
        let mut controls = OrbitControls::new(&camera, 0.5);
        let radius = controls.radius();
        controls.rotate_left(0.4);

        controls.update(&mut camera);
        let first = camera.position;
        controls.update(&mut camera);
        let second = camera.position;
        controls.update(&mut camera);
        let third = camera.position;

        let step_a = (second - first).length();
        let step_b = (third - second).length();
        assert!(step_b < step_a);
        assert!((camera.position.length() - radius).abs() < 1e-2);
    }

    #[test]
    fn test_dolly_is_clamped() {
        let mut camera = farm_camera();
        let mut controls = OrbitControls::new(&camera, 0.0);
        controls.dolly(0.001);
        controls.update(&mut camera);
        assert!((controls.radius() - MIN_RADIUS).abs() < 1e-4);
    }
}
