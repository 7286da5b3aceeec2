use crate::picking::Ray;
use glam::{Mat4, Quat, Vec2, Vec3};

/// Camera pose: position and orientation in world space.
///
/// An identity orientation looks down -Z with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl CameraPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }
}

/// Camera that eases toward a target pose.
///
/// Each step moves a fraction `1 - exp(-rate * dt)` of the remaining way,
/// so the motion settles the same regardless of frame timing and never
/// overshoots.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pose: CameraPose,
    rate: f32,
}

impl CameraRig {
    pub fn new(position: Vec3, rate: f32) -> Self {
        Self {
            pose: CameraPose::new(position, Quat::IDENTITY),
            rate,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    /// Blend factor for a step of `dt` seconds.
    pub fn alpha(&self, dt: f32) -> f32 {
        1.0 - (-self.rate * dt.max(0.0)).exp()
    }

    /// Advance toward `target` by `dt` seconds.
    pub fn step(&mut self, target: &CameraPose, dt: f32) {
        let alpha = self.alpha(dt);
        self.pose.position = self.pose.position.lerp(target.position, alpha);
        self.pose.orientation = self
            .pose
            .orientation
            .slerp(target.orientation, alpha)
            .normalize();
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.pose.orientation, self.pose.position).inverse()
    }
}

/// Projection matrix configuration.
#[derive(Debug, Clone)]
pub struct Projection {
    width: u32,
    height: u32,
    fov_y: f32,
    near: f32,
    far: f32,
}

impl Projection {
    /// `fov_y` in radians.
    pub fn new(width: u32, height: u32, fov_y: f32, near: f32, far: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            fov_y,
            near,
            far,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }
}

/// World-space ray through a point in normalized device coordinates
/// (`x`, `y` in `[-1, 1]`, +Y up).
pub fn ray_from_ndc(view: Mat4, proj: Mat4, ndc: Vec2) -> Ray {
    let inv = (proj * view).inverse();
    let near = inv.project_point3(ndc.extend(0.0));
    let far = inv.project_point3(ndc.extend(1.0));
    Ray::new(near, far - near)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_step_never_overshoots() {
        let target = CameraPose::new(Vec3::new(0.0, 0.0, 5.5), Quat::IDENTITY);
        let mut rig = CameraRig::new(Vec3::new(0.0, 0.0, 100.0), 3.0);
        // even a huge step lands at most on the target
        rig.step(&target, 10.0);
        assert!(rig.position().z >= 5.5);
        assert!(rig.position().z - 5.5 < 1e-3);
    }

    #[test]
    fn test_distance_non_increasing_under_variable_dt() {
        let target = CameraPose::new(
            Vec3::new(1.0, 0.8, 2.0),
            Quat::from_rotation_y(FRAC_PI_2 / 1.25),
        );
        let mut rig = CameraRig::new(Vec3::new(0.0, 0.0, 100.0), 3.0);
        let mut last_dist = rig.position().distance(target.position);
        let mut last_angle = rig.pose().orientation.angle_between(target.orientation);

        let dts = [0.016, 0.1, 0.0, 0.033, 0.25, 0.008, 1.0, 0.016];
        for _ in 0..20 {
            for dt in dts {
                rig.step(&target, dt);
                let dist = rig.position().distance(target.position);
                let angle = rig.pose().orientation.angle_between(target.orientation);
                assert!(dist <= last_dist + 1e-5);
                assert!(angle <= last_angle + 1e-4);
                last_dist = dist;
                last_angle = angle;
            }
        }
        assert!(last_dist < 1e-3);
        assert!(last_angle < 1e-2);
    }

    #[test]
    fn test_convergence_is_frame_rate_independent() {
        let target = CameraPose::new(Vec3::ZERO, Quat::IDENTITY);
        let mut coarse = CameraRig::new(Vec3::new(0.0, 0.0, 10.0), 3.0);
        let mut fine = coarse.clone();
        for _ in 0..10 {
            coarse.step(&target, 0.1);
        }
        for _ in 0..100 {
            fine.step(&target, 0.01);
        }
        assert!((coarse.position().z - fine.position().z).abs() < 1e-3);
    }

    #[test]
    fn test_identity_view_looks_down_neg_z() {
        let rig = CameraRig::new(Vec3::new(0.0, 0.0, 5.0), 3.0);
        let p = rig.view_matrix().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
        assert!((rig.pose().forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_center_ray_points_forward() {
        let rig = CameraRig::new(Vec3::new(0.0, 0.0, 5.0), 3.0);
        let proj = Projection::new(1280, 720, 70f32.to_radians(), 0.1, 1000.0);
        let ray = ray_from_ndc(rig.view_matrix(), proj.matrix(), Vec2::ZERO);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!((ray.origin.x).abs() < 1e-4 && (ray.origin.y).abs() < 1e-4);
    }
}
