use blockcraft_common::Ray;
use glam::{Mat4, Vec3};

/// First-person camera pose derived from the player each frame.
///
/// Yaw zero looks down -Z; positive yaw turns toward -X. Positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Camera {
    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            -self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Ray through the screen center.
    pub fn center_ray(&self) -> Ray {
        Ray::new(self.eye, self.forward())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.eye + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self, fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(fov_y, aspect, near, far)
    }
}
