use std::time::Duration;

use glam::{Mat4, Vec3};

use crate::renderer::uniform::camera::CameraUniformBuffer;

pub const PITCH_LIMIT: f32 = 89.0;

#[derive(Debug, Clone)]
pub struct CameraProjection {
    pub aspect: Option<f32>,
    pub yfov: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraProjection {
    fn default() -> Self {
        Self {
            aspect: None,
            yfov: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl CameraProjection {
    pub fn update_aspect(&mut self, new_aspect: f32) {
        self.aspect = Some(new_aspect);
    }

    pub fn matrix(&self, default_aspect: f32) -> Mat4 {
        let aspect = self.aspect.unwrap_or(default_aspect);
        Mat4::perspective_rh(self.yfov.to_radians(), aspect, self.znear, self.zfar)
    }
}

#[derive(Debug, Clone)]
pub struct CameraView {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for CameraView {
    // Yaw of -90 degrees looks down the negative z axis, towards the scene.
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
        }
    }
}

impl CameraView {
    fn front_from_yaw_pitch(yaw: f32, pitch: f32) -> Vec3 {
        let yaw = yaw.to_radians();
        let pitch = pitch.to_radians();
        let x = yaw.cos() * pitch.cos();
        let y = pitch.sin();
        let z = yaw.sin() * pitch.cos();
        Vec3::new(x, y, z).normalize()
    }

    pub fn front(&self) -> Vec3 {
        Self::front_from_yaw_pitch(self.yaw, self.pitch)
    }

    fn front_ignore_pitch(&self, yaw_offset: f32) -> Vec3 {
        Self::front_from_yaw_pitch(self.yaw + yaw_offset, 0.0)
    }

    pub fn move_eye(&mut self, offset: Vec3) {
        self.eye += offset;
    }

    /// Turns the view by a mouse delta in pixels. Moving the mouse up looks up.
    pub fn look(&mut self, delta: (f32, f32), sensitivity: f32) {
        self.yaw += delta.0 * sensitivity;
        self.pitch -= delta.1 * sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn matrix(&self) -> Mat4 {
        let target = self.eye + self.front();
        Mat4::look_at_rh(self.eye, target, Vec3::Y)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Camera {
    pub view: CameraView,
    pub projection: CameraProjection,
}

impl Camera {
    pub fn move_eye(&mut self, offset: Vec3) {
        self.view.move_eye(offset);
    }

    pub fn update_aspect(&mut self, new_aspect: f32) {
        self.projection.update_aspect(new_aspect);
    }

    pub fn update_uniform(&self, buffer: &mut CameraUniformBuffer, default_aspect: f32) {
        buffer.update_view(self, default_aspect);
    }

    pub fn matrix(&self, default_aspect: f32) -> Mat4 {
        let proj = self.projection.matrix(default_aspect);
        let view = self.view.matrix();
        proj * view
    }
}

#[derive(Clone, Debug)]
pub struct PositionController {
    /// Units per millisecond.
    pub speed: f32,
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Default for PositionController {
    fn default() -> Self {
        Self::with_speed(0.003)
    }
}

impl PositionController {
    pub fn with_speed(speed: f32) -> Self {
        Self {
            speed,
            forward: false,
            backward: false,
            left: false,
            right: false,
            up: false,
            down: false,
        }
    }

    /// Drops every held direction, for when key releases stop arriving.
    pub fn stop(&mut self) {
        self.forward = false;
        self.backward = false;
        self.left = false;
        self.right = false;
        self.up = false;
        self.down = false;
    }

    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }

    pub fn update(&self, duration: Duration, camera: &mut Camera) {
        let milliseconds = duration.as_secs_f32() * 1000.0;
        let distance = self.speed * milliseconds;
        let mut movement = Vec3::ZERO;

        let forward: Vec3 = camera.view.front_ignore_pitch(0.0) * distance;
        if self.forward {
            movement += forward;
        }
        if self.backward {
            movement -= forward;
        }

        let left: Vec3 = camera.view.front_ignore_pitch(-90.0) * distance;
        if self.left {
            movement += left;
        }
        if self.right {
            movement -= left;
        }

        if self.up {
            movement.y += distance;
        }
        if self.down {
            movement.y -= distance;
        }
        camera.move_eye(movement)
    }
}
