// camera.rs — 惯性轨道相机 (拖拽冲量 / 摩擦衰减 / 俯仰与缩放夹取)

use crate::config::{CameraConfig, FAR_PLANE, NEAR_PLANE};
use crate::math::{horizontal_axis, snap_to_rest};
use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Snapshot of the integrated camera. `distance` is the offset along the
/// view axis and stays within `[max_zoom_out_distance, 0]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraState {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub yaw_velocity: f32,
    pub pitch_velocity: f32,
}

/// Turns drag deltas into angular velocity and integrates it once per frame.
///
/// Single-threaded: drags and `advance` are expected on the same thread.
#[derive(Debug, Clone)]
pub struct OrbitController {
    config: CameraConfig,
    state: CameraState,
    reference: Vec2,
}

impl OrbitController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            state: CameraState::default(),
            reference: Vec2::ZERO,
        }
    }

    /// Resume from a saved pose (velocities included).
    pub fn with_state(config: CameraConfig, state: CameraState) -> Self {
        Self {
            config,
            state,
            reference: Vec2::ZERO,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = CameraState::default();
    }

    /// Cancel any residual inertia and start tracking from `point`.
    pub fn on_drag_start(&mut self, point: Vec2) {
        self.state.yaw_velocity = 0.0;
        self.state.pitch_velocity = 0.0;
        self.reference = point;
    }

    pub fn on_drag_move(&mut self, point: Vec2) {
        let prev = self.reference;
        self.state.yaw_velocity += self.impulse(prev.x, point.x);
        self.state.pitch_velocity += self.impulse(prev.y, point.y);
        self.reference = point;
    }

    /// Velocities are left alone so the view keeps coasting.
    pub fn on_drag_end(&mut self) {}

    // atan 饱和响应：大幅度甩动也不会产生无界角速度
    fn impulse(&self, from: f32, to: f32) -> f32 {
        let magnitude = ((from - to).abs() / 2.0 / self.config.drag_feel).atan() * 2.0;
        if from - to < 0.0 {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Integrate one frame of `dt` seconds.
    ///
    /// Friction is applied per call, not scaled by `dt`.
    pub fn advance(&mut self, dt: f32) {
        let s = &mut self.state;

        // Auto rotate
        s.yaw += dt * self.config.auto_rotate_speed;

        // Inertia
        s.yaw += dt * s.yaw_velocity;
        if s.distance < 0.0 {
            // 缩小状态下，竖直拖拽改为前后移动
            s.distance -= dt * s.pitch_velocity;
        } else {
            s.pitch += dt * s.pitch_velocity;
            if s.pitch > FRAC_PI_2 {
                s.distance -= s.pitch - FRAC_PI_2;
            }
        }

        // Clamp
        s.pitch = s.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
        if s.distance < self.config.max_zoom_out_distance {
            s.distance = self.config.max_zoom_out_distance;
            s.pitch_velocity = 0.0;
        }
        if s.distance > 0.0 {
            s.distance = 0.0;
        }

        // Friction
        s.yaw_velocity = snap_to_rest(s.yaw_velocity * self.config.friction);
        s.pitch_velocity = snap_to_rest(s.pitch_velocity * self.config.friction);
    }

    /// Translate by `distance`, rotate by yaw about +Y, then pitch about the
    /// yaw-dependent horizontal axis.
    pub fn view_transform(&self) -> Mat4 {
        let s = &self.state;
        Mat4::from_translation(Vec3::new(0.0, 0.0, s.distance))
            * Mat4::from_axis_angle(Vec3::Y, s.yaw)
            * Mat4::from_axis_angle(horizontal_axis(s.yaw), s.pitch)
    }

    /// Perspective projection for a viewport aspect ratio (`width / height`).
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect != 0.0 {
            aspect.abs()
        } else {
            1.0
        };
        Mat4::perspective_rh(
            self.config.fovy_degrees.to_radians(),
            aspect,
            NEAR_PLANE,
            FAR_PLANE,
        )
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut CameraState {
        &mut self.state
    }
}
