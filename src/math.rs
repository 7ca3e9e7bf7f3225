// math.rs — 相机用的小工具函数

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Velocities at or below this magnitude are snapped to zero.
pub const REST_THRESHOLD: f32 = 1e-7;

/// Horizontal direction the camera faces for a given yaw.
pub fn yaw_facing(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, yaw.cos())
}

/// Axis for pitch rotation: world-up crossed with the yaw-facing direction.
/// Equals `(cos yaw, 0, sin yaw)`, so pitch stays horizontal whatever the yaw.
pub fn horizontal_axis(yaw: f32) -> Vec3 {
    Vec3::Y.cross(yaw_facing(yaw)).normalize_or(Vec3::X)
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let a = (angle + PI).rem_euclid(TAU) - PI;
    if a == -PI {
        PI
    } else {
        a
    }
}

pub fn snap_to_rest(velocity: f32) -> f32 {
    if velocity.abs() <= REST_THRESHOLD {
        0.0
    } else {
        velocity
    }
}
