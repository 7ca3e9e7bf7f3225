// config.rs
//
// Viewer configuration:
// - All fields have defaults; a JSON file may override any subset.
// - Load order: --config <path> -> env SPHERE_VIEWER_CONFIG -> defaults
// - Texture: --image <path> or the first bare argument overrides `texture`.

use crate::error::{ConfigError, ViewerError};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub const NEAR_PLANE: f32 = 0.01;
pub const FAR_PLANE: f32 = 50.0;

/// UV-sphere resolution. Immutable once the mesh is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereConfig {
    pub stack_count: usize,
    pub slice_count: usize,
    pub radius: f32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            stack_count: 32,
            slice_count: 32,
            radius: 1.0,
        }
    }
}

/// Read-only parameters of the orbit controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub fovy_degrees: f32,
    /// Distance limit along the view axis, always `<= 0`.
    pub max_zoom_out_distance: f32,
    pub drag_feel: f32,
    /// Multiplicative decay applied once per frame, in (0, 1).
    pub friction: f32,
    /// Radians per second.
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        ViewerConfig::default().camera()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub fps: u32,
    pub fovy_degrees: f32,
    pub zoom_out_max: f32,
    pub drag_feel: f32,
    pub friction: f32,
    pub stack_count: usize,
    pub slice_count: usize,
    pub radius: f32,
    pub auto_rotate_speed: f32,
    pub texture: Option<PathBuf>,
    pub origin_bottom_left: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            fovy_degrees: 50.0,
            zoom_out_max: 3.0,
            drag_feel: 50.0,
            friction: 0.9,
            stack_count: 32,
            slice_count: 32,
            radius: 1.0,
            auto_rotate_speed: 0.1,
            texture: None,
            origin_bottom_left: true,
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn sphere(&self) -> SphereConfig {
        SphereConfig {
            stack_count: self.stack_count,
            slice_count: self.slice_count,
            radius: self.radius,
        }
    }

    pub fn camera(&self) -> CameraConfig {
        CameraConfig {
            fovy_degrees: self.fovy_degrees,
            max_zoom_out_distance: -self.zoom_out_max.abs(),
            drag_feel: self.drag_feel,
            friction: self.friction,
            auto_rotate_speed: self.auto_rotate_speed,
        }
    }

    /// Target time between frames. `fps == 0` is treated as 1.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    /// Build the config from CLI args (program name excluded) and the environment.
    pub fn from_args<I>(args: I) -> Result<Self, ViewerError>
    where
        I: IntoIterator<Item = String>,
    {
        // Env: SPHERE_VIEWER_CONFIG
        let env_config = std::env::var("SPHERE_VIEWER_CONFIG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self::resolve(args, env_config)
    }

    /// `--config` wins over `env_config`; neither means defaults.
    pub fn resolve<I>(args: I, env_config: Option<PathBuf>) -> Result<Self, ViewerError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config_path: Option<PathBuf> = None;
        let mut image: Option<PathBuf> = None;

        // CLI: --config <path> / --image <path> / <path>
        let mut it = args.into_iter();
        while let Some(a) = it.next() {
            match a.as_str() {
                "--config" => config_path = it.next().map(PathBuf::from),
                "--image" => image = it.next().map(PathBuf::from),
                _ if !a.starts_with("--") && image.is_none() => image = Some(PathBuf::from(a)),
                _ => log::warn!("ignoring unknown argument {a}"),
            }
        }

        let config_path = config_path.or(env_config);

        let mut config = match config_path {
            Some(p) => {
                log::info!("loading config from {}", p.display());
                Self::load(&p)?
            }
            None => Self::default(),
        };
        if image.is_some() {
            config.texture = image;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(r#"{ "fps": 60, "friction": 0.8 }"#).unwrap();
        assert_eq!(config.fps, 60);
        assert_eq!(config.friction, 0.8);
        assert_eq!(config.stack_count, 32);
        assert_eq!(config.zoom_out_max, 3.0);
        assert!(config.origin_bottom_left);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = ViewerConfig::from_json("{ fps: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ViewerConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn zoom_limit_is_negative() {
        let mut config = ViewerConfig::default();
        assert_eq!(config.camera().max_zoom_out_distance, -3.0);
        config.zoom_out_max = -2.0;
        assert_eq!(config.camera().max_zoom_out_distance, -2.0);
    }

    #[test]
    fn frame_interval_follows_fps() {
        let mut config = ViewerConfig::default();
        config.fps = 50;
        assert_eq!(config.frame_interval(), Duration::from_millis(20));
        config.fps = 0;
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn image_argument_overrides_texture() {
        let config = ViewerConfig::resolve(args(&["--image", "a.jpg"]), None).unwrap();
        assert_eq!(config.texture, Some(PathBuf::from("a.jpg")));

        let config = ViewerConfig::resolve(args(&["b.png"]), None).unwrap();
        assert_eq!(config.texture, Some(PathBuf::from("b.png")));
    }

    #[test]
    fn env_config_is_used_only_without_flag() {
        let env = Some(PathBuf::from("/no/such/env-config.json"));
        let err = ViewerConfig::resolve(args(&[]), env.clone()).unwrap_err();
        assert!(err.to_string().contains("env-config.json"));

        let err = ViewerConfig::resolve(args(&["--config", "/no/such/flag.json"]), env).unwrap_err();
        assert!(err.to_string().contains("flag.json"));
    }

    #[test]
    fn unreadable_config_surfaces_as_viewer_error() {
        let err = ViewerConfig::resolve(args(&["--config", "/no/such/cfg.json"]), None).unwrap_err();
        assert!(matches!(err, ViewerError::Config(ConfigError::Io { .. })));
        assert!(!err.is_texture_unavailable());
    }

    #[test]
    fn split_configs_carry_values() {
        let config = ViewerConfig::default();
        assert_eq!(config.sphere(), SphereConfig::default());
        let camera = config.camera();
        assert_eq!(camera.fovy_degrees, 50.0);
        assert_eq!(camera.drag_feel, 50.0);
        assert_eq!(camera.auto_rotate_speed, 0.1);
    }
}
