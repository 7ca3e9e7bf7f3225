//! Inertial 360° sphere image viewer core.
//!
//! [`mesh::generate_sphere`] builds the UV-sphere the photo is mapped onto;
//! [`camera::OrbitController`] integrates drag input into yaw/pitch/zoom.
//! [`viewer::SphereViewer`] composes both with texture loading and host
//! notifications. Rendering lives in the binary.

pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod math;
pub mod mesh;
pub mod observer;
pub mod texture;
pub mod viewer;

pub use camera::{CameraState, OrbitController};
pub use config::{CameraConfig, SphereConfig, ViewerConfig};
pub use error::{ConfigError, ViewerError};
pub use input::{DragAction, DragTracker};
pub use mesh::{generate_sphere, Mesh, Vertex};
pub use observer::{ChannelObserver, LogObserver, ViewerEvent, ViewerObserver};
pub use viewer::{SphereViewer, TextureState};
