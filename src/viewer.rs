// viewer.rs — 会话对象：配置 -> 网格 -> 相机 -> 纹理状态 -> 宿主通知

use crate::camera::{CameraState, OrbitController};
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::input::DragAction;
use crate::mesh::{generate_sphere, Mesh};
use crate::observer::ViewerObserver;
use crate::texture::{load_texture, TextureOptions, TextureSource};
use glam::{Mat4, Vec2};
use image::RgbaImage;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub enum TextureState {
    #[default]
    None,
    Ready(RgbaImage),
    Unavailable,
}

impl TextureState {
    pub fn image(&self) -> Option<&RgbaImage> {
        match self {
            TextureState::Ready(img) => Some(img),
            _ => None,
        }
    }
}

/// Owns everything the renderer reads each frame. The renderer itself is
/// external: it uploads `mesh()` once and `texture()` whenever
/// `take_texture_dirty()` reports a change.
pub struct SphereViewer<O: ViewerObserver> {
    config: ViewerConfig,
    mesh: Option<Mesh>,
    controller: OrbitController,
    texture: TextureState,
    texture_dirty: bool,
    observer: O,
}

impl<O: ViewerObserver> SphereViewer<O> {
    pub fn new(config: ViewerConfig, observer: O) -> Self {
        let mesh = generate_sphere(&config.sphere());
        let controller = OrbitController::new(config.camera());
        Self {
            config,
            mesh: Some(mesh),
            controller,
            texture: TextureState::None,
            texture_dirty: false,
            observer,
        }
    }

    /// Load the configured texture (if any) and report setup completion.
    /// A texture failure is reported to the observer and the viewer
    /// continues untextured.
    pub fn setup(&mut self) {
        if let Some(path) = self.config.texture.clone() {
            let result = load_texture(&TextureSource::Path(path), &self.texture_options());
            self.set_texture(result);
        }
        self.observer.setup_complete();
    }

    pub fn texture_options(&self) -> TextureOptions {
        TextureOptions {
            origin_bottom_left: self.config.origin_bottom_left,
        }
    }

    /// Accept a decoded texture, typically from `texture::spawn_load`.
    pub fn set_texture(&mut self, result: Result<RgbaImage, ViewerError>) {
        match result {
            Ok(img) => {
                log::info!("texture ready: {}x{}", img.width(), img.height());
                self.texture = TextureState::Ready(img);
            }
            Err(err) => {
                log::warn!("continuing without texture: {err}");
                self.observer.texture_load_failed(&err);
                self.texture = TextureState::Unavailable;
            }
        }
        self.texture_dirty = true;
    }

    /// Returns true once after every texture change.
    pub fn take_texture_dirty(&mut self) -> bool {
        std::mem::take(&mut self.texture_dirty)
    }

    /// Host signalled low memory: drop the mesh and texture we own.
    pub fn handle_memory_warning(&mut self) {
        if self.mesh.take().is_some() {
            log::warn!("memory pressure: releasing sphere mesh and texture");
        }
        if self.texture.image().is_some() {
            self.texture_dirty = true;
        }
        self.texture = TextureState::None;
        self.observer.memory_exhausted();
    }

    pub fn advance(&mut self, dt: f32) {
        self.controller.advance(dt);
    }

    pub fn drag_start(&mut self, point: Vec2) {
        self.controller.on_drag_start(point);
    }

    pub fn drag_move(&mut self, point: Vec2) {
        self.controller.on_drag_move(point);
    }

    pub fn drag_end(&mut self) {
        self.controller.on_drag_end();
    }

    pub fn apply_drag(&mut self, action: DragAction) {
        match action {
            DragAction::Start(p) => self.drag_start(p),
            DragAction::Move(p) => self.drag_move(p),
            DragAction::End => self.drag_end(),
        }
    }

    pub fn reset_camera(&mut self) {
        self.controller.reset();
    }

    /// `projection * view` for a viewport of `width x height`.
    pub fn view_projection(&self, width: f32, height: f32) -> Mat4 {
        let aspect = if height != 0.0 { width / height } else { 1.0 };
        self.controller.projection(aspect) * self.controller.view_transform()
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn texture(&self) -> &TextureState {
        &self.texture
    }

    pub fn camera(&self) -> CameraState {
        self.controller.state()
    }

    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    pub fn frame_interval(&self) -> Duration {
        self.config.frame_interval()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{ChannelObserver, LogObserver, ViewerEvent};
    use std::path::PathBuf;
    use std::sync::mpsc::{channel, Receiver};

    fn viewer(config: ViewerConfig) -> (SphereViewer<ChannelObserver>, Receiver<ViewerEvent>) {
        let (tx, rx) = channel();
        (SphereViewer::new(config, ChannelObserver::new(tx)), rx)
    }

    #[test]
    fn setup_without_texture_only_completes() {
        let (mut v, rx) = viewer(ViewerConfig::default());
        v.setup();
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![ViewerEvent::SetupComplete]);
        assert_eq!(v.mesh().map(Mesh::len), Some(32 * 32 * 6));
        assert!(matches!(v.texture(), TextureState::None));
    }

    #[test]
    fn missing_texture_reports_then_completes() {
        let config = ViewerConfig {
            texture: Some(PathBuf::from("/no/such/sphere.jpg")),
            ..ViewerConfig::default()
        };
        let (mut v, rx) = viewer(config);
        v.setup();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ViewerEvent::TextureLoadFailed(_)));
        assert_eq!(events[1], ViewerEvent::SetupComplete);
        assert!(matches!(v.texture(), TextureState::Unavailable));
        assert!(v.mesh().is_some());
        assert!(v.take_texture_dirty());
        assert!(!v.take_texture_dirty());
    }

    #[test]
    fn log_observer_session_survives_bad_texture() {
        let config = ViewerConfig {
            texture: Some(PathBuf::from("/no/such/sphere.jpg")),
            stack_count: 4,
            slice_count: 4,
            ..ViewerConfig::default()
        };
        let mut v = SphereViewer::new(config, LogObserver);
        v.setup();
        v.advance(1.0 / 30.0);
        assert_eq!(v.mesh().map(Mesh::len), Some(96));
        assert!(v.texture().image().is_none());
    }

    #[test]
    fn memory_warning_releases_resources() {
        let (mut v, rx) = viewer(ViewerConfig::default());
        v.set_texture(Ok(RgbaImage::new(2, 1)));
        v.take_texture_dirty();

        v.handle_memory_warning();
        assert!(v.mesh().is_none());
        assert!(v.texture().image().is_none());
        assert!(v.take_texture_dirty());
        assert_eq!(rx.try_recv(), Ok(ViewerEvent::MemoryExhausted));

        // 第二次只通知
        v.handle_memory_warning();
        assert_eq!(rx.try_recv(), Ok(ViewerEvent::MemoryExhausted));
        assert!(!v.take_texture_dirty());
    }

    #[test]
    fn drags_and_frames_reach_the_controller() {
        let (mut v, _rx) = viewer(ViewerConfig {
            auto_rotate_speed: 0.0,
            ..ViewerConfig::default()
        });
        v.drag_start(Vec2::new(10.0, 10.0));
        v.drag_move(Vec2::new(0.0, 10.0));
        v.drag_end();
        v.advance(0.1);
        assert!(v.camera().yaw > 0.0);

        v.reset_camera();
        assert_eq!(v.camera(), CameraState::default());
    }

    #[test]
    fn tracked_drag_actions_reach_the_controller() {
        use crate::input::DragTracker;

        let (mut v, _rx) = viewer(ViewerConfig {
            auto_rotate_speed: 0.0,
            ..ViewerConfig::default()
        });
        let mut drag = DragTracker::default();
        drag.cursor_moved(Vec2::new(10.0, 10.0));
        for action in [
            drag.mouse_button(true, false),
            drag.cursor_moved(Vec2::new(0.0, 10.0)),
            // 在 UI 上松开仍然结束拖拽
            drag.mouse_button(false, true),
        ]
        .into_iter()
        .flatten()
        {
            v.apply_drag(action);
        }
        assert!(v.controller().state().yaw_velocity > 0.0);
        v.advance(0.1);
        assert!(v.camera().yaw > 0.0);
    }

    #[test]
    fn view_projection_handles_zero_height() {
        let (v, _rx) = viewer(ViewerConfig::default());
        let m = v.view_projection(800.0, 0.0);
        assert!(m.is_finite());
        assert!(m.abs_diff_eq(v.view_projection(10.0, 10.0), 1e-6));
    }
}
