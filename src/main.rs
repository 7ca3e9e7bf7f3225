// main.rs — 桌面宿主：窗口、触摸/鼠标拖拽、帧率控制、状态栏

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // 在 Release 模式下隐藏控制台窗口

mod renderer;

use renderer::Renderer;
use sphere_viewer::math::wrap_angle;
use sphere_viewer::observer::{ChannelObserver, ViewerEvent};
use sphere_viewer::texture::{spawn_load, TextureSource};
use sphere_viewer::{DragTracker, SphereViewer, ViewerConfig, ViewerError};

use glam::Vec2;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, WindowBuilder},
};

type TextureResult = Result<RgbaImage, ViewerError>;

fn to_point(p: PhysicalPosition<f64>) -> Vec2 {
    Vec2::new(p.x as f32, p.y as f32)
}

fn main() {
    env_logger::init();

    let config = match ViewerConfig::from_args(std::env::args().skip(1)) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(2);
        }
    };

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Sphere Viewer")
            .with_inner_size(LogicalSize::new(1280, 720))
            .build(&event_loop)
            .expect("create window"),
    );

    let (events_tx, events_rx) = channel();
    let mut viewer = SphereViewer::new(config, ChannelObserver::new(events_tx));
    viewer.setup();

    let mut renderer = pollster::block_on(Renderer::new(window.clone(), viewer.mesh()));
    if viewer.take_texture_dirty() {
        renderer.set_texture(viewer.texture().image());
    }

    // 交互状态
    let mut drag = DragTracker::default();

    // 帧率控制
    let frame_interval = viewer.frame_interval();
    let mut next_frame = Instant::now();
    let mut last_update = Instant::now();
    let mut fps_window_start = Instant::now();
    let mut frame_count = 0;
    let mut fps = 0.0;

    // UI 状态
    let mut is_fullscreen = false;
    let mut status_message: Option<String> = None;
    let mut pending_texture: Option<Receiver<TextureResult>> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::WaitUntil(next_frame);

        // 后台加载完成的纹理
        if let Some(rx) = &pending_texture {
            if let Ok(result) = rx.try_recv() {
                pending_texture = None;
                if result.is_ok() {
                    status_message = None;
                }
                viewer.set_texture(result);
            }
        }
        if viewer.take_texture_dirty() {
            renderer.set_texture(viewer.texture().image());
        }

        // 宿主通知
        for ev in events_rx.try_iter() {
            match ev {
                ViewerEvent::TextureLoadFailed(msg) => status_message = Some(msg),
                ViewerEvent::MemoryExhausted => {
                    status_message = Some(ViewerError::ResourceExhaustion.to_string())
                }
                ViewerEvent::SetupComplete => log::info!("ready"),
            }
        }

        match event {
            Event::WindowEvent { event, .. } => {
                // 先让 egui 处理事件
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);

                // 拖拽：UI 只拦截按下/开始，松开与移动必须照常处理
                let action = match &event {
                    WindowEvent::CursorMoved { position, .. } => drag.cursor_moved(to_point(*position)),
                    WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                        drag.mouse_button(*state == ElementState::Pressed, response.consumed)
                    }
                    // 触摸：只跟踪第一根手指
                    WindowEvent::Touch(touch) => match touch.phase {
                        TouchPhase::Started => {
                            drag.touch_started(touch.id, to_point(touch.location), response.consumed)
                        }
                        TouchPhase::Moved => drag.touch_moved(touch.id, to_point(touch.location)),
                        TouchPhase::Ended | TouchPhase::Cancelled => drag.touch_ended(touch.id),
                    },
                    _ => None,
                };
                if let Some(action) = action {
                    viewer.apply_drag(action);
                }

                if response.consumed {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                    }

                    // 键盘快捷键
                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed {
                            match input.virtual_keycode {
                                Some(VirtualKeyCode::O) => {
                                    if let Some(path) = pick_image() {
                                        pending_texture = Some(start_load(&viewer, path));
                                    }
                                }
                                Some(VirtualKeyCode::R) => viewer.reset_camera(),
                                Some(VirtualKeyCode::F11) => {
                                    is_fullscreen = !is_fullscreen;
                                    if is_fullscreen {
                                        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                                    } else {
                                        window.set_fullscreen(None);
                                    }
                                }
                                _ => {}
                            }
                        }
                    }

                    WindowEvent::DroppedFile(path) => {
                        pending_texture = Some(start_load(&viewer, path));
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.duration_since(last_update).as_secs_f32();
                last_update = now;

                // FPS 统计
                frame_count += 1;
                let elapsed = now.duration_since(fps_window_start).as_secs_f32();
                if elapsed >= 1.0 {
                    fps = frame_count as f32 / elapsed;
                    frame_count = 0;
                    fps_window_start = now;
                }

                viewer.advance(dt);
                let size = renderer.size;
                renderer.update_camera(viewer.view_projection(size.width as f32, size.height as f32));

                let camera = viewer.camera();
                let fov = viewer.controller().config().fovy_degrees;
                let loading = pending_texture.is_some();
                let message = status_message.clone();
                let render_result = renderer.render_with_ui(&window, |ctx| {
                    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                        ui.horizontal(|ui| {
                            if loading {
                                ui.label(egui::RichText::new("Loading…").color(egui::Color32::YELLOW));
                                ui.label("|");
                            }
                            if let Some(msg) = &message {
                                ui.label(egui::RichText::new(msg).color(egui::Color32::RED));
                                ui.label("|");
                            }
                            ui.label(format!("Yaw: {:.1}°", wrap_angle(camera.yaw).to_degrees()));
                            ui.label("|");
                            ui.label(format!("Pitch: {:.1}°", camera.pitch.to_degrees()));
                            ui.label("|");
                            ui.label(format!("Zoom: {:.2}", camera.distance));
                            ui.label("|");
                            ui.label(format!("FOV: {:.1}°", fov));
                            ui.label("|");
                            ui.label(egui::RichText::new(format!("FPS: {:.1}", fps)).color(egui::Color32::GREEN));
                        });
                    });
                });

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        viewer.handle_memory_warning();
                        renderer.release_scene();
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::error!("render error: {e:?}"),
                }
            }

            Event::MainEventsCleared => {
                let now = Instant::now();
                if now >= next_frame {
                    window.request_redraw();
                    next_frame = now + frame_interval;
                }
                *control_flow = ControlFlow::WaitUntil(next_frame);
            }

            _ => {}
        }
    });
}

fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", &["jpg", "jpeg", "png", "bmp"])
        .pick_file()
}

fn start_load<O: sphere_viewer::ViewerObserver>(
    viewer: &SphereViewer<O>,
    path: PathBuf,
) -> Receiver<TextureResult> {
    spawn_load(TextureSource::Path(path), viewer.texture_options())
}
