//! Walk Viewer
//!
//! First-person walk through the demo catacomb scene.
//!
//! Run with: `cargo run --bin walk_viewer [config.json]`
//!
//! Controls:
//! - Left click: Capture the mouse and start walking
//! - WASD / Arrow keys: Move
//! - Shift: Sprint
//! - Space: Jump
//! - Mouse: Look around (while captured)
//! - F: Reload the scene geometry
//! - ESC: Release the mouse (press again to quit)

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use catacombs_engine::camera::{CameraHandle, CameraPose, shared_camera};
use catacombs_engine::config::WalkingConfig;
use catacombs_engine::input::{KeyCode, KeyboardInput, WinitPointerLock};
use catacombs_engine::player::WalkingControls;
use catacombs_engine::render::{GpuContext, GpuContextConfig, WalkMeshPass, WalkUniforms};
use catacombs_engine::world::{WalkableGeometry, catacomb_demo, spawn_point};

/// Ambient term while the flashlight is off
const AMBIENT_LEVEL: f32 = 0.35;

struct WalkViewerApp {
    config: WalkingConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    mesh_pass: Option<WalkMeshPass>,
    controls: Option<WalkingControls>,
    camera: CameraHandle,
    geometry: WalkableGeometry,
    keyboard: KeyboardInput,
    hint_logged: bool,
}

impl WalkViewerApp {
    fn new(config: WalkingConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            mesh_pass: None,
            controls: None,
            camera: shared_camera(CameraPose::with_position(spawn_point())),
            geometry: catacomb_demo(),
            keyboard: KeyboardInput::new(),
            hint_logged: false,
        }
    }

    fn initialize(&mut self, window: Arc<Window>) -> Result<(), catacombs_engine::WalkError> {
        let gpu = GpuContext::new(Arc::clone(&window), GpuContextConfig::default())?;
        let mut mesh_pass = WalkMeshPass::new(&gpu);

        let (width, height) = gpu.dimensions();
        self.camera.borrow_mut().set_viewport(width, height);

        let mut controls = WalkingControls::builder()
            .camera(self.camera.clone())
            .pointer_lock(Box::new(WinitPointerLock::new(Arc::clone(&window))))
            .exit_callback(|| log::info!("Left walking mode"))
            .config(self.config.clone())
            .build()?;
        controls.start(&mut self.geometry, Instant::now())?;
        mesh_pass.upload_geometry(&gpu, &self.geometry);

        println!("Catacombs walk viewer");
        println!("  Click to look around, WASD to walk, Shift to sprint, Space to jump");
        println!("  F reloads the scene, ESC releases the mouse");

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.mesh_pass = Some(mesh_pass);
        self.controls = Some(controls);
        Ok(())
    }

    fn reload_geometry(&mut self) {
        let (Some(controls), Some(gpu), Some(mesh_pass)) =
            (self.controls.as_mut(), self.gpu.as_ref(), self.mesh_pass.as_mut())
        else {
            return;
        };

        let demo = catacomb_demo();
        self.geometry.set_meshes(demo.meshes().to_vec());
        match controls.start(&mut self.geometry, Instant::now()) {
            Ok(()) => {
                mesh_pass.upload_geometry(gpu, &self.geometry);
                self.hint_logged = false;
            }
            Err(e) => log::warn!("Failed to restart walking: {}", e),
        }
    }

    fn handle_key(&mut self, key: WinitKeyCode, pressed: bool) {
        let key = KeyCode::from_winit(key);
        match key {
            KeyCode::Escape if pressed => {
                if let Some(controls) = self.controls.as_mut() {
                    controls.unlock();
                }
            }
            KeyCode::F if pressed => self.reload_geometry(),
            _ => {
                self.keyboard.handle_key(key, pressed);
            }
        }
    }

    fn update(&mut self) {
        let Some(controls) = self.controls.as_mut() else {
            return;
        };

        controls.pump_input(&mut self.keyboard);
        if let Err(e) = controls.poll_pointer_lock() {
            log::warn!("{}", e);
        }
        controls.animate(&self.geometry);

        let now = Instant::now();
        if controls.hint().is_visible(now) && !self.hint_logged {
            log::info!("{}", controls.hint().message());
            self.hint_logged = true;
        }
    }

    fn render(&mut self) {
        let (Some(gpu), Some(mesh_pass), Some(controls)) =
            (self.gpu.as_ref(), self.mesh_pass.as_ref(), self.controls.as_ref())
        else {
            return;
        };

        let uniforms =
            WalkUniforms::from_scene(&self.camera.borrow(), controls.lighting(), AMBIENT_LEVEL);
        mesh_pass.update_uniforms(&gpu.queue, &uniforms);

        match mesh_pass.render(gpu) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(e) => log::warn!("Frame skipped: {:?}", e),
        }
    }

    fn update_title(&self) {
        let (Some(window), Some(controls)) = (&self.window, &self.controls) else {
            return;
        };
        let position = self.camera.borrow().position;
        let mode = if controls.is_locked() { "Walking" } else { "Click to walk" };
        window.set_title(&format!(
            "Catacombs - {} | pos ({:.1}, {:.1}, {:.1})",
            mode, position.x, position.y, position.z
        ));
    }
}

impl ApplicationHandler for WalkViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = WindowAttributes::default()
            .with_title("Catacombs - Click to walk")
            .with_inner_size(PhysicalSize::new(1280, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        if let Err(e) = self.initialize(window) {
            log::error!("Failed to initialize walk viewer: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    let locked = self.controls.as_ref().is_some_and(|c| c.is_locked());
                    if key == WinitKeyCode::Escape && pressed && !locked {
                        event_loop.exit();
                        return;
                    }
                    if !event.repeat {
                        self.handle_key(key, pressed);
                    }
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(controls) = self.controls.as_mut()
                    && !controls.is_locked()
                {
                    controls.lock();
                }
            }
            WindowEvent::Focused(false) => {
                if let Some(controls) = self.controls.as_mut()
                    && controls.is_locked()
                {
                    controls.unlock();
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.dimensions();
                    self.camera.borrow_mut().set_viewport(width, height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.update();
                self.render();
                self.update_title();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event
            && let Some(controls) = self.controls.as_mut()
        {
            controls.on_mouse_move(delta.0 as f32, delta.1 as f32);
        }
    }
}

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match WalkingConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Could not load {}: {}, using defaults", path, e);
                WalkingConfig::default()
            }
        },
        None => WalkingConfig::default(),
    };

    let event_loop = EventLoop::new().expect("failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = WalkViewerApp::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
