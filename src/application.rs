use std::sync::Arc;

use instant::Instant;
use log::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::component::DevOpsLoop;
use crate::keyboard::Keyboard;
use crate::pointer::PointerHandler;
use crate::scene::Scene;
use crate::tessellate::tessellate;
use crate::viewport::Viewport;
use crate::wgpu::background_renderer::BackgroundRenderer;
use crate::wgpu::shape_renderer::ShapeRenderer;
use crate::wgpu::text_renderer::TextRenderer;
use crate::wgpu::Wgpu;
use crate::{LoopError, LoopEvent, Radio, Settings};

/// The GPU side, available once the context arrives over the radio.
struct Graphics {
    wgpu: Wgpu,
    background: BackgroundRenderer,
    shapes: ShapeRenderer,
    text: Option<TextRenderer>,
}

impl Graphics {
    fn new(wgpu: Wgpu, font: Option<Vec<u8>>) -> Self {
        let background = wgpu.create_background_renderer();
        let shapes = wgpu.create_shape_renderer();
        let text = wgpu.create_text_renderer(font);
        Self {
            wgpu,
            background,
            shapes,
            text,
        }
    }

    fn resize(&mut self, size: (u32, u32)) {
        self.wgpu.resize(size);
        if let Some(text) = &mut self.text {
            text.resize(&self.wgpu);
        }
    }

    fn render(&mut self, scene: &Scene, viewport: &Viewport) {
        let surface_texture = match self.wgpu.get_surface_texture() {
            Ok(surface_texture) => surface_texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.wgpu.reconfigure();
                return;
            }
            Err(problem) => {
                error!("Unable to get surface texture: {problem}");
                return;
            }
        };
        self.wgpu.update_projection(viewport.projection());
        self.background.update(&self.wgpu.queue, &scene.backdrop);
        self.shapes.update(&self.wgpu, &tessellate(scene));
        if let Some(text) = &mut self.text {
            text.update(scene, viewport);
        }
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.wgpu.create_encoder();
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            self.background.render(&mut render_pass);
            self.shapes.render(&mut render_pass, &self.wgpu);
            if let Some(text) = &mut self.text {
                text.draw(&mut render_pass, &self.wgpu);
            }
        }
        self.wgpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }
}

pub struct Application {
    settings: Settings,
    window_attributes: WindowAttributes,
    radio: Radio,
    window: Option<Arc<Window>>,
    graphics: Option<Graphics>,
    view: DevOpsLoop,
    scene: Scene,
    viewport: Viewport,
    pointer: PointerHandler,
    keyboard: Keyboard,
}

impl Application {
    pub fn new(settings: Settings, window_attributes: WindowAttributes, radio: Radio) -> Self {
        let view = DevOpsLoop::new(settings.seed);
        let scene = view.render();
        let viewport = Viewport::new(scene.bounds, settings.width, settings.height);
        let keyboard = Keyboard::new(radio.clone()).with_actions();
        info!("Keys: {}", keyboard.legend());
        Self {
            pointer: PointerHandler::new(radio.clone()),
            keyboard,
            settings,
            window_attributes,
            radio,
            window: None,
            graphics: None,
            view,
            scene,
            viewport,
        }
    }

    fn load_font(&self) -> Option<Vec<u8>> {
        match self.settings.font_bytes() {
            Ok(None) => {
                warn!("No font given, text will not be drawn");
                None
            }
            Ok(bytes) => bytes,
            Err(problem) => {
                warn!("Text disabled: {problem}");
                None
            }
        }
    }

    fn refresh_scene(&mut self) {
        self.scene = self.view.render();
        self.request_redraw();
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn toggle_mount(&mut self) {
        if self.view.is_running() {
            self.view.unmount();
        } else {
            self.view.mount(Instant::now());
        }
        self.refresh_scene();
        self.pointer
            .refresh(&self.scene, &self.viewport, self.view.is_running());
    }

    fn quit(&mut self, event_loop: &ActiveEventLoop) {
        self.view.unmount();
        event_loop.exit();
    }
}

impl ApplicationHandler<LoopEvent> for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match event_loop
            .create_window(self.window_attributes.clone())
            .map_err(LoopError::from)
        {
            Ok(window) => {
                let window = Arc::new(window);
                self.window = Some(Arc::clone(&window));
                Wgpu::create_and_send(window, self.radio.clone());
            }
            Err(problem) => {
                error!("{problem}");
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: LoopEvent) {
        match event {
            LoopEvent::ContextCreated(wgpu) => {
                let (width, height) = wgpu.size();
                self.viewport = Viewport::new(self.scene.bounds, width, height);
                self.graphics = Some(Graphics::new(wgpu, self.load_font()));
                self.view.mount(Instant::now());
                self.refresh_scene();
                self.pointer.refresh(&self.scene, &self.viewport, true);
            }
            LoopEvent::Hover(hover_event) => {
                if self.view.hover(hover_event) {
                    self.refresh_scene();
                }
            }
            LoopEvent::ToggleMount => self.toggle_mount(),
            LoopEvent::Quit => self.quit(event_loop),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let running = self.view.is_running();
        if self
            .pointer
            .process_window_event(&event, &self.scene, &self.viewport, running)
        {
            return;
        }
        match event {
            WindowEvent::CloseRequested => self.quit(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(graphics) = &mut self.graphics {
                    graphics.resize((size.width, size.height));
                }
                self.viewport = Viewport::new(self.scene.bounds, size.width, size.height);
                self.request_redraw();
            }
            WindowEvent::KeyboardInput { event, .. } => self.keyboard.handle_key_event(&event),
            WindowEvent::RedrawRequested => {
                if let Some(graphics) = &mut self.graphics {
                    graphics.render(&self.scene, &self.viewport);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.view.advance(Instant::now()) {
            self.refresh_scene();
            self.pointer
                .refresh(&self.scene, &self.viewport, self.view.is_running());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let control_flow = match self.view.next_deadline() {
                Some(deadline) => ControlFlow::WaitUntil(deadline),
                None => ControlFlow::Wait,
            };
            event_loop.set_control_flow(control_flow);
        }
        #[cfg(target_arch = "wasm32")]
        {
            // redraws arrive once per animation frame
            if self.view.is_running() {
                self.request_redraw();
            }
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }
}
