use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

use log::error;
use thiserror::Error;

use crate::hover::HoverEvent;
use crate::wgpu::Wgpu;

pub mod ambience;
pub mod application;
pub mod choreography;
pub mod clock;
pub mod color;
pub mod component;
pub mod geometry;
pub mod hover;
pub mod keyboard;
pub mod phase;
pub mod pointer;
pub mod scene;
pub mod tessellate;
pub mod viewport;
pub mod wgpu;

pub enum LoopEvent {
    ContextCreated(Wgpu),
    Hover(HoverEvent),
    ToggleMount,
    Quit,
}

impl Debug for LoopEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopEvent::ContextCreated(_) => write!(f, "LoopEvent::ContextCreated"),
            LoopEvent::Hover(event) => write!(f, "LoopEvent::Hover({event:?})"),
            LoopEvent::ToggleMount => write!(f, "LoopEvent::ToggleMount"),
            LoopEvent::Quit => write!(f, "LoopEvent::Quit"),
        }
    }
}

pub type Radio = winit::event_loop::EventLoopProxy<LoopEvent>;

impl LoopEvent {
    pub fn send(self, radio: &Radio) {
        if let Err(closed) = radio.send_event(self) {
            error!("Event loop closed, dropped {:?}", closed.0);
        }
    }
}

/// Startup options gathered from the command line.
#[derive(Debug, Clone)]
pub struct Settings {
    pub font: Option<PathBuf>,
    pub seed: u64,
    pub width: u32,
    pub height: u32,
}

impl Settings {
    /// Bytes of the configured font, if one was given.
    pub fn font_bytes(&self) -> Result<Option<Vec<u8>>, LoopError> {
        let Some(path) = &self.font else {
            return Ok(None);
        };
        Ok(Some(std::fs::read(path)?))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font: None,
            seed: 0,
            width: 1200,
            height: 1100,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("unable to create surface: {0}")]
    Surface(#[from] ::wgpu::CreateSurfaceError),
    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] ::wgpu::RequestAdapterError),
    #[error("unable to create device: {0}")]
    Device(#[from] ::wgpu::RequestDeviceError),
    #[error("surface is not supported by the adapter")]
    SurfaceConfiguration,
    #[error("invalid font: {0}")]
    Font(#[from] wgpu_text::glyph_brush::ab_glyph::InvalidFont),
    #[error("unable to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("unable to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
