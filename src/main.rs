use std::path::PathBuf;

use clap::Parser;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoop;
use winit::window::Window;

use devops_loop::ambience::Ambience;
use devops_loop::application::Application;
use devops_loop::choreography::Choreography;
use devops_loop::clock::AnimationTime;
use devops_loop::hover::HoverState;
use devops_loop::phase::PhaseName;
use devops_loop::scene::{render, LoopState};
use devops_loop::{LoopError, LoopEvent, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TTF or OTF font for the labels
    #[arg(long)]
    font: Option<PathBuf>,

    /// Seed for floating particles and fire flicker
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 1200)]
    width: u32,

    #[arg(long, default_value_t = 1100)]
    height: u32,

    /// Print the scene at this many seconds as JSON instead of opening a window
    #[arg(long)]
    dump_scene: Option<f32>,

    /// Phase under the pointer in the dumped scene
    #[arg(long)]
    hover: Option<PhaseName>,
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    start();
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn start() {
    if let Err(problem) = run() {
        log::error!("{problem}");
        #[cfg(not(target_arch = "wasm32"))]
        std::process::exit(1);
    }
}

fn run() -> Result<(), LoopError> {
    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        console_log::init_with_level(log::Level::Info)?;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        env_logger::try_init()?;
    }

    #[cfg(target_arch = "wasm32")]
    let args = Args::parse_from(["devops_loop"]);
    #[cfg(not(target_arch = "wasm32"))]
    let args = Args::parse();

    if let Some(seconds) = args.dump_scene {
        return dump_scene(seconds, args.hover, args.seed);
    }

    let settings = Settings {
        font: args.font,
        seed: args.seed,
        width: args.width,
        height: args.height,
    };
    let event_loop = EventLoop::<LoopEvent>::with_user_event().build()?;
    #[allow(unused_mut)]
    let mut window_attributes = Window::default_attributes()
        .with_title("DevOps Infinity Loop")
        .with_inner_size(PhysicalSize::new(settings.width, settings.height));

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::WindowAttributesExtWebSys;

        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("canvas"))
            .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok());
        if canvas.is_none() {
            log::warn!("No element with id 'canvas', winit will append one");
        }
        window_attributes = window_attributes
            .with_canvas(canvas)
            .with_append(true);
    }

    let radio = event_loop.create_proxy();
    #[allow(unused_mut)]
    let mut app = Application::new(settings, window_attributes, radio);

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::EventLoopExtWebSys;
        event_loop.spawn_app(app);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        event_loop.run_app(&mut app)?;
    }
    Ok(())
}

fn dump_scene(seconds: f32, hover: Option<PhaseName>, seed: u64) -> Result<(), LoopError> {
    let state = LoopState {
        time: AnimationTime::from_seconds(seconds),
        hovered: hover.map_or(HoverState::Idle, HoverState::Hovering),
        mounted: true,
    };
    let scene = render(&state, &Ambience::new(seed), &Choreography::default());
    let stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(stdout, &scene)?;
    println!();
    Ok(())
}
