//! Free-look camera demo host

use std::path::PathBuf;

use anyhow::{Context, Result};
use fl_engine::config::{Config, ScrollClamp};
use fl_engine::control::camera::free_look::FreeLook;
use fl_engine::control::controller::{keyboard::Keyboard, mouse::Mouse};
use fl_engine::render::window::WindowDescriptor;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "freelook", about = "Fly a free-look camera around an empty scene")]
struct Opt {
    /// TOML config file; missing values use defaults
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Keep the camera at its starting height
    #[structopt(long)]
    no_fly: bool,

    /// Reproduce the historical scroll clamp that lets fov dip below its minimum
    #[structopt(long)]
    legacy_scroll: bool,

    /// Starting position as x y z
    #[structopt(long, number_of_values = 3, allow_hyphen_values = true)]
    position: Option<Vec<f32>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(if cfg!(debug_assertions) {
            tracing::Level::TRACE
        } else {
            tracing::Level::INFO
        })
        .init();

    let opt = Opt::from_args();

    let mut config = match &opt.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    if opt.no_fly {
        config.camera.can_fly = false;
    }
    if opt.legacy_scroll {
        config.camera.scroll_clamp = ScrollClamp::Legacy;
    }
    if let Some([x, y, z]) = opt.position.as_deref() {
        config.camera.position = [*x, *y, *z];
    }
    tracing::info!(
        "Camera at {:?}, flying {}",
        config.camera.position,
        if config.camera.can_fly { "on" } else { "off" }
    );

    let camera = FreeLook::with_config(&config.camera);
    let keyboard = Keyboard::new(config.keybindings.clone());
    let mouse = Mouse::new(config.window.cursor_locked);

    let app_config = fl_engine::FreeLookAppConfig {
        window: WindowDescriptor::from(&config.window),
        camera: Box::new(camera),
        controllers: vec![Box::new(keyboard), Box::new(mouse)],
        projection: config.projection,
    };

    fl_engine::FreeLookApp::new(app_config)
        .run()
        .context("running the event loop")
}
