use crate::Args;
use gallery_scene::{ConfigError, Gallery, GalleryConfig};
use gallery_window::{GalleryInit, WindowOptions};
use std::error::Error;
use tracing::info;

/// Config file (or defaults) with command line values laid over it.
pub fn resolve_config(args: Args) -> Result<GalleryConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => GalleryConfig::load(path)?,
        None => GalleryConfig::default(),
    };
    if !args.images.is_empty() {
        config.images = args.images;
    }
    if let Some(route) = args.route {
        config.initial_route = route;
    }
    if let Some(title) = args.title {
        config.title = title;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }
    if let Some(fov) = args.fov {
        config.camera.fov_degrees = fov;
    }
    if let Some(damping) = args.damping {
        config.camera.damping = damping;
    }
    config.validate()?;
    Ok(config)
}

/// Resolve the config, install logging, then compose the gallery. Logging
/// comes first so composition warnings reach the subscriber.
pub fn prepare(args: Args) -> Result<(WindowOptions, GalleryInit), ConfigError> {
    let config = resolve_config(args)?;
    gallery_window::init_tracing(&config.log_level);

    let options = WindowOptions {
        title: config.title.clone(),
        size: config.window_size,
        log_level: config.log_level.clone(),
    };
    let init = GalleryInit {
        gallery: Gallery::from_config(&config),
        camera: config.camera.clone(),
    };
    info!("Starting gallery with {} images", config.images.len());
    Ok((options, init))
}

pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let (options, init) = prepare(args)?;
    gallery_window::run_gallery(options, init)
}
