//! `vitrine [OPTIONS_TOML] [GALLERY_TOML]`
//!
//! Opens the gallery in a window. Without arguments the built-in
//! three-portal gallery is shown with default options.

use std::path::Path;

use vitrine::{options::Options, GalleryConfig, Viewer, VitrineError};

fn run() -> Result<(), VitrineError> {
    let mut args = std::env::args().skip(1);
    let options = match args.next() {
        Some(path) => Options::load(Path::new(&path))?,
        None => Options::default(),
    };
    let config = match args.next() {
        Some(path) => GalleryConfig::load(Path::new(&path))?,
        None => GalleryConfig::default(),
    };
    log::info!(
        "opening gallery with {} portals (assets in {})",
        config.portals.len(),
        options.asset_root.display()
    );

    Viewer::builder()
        .with_options(options)
        .with_config(config)
        .build()
        .run()
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
