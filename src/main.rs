// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Phi.Slides presenter
//!
//! Presents a deck folder produced by `phislides-build` full-screen,
//! compositing the live camera, videos and frame transforms into the
//! marked regions of each slide.

mod app;
mod ui;

use anyhow::Result;
use app::PhiSlidesApp;
use clap::Parser;
use phislides::config::PresenterConfig;
use phislides::content::registry::TransformRegistry;
use phislides::io::media::default_backend;
use phislides::loader::{load_deck, open_camera};
use phislides::presenter::Presenter;
use phislides::render::Compositor;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "phislides", version, about = "Custom slide presentation tool")]
struct Args {
    /// Base folder containing slides.yaml, slides, videos and interactive_functions
    base_folder: PathBuf,

    /// Presenter settings file (default: <base_folder>/presenter.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Camera device index
    #[arg(long)]
    camera_index: Option<i32>,

    /// Run in a window instead of full-screen
    #[arg(long)]
    windowed: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PresenterConfig::load(path)?,
        None => PresenterConfig::load_or_default(&args.base_folder)?,
    };
    if let Some(index) = args.camera_index {
        config.camera_index = index;
    }
    if args.windowed {
        config.fullscreen = false;
    }

    // Validate and open the deck before touching the camera
    let backend = default_backend();
    let mut registry = TransformRegistry::new();
    let deck = load_deck(&args.base_folder, config.canvas, &mut registry, backend.as_ref())?;
    let camera = open_camera(backend.as_ref(), config.camera_index)?;

    let presenter = Presenter::new(
        deck,
        camera,
        Compositor::new(config.content_filter.into()),
        config.mirror_camera,
    );
    let app = PhiSlidesApp::new(presenter, &config.keys);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.canvas.width as f32, config.canvas.height as f32])
            .with_fullscreen(config.fullscreen)
            .with_title(config.window_title.clone()),
        ..Default::default()
    };

    // Run the presentation
    eframe::run_native(
        &config.window_title,
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
