// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Phi.Slides deck builder
//!
//! Converts a PDF into a deck folder: one PNG per page, a descriptor with
//! the regions found from fiducial markers, and the default function module.

use anyhow::{bail, Context, Result};
use clap::Parser;
use phislides::builder::{build_deck, BuildOptions, DEFAULT_CONTENT};
use phislides::config::{DescriptorFormat, Resolution};
use phislides::io::markers::default_detector;
use phislides::io::pdf::default_rasterizer;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "phislides-build",
    version,
    about = "Convert a PDF to slides with a YAML or JSON deck descriptor"
)]
struct Args {
    /// Path to the input PDF file. A file picker opens when omitted.
    pdf_path: Option<PathBuf>,

    /// Directory to save slides and the descriptor
    #[arg(long, alias = "output_dir", default_value = "output_slides")]
    output_dir: PathBuf,

    /// Slide resolution as WxH
    #[arg(long, alias = "output_resolution", default_value = "2000x1000")]
    resolution: String,

    /// Content reference for every detected region
    #[arg(long, default_value = DEFAULT_CONTENT)]
    content: String,

    /// Descriptor format
    #[arg(long, value_enum, default_value_t = DescriptorFormat::Yaml)]
    format: DescriptorFormat,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let pdf_path = match args.pdf_path {
        Some(path) => path,
        None => rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_title("Select the PDF to convert")
            .pick_file()
            .context("No PDF selected")?,
    };
    if !pdf_path.is_file() {
        bail!("PDF file '{}' not found", pdf_path.display());
    }

    let options = BuildOptions {
        resolution: Resolution::parse_lenient(&args.resolution, Resolution::DEFAULT),
        content: args.content,
        format: args.format,
    };

    let mut rasterizer = default_rasterizer()?;
    let mut detector = default_detector()?;
    let deck = build_deck(
        &pdf_path,
        &args.output_dir,
        &options,
        rasterizer.as_mut(),
        detector.as_mut(),
    )?;

    let with_regions = deck
        .slides
        .iter()
        .filter(|slide| slide.interactive_frames.is_some())
        .count();
    log::info!(
        "{} slides written to {} ({} with regions)",
        deck.len(),
        args.output_dir.display(),
        with_regions
    );
    Ok(())
}
