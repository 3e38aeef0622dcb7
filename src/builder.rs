// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Deck building: PDF pages in, deck folder out.
//!
//! Every page is rasterized, saved as a slide background and scanned for
//! markers. Each marker becomes one placement region; pages without
//! markers get no region list at all.

use crate::config::{DescriptorFormat, Resolution};
use crate::content::registry::module_path;
use crate::content::transform::FunctionModule;
use crate::io::markers::{MarkerCorners, MarkerDetector};
use crate::io::pdf::PageRasterizer;
use crate::io::serialization::export_deck;
use crate::loader::DeckPaths;
use crate::models::deck::{Deck, Slide};
use crate::models::region::Region;
use crate::util::geometry::derive_placement;
use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::Path;

/// Module the builder seeds every deck with.
pub const LOOPBACK_MODULE: &str = "loopback";
/// Content reference given to every detected region by default.
pub const DEFAULT_CONTENT: &str = "loopback.process_frame";

/// Builder settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub resolution: Resolution,
    /// Content reference written for every detected region
    pub content: String,
    pub format: DescriptorFormat,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            resolution: Resolution::DEFAULT,
            content: DEFAULT_CONTENT.to_string(),
            format: DescriptorFormat::default(),
        }
    }
}

/// File name of the background for a 0-based page index.
pub fn slide_file_name(page_index: usize) -> String {
    format!("slide_{}.png", page_index + 1)
}

/// Turn one page's markers into regions. No markers means no region list.
pub fn regions_for_page(
    markers: &[MarkerCorners],
    width: u32,
    height: u32,
    content: &str,
) -> Option<Vec<Region>> {
    let regions: Vec<Region> = markers
        .iter()
        .filter_map(|corners| derive_placement(corners, width, height))
        .map(|placement| Region::new(placement, content))
        .collect();
    (!regions.is_empty()).then_some(regions)
}

/// Create the deck folder layout and seed the loopback function module.
pub fn prepare_output(paths: &DeckPaths) -> Result<()> {
    for dir in [&paths.base, &paths.slides, &paths.functions, &paths.videos] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    FunctionModule::loopback().save(&module_path(&paths.functions, LOOPBACK_MODULE))?;
    Ok(())
}

/// Delete descriptors in other formats so a rebuilt deck is never shadowed
/// by an older one.
fn remove_stale_descriptors(base: &Path, keep: DescriptorFormat) -> Result<()> {
    for format in DescriptorFormat::ALL.into_iter().filter(|f| *f != keep) {
        let stale = base.join(format.file_name());
        if stale.is_file() {
            std::fs::remove_file(&stale)
                .with_context(|| format!("removing {}", stale.display()))?;
            log::info!("Removed stale descriptor {}", stale.display());
        }
    }
    Ok(())
}

/// Build a deck folder from a PDF document.
pub fn build_deck(
    document: &Path,
    output_dir: &Path,
    options: &BuildOptions,
    rasterizer: &mut dyn PageRasterizer,
    detector: &mut dyn MarkerDetector,
) -> Result<Deck> {
    let paths = DeckPaths::with_format(output_dir, options.format);
    prepare_output(&paths)?;
    remove_stale_descriptors(&paths.base, options.format)?;

    let pages = rasterizer
        .rasterize(document, options.resolution)
        .with_context(|| format!("rasterizing {}", document.display()))?;
    log::info!("Rasterized {} pages from {}", pages.len(), document.display());

    let mut slides = Vec::with_capacity(pages.len());
    for (index, page) in pages.into_iter().enumerate() {
        let file_name = slide_file_name(index);
        let slide_path = paths.slides.join(&file_name);
        page.save(&slide_path)
            .with_context(|| format!("writing {}", slide_path.display()))?;

        let (width, height) = page.dimensions();
        let gray = DynamicImage::ImageRgb8(page).to_luma8();
        let markers = detector
            .detect(&gray)
            .with_context(|| format!("detecting markers on page {}", index + 1))?;
        log::info!("Page {}: {} markers", index + 1, markers.len());

        let regions = regions_for_page(&markers, width, height, &options.content);
        slides.push(Slide::new(file_name, regions));
    }

    let deck = Deck::new(slides);
    export_deck(&deck, &paths.descriptor)
        .with_context(|| format!("writing {}", paths.descriptor.display()))?;
    log::info!("Slides and descriptor generated in {}", output_dir.display());
    Ok(deck)
}
