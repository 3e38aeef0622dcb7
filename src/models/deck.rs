// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Deck descriptor: the contract between the builder and the runtime.

use super::region::Region;
use serde::{Deserialize, Serialize};

/// File name of the descriptor at the root of a deck folder.
pub const DESCRIPTOR_FILE: &str = "slides.yaml";
/// File name of a descriptor written in JSON.
pub const DESCRIPTOR_JSON_FILE: &str = "slides.json";
/// Folder holding the rendered slide backgrounds.
pub const SLIDES_DIR: &str = "slides";
/// Folder holding video assets referenced by regions.
pub const VIDEOS_DIR: &str = "videos";
/// Folder holding frame transform modules.
pub const FUNCTIONS_DIR: &str = "interactive_functions";

/// One slide: a background image and its placement regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Background image file name, relative to `slides/`.
    pub img_slide: String,
    /// `None` when no markers were found on the page. Serialized as an
    /// explicit `null`, never as an empty list.
    #[serde(default)]
    pub interactive_frames: Option<Vec<Region>>,
}

impl Slide {
    pub fn new(img_slide: impl Into<String>, regions: Option<Vec<Region>>) -> Self {
        Self {
            img_slide: img_slide.into(),
            interactive_frames: regions,
        }
    }

    /// Regions in composite order; empty when absent.
    pub fn regions(&self) -> &[Region] {
        self.interactive_frames.as_deref().unwrap_or(&[])
    }
}

/// Complete deck descriptor for serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}
