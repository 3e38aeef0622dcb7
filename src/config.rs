// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Builder and presenter settings.

use crate::models::deck::{DESCRIPTOR_FILE, DESCRIPTOR_JSON_FILE};
use anyhow::{Context, Result};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File name of the optional presenter settings inside a deck folder.
pub const PRESENTER_CONFIG_FILE: &str = "presenter.yaml";

/// Target raster size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Default page raster size for the builder.
    pub const DEFAULT: Resolution = Resolution {
        width: 2000,
        height: 1000,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse `WxH`, `W,H` or `(W, H)`.
    pub fn parse(token: &str) -> Option<Self> {
        let trimmed = token
            .trim()
            .trim_start_matches(['(', '['])
            .trim_end_matches([')', ']']);
        let (w, h) = trimmed
            .split_once(['x', 'X', ','])
            .map(|(w, h)| (w.trim(), h.trim()))?;
        let width = w.parse::<u32>().ok()?;
        let height = h.parse::<u32>().ok()?;
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Parse a resolution token, falling back to `default` with a warning
    /// when the token is malformed.
    pub fn parse_lenient(token: &str, default: Resolution) -> Self {
        Self::parse(token).unwrap_or_else(|| {
            log::warn!("Invalid resolution '{}', using default {}", token, default);
            default
        })
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// On-disk format of a deck descriptor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorFormat {
    #[default]
    Yaml,
    Json,
}

impl DescriptorFormat {
    /// Lookup order when a deck folder is opened.
    pub const ALL: [DescriptorFormat; 2] = [DescriptorFormat::Yaml, DescriptorFormat::Json];

    pub fn file_name(self) -> &'static str {
        match self {
            DescriptorFormat::Yaml => DESCRIPTOR_FILE,
            DescriptorFormat::Json => DESCRIPTOR_JSON_FILE,
        }
    }
}

/// Interpolation filter for resizing region content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Key names (as understood by egui, e.g. `Q`, `ArrowRight`) bound to
/// each presenter command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub quit: Vec<String>,
    pub next: Vec<String>,
    pub previous: Vec<String>,
    pub restart: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            quit: keys(&["Q", "Escape"]),
            next: keys(&["D", "ArrowRight"]),
            previous: keys(&["A", "ArrowLeft"]),
            restart: keys(&["R"]),
        }
    }
}

/// Presentation runtime settings. Every field has a default, so a partial
/// `presenter.yaml` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    /// Backgrounds are resized to this canvas before compositing.
    pub canvas: Resolution,
    pub camera_index: i32,
    /// Mirror the camera horizontally so the feed follows the presenter.
    pub mirror_camera: bool,
    pub fullscreen: bool,
    pub window_title: String,
    pub content_filter: ResizeFilter,
    pub keys: KeyBindings,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            canvas: Resolution::new(1800, 900),
            camera_index: 0,
            mirror_camera: true,
            fullscreen: true,
            window_title: "Phi.Slides".to_string(),
            content_filter: ResizeFilter::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl PresenterConfig {
    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Load `presenter.yaml` from a deck folder, or defaults when absent.
    pub fn load_or_default(base_folder: &Path) -> Result<Self> {
        let path = base_folder.join(PRESENTER_CONFIG_FILE);
        if path.is_file() {
            log::info!("Using presenter settings from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_parse_forms() {
        let expected = Some(Resolution::new(1800, 900));
        assert_eq!(Resolution::parse("1800x900"), expected);
        assert_eq!(Resolution::parse("1800X900"), expected);
        assert_eq!(Resolution::parse("1800,900"), expected);
        assert_eq!(Resolution::parse("(1800, 900)"), expected);
        assert_eq!(Resolution::parse(" 1800 x 900 "), expected);
    }

    #[test]
    fn test_resolution_lenient_fallback() {
        let default = Resolution::DEFAULT;
        assert_eq!(Resolution::parse_lenient("wide", default), default);
        assert_eq!(Resolution::parse_lenient("0x900", default), default);
        assert_eq!(Resolution::parse_lenient("1800", default), default);
        assert_eq!(Resolution::parse_lenient("-5x3", default), default);
        assert_eq!(
            Resolution::parse_lenient("1600x800", default),
            Resolution::new(1600, 800)
        );
    }

    #[test]
    fn test_partial_presenter_config() {
        let config: PresenterConfig = serde_yaml::from_str(
            "canvas:\n  width: 1280\n  height: 720\nkeys:\n  next: [Space]\n",
        )
        .unwrap();
        assert_eq!(config.canvas, Resolution::new(1280, 720));
        assert_eq!(config.keys.next, vec!["Space".to_string()]);
        assert_eq!(config.keys.quit, KeyBindings::default().quit);
        assert!(config.mirror_camera);
        assert_eq!(config.content_filter, ResizeFilter::Lanczos3);
    }
}
