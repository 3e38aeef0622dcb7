// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Phi.Slides - interactive slide decks.
//!
//! The builder rasterizes a PDF, finds fiducial markers on every page and
//! writes a deck folder whose descriptor lists normalized placement
//! regions. The runtime loads that folder and presents it, filling each
//! region with the live camera, a looping video or a frame transform.

pub mod builder;
pub mod config;
pub mod content;
pub mod error;
pub mod io;
pub mod loader;
pub mod models;
pub mod presenter;
pub mod render;
pub mod state;
pub mod util;

pub use error::{CameraFailure, SetupError};
pub use io::media::Frame;
