// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Deck data model shared by the builder and the runtime.

pub mod deck;
pub mod region;

pub use deck::{Deck, Slide};
pub use region::{ContentRef, Placement, Point, Region};
